//! Keys file loading and mnemonic decryption.
//!
//! # Security
//! - Mnemonics are stored sealed with AES-256-GCM under an Argon2id key
//! - Decrypted mnemonics live in `Zeroizing` buffers and are never logged
//! - A failed GCM tag check is reported as `AuthenticationFailed`, distinct
//!   from malformed ciphertext

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use zeroize::Zeroizing;

use crate::config::Network;
use crate::wallet::types::{DecryptionError, KeyFileError, Mnemonics};

/// Current on-disk keys file schema version.
pub const KEYS_FILE_VERSION: u8 = 1;

/// Source of key material for the send pipeline.
pub trait KeyMaterialProvider: Send + Sync {
    /// Read and parse the keys file for `network`.
    fn read_keys_file(&self, network: Network, path: &Path) -> Result<KeysFile, KeyFileError>;

    /// Decrypt every mnemonic in `keys` with `password`.
    fn decrypt_mnemonics(&self, keys: &KeysFile, password: &str) -> Result<Mnemonics, DecryptionError>;
}

/// A single sealed mnemonic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedMnemonic {
    pub cipher: String,
    pub nonce: String,
    pub salt: String,
}

/// Serialized keys file written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeysFile {
    pub version: u8,
    pub network: Network,
    /// Public keys of every cosigner, local ones included.
    pub public_keys: Vec<String>,
    pub minimum_signatures: u32,
    /// ECDSA instead of Schnorr signatures.
    #[serde(default)]
    pub ecdsa: bool,
    /// Mnemonics held locally. Fewer than `public_keys` for a partial multisig wallet.
    pub encrypted_mnemonics: Vec<EncryptedMnemonic>,
}

impl KeysFile {
    /// Build a keys file, sealing each mnemonic with `password`.
    pub fn create(
        network: Network,
        mnemonics: &[String],
        public_keys: Vec<String>,
        minimum_signatures: u32,
        ecdsa: bool,
        password: &str,
    ) -> Result<Self, KeyFileError> {
        let encrypted_mnemonics = mnemonics
            .iter()
            .map(|mnemonic| encrypt_mnemonic(mnemonic, password))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            version: KEYS_FILE_VERSION,
            network,
            public_keys,
            minimum_signatures,
            ecdsa,
            encrypted_mnemonics,
        })
    }

    /// Load a keys file from disk and check it belongs to `network`.
    pub fn load(network: Network, path: &Path) -> Result<Self, KeyFileError> {
        let display = path.display().to_string();
        let data = fs::read(path).map_err(|source| KeyFileError::Io {
            path: display.clone(),
            source,
        })?;
        let keys: KeysFile = serde_json::from_slice(&data).map_err(|e| KeyFileError::Parse {
            path: display,
            reason: e.to_string(),
        })?;

        if keys.version != KEYS_FILE_VERSION {
            return Err(KeyFileError::UnsupportedVersion(keys.version));
        }
        if keys.network != network {
            return Err(KeyFileError::NetworkMismatch {
                expected: network.to_string(),
                actual: keys.network.to_string(),
            });
        }
        Ok(keys)
    }

    /// Persist the keys file to disk.
    pub fn save(&self, path: &Path) -> Result<(), KeyFileError> {
        let display = path.display().to_string();
        let io_err = |source| KeyFileError::Io {
            path: display.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let data = serde_json::to_vec_pretty(self).map_err(|e| KeyFileError::Parse {
            path: display.clone(),
            reason: e.to_string(),
        })?;
        fs::write(path, data).map_err(io_err)
    }

    pub fn is_multisig(&self) -> bool {
        self.public_keys.len() > 1
    }

    /// Whether every cosigner key has a local mnemonic.
    pub fn has_all_keys(&self) -> bool {
        self.public_keys.len() <= self.encrypted_mnemonics.len()
    }

    /// Decrypt all mnemonics with `password`.
    pub fn decrypt_mnemonics(&self, password: &str) -> Result<Mnemonics, DecryptionError> {
        let mut mnemonics = Zeroizing::new(Vec::with_capacity(self.encrypted_mnemonics.len()));
        for sealed in &self.encrypted_mnemonics {
            mnemonics.push(decrypt_mnemonic(sealed, password)?);
        }
        Ok(mnemonics)
    }
}

/// Keys files on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileKeyStore;

impl KeyMaterialProvider for FileKeyStore {
    fn read_keys_file(&self, network: Network, path: &Path) -> Result<KeysFile, KeyFileError> {
        KeysFile::load(network, path)
    }

    fn decrypt_mnemonics(&self, keys: &KeysFile, password: &str) -> Result<Mnemonics, DecryptionError> {
        keys.decrypt_mnemonics(password)
    }
}

fn encrypt_mnemonic(mnemonic: &str, password: &str) -> Result<EncryptedMnemonic, KeyFileError> {
    let mut salt = [0u8; 16];
    OsRng.fill_bytes(&mut salt);
    let mut nonce_bytes = [0u8; 12];
    OsRng.fill_bytes(&mut nonce_bytes);

    let key = derive_encryption_key(password, &salt)
        .map_err(|e| KeyFileError::Encryption(e.to_string()))?;
    let cipher = Aes256Gcm::new_from_slice(key.as_slice())
        .map_err(|e| KeyFileError::Encryption(format!("cipher init failed: {e}")))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), mnemonic.as_bytes())
        .map_err(|e| KeyFileError::Encryption(format!("encryption failed: {e}")))?;

    Ok(EncryptedMnemonic {
        cipher: BASE64.encode(ciphertext),
        nonce: BASE64.encode(nonce_bytes),
        salt: BASE64.encode(salt),
    })
}

fn decrypt_mnemonic(sealed: &EncryptedMnemonic, password: &str) -> Result<String, DecryptionError> {
    let ciphertext = BASE64
        .decode(&sealed.cipher)
        .map_err(|e| DecryptionError::Corrupted(format!("invalid ciphertext: {e}")))?;
    let nonce_bytes = BASE64
        .decode(&sealed.nonce)
        .map_err(|e| DecryptionError::Corrupted(format!("invalid nonce: {e}")))?;
    let salt = BASE64
        .decode(&sealed.salt)
        .map_err(|e| DecryptionError::Corrupted(format!("invalid salt: {e}")))?;
    let nonce: [u8; 12] = nonce_bytes
        .as_slice()
        .try_into()
        .map_err(|_| DecryptionError::Corrupted("nonce must be 12 bytes".into()))?;

    let key = derive_encryption_key(password, &salt)?;
    let cipher = Aes256Gcm::new_from_slice(key.as_slice())
        .map_err(|e| DecryptionError::Corrupted(format!("cipher init failed: {e}")))?;
    let plaintext = Zeroizing::new(
        cipher
            .decrypt(Nonce::from_slice(&nonce), ciphertext.as_ref())
            .map_err(|_| DecryptionError::AuthenticationFailed)?,
    );

    String::from_utf8(plaintext.to_vec())
        .map_err(|_| DecryptionError::Corrupted("mnemonic is not valid UTF-8".into()))
}

fn derive_encryption_key(password: &str, salt: &[u8]) -> Result<Zeroizing<[u8; 32]>, DecryptionError> {
    let mut key = Zeroizing::new([0u8; 32]);
    argon2::Argon2::default()
        .hash_password_into(password.as_bytes(), salt, &mut key[..])
        .map_err(|e| DecryptionError::Corrupted(format!("key derivation failed: {e}")))?;
    Ok(key)
}
