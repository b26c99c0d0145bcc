//! Local transaction signing.
//!
//! # Responsibilities
//! - Derive one secp256k1 key per decrypted mnemonic
//! - Sign the digest of an unsigned transaction with Schnorr or ECDSA
//! - Attach signatures to the payload for broadcast
//!
//! Signed layout: `unsigned || count:u8 || (pubkey || signature) * count`.
//! Schnorr entries carry a 32-byte x-only key, ECDSA entries a 33-byte
//! compressed key; signatures are 64 bytes in both cases.

use secp256k1::{Keypair, Message, PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::config::Network;
use crate::wallet::types::{SignError, TxBlob};

/// Produces one signed transaction from one unsigned transaction.
pub trait TransactionSigner: Send + Sync {
    fn sign(
        &self,
        network: Network,
        mnemonics: &[String],
        unsigned: &[u8],
        ecdsa: bool,
    ) -> Result<TxBlob, SignError>;
}

/// Signs with keys derived directly from the wallet mnemonics.
#[derive(Default)]
pub struct LocalSigner {
    secp: Secp256k1<secp256k1::All>,
}

impl LocalSigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Secret key for `mnemonic` on `network`.
    pub fn derive_secret_key(&self, network: Network, mnemonic: &str) -> Result<SecretKey, SignError> {
        let mut hasher = Sha256::new();
        hasher.update(network.address_prefix().as_bytes());
        hasher.update([0u8]);
        hasher.update(mnemonic.trim().as_bytes());
        let seed = Zeroizing::new(<[u8; 32]>::from(hasher.finalize()));

        SecretKey::from_slice(seed.as_slice()).map_err(|e| SignError::KeyDerivation(e.to_string()))
    }

    /// Hex public key matching what [`LocalSigner::sign`] embeds.
    pub fn public_key_hex(&self, network: Network, mnemonic: &str, ecdsa: bool) -> Result<String, SignError> {
        let secret = self.derive_secret_key(network, mnemonic)?;
        Ok(if ecdsa {
            hex::encode(PublicKey::from_secret_key(&self.secp, &secret).serialize())
        } else {
            let keypair = Keypair::from_secret_key(&self.secp, &secret);
            hex::encode(keypair.x_only_public_key().0.serialize())
        })
    }
}

/// Digest that every cosigner signs.
pub fn signing_digest(unsigned: &[u8]) -> [u8; 32] {
    Sha256::digest(unsigned).into()
}

impl TransactionSigner for LocalSigner {
    fn sign(
        &self,
        network: Network,
        mnemonics: &[String],
        unsigned: &[u8],
        ecdsa: bool,
    ) -> Result<TxBlob, SignError> {
        if mnemonics.is_empty() {
            return Err(SignError::NoMnemonics);
        }
        if unsigned.is_empty() {
            return Err(SignError::EmptyTransaction);
        }
        let count = u8::try_from(mnemonics.len())
            .map_err(|_| SignError::KeyDerivation(format!("too many keys: {}", mnemonics.len())))?;

        let message = Message::from_digest(signing_digest(unsigned));
        let mut signed = Vec::with_capacity(unsigned.len() + 1 + mnemonics.len() * 97);
        signed.extend_from_slice(unsigned);
        signed.push(count);

        for mnemonic in mnemonics {
            let secret = self.derive_secret_key(network, mnemonic)?;
            if ecdsa {
                let public = PublicKey::from_secret_key(&self.secp, &secret);
                let signature = self.secp.sign_ecdsa(&message, &secret);
                signed.extend_from_slice(&public.serialize());
                signed.extend_from_slice(&signature.serialize_compact());
            } else {
                let keypair = Keypair::from_secret_key(&self.secp, &secret);
                let signature = self.secp.sign_schnorr_no_aux_rand(&message, &keypair);
                signed.extend_from_slice(&keypair.x_only_public_key().0.serialize());
                signed.extend_from_slice(signature.as_ref());
            }
        }

        tracing::trace!(
            network = %network,
            signatures = mnemonics.len(),
            ecdsa,
            "Transaction signed"
        );
        Ok(signed)
    }
}
