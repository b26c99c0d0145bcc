//! Shared mocks for the send pipeline integration tests.
//!
//! Every collaborator records what it was asked to do in a shared [`Probe`]
//! so tests can assert which stages ran and that the daemon connection was
//! released.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use zeroize::Zeroizing;

use kaspawallet::config::{Network, WalletConfig};
use kaspawallet::wallet::keys::EncryptedMnemonic;
use kaspawallet::wallet::types::{CreateUnsignedTransactions, Mnemonics, TxBlob};
use kaspawallet::wallet::{
    CustodyClient, CustodyConnector, CustodyError, DecryptionError, KeyFileError, KeyMaterialProvider,
    KeysFile, SignError, TransactionSigner,
};
use kaspawallet::{Dispatcher, SendPipeline};

pub const PASSWORD: &str = "correct horse";
pub const TO_ADDRESS: &str = "kaspatest:qqdestination";

/// Call counters shared by all mocks of one harness.
#[derive(Debug, Default)]
pub struct Probe {
    pub key_reads: AtomicUsize,
    pub decrypts: AtomicUsize,
    pub connects: AtomicUsize,
    pub builds: AtomicUsize,
    pub signs: AtomicUsize,
    pub broadcasts: AtomicUsize,
    pub closes: AtomicUsize,
    pub last_build: Mutex<Option<CreateUnsignedTransactions>>,
    pub broadcast_batch: Mutex<Vec<TxBlob>>,
}

impl Probe {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// How the mock keys provider behaves.
#[derive(Debug, Clone)]
pub struct KeysScript {
    pub missing: bool,
    pub public_keys: usize,
    pub mnemonics: usize,
    pub ecdsa: bool,
    pub corrupted: bool,
}

impl Default for KeysScript {
    fn default() -> Self {
        Self {
            missing: false,
            public_keys: 1,
            mnemonics: 1,
            ecdsa: false,
            corrupted: false,
        }
    }
}

/// How the mock wallet daemon behaves.
#[derive(Debug, Clone)]
pub struct DaemonScript {
    pub refuse_connect: bool,
    pub batch: usize,
    pub reject_build: bool,
    pub build_delay: Duration,
    pub reject_broadcast: bool,
    pub broadcast_delay: Duration,
    /// Return fewer ids than transactions submitted.
    pub drop_ids: usize,
}

impl Default for DaemonScript {
    fn default() -> Self {
        Self {
            refuse_connect: false,
            batch: 1,
            reject_build: false,
            build_delay: Duration::ZERO,
            reject_broadcast: false,
            broadcast_delay: Duration::ZERO,
            drop_ids: 0,
        }
    }
}

pub struct MockKeys {
    script: KeysScript,
    probe: Arc<Probe>,
}

impl KeyMaterialProvider for MockKeys {
    fn read_keys_file(&self, network: Network, path: &Path) -> Result<KeysFile, KeyFileError> {
        self.probe.key_reads.fetch_add(1, Ordering::SeqCst);
        if self.script.missing {
            return Err(KeyFileError::Io {
                path: path.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
            });
        }
        let sealed = EncryptedMnemonic {
            cipher: "c2VhbGVk".into(),
            nonce: "bm9uY2U=".into(),
            salt: "c2FsdA==".into(),
        };
        Ok(KeysFile {
            version: 1,
            network,
            public_keys: (0..self.script.public_keys).map(|i| format!("02{:02x}", i)).collect(),
            minimum_signatures: self.script.public_keys.max(1) as u32,
            ecdsa: self.script.ecdsa,
            encrypted_mnemonics: vec![sealed; self.script.mnemonics],
        })
    }

    fn decrypt_mnemonics(&self, keys: &KeysFile, password: &str) -> Result<Mnemonics, DecryptionError> {
        self.probe.decrypts.fetch_add(1, Ordering::SeqCst);
        if self.script.corrupted {
            return Err(DecryptionError::Corrupted("invalid nonce".into()));
        }
        if password != PASSWORD {
            return Err(DecryptionError::AuthenticationFailed);
        }
        Ok(Zeroizing::new(
            (0..keys.encrypted_mnemonics.len()).map(|i| format!("mnemonic {}", i)).collect(),
        ))
    }
}

pub struct MockConnector {
    script: DaemonScript,
    probe: Arc<Probe>,
}

#[async_trait]
impl CustodyConnector for MockConnector {
    async fn connect(&self, address: &str) -> Result<Box<dyn CustodyClient>, CustodyError> {
        self.probe.connects.fetch_add(1, Ordering::SeqCst);
        if self.script.refuse_connect {
            return Err(CustodyError::Unreachable {
                address: address.to_string(),
                reason: "connection refused".into(),
            });
        }
        Ok(Box::new(MockClient {
            script: self.script.clone(),
            probe: Arc::clone(&self.probe),
        }))
    }
}

pub struct MockClient {
    script: DaemonScript,
    probe: Arc<Probe>,
}

#[async_trait]
impl CustodyClient for MockClient {
    async fn create_unsigned_transactions(
        &self,
        request: CreateUnsignedTransactions,
    ) -> Result<Vec<TxBlob>, CustodyError> {
        self.probe.builds.fetch_add(1, Ordering::SeqCst);
        *self.probe.last_build.lock().unwrap() = Some(request);
        tokio::time::sleep(self.script.build_delay).await;
        if self.script.reject_build {
            return Err(CustodyError::Rejected {
                operation: "create unsigned transactions",
                message: "insufficient funds".into(),
            });
        }
        Ok((0..self.script.batch).map(|i| format!("unsigned-{}", i).into_bytes()).collect())
    }

    async fn broadcast(&self, transactions: Vec<TxBlob>) -> Result<Vec<String>, CustodyError> {
        self.probe.broadcasts.fetch_add(1, Ordering::SeqCst);
        *self.probe.broadcast_batch.lock().unwrap() = transactions.clone();
        tokio::time::sleep(self.script.broadcast_delay).await;
        if self.script.reject_broadcast {
            return Err(CustodyError::Rejected {
                operation: "broadcast",
                message: "transaction rejected by mempool".into(),
            });
        }
        let returned = transactions.len().saturating_sub(self.script.drop_ids);
        Ok((0..returned).map(|i| format!("txid-{}", i)).collect())
    }
}

impl Drop for MockClient {
    fn drop(&mut self) {
        self.probe.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Appends a marker per call; fails on the call with index `fail_at`.
pub struct MockSigner {
    fail_at: Option<usize>,
    probe: Arc<Probe>,
}

impl TransactionSigner for MockSigner {
    fn sign(
        &self,
        _network: Network,
        mnemonics: &[String],
        unsigned: &[u8],
        _ecdsa: bool,
    ) -> Result<TxBlob, SignError> {
        let call = self.probe.signs.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(call) {
            return Err(SignError::KeyDerivation("derivation path exhausted".into()));
        }
        let mut signed = unsigned.to_vec();
        signed.extend_from_slice(format!("|signed x{}", mnemonics.len()).as_bytes());
        Ok(signed)
    }
}

/// Test setup; adjust fields then call [`Setup::build`].
pub struct Setup {
    pub keys: KeysScript,
    pub daemon: DaemonScript,
    pub sign_fail_at: Option<usize>,
    pub daemon_timeout_ms: u64,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            keys: KeysScript::default(),
            daemon: DaemonScript::default(),
            sign_fail_at: None,
            daemon_timeout_ms: 2_000,
        }
    }
}

pub struct Harness {
    pub probe: Arc<Probe>,
    pub dispatcher: Dispatcher,
}

impl Setup {
    pub fn build(self) -> Harness {
        let probe = Arc::new(Probe::default());
        let pipeline = SendPipeline::new(
            Arc::new(MockKeys {
                script: self.keys,
                probe: Arc::clone(&probe),
            }),
            Arc::new(MockConnector {
                script: self.daemon,
                probe: Arc::clone(&probe),
            }),
            Arc::new(MockSigner {
                fail_at: self.sign_fail_at,
                probe: Arc::clone(&probe),
            }),
        );
        let config = test_config(self.daemon_timeout_ms);
        Harness {
            probe,
            dispatcher: Dispatcher::new(Arc::new(config), pipeline),
        }
    }

    /// Mock daemon with real key material and signer.
    pub fn build_with(
        self,
        keys: Arc<dyn KeyMaterialProvider>,
        signer: Arc<dyn TransactionSigner>,
        keys_file: PathBuf,
    ) -> Harness {
        let probe = Arc::new(Probe::default());
        let connector = Arc::new(MockConnector {
            script: self.daemon,
            probe: Arc::clone(&probe),
        });
        let mut config = test_config(self.daemon_timeout_ms);
        config.send.keys_file = Some(keys_file);
        Harness {
            probe,
            dispatcher: Dispatcher::new(Arc::new(config), SendPipeline::new(keys, connector, signer)),
        }
    }
}

pub fn test_config(daemon_timeout_ms: u64) -> WalletConfig {
    let mut config = WalletConfig::default();
    config.send.network = Network::Testnet;
    config.send.keys_file = Some(PathBuf::from("/nonexistent/kaspawallet/keys.json"));
    config.send.daemon_timeout_ms = daemon_timeout_ms;
    config.http.enabled = false;
    config
}
