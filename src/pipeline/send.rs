//! The send pipeline.
//!
//! # Responsibilities
//! - Sequence key loading, daemon calls and local signing for one send
//! - Short-circuit on the first failing stage
//! - Bound transaction construction and broadcast with separate deadlines
//! - Release the daemon connection on every exit path

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::SendConfig;
use crate::observability::metrics;
use crate::pipeline::amount::parse_sompi;
use crate::pipeline::error::SendError;
use crate::pipeline::request::{PipelineOutcome, PipelineRequest};
use crate::wallet::client::{CustodyConnector, DaemonConnector};
use crate::wallet::keys::{FileKeyStore, KeyMaterialProvider};
use crate::wallet::transaction::{LocalSigner, TransactionSigner};
use crate::wallet::types::{CreateUnsignedTransactions, CustodyError, TxBlob};

/// Orchestrates one send from intent to broadcast.
///
/// Cheap to clone; every run owns its own keys, connection and batches.
#[derive(Clone)]
pub struct SendPipeline {
    keys: Arc<dyn KeyMaterialProvider>,
    custody: Arc<dyn CustodyConnector>,
    signer: Arc<dyn TransactionSigner>,
}

impl SendPipeline {
    pub fn new(
        keys: Arc<dyn KeyMaterialProvider>,
        custody: Arc<dyn CustodyConnector>,
        signer: Arc<dyn TransactionSigner>,
    ) -> Self {
        Self { keys, custody, signer }
    }

    /// Pipeline backed by the keys file on disk, the HTTP wallet daemon and local signing.
    pub fn from_config(config: &SendConfig) -> Self {
        Self::new(
            Arc::new(FileKeyStore),
            Arc::new(DaemonConnector::new(config.connect_timeout())),
            Arc::new(LocalSigner::new()),
        )
    }

    /// Run the pipeline. Always produces exactly one outcome.
    pub async fn execute(&self, request: PipelineRequest) -> PipelineOutcome {
        let send_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "send",
            %send_id,
            network = %request.config.send.network,
            to = %request.to_address,
        );
        let start = Instant::now();

        let result = self.run(&request).instrument(span.clone()).await;

        span.in_scope(|| match &result {
            Ok(tx_ids) => {
                tracing::info!(count = tx_ids.len(), "Send completed");
                metrics::record_send("success", "done", start);
            }
            Err(e) => {
                tracing::warn!(stage = %e.stage(), error = %e, "Send failed");
                metrics::record_send("failure", e.stage().as_str(), start);
            }
        });
        PipelineOutcome::from(result)
    }

    async fn run(&self, request: &PipelineRequest) -> Result<Vec<String>, SendError> {
        let config = &request.config.send;

        let keys = self.keys.read_keys_file(config.network, &config.keys_file_path())?;
        if !keys.has_all_keys() {
            return Err(SendError::IncompleteMultisig {
                public_keys: keys.public_keys.len(),
                mnemonics: keys.encrypted_mnemonics.len(),
            });
        }
        tracing::debug!(
            cosigners = keys.public_keys.len(),
            multisig = keys.is_multisig(),
            ecdsa = keys.ecdsa,
            "Keys file loaded"
        );

        // Dropped on every return below, which closes the connection.
        let daemon = self
            .custody
            .connect(&config.daemon_address)
            .await
            .map_err(SendError::Connection)?;

        let amount = parse_sompi(&request.amount)?;

        let unsigned = bounded(
            config.daemon_timeout(),
            "create unsigned transactions",
            daemon.create_unsigned_transactions(CreateUnsignedTransactions {
                from: config.from_addresses.clone(),
                address: request.to_address.clone(),
                amount,
                is_send_all: false,
                use_existing_change_address: config.use_existing_change_address,
            }),
        )
        .await
        .map_err(SendError::Build)?;
        if unsigned.is_empty() {
            return Err(SendError::Build(CustodyError::Rejected {
                operation: "create unsigned transactions",
                message: "daemon returned no transactions".into(),
            }));
        }
        tracing::debug!(count = unsigned.len(), amount, "Unsigned transactions created");

        // No deadline from here until broadcast: the password may come from a person.
        let mnemonics = {
            let password = request.password.resolve().await?;
            self.keys.decrypt_mnemonics(&keys, &password)?
        };

        let signed = sign_all(self.signer.as_ref(), config, &mnemonics, &unsigned, keys.ecdsa)?;
        drop(mnemonics);

        if signed.len() > 1 {
            tracing::info!(count = signed.len(), "Broadcasting transactions");
        }
        let submitted = signed.len();
        let tx_ids = bounded(config.daemon_timeout(), "broadcast", daemon.broadcast(signed))
            .await
            .map_err(SendError::Broadcast)?;

        if tx_ids.len() != submitted {
            tracing::warn!(
                submitted,
                returned = tx_ids.len(),
                "Daemon returned a different number of transaction IDs"
            );
        }
        tracing::info!(tx_ids = ?tx_ids, "Transactions were sent successfully");
        Ok(tx_ids)
    }
}

/// Sign the whole batch in order. Any failure discards everything signed so far.
fn sign_all(
    signer: &dyn TransactionSigner,
    config: &SendConfig,
    mnemonics: &[String],
    unsigned: &[TxBlob],
    ecdsa: bool,
) -> Result<Vec<TxBlob>, SendError> {
    unsigned
        .iter()
        .enumerate()
        .map(|(index, tx)| {
            signer
                .sign(config.network, mnemonics, tx, ecdsa)
                .map_err(|source| SendError::Signing { index, source })
        })
        .collect()
}

/// Run `call` under a deadline started now.
async fn bounded<T, F>(deadline: Duration, operation: &'static str, call: F) -> Result<T, CustodyError>
where
    F: Future<Output = Result<T, CustodyError>>,
{
    match timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(CustodyError::DeadlineExceeded {
            operation,
            after: deadline,
        }),
    }
}
