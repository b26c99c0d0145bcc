//! Wallet daemon client.
//!
//! # Responsibilities
//! - Open a request-scoped connection to the wallet daemon
//! - Ask the daemon to build unsigned transactions
//! - Submit signed transactions for broadcast
//!
//! The connection is released when the returned handle is dropped. Call
//! deadlines are owned by the caller; this module only bounds connection
//! establishment.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

use crate::wallet::types::{CreateUnsignedTransactions, CustodyError, TxBlob};

/// Opens connections to the custody service.
#[async_trait]
pub trait CustodyConnector: Send + Sync {
    async fn connect(&self, address: &str) -> Result<Box<dyn CustodyClient>, CustodyError>;
}

/// A live, request-scoped connection to the custody service.
#[async_trait]
pub trait CustodyClient: Send + Sync {
    async fn create_unsigned_transactions(
        &self,
        request: CreateUnsignedTransactions,
    ) -> Result<Vec<TxBlob>, CustodyError>;

    async fn broadcast(&self, transactions: Vec<TxBlob>) -> Result<Vec<String>, CustodyError>;
}

/// Body of `POST /create-unsigned-transactions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUnsignedTransactionsRequest {
    pub from: Vec<String>,
    pub address: String,
    pub amount: u64,
    pub is_send_all: bool,
    pub use_existing_change_address: bool,
}

impl From<CreateUnsignedTransactions> for CreateUnsignedTransactionsRequest {
    fn from(req: CreateUnsignedTransactions) -> Self {
        Self {
            from: req.from,
            address: req.address,
            amount: req.amount,
            is_send_all: req.is_send_all,
            use_existing_change_address: req.use_existing_change_address,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUnsignedTransactionsResponse {
    /// Hex-encoded transactions.
    pub unsigned_transactions: Vec<String>,
}

/// Body of `POST /broadcast`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastRequest {
    /// Hex-encoded transactions.
    pub transactions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastResponse {
    pub tx_ids: Vec<String>,
}

/// Error body returned by the daemon on non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonErrorBody {
    pub error: String,
}

/// Connects to the wallet daemon over HTTP.
#[derive(Debug, Clone)]
pub struct DaemonConnector {
    connect_timeout: Duration,
}

impl DaemonConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

/// Normalize a daemon address (`host:port` or full URL) to a base URL.
pub fn daemon_base_url(address: &str) -> Result<Url, CustodyError> {
    let with_scheme = if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{}", address)
    };
    let mut url = Url::parse(&with_scheme).map_err(|e| CustodyError::Unreachable {
        address: address.to_string(),
        reason: format!("invalid daemon address: {}", e),
    })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[async_trait]
impl CustodyConnector for DaemonConnector {
    async fn connect(&self, address: &str) -> Result<Box<dyn CustodyClient>, CustodyError> {
        let base = daemon_base_url(address)?;
        let unreachable = |reason: String| CustodyError::Unreachable {
            address: address.to_string(),
            reason,
        };

        let http = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(|e| unreachable(e.to_string()))?;

        let health = base.join("health").map_err(|e| unreachable(e.to_string()))?;
        match timeout(self.connect_timeout, http.get(health).send()).await {
            Ok(Ok(response)) if response.status().is_success() => {}
            Ok(Ok(response)) => {
                return Err(unreachable(format!("health probe returned {}", response.status())));
            }
            Ok(Err(e)) => return Err(unreachable(e.to_string())),
            Err(_) => {
                return Err(unreachable(format!(
                    "no response within {:?}",
                    self.connect_timeout
                )));
            }
        }

        tracing::debug!(daemon = %base, "Connected to wallet daemon");
        Ok(Box::new(DaemonClient { http, base }))
    }
}

/// HTTP connection to the wallet daemon.
#[derive(Debug)]
pub struct DaemonClient {
    http: reqwest::Client,
    base: Url,
}

impl DaemonClient {
    async fn post<Req, Resp>(&self, operation: &'static str, path: &str, body: &Req) -> Result<Resp, CustodyError>
    where
        Req: Serialize + Sync,
        Resp: for<'de> Deserialize<'de>,
    {
        let transport = |reason: String| CustodyError::Transport { operation, reason };

        let url = self.base.join(path).map_err(|e| transport(e.to_string()))?;
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<DaemonErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("status {}: {}", status, text));
            return Err(CustodyError::Rejected { operation, message });
        }

        response.json::<Resp>().await.map_err(|e| transport(e.to_string()))
    }
}

#[async_trait]
impl CustodyClient for DaemonClient {
    async fn create_unsigned_transactions(
        &self,
        request: CreateUnsignedTransactions,
    ) -> Result<Vec<TxBlob>, CustodyError> {
        const OP: &str = "create unsigned transactions";
        let body = CreateUnsignedTransactionsRequest::from(request);
        let response: CreateUnsignedTransactionsResponse =
            self.post(OP, "create-unsigned-transactions", &body).await?;

        response
            .unsigned_transactions
            .iter()
            .map(|tx| {
                hex::decode(tx).map_err(|e| CustodyError::Transport {
                    operation: OP,
                    reason: format!("invalid transaction encoding: {}", e),
                })
            })
            .collect()
    }

    async fn broadcast(&self, transactions: Vec<TxBlob>) -> Result<Vec<String>, CustodyError> {
        let body = BroadcastRequest {
            transactions: transactions.iter().map(hex::encode).collect(),
        };
        let response: BroadcastResponse = self.post("broadcast", "broadcast", &body).await?;
        Ok(response.tx_ids)
    }
}

impl Drop for DaemonClient {
    fn drop(&mut self) {
        tracing::debug!(daemon = %self.base, "Wallet daemon connection closed");
    }
}
