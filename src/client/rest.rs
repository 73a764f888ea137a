//! Movement fullnode REST client

use eyre::{eyre, Result};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use super::types::{
    AccountAddress, AccountData, ApiError, GasEstimation, LedgerInfo, PendingTransaction,
    SignedTransaction, TransactionInfo, UnsignedTransaction, ViewRequest,
};
use super::Fullnode;
use crate::config::Config;

/// Default confirmation timeout, same as the wallet SDKs
const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 20;

const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Client for a single fullnode's REST API (base URL ends in `/v1`)
#[derive(Debug, Clone)]
pub struct MovementClient {
    http_client: Client,
    base_url: String,
    poll_interval: Duration,
    wait_timeout: Duration,
}

impl MovementClient {
    pub fn new(base_url: impl Into<String>, http_timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(http_timeout)
            .build()
            .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            wait_timeout: Duration::from_secs(DEFAULT_WAIT_TIMEOUT_SECS),
        })
    }

    /// Client for the dashboard's read endpoint
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(&config.fullnode_url, config.http_timeout())?
            .with_wait(config.tx_poll_interval(), config.tx_timeout()))
    }

    pub fn with_wait(mut self, poll_interval: Duration, wait_timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.wait_timeout = wait_timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        trace!("GET {}", url);
        let response = self.http_client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path);
        trace!("POST {}", url);
        let response = self.http_client.post(&url).json(body).send().await?;
        Self::decode(response).await
    }

    /// Decode a 2xx body, or turn the node's error body into an error carrying its message
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await.unwrap_or_default();
        Err(api_error(status, &text))
    }

    /// `GET /` - chain ID and ledger position
    pub async fn ledger_info(&self) -> Result<LedgerInfo> {
        self.get("").await
    }

    pub async fn account(&self, address: &AccountAddress) -> Result<AccountData> {
        self.get(&format!("accounts/{}", address)).await
    }

    pub async fn estimate_gas_price(&self) -> Result<GasEstimation> {
        self.get("estimate_gas_price").await
    }

    /// Ask the node for the BCS signing message of a raw transaction (hex)
    pub async fn encode_submission(&self, transaction: &UnsignedTransaction) -> Result<String> {
        self.post("transactions/encode_submission", transaction).await
    }

    pub async fn submit_transaction(&self, transaction: &SignedTransaction) -> Result<PendingTransaction> {
        self.post("transactions", transaction).await
    }

    /// `None` while the node has never seen the hash
    pub async fn transaction_by_hash(&self, hash: &str) -> Result<Option<TransactionInfo>> {
        let url = self.url(&format!("transactions/by_hash/{}", hash));
        let response = self.http_client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::decode(response).await.map(Some)
    }
}

impl Fullnode for MovementClient {
    async fn view(&self, request: &ViewRequest) -> Result<Vec<Value>> {
        debug!("view {}", request.function);
        self.post("view", request).await
    }

    async fn wait_for_transaction(&self, hash: &str) -> Result<TransactionInfo> {
        let started = Instant::now();

        loop {
            let tx = self.transaction_by_hash(hash).await?;
            if let Some(result) = confirmation(hash, tx, started.elapsed(), self.wait_timeout) {
                return result;
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Error for a non-2xx response. The node's `message` is kept verbatim.
fn api_error(status: StatusCode, body: &str) -> eyre::Report {
    match serde_json::from_str::<ApiError>(body) {
        Ok(api_error) => {
            debug!(
                "Fullnode error {} ({:?}, vm code {:?}): {}",
                status, api_error.error_code, api_error.vm_error_code, api_error.message
            );
            eyre!("{}", api_error.message)
        }
        Err(_) => eyre!("Fullnode returned {}: {}", status, body),
    }
}

/// One step of the confirmation loop. `None` means poll again.
fn confirmation(
    hash: &str,
    tx: Option<TransactionInfo>,
    elapsed: Duration,
    timeout: Duration,
) -> Option<Result<TransactionInfo>> {
    match tx {
        Some(tx) if !tx.is_pending() => {
            if tx.is_success() {
                debug!("Transaction {} committed at version {:?}", tx.hash, tx.version);
                Some(Ok(tx))
            } else {
                Some(Err(eyre!(
                    "Transaction {} failed with an error: {}",
                    hash,
                    tx.vm_status.as_deref().unwrap_or("unknown")
                )))
            }
        }
        _ if elapsed >= timeout => Some(Err(eyre!(
            "Waiting for transaction {} timed out after {} seconds",
            hash,
            timeout.as_secs()
        ))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer one request per `(status line, body)` pair, then stop
    async fn serve(responses: Vec<(&'static str, String)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                }
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
        });

        format!("http://{}/v1", addr)
    }

    fn client(url: String) -> MovementClient {
        MovementClient::new(url, Duration::from_secs(5))
            .unwrap()
            .with_wait(Duration::from_millis(1), Duration::from_secs(5))
    }

    fn tx(value: Value) -> TransactionInfo {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_confirmation_steps() {
        let timeout = Duration::from_secs(20);
        let early = Duration::from_secs(1);

        assert!(confirmation("0xaa", None, early, timeout).is_none());
        let pending = tx(json!({"type": "pending_transaction", "hash": "0xaa"}));
        assert!(confirmation("0xaa", Some(pending), early, timeout).is_none());

        let done = tx(json!({"type": "user_transaction", "hash": "0xaa", "version": "9", "success": true}));
        let result = confirmation("0xaa", Some(done), early, timeout).unwrap();
        assert_eq!(result.unwrap().version.as_deref(), Some("9"));

        let aborted = tx(json!({
            "type": "user_transaction",
            "hash": "0xaa",
            "success": false,
            "vm_status": "Move abort: E_INSUFFICIENT_COLLATERAL"
        }));
        let err = confirmation("0xaa", Some(aborted), early, timeout).unwrap().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Transaction 0xaa failed with an error: Move abort: E_INSUFFICIENT_COLLATERAL"
        );
    }

    #[test]
    fn test_confirmation_timeout() {
        let timeout = Duration::from_secs(20);
        let err = confirmation("0xaa", None, timeout, timeout).unwrap().unwrap_err();
        assert_eq!(err.to_string(), "Waiting for transaction 0xaa timed out after 20 seconds");

        // A committed result still wins over the deadline
        let done = tx(json!({"type": "user_transaction", "hash": "0xaa", "success": true}));
        assert!(confirmation("0xaa", Some(done), timeout, timeout).unwrap().is_ok());
    }

    #[test]
    fn test_api_error_keeps_node_message() {
        let body = json!({
            "message": "Account not found by Address(0x1)",
            "error_code": "account_not_found",
            "vm_error_code": null
        })
        .to_string();
        let err = api_error(StatusCode::NOT_FOUND, &body);
        assert_eq!(err.to_string(), "Account not found by Address(0x1)");

        let err = api_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.to_string(), "Fullnode returned 502 Bad Gateway: upstream down");
    }

    #[tokio::test]
    async fn test_unknown_hash_is_none() {
        let body = json!({"message": "Transaction not found by Transaction hash(0xaa)"}).to_string();
        let url = serve(vec![("404 Not Found", body)]).await;

        let found = client(url).transaction_by_hash("0xaa").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_error_body_surfaces_message() {
        let body = json!({"message": "Invalid request", "error_code": "web_framework_error"}).to_string();
        let url = serve(vec![("400 Bad Request", body)]).await;

        let err = client(url).ledger_info().await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid request");
    }

    #[tokio::test]
    async fn test_wait_polls_until_committed() {
        let url = serve(vec![
            ("404 Not Found", json!({"message": "not found"}).to_string()),
            ("200 OK", json!({"type": "pending_transaction", "hash": "0xaa"}).to_string()),
            (
                "200 OK",
                json!({"type": "user_transaction", "hash": "0xaa", "version": "77", "success": true}).to_string(),
            ),
        ])
        .await;

        let info = client(url).wait_for_transaction("0xaa").await.unwrap();
        assert_eq!(info.version.as_deref(), Some("77"));
    }

    #[tokio::test]
    async fn test_wait_reports_vm_failure() {
        let url = serve(vec![(
            "200 OK",
            json!({
                "type": "user_transaction",
                "hash": "0xaa",
                "success": false,
                "vm_status": "Out of gas"
            })
            .to_string(),
        )])
        .await;

        let err = client(url).wait_for_transaction("0xaa").await.unwrap_err();
        assert_eq!(err.to_string(), "Transaction 0xaa failed with an error: Out of gas");
    }

    #[test]
    fn test_url_building() {
        let client = MovementClient::new("https://full.testnet.movementinfra.xyz/v1/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "https://full.testnet.movementinfra.xyz/v1");
        assert_eq!(client.url(""), "https://full.testnet.movementinfra.xyz/v1");
        assert_eq!(client.url("/view"), "https://full.testnet.movementinfra.xyz/v1/view");
        assert_eq!(
            client.url("transactions/by_hash/0xab"),
            "https://full.testnet.movementinfra.xyz/v1/transactions/by_hash/0xab"
        );
    }

    #[test]
    fn test_from_config_uses_wait_settings() {
        let config = Config {
            tx_timeout_secs: 7,
            tx_poll_interval_ms: 250,
            ..Default::default()
        };
        let client = MovementClient::from_config(&config).unwrap();
        assert_eq!(client.wait_timeout, Duration::from_secs(7));
        assert_eq!(client.poll_interval, Duration::from_millis(250));
    }
}
