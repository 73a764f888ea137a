//! Watch-only wallet: an address without a key

use eyre::{eyre, Result};
use tracing::info;

use super::{network_name, NetworkInfo, Wallet};
use crate::client::{AccountAddress, MovementClient, PendingTransaction, TransactionRequest};
use crate::config::Config;

pub struct WatchWallet {
    address: AccountAddress,
    network: NetworkInfo,
    connected: bool,
}

impl WatchWallet {
    pub const NAME: &'static str = "Watch Only";

    pub async fn connect(config: &Config) -> Result<Self> {
        let address: AccountAddress = config
            .wallet_address
            .as_deref()
            .ok_or_else(|| eyre!("WALLET_ADDRESS not set"))?
            .parse()?;

        let client = MovementClient::new(&config.wallet_fullnode_url, config.http_timeout())?;
        let ledger = client.ledger_info().await?;

        info!(
            "✓ Watching {} (chain {}, ledger version {})",
            address,
            ledger.chain_id,
            ledger.ledger_version.as_deref().unwrap_or("?")
        );

        Ok(Self::new(
            address,
            NetworkInfo {
                name: network_name(ledger.chain_id).to_string(),
                chain_id: ledger.chain_id,
                url: Some(client.base_url().to_string()),
            },
        ))
    }

    pub fn new(address: AccountAddress, network: NetworkInfo) -> Self {
        Self {
            address,
            network,
            connected: true,
        }
    }
}

impl Wallet for WatchWallet {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn account(&self) -> Option<AccountAddress> {
        self.connected.then_some(self.address)
    }

    fn network(&self) -> Option<&NetworkInfo> {
        self.connected.then_some(&self.network)
    }

    async fn sign_and_submit_transaction(&self, _request: &TransactionRequest) -> Result<PendingTransaction> {
        Err(eyre!("Watch-only wallet cannot sign transactions. Set WALLET_PRIVATE_KEY to submit."))
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ModuleId;
    use crate::wallet::NetworkChangeRequest;
    use serde_json::json;

    fn wallet() -> WatchWallet {
        WatchWallet::new(
            "0xabc".parse().unwrap(),
            NetworkInfo { name: network_name(250).to_string(), chain_id: 250, url: None },
        )
    }

    #[tokio::test]
    async fn test_watch_wallet_cannot_sign() {
        let wallet = wallet();
        let request = TransactionRequest {
            sender: wallet.account().unwrap(),
            payload: ModuleId::new("0x1".parse().unwrap(), "mfusd")
                .entry_payload("add_collateral", vec![json!("1")]),
        };
        let err = tokio_test::assert_err!(wallet.sign_and_submit_transaction(&request).await);
        assert!(err.to_string().starts_with("Watch-only wallet cannot sign transactions"));
    }

    #[tokio::test]
    async fn test_watch_wallet_cannot_switch() {
        let mut wallet = wallet();
        assert!(!wallet.supports_network_change());
        let request = NetworkChangeRequest {
            chain_id: 250,
            name: "custom".to_string(),
            url: "http://localhost/v1".to_string(),
        };
        let err = tokio_test::assert_err!(wallet.change_network(&request).await);
        assert_eq!(err.to_string(), "Watch Only does not support network switching");
    }
}
