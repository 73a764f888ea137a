//! Wallet connection
//!
//! The dashboard talks to wallets through the `Wallet` trait:
//! - `LocalWallet`: ed25519 key from the environment, can sign and switch networks
//! - `WatchWallet`: address only, read-only
//!
//! `WalletProvider` connects the configured wallet once at start-up.

mod local;
mod watch;

pub use local::LocalWallet;
pub use watch::WatchWallet;

use eyre::{eyre, Result};
use tracing::{error, info};

use crate::client::{AccountAddress, PendingTransaction, TransactionRequest};
use crate::config::Config;

/// Network the wallet is currently connected to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInfo {
    pub name: String,
    pub chain_id: u64,
    pub url: Option<String>,
}

/// Request to move a wallet to another network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkChangeRequest {
    pub chain_id: u64,
    pub name: String,
    pub url: String,
}

/// Known chain names, by chain ID
pub fn network_name(chain_id: u64) -> &'static str {
    match chain_id {
        126 => "Movement Mainnet",
        250 => "Movement Testnet",
        _ => "Custom",
    }
}

#[allow(async_fn_in_trait)]
pub trait Wallet {
    fn name(&self) -> &str;

    /// Connected account, `None` when disconnected
    fn account(&self) -> Option<AccountAddress>;

    fn network(&self) -> Option<&NetworkInfo>;

    fn chain_id(&self) -> Option<u64> {
        self.network().map(|n| n.chain_id)
    }

    /// Whether `change_network` is implemented by this wallet
    fn supports_network_change(&self) -> bool {
        false
    }

    async fn change_network(&mut self, _request: &NetworkChangeRequest) -> Result<()> {
        Err(eyre!("{} does not support network switching", self.name()))
    }

    async fn sign_and_submit_transaction(&self, request: &TransactionRequest) -> Result<PendingTransaction>;

    fn disconnect(&mut self);
}

/// Whichever wallet the provider managed to connect
pub enum WalletConnection {
    Local(LocalWallet),
    Watch(WatchWallet),
    Disconnected,
}

impl Wallet for WalletConnection {
    fn name(&self) -> &str {
        match self {
            WalletConnection::Local(w) => w.name(),
            WalletConnection::Watch(w) => w.name(),
            WalletConnection::Disconnected => "None",
        }
    }

    fn account(&self) -> Option<AccountAddress> {
        match self {
            WalletConnection::Local(w) => w.account(),
            WalletConnection::Watch(w) => w.account(),
            WalletConnection::Disconnected => None,
        }
    }

    fn network(&self) -> Option<&NetworkInfo> {
        match self {
            WalletConnection::Local(w) => w.network(),
            WalletConnection::Watch(w) => w.network(),
            WalletConnection::Disconnected => None,
        }
    }

    fn supports_network_change(&self) -> bool {
        match self {
            WalletConnection::Local(w) => w.supports_network_change(),
            WalletConnection::Watch(w) => w.supports_network_change(),
            WalletConnection::Disconnected => false,
        }
    }

    async fn change_network(&mut self, request: &NetworkChangeRequest) -> Result<()> {
        match self {
            WalletConnection::Local(w) => w.change_network(request).await,
            WalletConnection::Watch(w) => w.change_network(request).await,
            WalletConnection::Disconnected => Err(eyre!("Wallet is not connected")),
        }
    }

    async fn sign_and_submit_transaction(&self, request: &TransactionRequest) -> Result<PendingTransaction> {
        match self {
            WalletConnection::Local(w) => w.sign_and_submit_transaction(request).await,
            WalletConnection::Watch(w) => w.sign_and_submit_transaction(request).await,
            WalletConnection::Disconnected => Err(eyre!("Wallet is not connected")),
        }
    }

    fn disconnect(&mut self) {
        match self {
            WalletConnection::Local(w) => w.disconnect(),
            WalletConnection::Watch(w) => w.disconnect(),
            WalletConnection::Disconnected => {}
        }
    }
}

/// Connects the configured wallet at start-up
pub struct WalletProvider;

impl WalletProvider {
    /// Connect according to config. Errors are logged and leave the wallet disconnected.
    pub async fn init(config: &Config) -> WalletConnection {
        if !config.auto_connect {
            info!("Auto-connect disabled, wallet not connected");
            return WalletConnection::Disconnected;
        }

        match Self::connect(config).await {
            Ok(connection) => connection,
            Err(e) => {
                Self::on_error(&e);
                WalletConnection::Disconnected
            }
        }
    }

    /// A private key wins over a watch address
    pub async fn connect(config: &Config) -> Result<WalletConnection> {
        if config.wallet_private_key.is_some() {
            Ok(WalletConnection::Local(LocalWallet::connect(config).await?))
        } else if config.wallet_address.is_some() {
            Ok(WalletConnection::Watch(WatchWallet::connect(config).await?))
        } else {
            info!("No WALLET_PRIVATE_KEY or WALLET_ADDRESS configured");
            Ok(WalletConnection::Disconnected)
        }
    }

    fn on_error(err: &eyre::Report) {
        error!("Wallet error: {:#}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_names() {
        assert_eq!(network_name(250), "Movement Testnet");
        assert_eq!(network_name(126), "Movement Mainnet");
        assert_eq!(network_name(4), "Custom");
    }

    #[tokio::test]
    async fn test_provider_without_wallet_config() {
        let config = Config::default();
        let wallet = WalletProvider::init(&config).await;
        assert!(matches!(wallet, WalletConnection::Disconnected));
        assert!(wallet.account().is_none());
        assert!(wallet.chain_id().is_none());
    }

    #[tokio::test]
    async fn test_provider_respects_auto_connect() {
        let config = Config {
            auto_connect: false,
            wallet_address: Some("0x1".to_string()),
            ..Default::default()
        };
        let wallet = WalletProvider::init(&config).await;
        assert!(matches!(wallet, WalletConnection::Disconnected));
    }

    #[test]
    fn test_watch_connection_delegates() {
        let watch = WatchWallet::new(
            "0x1".parse().unwrap(),
            NetworkInfo { name: "Custom".to_string(), chain_id: 4, url: None },
        );
        let mut connection = WalletConnection::Watch(watch);
        assert_eq!(connection.name(), WatchWallet::NAME);
        assert_eq!(connection.chain_id(), Some(4));
        assert!(!connection.supports_network_change());
        connection.disconnect();
        assert!(connection.account().is_none());
    }
}
