//! Configuration for the mFUSD dashboard
//!
//! Settings come from environment variables (with `.env` support) or from a
//! TOML file. Defaults point at the Movement testnet deployment.

use eyre::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::client::AccountAddress;

// ============================================
// DEFAULTS
// ============================================

pub const DEFAULT_FULLNODE_URL: &str = "https://full.testnet.movementinfra.xyz/v1";
pub const DEFAULT_CHAIN_ID: u64 = 250;
pub const DEFAULT_NETWORK_NAME: &str = "Movement Testnet";
pub const DEFAULT_MODULE_ADDRESS: &str =
    "0xf9656522a6359b1a81c55e625876d4bd7ecbca623422a9e3f103a84922820f76";
pub const DEFAULT_MODULE_NAME: &str = "mfusd";
pub const DEFAULT_EXPLORER_TX_URL: &str =
    "https://explorer.movementnetwork.xyz/txn/{hash}?network=bardock+testnet";

// ============================================
// MAIN CONFIGURATION
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // ========== Network Settings ==========
    /// Fullnode used for view calls and confirmation polling
    pub fullnode_url: String,

    /// Chain the dashboard operates on (250 = Movement testnet)
    pub target_chain_id: u64,

    /// Display name of the target network
    pub target_network_name: String,

    // ========== Protocol Settings ==========
    /// Account that published the stablecoin module
    pub module_address: String,

    /// Move module name
    pub module_name: String,

    /// Explorer link template, `{hash}` is replaced by the transaction hash
    pub explorer_tx_url: String,

    // ========== Wallet Settings ==========
    /// Ed25519 private key (hex). KEEP SECRET! Never written back to disk.
    #[serde(skip_serializing)]
    pub wallet_private_key: Option<String>,

    /// Account address (watch-only, or override for a rotated key)
    pub wallet_address: Option<String>,

    /// Fullnode the wallet submits through
    pub wallet_fullnode_url: String,

    /// Connect the configured wallet at start-up
    pub auto_connect: bool,

    // ========== Transaction Settings ==========
    pub max_gas_amount: u64,

    /// Fixed gas unit price; estimated from the node when unset
    pub gas_unit_price: Option<u64>,

    /// Seconds until a submitted transaction expires
    pub tx_expiration_secs: u64,

    /// How long to wait for confirmation before giving up
    pub tx_timeout_secs: u64,

    pub tx_poll_interval_ms: u64,

    /// Per-request HTTP timeout
    pub http_timeout_secs: u64,

    /// Delay before reporting a network switch as done
    pub network_switch_delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let fullnode_url = env::var("FULLNODE_URL")
            .unwrap_or_else(|_| DEFAULT_FULLNODE_URL.to_string());

        Ok(Self {
            // Network
            wallet_fullnode_url: env::var("WALLET_FULLNODE_URL")
                .unwrap_or_else(|_| fullnode_url.clone()),
            fullnode_url,
            target_chain_id: parse_var("TARGET_CHAIN_ID", DEFAULT_CHAIN_ID),
            target_network_name: env::var("TARGET_NETWORK_NAME")
                .unwrap_or_else(|_| DEFAULT_NETWORK_NAME.to_string()),

            // Protocol
            module_address: env::var("MFUSD_MODULE_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_MODULE_ADDRESS.to_string()),
            module_name: env::var("MFUSD_MODULE_NAME")
                .unwrap_or_else(|_| DEFAULT_MODULE_NAME.to_string()),
            explorer_tx_url: env::var("EXPLORER_TX_URL")
                .unwrap_or_else(|_| DEFAULT_EXPLORER_TX_URL.to_string()),

            // Wallet
            wallet_private_key: env::var("WALLET_PRIVATE_KEY").ok().filter(|s| !s.is_empty()),
            wallet_address: env::var("WALLET_ADDRESS").ok().filter(|s| !s.is_empty()),
            auto_connect: parse_var("AUTO_CONNECT", true),

            // Transactions
            max_gas_amount: parse_var("MAX_GAS_AMOUNT", 200_000),
            gas_unit_price: env::var("GAS_UNIT_PRICE").ok().and_then(|s| s.parse().ok()),
            tx_expiration_secs: parse_var("TX_EXPIRATION_SECS", 60),
            tx_timeout_secs: parse_var("TX_TIMEOUT_SECS", 20),
            tx_poll_interval_ms: parse_var("TX_POLL_INTERVAL_MS", 500),
            http_timeout_secs: parse_var("HTTP_TIMEOUT_SECS", 30),
            network_switch_delay_ms: parse_var("NETWORK_SWITCH_DELAY_MS", 1_000),
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration before connecting
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("FULLNODE_URL", &self.fullnode_url),
            ("WALLET_FULLNODE_URL", &self.wallet_fullnode_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(eyre::eyre!("Invalid {} - expected an http(s) URL, got {:?}", name, url));
            }
        }

        AccountAddress::from_str(&self.module_address)
            .map_err(|e| eyre::eyre!("Invalid MFUSD_MODULE_ADDRESS: {}", e))?;

        if self.module_name.is_empty() {
            return Err(eyre::eyre!("MFUSD_MODULE_NAME must not be empty"));
        }

        if let Some(key) = &self.wallet_private_key {
            let key = key.trim_start_matches("0x");
            if key.len() != 64 || hex::decode(key).is_err() {
                return Err(eyre::eyre!(
                    "WALLET_PRIVATE_KEY invalid format (should be 64 hex chars)"
                ));
            }
        }

        if let Some(address) = &self.wallet_address {
            AccountAddress::from_str(address)
                .map_err(|e| eyre::eyre!("Invalid WALLET_ADDRESS: {}", e))?;
        }

        if self.max_gas_amount == 0 {
            return Err(eyre::eyre!("MAX_GAS_AMOUNT must be greater than zero"));
        }
        if self.tx_poll_interval_ms == 0 {
            return Err(eyre::eyre!("TX_POLL_INTERVAL_MS must be greater than zero"));
        }

        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn tx_timeout(&self) -> Duration {
        Duration::from_secs(self.tx_timeout_secs)
    }

    pub fn tx_poll_interval(&self) -> Duration {
        Duration::from_millis(self.tx_poll_interval_ms)
    }

    pub fn network_switch_delay(&self) -> Duration {
        Duration::from_millis(self.network_switch_delay_ms)
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("╔════════════════════════════════════════════════════════════╗");
        println!("║              mFUSD DASHBOARD - CONFIGURATION               ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ Network:           {:^40} ║", self.target_network_name);
        println!("║ Chain ID:          {:^40} ║", self.target_chain_id);
        println!("║ Fullnode:          {:^40} ║", truncate(&self.fullnode_url, 40));
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ PROTOCOL                                                   ║");
        println!("║ • Module:          {:^40} ║",
            truncate(&format!("{}::{}", self.module_address, self.module_name), 40)
        );
        println!("║ • Min Ratio:       {:>39}% ║", crate::amounts::PROTOCOL_MIN_RATIO_PCT);
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ WALLET                                                     ║");
        println!("║ • Private Key:     {:^40} ║",
            if self.wallet_private_key.is_some() { "✓ Configured" } else { "✗ Not Set" }
        );
        println!("║ • Address:         {:^40} ║",
            self.wallet_address.as_deref().map(|a| truncate(a, 40)).unwrap_or_else(|| "(derived)".to_string())
        );
        println!("║ • Auto Connect:    {:^40} ║",
            if self.auto_connect { "✓ Enabled" } else { "✗ Disabled" }
        );
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ TRANSACTIONS                                               ║");
        println!("║ • Max Gas:         {:>40} ║", self.max_gas_amount);
        println!("║ • Gas Unit Price:  {:>40} ║",
            self.gas_unit_price.map(|p| p.to_string()).unwrap_or_else(|| "estimated".to_string())
        );
        println!("║ • Confirm Timeout: {:>39}s ║", self.tx_timeout_secs);
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fullnode_url: DEFAULT_FULLNODE_URL.to_string(),
            target_chain_id: DEFAULT_CHAIN_ID,
            target_network_name: DEFAULT_NETWORK_NAME.to_string(),
            module_address: DEFAULT_MODULE_ADDRESS.to_string(),
            module_name: DEFAULT_MODULE_NAME.to_string(),
            explorer_tx_url: DEFAULT_EXPLORER_TX_URL.to_string(),
            wallet_private_key: None,
            wallet_address: None,
            wallet_fullnode_url: DEFAULT_FULLNODE_URL.to_string(),
            auto_connect: true,
            max_gas_amount: 200_000,
            gas_unit_price: None,
            tx_expiration_secs: 60,
            tx_timeout_secs: 20,
            tx_poll_interval_ms: 500,
            http_timeout_secs: 30,
            network_switch_delay_ms: 1_000,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().to_lowercase().parse().ok())
        .unwrap_or(default)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    }
}

// ============================================
// TESTS
// ============================================
