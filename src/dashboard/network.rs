//! Network status and switching
//!
//! Switching is only attempted for wallets that advertise it. Success is
//! reported after a fixed settle delay; the switch itself is not confirmed.

use console::style;
use std::fmt::Write;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::notify::Notifier;
use crate::wallet::{NetworkChangeRequest, Wallet};

/// Name sent with change-network requests for non-builtin networks
const CUSTOM_NETWORK: &str = "custom";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkStatus {
    OnTarget,
    WrongNetwork {
        name: Option<String>,
        chain_id: Option<u64>,
        can_switch: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    AlreadyOnTarget,
    /// Reported after the settle delay, not confirmed
    Switched,
    /// Wallet has no programmatic switch; the user must do it manually
    Unsupported,
    Failed(String),
}

pub struct SwitchNetwork {
    target: NetworkChangeRequest,
    target_name: String,
    settle_delay: Duration,
}

impl SwitchNetwork {
    pub fn new(
        target_chain_id: u64,
        target_name: impl Into<String>,
        target_url: impl Into<String>,
        settle_delay: Duration,
    ) -> Self {
        Self {
            target: NetworkChangeRequest {
                chain_id: target_chain_id,
                name: CUSTOM_NETWORK.to_string(),
                url: target_url.into(),
            },
            target_name: target_name.into(),
            settle_delay,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.target_chain_id,
            &config.target_network_name,
            &config.fullnode_url,
            config.network_switch_delay(),
        )
    }

    pub fn status<W: Wallet>(&self, wallet: &W) -> NetworkStatus {
        if wallet.chain_id() == Some(self.target.chain_id) {
            NetworkStatus::OnTarget
        } else {
            NetworkStatus::WrongNetwork {
                name: wallet.network().map(|n| n.name.clone()),
                chain_id: wallet.chain_id(),
                can_switch: wallet.supports_network_change(),
            }
        }
    }

    pub async fn switch_to_target<W: Wallet, T: Notifier>(&self, wallet: &mut W, notifier: &T) -> SwitchOutcome {
        if wallet.chain_id() == Some(self.target.chain_id) {
            return SwitchOutcome::AlreadyOnTarget;
        }

        notifier.loading(format!("Switching to {}...", self.target_name));

        if !wallet.supports_network_change() {
            notifier.error(format!(
                "Network switching not supported by {}. Please switch to {} manually.",
                wallet.name(),
                self.target_name
            ));
            return SwitchOutcome::Unsupported;
        }

        match wallet.change_network(&self.target).await {
            Ok(()) => {
                // Give the wallet time to settle; nothing is verified
                tokio::time::sleep(self.settle_delay).await;
                info!("Switched {} to chain {}", wallet.name(), self.target.chain_id);
                notifier.success(format!("Switched to {}", self.target_name), None);
                SwitchOutcome::Switched
            }
            Err(e) => {
                let mut message = e.to_string();
                if message.is_empty() {
                    message = format!("Failed to switch to {}", self.target_name);
                }
                warn!("Network switch failed: {}", message);
                notifier.error(message.clone());
                SwitchOutcome::Failed(message)
            }
        }
    }

    pub fn render<W: Wallet>(&self, wallet: &W) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = self.write_panel(&mut out, wallet);
        out
    }

    fn write_panel<W: Wallet>(&self, out: &mut String, wallet: &W) -> std::fmt::Result {
        writeln!(out, "{}", style("── Network Status ──").bold())?;

        match self.status(wallet) {
            NetworkStatus::OnTarget => writeln!(
                out,
                "  Current Network: {} (Chain ID: {})",
                self.target_name, self.target.chain_id
            ),
            NetworkStatus::WrongNetwork { name, chain_id, can_switch } => {
                writeln!(
                    out,
                    "  Current Network: {} (Chain ID: {})",
                    name.as_deref().unwrap_or("Unknown"),
                    chain_id.map(|id| id.to_string()).unwrap_or_else(|| "unknown".to_string())
                )?;
                writeln!(
                    out,
                    "  {}",
                    style(format!("Please switch to {} to use this dApp", self.target_name)).yellow()
                )?;

                if can_switch {
                    writeln!(
                        out,
                        "  {} Switch to {}",
                        style("[switch]").cyan(),
                        self.target_name
                    )
                } else {
                    writeln!(
                        out,
                        "  Please manually switch to {} in your wallet:",
                        self.target_name
                    )?;
                    writeln!(
                        out,
                        "    {}: Chain ID {}",
                        style(&self.target_name).bold(),
                        self.target.chain_id
                    )?;
                    writeln!(
                        out,
                        "  {}",
                        style("Automatic network switching is only available with wallets that support it").dim()
                    )
                }
            }
        }
    }
}
