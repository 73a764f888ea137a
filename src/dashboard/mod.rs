//! The dashboard: network status, position/protocol stats and operations
//!
//! The dashboard owns the refresh counter. A confirmed transaction bumps it
//! once, which changes the stats panel's refresh key and forces a refetch.

pub mod network;
pub mod operations;
pub mod stats;

pub use network::{SwitchNetwork, SwitchOutcome};
pub use operations::{OperationOutcome, StablecoinOperations};
pub use stats::StatsPanel;

use console::style;
use eyre::{eyre, Result};

use crate::client::{Fullnode, ModuleId};
use crate::config::Config;
use crate::notify::Notifier;
use crate::wallet::Wallet;

pub struct Dashboard<W, N, T> {
    wallet: W,
    node: N,
    notifier: T,
    stats: StatsPanel,
    operations: StablecoinOperations,
    network: SwitchNetwork,
    refresh_trigger: u64,
    target_chain_id: u64,
    target_network_name: String,
}

impl<W: Wallet, N: Fullnode, T: Notifier> Dashboard<W, N, T> {
    pub fn new(config: &Config, wallet: W, node: N, notifier: T) -> Result<Self> {
        let address = config
            .module_address
            .parse()
            .map_err(|e| eyre!("Invalid module address: {}", e))?;
        let module = ModuleId::new(address, &config.module_name);

        Ok(Self {
            wallet,
            node,
            notifier,
            stats: StatsPanel::new(module.clone(), config.target_chain_id),
            operations: StablecoinOperations::from_config(config, module),
            network: SwitchNetwork::from_config(config),
            refresh_trigger: 0,
            target_chain_id: config.target_chain_id,
            target_network_name: config.target_network_name.clone(),
        })
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn stats(&self) -> &StatsPanel {
        &self.stats
    }

    pub fn refresh_trigger(&self) -> u64 {
        self.refresh_trigger
    }

    pub fn is_on_target(&self) -> bool {
        self.wallet.chain_id() == Some(self.target_chain_id)
    }

    /// Refetch stats if the account, network or refresh counter changed
    pub async fn refresh(&mut self) -> bool {
        self.stats
            .sync(&self.wallet, &self.node, self.refresh_trigger)
            .await
    }

    /// Drop cached reads and fetch again; the refresh counter is left alone
    pub async fn force_refresh(&mut self) -> bool {
        self.stats
            .force(&self.wallet, &self.node, self.refresh_trigger)
            .await
    }

    pub async fn deposit_and_mint(&mut self, collateral: &str, mint: &str) -> OperationOutcome {
        self.operations.deposit_collateral = collateral.to_string();
        self.operations.mint_amount = mint.to_string();

        let trigger = &mut self.refresh_trigger;
        let outcome = self
            .operations
            .deposit_and_mint(&self.wallet, &self.node, &self.notifier, || *trigger += 1)
            .await;

        self.refresh().await;
        outcome
    }

    pub async fn add_collateral(&mut self, amount: &str) -> OperationOutcome {
        self.operations.add_collateral_amount = amount.to_string();

        let trigger = &mut self.refresh_trigger;
        let outcome = self
            .operations
            .add_collateral(&self.wallet, &self.node, &self.notifier, || *trigger += 1)
            .await;

        self.refresh().await;
        outcome
    }

    pub async fn switch_network(&mut self) -> SwitchOutcome {
        let outcome = self
            .network
            .switch_to_target(&mut self.wallet, &self.notifier)
            .await;
        self.refresh().await;
        outcome
    }

    pub fn disconnect(&mut self) {
        self.wallet.disconnect();
        self.notifier.success("Wallet disconnected", None);
    }

    pub fn render_network(&self) -> String {
        self.network.render(&self.wallet)
    }

    /// `None` when off the target network
    pub fn render_stats(&self) -> Option<String> {
        self.stats.render(&self.wallet)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("{}\n", style("mFUSD Stablecoin Interface").bold().cyan()));
        match self.wallet.account() {
            Some(account) => out.push_str(&format!(
                "  Wallet: {} ({})  {}\n",
                account,
                self.wallet.name(),
                style("[disconnect]").dim()
            )),
            None => out.push_str(&format!("  Wallet: {}\n", style("not connected").yellow())),
        }
        if !self.is_on_target() {
            out.push_str(&format!(
                "  {}\n",
                style(format!("⚠️  Please switch to {}", self.target_network_name)).yellow()
            ));
        }
        out.push('\n');

        out.push_str(&self.render_network());
        out.push('\n');

        if let Some(stats) = self.render_stats() {
            out.push_str(&stats);
            out.push('\n');
        }

        out.push_str(&self.operations.render(&self.wallet));
        out
    }
}
