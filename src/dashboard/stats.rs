//! Position and protocol statistics panel
//!
//! Reads are refetched whenever the (account, on-target-network, refresh
//! trigger) key changes. Read failures never surface as errors: a failed
//! position read shows as "no position", a failed stats read as
//! "unavailable".

use console::style;
use eyre::Result;
use serde_json::Value;
use std::fmt::Write;
use tracing::{debug, error};

use crate::amounts::{bps_to_percent, format_amount, PROTOCOL_MIN_RATIO_PCT};
use crate::client::{view_u64, AccountAddress, Fullnode, ModuleId};
use crate::health::{needs_more_collateral, HealthStatus};
use crate::wallet::Wallet;

pub const GET_POSITION: &str = "get_position";
pub const GET_COLLATERALIZATION_RATIO: &str = "get_collateralization_ratio";
pub const GET_PROTOCOL_STATS: &str = "get_protocol_stats";

/// A user's position as reported by the module (base units)
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub collateral: u64,
    pub minted: u64,
    /// Percent; 0 when nothing is minted
    pub ratio: f64,
}

impl Position {
    pub fn health(&self) -> HealthStatus {
        HealthStatus::classify(self.ratio)
    }

    pub fn is_active(&self) -> bool {
        self.collateral > 0 || self.minted > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolStats {
    pub total_collateral: u64,
    pub total_minted: u64,
}

impl ProtocolStats {
    /// Global collateralization in percent, `None` when nothing is minted
    pub fn global_ratio(&self) -> Option<f64> {
        (self.total_minted > 0)
            .then(|| self.total_collateral as f64 / self.total_minted as f64 * 100.0)
    }
}

/// What the panel last fetched for
#[derive(Debug, Clone, PartialEq, Eq)]
struct RefreshKey {
    account: AccountAddress,
    on_target: bool,
    trigger: u64,
}

pub struct StatsPanel {
    module: ModuleId,
    target_chain_id: u64,
    position: Option<Position>,
    stats: Option<ProtocolStats>,
    last_key: Option<RefreshKey>,
}

impl StatsPanel {
    pub fn new(module: ModuleId, target_chain_id: u64) -> Self {
        Self {
            module,
            target_chain_id,
            position: None,
            stats: None,
            last_key: None,
        }
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn protocol_stats(&self) -> Option<&ProtocolStats> {
        self.stats.as_ref()
    }

    /// Refetch if the refresh key changed. Returns whether a fetch ran.
    pub async fn sync<W: Wallet, N: Fullnode>(&mut self, wallet: &W, node: &N, refresh_trigger: u64) -> bool {
        let on_target = wallet.chain_id() == Some(self.target_chain_id);
        let key = wallet.account().map(|account| RefreshKey {
            account,
            on_target,
            trigger: refresh_trigger,
        });

        if key == self.last_key {
            return false;
        }
        self.last_key = key.clone();

        match key {
            Some(key) if key.on_target => {
                self.fetch_data(node, &key.account).await;
                true
            }
            _ => false,
        }
    }

    /// Fetch now, even when the refresh key is unchanged
    pub async fn force<W: Wallet, N: Fullnode>(&mut self, wallet: &W, node: &N, refresh_trigger: u64) -> bool {
        self.last_key = None;
        self.sync(wallet, node, refresh_trigger).await
    }

    /// Fetch position and protocol stats concurrently
    pub async fn fetch_data<N: Fullnode>(&mut self, node: &N, account: &AccountAddress) {
        let (position, stats) = futures::join!(
            fetch_position(node, &self.module, account),
            fetch_protocol_stats(node, &self.module),
        );

        self.position = match position {
            Ok(position) => Some(position),
            Err(e) => {
                // Also the "no position yet" path: the module aborts
                debug!("No position for {}: {}", account, e);
                None
            }
        };

        self.stats = match stats {
            Ok(stats) => Some(stats),
            Err(e) => {
                error!("Error fetching protocol stats: {}", e);
                None
            }
        };

    }

    /// Panel text, or `None` when the wallet is not on the target network
    pub fn render<W: Wallet>(&self, wallet: &W) -> Option<String> {
        if wallet.chain_id() != Some(self.target_chain_id) {
            return None;
        }

        let mut out = String::new();
        self.render_position(&mut out).ok()?;
        out.push('\n');
        self.render_protocol(&mut out).ok()?;
        Some(out)
    }

    fn render_position(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "{}", style("── Your Position ──").bold())?;

        match &self.position {
            Some(position) if position.is_active() => {
                let health = position.health();
                writeln!(out, "  Collateral Locked:        {} MOVE", format_amount(position.collateral))?;
                writeln!(out, "  mFUSD Minted:             {} mFUSD", format_amount(position.minted))?;
                writeln!(
                    out,
                    "  Collateralization Ratio:  {} {}",
                    health.paint(format!("{:.0}%", position.ratio)).bold(),
                    health.paint(format!("({})", health))
                )?;
                if needs_more_collateral(position.ratio) {
                    writeln!(
                        out,
                        "  {}",
                        style("⚠️  Consider adding collateral to improve your ratio").yellow()
                    )?;
                }
            }
            _ => {
                writeln!(out, "  {}", style("No active position").dim())?;
                writeln!(
                    out,
                    "  {}",
                    style("Deposit collateral and mint mFUSD to get started").dim()
                )?;
            }
        }
        Ok(())
    }

    fn render_protocol(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "{}", style("── Protocol Statistics ──").bold())?;

        match &self.stats {
            Some(stats) => {
                writeln!(out, "  Total Collateral:         {} MOVE", format_amount(stats.total_collateral))?;
                writeln!(out, "  Total mFUSD Supply:       {} mFUSD", format_amount(stats.total_minted))?;
                let global = stats
                    .global_ratio()
                    .map(|r| format!("{:.0}", r))
                    .unwrap_or_else(|| "∞".to_string());
                writeln!(out, "  Global Collateralization: {}%", global)?;
                writeln!(
                    out,
                    "  {}",
                    style(format!(
                        "Min. Required Ratio: {}% • Price: 1 MOVE = 1 USD (fixed)",
                        PROTOCOL_MIN_RATIO_PCT
                    ))
                    .dim()
                )?;
            }
            None => {
                writeln!(out, "  {}", style("Unable to fetch protocol statistics").dim())?;
            }
        }
        Ok(())
    }
}

async fn fetch_position<N: Fullnode>(node: &N, module: &ModuleId, account: &AccountAddress) -> Result<Position> {
    let args = vec![Value::String(account.to_string())];

    let values = node.view(&module.view_request(GET_POSITION, args.clone())).await?;
    let collateral = view_u64(&values, 0)?;
    let minted = view_u64(&values, 1)?;

    let ratio = if minted > 0 {
        let values = node
            .view(&module.view_request(GET_COLLATERALIZATION_RATIO, args))
            .await?;
        bps_to_percent(view_u64(&values, 0)?)
    } else {
        0.0
    };

    Ok(Position { collateral, minted, ratio })
}

async fn fetch_protocol_stats<N: Fullnode>(node: &N, module: &ModuleId) -> Result<ProtocolStats> {
    let values = node.view(&module.view_request(GET_PROTOCOL_STATS, vec![])).await?;
    Ok(ProtocolStats {
        total_collateral: view_u64(&values, 0)?,
        total_minted: view_u64(&values, 1)?,
    })
}
