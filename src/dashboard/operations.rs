//! Deposit & mint / add collateral
//!
//! Every submission is user-initiated and never retried. Local checks run
//! before anything touches the network.

use console::style;
use serde_json::Value;
use std::fmt::Write;
use tracing::{info, warn};

use crate::amounts::{
    format_amount, meets_min_collateral, min_collateral_for, parse_amount, DECIMALS,
    PROTOCOL_MIN_RATIO_PCT,
};
use crate::client::{Fullnode, ModuleId, TransactionRequest};
use crate::config::Config;
use crate::notify::Notifier;
use crate::wallet::Wallet;

pub const DEPOSIT_AND_MINT: &str = "deposit_and_mint";
pub const ADD_COLLATERAL: &str = "add_collateral";

/// Result of one button press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    /// Stopped locally; nothing was sent
    Rejected(String),
    Confirmed { hash: String },
    /// Signing, submission or execution failed
    Failed(String),
}

impl OperationOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, OperationOutcome::Confirmed { .. })
    }
}

#[derive(Debug, Clone, Copy)]
enum Action {
    DepositAndMint,
    AddCollateral,
}

impl Action {
    fn function(&self) -> &'static str {
        match self {
            Action::DepositAndMint => DEPOSIT_AND_MINT,
            Action::AddCollateral => ADD_COLLATERAL,
        }
    }
}

pub struct StablecoinOperations {
    // Form inputs, as typed
    pub deposit_collateral: String,
    pub mint_amount: String,
    pub add_collateral_amount: String,

    module: ModuleId,
    target_chain_id: u64,
    target_network_name: String,
    explorer_tx_url: String,
}

impl StablecoinOperations {
    pub fn new(
        module: ModuleId,
        target_chain_id: u64,
        target_network_name: impl Into<String>,
        explorer_tx_url: impl Into<String>,
    ) -> Self {
        Self {
            deposit_collateral: String::new(),
            mint_amount: String::new(),
            add_collateral_amount: String::new(),
            module,
            target_chain_id,
            target_network_name: target_network_name.into(),
            explorer_tx_url: explorer_tx_url.into(),
        }
    }

    pub fn from_config(config: &Config, module: ModuleId) -> Self {
        Self::new(
            module,
            config.target_chain_id,
            &config.target_network_name,
            &config.explorer_tx_url,
        )
    }

    /// Forms are only shown on the target network
    pub fn is_available<W: Wallet>(&self, wallet: &W) -> bool {
        wallet.chain_id() == Some(self.target_chain_id)
    }

    /// Whether the submit buttons are enabled
    pub fn can_submit<W: Wallet>(&self, wallet: &W) -> bool {
        self.is_available(wallet) && wallet.account().is_some()
    }

    fn explorer_url(&self, hash: &str) -> String {
        self.explorer_tx_url.replace("{hash}", hash)
    }

    pub async fn deposit_and_mint<W, N, T, F>(
        &mut self,
        wallet: &W,
        node: &N,
        notifier: &T,
        on_success: F,
    ) -> OperationOutcome
    where
        W: Wallet,
        N: Fullnode,
        T: Notifier,
        F: FnOnce(),
    {
        if self.deposit_collateral.trim().is_empty() || self.mint_amount.trim().is_empty() {
            return reject(notifier, "Please enter both collateral and mint amounts");
        }

        let collateral = match parse_amount(&self.deposit_collateral) {
            Ok(v) => v,
            Err(e) => return reject(notifier, e.to_string()),
        };
        let mint = match parse_amount(&self.mint_amount) {
            Ok(v) => v,
            Err(e) => return reject(notifier, e.to_string()),
        };

        if !meets_min_collateral(collateral, mint) {
            return reject(
                notifier,
                format!(
                    "Need at least {} MOVE collateral for {} mFUSD (>{}% ratio)",
                    format_amount(min_collateral_for(mint)),
                    self.mint_amount.trim(),
                    PROTOCOL_MIN_RATIO_PCT
                ),
            );
        }

        let description = format!(
            "Deposit {} MOVE and mint {} mFUSD",
            format_amount(collateral),
            format_amount(mint)
        );
        self.handle_transaction(
            Action::DepositAndMint,
            vec![collateral, mint],
            description,
            wallet,
            node,
            notifier,
            on_success,
        )
        .await
    }

    pub async fn add_collateral<W, N, T, F>(
        &mut self,
        wallet: &W,
        node: &N,
        notifier: &T,
        on_success: F,
    ) -> OperationOutcome
    where
        W: Wallet,
        N: Fullnode,
        T: Notifier,
        F: FnOnce(),
    {
        if self.add_collateral_amount.trim().is_empty() {
            return reject(notifier, "Please enter collateral amount");
        }

        let amount = match parse_amount(&self.add_collateral_amount) {
            Ok(v) => v,
            Err(e) => return reject(notifier, e.to_string()),
        };

        let description = format!("Add {} MOVE collateral", format_amount(amount));
        self.handle_transaction(
            Action::AddCollateral,
            vec![amount],
            description,
            wallet,
            node,
            notifier,
            on_success,
        )
        .await
    }

    /// Shared submit path: guard, sign+submit, confirm, report.
    /// `&mut self` is held until the transaction resolves, so only one runs at a time.
    #[allow(clippy::too_many_arguments)]
    async fn handle_transaction<W, N, T, F>(
        &mut self,
        action: Action,
        args: Vec<u64>,
        description: String,
        wallet: &W,
        node: &N,
        notifier: &T,
        on_success: F,
    ) -> OperationOutcome
    where
        W: Wallet,
        N: Fullnode,
        T: Notifier,
        F: FnOnce(),
    {
        let Some(sender) = wallet.account() else {
            return reject(notifier, "Please connect your wallet first");
        };
        if !self.is_available(wallet) {
            return reject(notifier, format!("Please switch to {}", self.target_network_name));
        }

        notifier.loading(format!("Processing {}...", description));

        // u64 arguments travel as decimal strings
        let arguments = args.iter().map(|v| Value::String(v.to_string())).collect();
        let request = TransactionRequest {
            sender,
            payload: self.module.entry_payload(action.function(), arguments),
        };

        let result = async {
            let pending = wallet.sign_and_submit_transaction(&request).await?;
            notifier.loading("Transaction submitted. Waiting for confirmation...");
            node.wait_for_transaction(&pending.hash).await?;
            Ok::<_, eyre::Report>(pending.hash)
        }
        .await;

        match result {
            Ok(hash) => {
                info!("{} confirmed: {}", description, hash);
                notifier.success(
                    format!("{} successful!", description),
                    Some(self.explorer_url(&hash)),
                );
                self.clear_fields(action);
                on_success();
                OperationOutcome::Confirmed { hash }
            }
            Err(e) => {
                let mut message = e.to_string();
                if message.is_empty() {
                    message = format!("Failed to {}", description.to_lowercase());
                }
                warn!("{} failed: {}", description, message);
                notifier.error(message.clone());
                OperationOutcome::Failed(message)
            }
        }
    }

    fn clear_fields(&mut self, action: Action) {
        match action {
            Action::DepositAndMint => {
                self.deposit_collateral.clear();
                self.mint_amount.clear();
            }
            Action::AddCollateral => self.add_collateral_amount.clear(),
        }
    }

    /// Forms and info panel, or the network alert off-target
    pub fn render<W: Wallet>(&self, wallet: &W) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = self.write_panel(&mut out, wallet);
        out
    }

    fn write_panel<W: Wallet>(&self, out: &mut String, wallet: &W) -> std::fmt::Result {
        if !self.is_available(wallet) {
            writeln!(out, "{}", style("── Network Alert ──").yellow().bold())?;
            return writeln!(
                out,
                "  {}",
                style(format!(
                    "Please switch to {} to use mFUSD stablecoin operations.",
                    self.target_network_name
                ))
                .yellow()
            );
        }

        let button = |label: &str| {
            if self.can_submit(wallet) {
                style(format!("[{}]", label)).cyan().to_string()
            } else {
                style(format!("[{}] (disabled)", label)).dim().to_string()
            }
        };
        let field = |value: &str| {
            if value.is_empty() {
                style("—".to_string()).dim().to_string()
            } else {
                value.to_string()
            }
        };

        writeln!(out, "{}", style("── mFUSD Stablecoin Operations ──").bold())?;
        writeln!(out, "  Deposit & Mint {}", button("deposit <collateral> <mint>"))?;
        writeln!(out, "    Collateral Amount (MOVE): {}", field(&self.deposit_collateral))?;
        writeln!(out, "    Mint Amount (mFUSD):      {}", field(&self.mint_amount))?;
        writeln!(out, "  Add Collateral {}", button("add <amount>"))?;
        writeln!(out, "    Additional Collateral (MOVE): {}", field(&self.add_collateral_amount))?;
        writeln!(out)?;
        writeln!(out, "{}", style("── Important Information ──").bold())?;
        writeln!(
            out,
            "  • Minimum collateralization ratio: {}% (must deposit >1.5x the mFUSD value)",
            PROTOCOL_MIN_RATIO_PCT
        )?;
        writeln!(
            out,
            "  • All amounts use {} decimal places (1 token = 100,000,000 units)",
            DECIMALS
        )?;
        writeln!(out, "  • 1 MOVE is assumed to equal 1 USD")?;
        writeln!(
            out,
            "  • Positions below {}% can be liquidated by other users",
            PROTOCOL_MIN_RATIO_PCT
        )
    }
}

fn reject<T: Notifier>(notifier: &T, message: impl Into<String>) -> OperationOutcome {
    let message = message.into();
    notifier.error(message.clone());
    OperationOutcome::Rejected(message)
}
