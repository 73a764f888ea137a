//! mFUSD - Stablecoin dashboard for Movement testnet
//!
//! Run with: cargo run -- [dashboard|stats|deposit-mint|add-collateral|network|switch-network]
//!
//! Reads position and protocol stats from the mFUSD module and submits
//! deposit & mint / add collateral transactions through the connected wallet.

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use console::style;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod amounts;
mod client;
mod config;
mod dashboard;
mod health;
mod notify;
mod wallet;

#[cfg(test)]
mod testing;

use client::{Fullnode, MovementClient};
use config::Config;
use dashboard::{Dashboard, SwitchOutcome};
use notify::{ConsoleNotifier, Notifier};
use wallet::{Wallet, WalletProvider};

#[derive(Parser)]
#[command(name = "mfusd", version, about = "mFUSD stablecoin dashboard for Movement")]
struct Cli {
    /// Load configuration from a TOML file instead of the environment
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive dashboard (default)
    Dashboard,
    /// Print position and protocol statistics
    Stats,
    /// Deposit MOVE collateral and mint mFUSD
    DepositMint {
        /// Collateral amount in MOVE
        #[arg(long)]
        collateral: String,
        /// mFUSD amount to mint
        #[arg(long)]
        mint: String,
    },
    /// Add MOVE collateral to the existing position
    AddCollateral {
        /// Collateral amount in MOVE
        #[arg(long)]
        amount: String,
    },
    /// Show the wallet's network status
    Network,
    /// Ask the wallet to switch to the target network
    SwitchNetwork,
    /// Write the effective configuration to a TOML file
    InitConfig {
        /// Destination file
        path: PathBuf,
    },
}

fn print_banner() {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!(
        "{}",
        style(" 💵 mFUSD - Movement Stablecoin Dashboard").cyan().bold()
    );
    println!(
        "{}",
        style("    Deposit MOVE | Mint mFUSD | Track Collateralization").cyan()
    );
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!();
}

fn print_help() {
    println!("{}", style("Commands:").bold());
    println!("  refresh, r                     Refetch position and protocol stats");
    println!("  deposit <collateral> <mint>    Deposit MOVE and mint mFUSD");
    println!("  add <amount>                   Add MOVE collateral");
    println!("  network, n                     Show network status");
    println!("  switch                         Switch the wallet to the target network");
    println!("  disconnect                     Disconnect the wallet");
    println!("  help, h                        Show this help");
    println!("  quit, q                        Exit");
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mfusd=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    print_banner();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {:#}", e);
        return Err(e);
    }
    config.print_summary();

    if let Some(Command::InitConfig { path }) = &cli.command {
        config.save_to_file(path)?;
        info!("Configuration written to {}", path.display());
        return Ok(());
    }

    let wallet = WalletProvider::init(&config).await;
    let node = MovementClient::from_config(&config)?;
    let mut dashboard = Dashboard::new(&config, wallet, node, ConsoleNotifier::new())?;

    info!("Fullnode: {}", config.fullnode_url);

    let succeeded = match cli.command.unwrap_or(Command::Dashboard) {
        Command::Dashboard => {
            run_interactive(&mut dashboard).await?;
            true
        }
        Command::Stats => {
            dashboard.refresh().await;
            match dashboard.render_stats() {
                Some(stats) => {
                    println!("{}", stats);
                    true
                }
                None => {
                    println!("{}", dashboard.render_network());
                    false
                }
            }
        }
        Command::DepositMint { collateral, mint } => {
            dashboard.deposit_and_mint(&collateral, &mint).await.is_confirmed()
        }
        Command::AddCollateral { amount } => dashboard.add_collateral(&amount).await.is_confirmed(),
        Command::Network => {
            println!("{}", dashboard.render_network());
            dashboard.is_on_target()
        }
        Command::SwitchNetwork => matches!(
            dashboard.switch_network().await,
            SwitchOutcome::Switched | SwitchOutcome::AlreadyOnTarget
        ),
        Command::InitConfig { .. } => true,
    };

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}

/// Line-oriented dashboard session over stdin
async fn run_interactive<W, N, T>(dashboard: &mut Dashboard<W, N, T>) -> Result<()>
where
    W: Wallet,
    N: Fullnode,
    T: Notifier,
{
    dashboard.refresh().await;
    println!("{}", dashboard.render());
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let args: Vec<&str> = line.split_whitespace().collect();

        match args.as_slice() {
            [] => continue,
            ["quit" | "q" | "exit"] => break,
            ["help" | "h"] => print_help(),
            ["refresh" | "r"] => {
                dashboard.force_refresh().await;
                println!("{}", dashboard.render());
            }
            ["deposit", collateral, mint] => {
                if dashboard.deposit_and_mint(collateral, mint).await.is_confirmed() {
                    println!("{}", dashboard.render());
                }
            }
            ["add", amount] => {
                if dashboard.add_collateral(amount).await.is_confirmed() {
                    println!("{}", dashboard.render());
                }
            }
            ["network" | "n"] => println!("{}", dashboard.render_network()),
            ["switch"] => {
                if dashboard.switch_network().await == SwitchOutcome::Switched {
                    println!("{}", dashboard.render());
                }
            }
            ["disconnect"] => {
                dashboard.disconnect();
                println!("{}", dashboard.render());
            }
            _ => {
                println!("{} {}", style("Unknown command:").red(), line.trim());
                print_help();
            }
        }
    }

    info!("Session closed");
    Ok(())
}
