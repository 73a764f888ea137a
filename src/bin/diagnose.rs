//! Diagnostic tool - Check configuration and fullnode reachability
//!
//! Run with: cargo run --bin diagnose

use serde_json::{json, Value};
use std::env;
use std::time::Duration;

const DEFAULT_FULLNODE_URL: &str = "https://full.testnet.movementinfra.xyz/v1";
const DEFAULT_MODULE_ADDRESS: &str = "0xf9656522a6359b1a81c55e625876d4bd7ecbca623422a9e3f103a84922820f76";

/// Keep the head and tail of long values, counting chars rather than bytes
fn shorten(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 50 {
        return value.to_string();
    }
    let head: String = chars[..20].iter().collect();
    let tail: String = chars[chars.len() - 12..].iter().collect();
    format!("{}...{}", head, tail)
}

fn section(title: &str) {
    println!("\n═══════════════════════════════════════════════════");
    println!("  {}", title);
    println!("═══════════════════════════════════════════════════\n");
}

#[tokio::main]
async fn main() {
    println!("🔍 mFUSD DIAGNOSTIC CHECK\n");

    dotenvy::dotenv().ok();

    section("CONFIGURATION");

    let checks = [
        ("FULLNODE_URL", DEFAULT_FULLNODE_URL, "Fullnode used for reads"),
        ("TARGET_CHAIN_ID", "250", "Chain the dashboard operates on"),
        ("TARGET_NETWORK_NAME", "Movement Testnet", "Display name of the target"),
        ("MFUSD_MODULE_ADDRESS", DEFAULT_MODULE_ADDRESS, "Account hosting the module"),
        ("MFUSD_MODULE_NAME", "mfusd", "Module name"),
        ("AUTO_CONNECT", "true", "Connect the wallet at start-up?"),
        ("TX_TIMEOUT_SECS", "20", "Confirmation timeout"),
    ];

    for (key, default, desc) in checks {
        let value = env::var(key).unwrap_or_else(|_| default.to_string());
        let marker = if env::var(key).is_err() { "(default)" } else { "(from .env)" };
        println!("  {}: {} {}", key, shorten(&value), marker);
        println!("    └─ {}\n", desc);
    }

    section("WALLET");

    let has_key = env::var("WALLET_PRIVATE_KEY").is_ok();
    let has_address = env::var("WALLET_ADDRESS").is_ok();
    println!("  WALLET_PRIVATE_KEY: {}", if has_key { "✅ Set" } else { "❌ Not set" });
    println!("  WALLET_ADDRESS:     {}", if has_address { "✅ Set" } else { "❌ Not set" });
    match (has_key, has_address) {
        (true, _) => println!("\n  🔑 Local key wallet: transactions can be signed"),
        (false, true) => println!("\n  👀 Watch-only wallet: stats only, no transactions"),
        (false, false) => println!("\n  ⚠️  No wallet configured: run `cargo run --bin generate-wallet`"),
    }

    section("FULLNODE");

    let url = env::var("FULLNODE_URL").unwrap_or_else(|_| DEFAULT_FULLNODE_URL.to_string());
    let url = url.trim_end_matches('/').to_string();
    let target: u64 = env::var("TARGET_CHAIN_ID")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(250);

    let client = match reqwest::Client::builder().timeout(Duration::from_secs(10)).build() {
        Ok(client) => client,
        Err(e) => {
            println!("  ❌ Could not build HTTP client: {}", e);
            return;
        }
    };

    match client.get(&url).send().await {
        Ok(resp) => match resp.json::<Value>().await {
            Ok(ledger) => {
                let chain_id = ledger.get("chain_id").and_then(Value::as_u64);
                let version = ledger.get("ledger_version").and_then(Value::as_str).unwrap_or("?");
                println!("  ✅ Reachable: {}", url);
                println!("     Ledger version: {}", version);
                match chain_id {
                    Some(id) if id == target => println!("     Chain ID: {} ✅", id),
                    Some(id) => println!("     Chain ID: {} ⚠️  expected {}", id, target),
                    None => println!("     Chain ID: unknown"),
                }
            }
            Err(e) => println!("  ❌ Unexpected ledger response: {}", e),
        },
        Err(e) => {
            println!("  ❌ Unreachable: {} ({})", url, e);
            println!("\n✅ Diagnostic complete!\n");
            return;
        }
    }

    let module_address = env::var("MFUSD_MODULE_ADDRESS").unwrap_or_else(|_| DEFAULT_MODULE_ADDRESS.to_string());
    let module_name = env::var("MFUSD_MODULE_NAME").unwrap_or_else(|_| "mfusd".to_string());
    let request = json!({
        "function": format!("{}::{}::get_protocol_stats", module_address, module_name),
        "type_arguments": [],
        "arguments": [],
    });

    match client.post(format!("{}/view", url)).json(&request).send().await {
        Ok(resp) if resp.status().is_success() => {
            let values: Vec<Value> = resp.json().await.unwrap_or_default();
            println!("  ✅ Module responds: {}::{}", module_address, module_name);
            if let [collateral, minted, ..] = values.as_slice() {
                println!("     Total collateral (octas): {}", collateral.as_str().unwrap_or("?"));
                println!("     Total minted (units):     {}", minted.as_str().unwrap_or("?"));
            }
        }
        Ok(resp) => {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            println!("  ❌ View call failed ({}): {}", status, body);
        }
        Err(e) => println!("  ❌ View call failed: {}", e),
    }

    println!("\n✅ Diagnostic complete!\n");
}
