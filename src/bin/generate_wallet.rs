//! Wallet Generation Utility
//!
//! Run with: cargo run --bin generate-wallet
//!
//! Generates a new ed25519 key for the local signing wallet and prints the
//! Movement account address derived from it.

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use sha3::{Digest, Sha3_256};

/// Authentication key scheme byte for single ed25519 keys
const ED25519_SCHEME: u8 = 0x00;

fn account_address(signing_key: &SigningKey) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update(signing_key.verifying_key().as_bytes());
    hasher.update([ED25519_SCHEME]);
    format!("0x{}", hex::encode(hasher.finalize()))
}

fn main() {
    println!();
    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║          mFUSD WALLET GENERATOR                            ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();

    let signing_key = SigningKey::generate(&mut OsRng);
    let address = account_address(&signing_key);
    let private_key = format!("0x{}", hex::encode(signing_key.to_bytes()));

    println!("🔑 NEW WALLET GENERATED");
    println!();
    println!("   Address:     {}", address);
    println!("   Public Key:  0x{}", hex::encode(signing_key.verifying_key().as_bytes()));
    println!("   Private Key: {}", private_key);
    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    println!("⚠️  SECURITY WARNINGS:");
    println!();
    println!("   1. NEVER share your private key with anyone");
    println!("   2. NEVER commit it to git or any public repository");
    println!("   3. Use this key on testnet only");
    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    println!("📝 TO USE THIS WALLET (add to .env):");
    println!();
    println!("   WALLET_PRIVATE_KEY={}", private_key);
    println!();
    println!("💡 The account does not exist on chain until it is funded.");
    println!("   Request testnet MOVE from the Movement faucet for {}", address);
    println!();
}
