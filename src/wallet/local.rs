//! Local ed25519 key wallet
//!
//! Signs transactions with a key loaded from the environment. The node
//! produces the BCS signing message (`encode_submission`), so no BCS
//! encoder is needed here.
//!
//! ⚠️  SECURITY WARNING:
//! - Never log or expose private keys
//! - Use environment variables, not hardcoded keys

use chrono::Utc;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use eyre::{eyre, Result};
use sha3::{Digest, Sha3_256};
use std::time::Duration;
use tracing::{debug, info};

use super::{network_name, NetworkChangeRequest, NetworkInfo, Wallet};
use crate::client::{
    AccountAddress, MovementClient, PendingTransaction, SignedTransaction, TransactionRequest,
    TransactionSignature, UnsignedTransaction,
};
use crate::config::Config;

/// Authentication scheme byte for single ed25519 keys
const ED25519_SCHEME: u8 = 0x00;

pub struct LocalWallet {
    signing_key: SigningKey,
    address: AccountAddress,
    client: MovementClient,
    network: NetworkInfo,
    connected: bool,
    http_timeout: Duration,
    max_gas_amount: u64,
    gas_unit_price: Option<u64>,
    expiration_secs: u64,
}

impl LocalWallet {
    pub const NAME: &'static str = "Local Key";

    /// Load the key from config and read the chain ID from the wallet's fullnode
    pub async fn connect(config: &Config) -> Result<Self> {
        let key = config
            .wallet_private_key
            .as_deref()
            .ok_or_else(|| eyre!("WALLET_PRIVATE_KEY not set"))?;
        let signing_key = signing_key_from_hex(key)?;

        // A rotated key no longer derives its account address
        let address = match &config.wallet_address {
            Some(addr) => addr.parse()?,
            None => derive_address(&signing_key.verifying_key()),
        };

        let client = MovementClient::new(&config.wallet_fullnode_url, config.http_timeout())?;
        let ledger = client.ledger_info().await?;

        info!(
            "✓ Wallet connected: {} (chain {}, ledger version {})",
            address,
            ledger.chain_id,
            ledger.ledger_version.as_deref().unwrap_or("?")
        );

        Ok(Self {
            signing_key,
            address,
            network: NetworkInfo {
                name: network_name(ledger.chain_id).to_string(),
                chain_id: ledger.chain_id,
                url: Some(client.base_url().to_string()),
            },
            client,
            connected: true,
            http_timeout: config.http_timeout(),
            max_gas_amount: config.max_gas_amount,
            gas_unit_price: config.gas_unit_price,
            expiration_secs: config.tx_expiration_secs,
        })
    }

    pub fn address(&self) -> AccountAddress {
        self.address
    }

    pub fn public_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    fn build_transaction(
        &self,
        sequence_number: u64,
        gas_unit_price: u64,
        request: &TransactionRequest,
    ) -> UnsignedTransaction {
        let expiration = Utc::now().timestamp().max(0) as u64 + self.expiration_secs;

        UnsignedTransaction {
            sender: request.sender.to_string(),
            sequence_number: sequence_number.to_string(),
            max_gas_amount: self.max_gas_amount.to_string(),
            gas_unit_price: gas_unit_price.to_string(),
            expiration_timestamp_secs: expiration.to_string(),
            payload: request.payload.clone(),
        }
    }

    /// Sign a node-produced signing message (hex, `0x`-prefixed)
    fn sign_message(&self, message_hex: &str) -> Result<TransactionSignature> {
        let message = hex::decode(message_hex.trim_start_matches("0x"))
            .map_err(|e| eyre!("Fullnode returned a malformed signing message: {}", e))?;
        let signature = self.signing_key.sign(&message);

        Ok(TransactionSignature::ed25519(
            self.signing_key.verifying_key().as_bytes(),
            &signature.to_bytes(),
        ))
    }
}

impl Wallet for LocalWallet {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn account(&self) -> Option<AccountAddress> {
        self.connected.then_some(self.address)
    }

    fn network(&self) -> Option<&NetworkInfo> {
        self.connected.then_some(&self.network)
    }

    fn supports_network_change(&self) -> bool {
        true
    }

    /// Re-point the wallet at another fullnode. The chain ID is taken from
    /// the request, not read back from the node.
    async fn change_network(&mut self, request: &NetworkChangeRequest) -> Result<()> {
        if !self.connected {
            return Err(eyre!("Wallet is not connected"));
        }
        self.client = MovementClient::new(&request.url, self.http_timeout)?;
        self.network = NetworkInfo {
            name: network_name(request.chain_id).to_string(),
            chain_id: request.chain_id,
            url: Some(self.client.base_url().to_string()),
        };
        info!("Wallet network changed to chain {} via {}", request.chain_id, request.url);
        Ok(())
    }

    async fn sign_and_submit_transaction(&self, request: &TransactionRequest) -> Result<PendingTransaction> {
        if !self.connected {
            return Err(eyre!("Wallet is not connected"));
        }
        if request.sender != self.address {
            return Err(eyre!(
                "Sender {} does not match connected account {}",
                request.sender,
                self.address
            ));
        }

        let sequence_number = self.client.account(&self.address).await?.sequence_number()?;
        let gas_unit_price = match self.gas_unit_price {
            Some(price) => price,
            None => self.client.estimate_gas_price().await?.gas_estimate,
        };

        let raw = self.build_transaction(sequence_number, gas_unit_price, request);
        let message = self.client.encode_submission(&raw).await?;
        let signature = self.sign_message(&message)?;

        debug!(
            "Signed {}: sequence={}, gas_unit_price={}",
            request.payload.function, sequence_number, gas_unit_price
        );

        let pending = self
            .client
            .submit_transaction(&SignedTransaction { raw, signature })
            .await?;

        info!("Submitted {} as {}", request.payload.function, pending.hash);
        Ok(pending)
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }
}

/// Account address for a single-key ed25519 account: sha3-256(public key ‖ 0x00)
pub fn derive_address(public_key: &VerifyingKey) -> AccountAddress {
    let mut hasher = Sha3_256::new();
    hasher.update(public_key.as_bytes());
    hasher.update([ED25519_SCHEME]);
    AccountAddress::new(hasher.finalize().into())
}

pub fn signing_key_from_hex(key: &str) -> Result<SigningKey> {
    let bytes = hex::decode(key.trim().trim_start_matches("0x"))
        .map_err(|e| eyre!("Private key is not hex: {}", e))?;
    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|_| eyre!("Private key must be 32 bytes (64 hex chars)"))?;
    Ok(SigningKey::from_bytes(&bytes))
}
