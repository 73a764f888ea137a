//! Fullnode REST API types
//!
//! The REST API encodes u64 values as JSON strings, so most numeric
//! fields here are strings on the wire.

use eyre::{eyre, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::str::FromStr;

// ============================================
// ACCOUNT ADDRESS
// ============================================

/// 32-byte account address, displayed as `0x` + 64 lowercase hex digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountAddress([u8; 32]);

impl AccountAddress {
    pub const LENGTH: usize = 32;

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl FromStr for AccountAddress {
    type Err = eyre::Report;

    /// Accepts long and short forms (`0x1` == `0x000...001`)
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        if digits.is_empty() || digits.len() > Self::LENGTH * 2 {
            return Err(eyre!("expected 1 to 64 hex digits, got {:?}", s));
        }
        let padded = format!("{:0>64}", digits);
        let decoded = hex::decode(&padded).map_err(|e| eyre!("{:?} is not hex: {}", s, e))?;

        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }
}

impl std::fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================
// MODULE / PAYLOADS
// ============================================

/// A published Move module, e.g. `0xf965...::mfusd`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleId {
    pub address: AccountAddress,
    pub name: String,
}

impl ModuleId {
    pub fn new(address: AccountAddress, name: impl Into<String>) -> Self {
        Self { address, name: name.into() }
    }

    /// Fully qualified function id `address::module::function`
    pub fn function(&self, function: &str) -> String {
        format!("{}::{}::{}", self.address, self.name, function)
    }

    pub fn view_request(&self, function: &str, arguments: Vec<Value>) -> ViewRequest {
        ViewRequest {
            function: self.function(function),
            type_arguments: vec![],
            arguments,
        }
    }

    pub fn entry_payload(&self, function: &str, arguments: Vec<Value>) -> EntryFunctionPayload {
        EntryFunctionPayload {
            payload_type: EntryFunctionPayload::TYPE.to_string(),
            function: self.function(function),
            type_arguments: vec![],
            arguments,
        }
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}", self.address, self.name)
    }
}

/// Body of `POST /view`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRequest {
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryFunctionPayload {
    #[serde(rename = "type")]
    pub payload_type: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<Value>,
}

impl EntryFunctionPayload {
    pub const TYPE: &'static str = "entry_function_payload";
}

/// What a dApp hands to the wallet for signing
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    pub sender: AccountAddress,
    pub payload: EntryFunctionPayload,
}

// ============================================
// TRANSACTIONS
// ============================================

/// Raw transaction fields, as accepted by `encode_submission` and `transactions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    pub sender: String,
    pub sequence_number: String,
    pub max_gas_amount: String,
    pub gas_unit_price: String,
    pub expiration_timestamp_secs: String,
    pub payload: EntryFunctionPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionSignature {
    #[serde(rename = "type")]
    pub signature_type: String,
    pub public_key: String,
    pub signature: String,
}

impl TransactionSignature {
    pub fn ed25519(public_key: &[u8], signature: &[u8]) -> Self {
        Self {
            signature_type: "ed25519_signature".to_string(),
            public_key: format!("0x{}", hex::encode(public_key)),
            signature: format!("0x{}", hex::encode(signature)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedTransaction {
    #[serde(flatten)]
    pub raw: UnsignedTransaction,
    pub signature: TransactionSignature,
}

/// Response to a submission; only the hash matters to callers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PendingTransaction {
    pub hash: String,
}

/// A transaction as returned by `GET /transactions/by_hash/{hash}`
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionInfo {
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub hash: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub vm_status: Option<String>,
}

impl TransactionInfo {
    pub fn is_pending(&self) -> bool {
        self.transaction_type == "pending_transaction"
    }

    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }
}

// ============================================
// NODE / ACCOUNT STATE
// ============================================

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerInfo {
    pub chain_id: u64,
    #[serde(default)]
    pub ledger_version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountData {
    pub sequence_number: String,
}

impl AccountData {
    pub fn sequence_number(&self) -> Result<u64> {
        self.sequence_number
            .parse()
            .map_err(|_| eyre!("Bad sequence number: {}", self.sequence_number))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GasEstimation {
    pub gas_estimate: u64,
}

/// Error body returned by the fullnode on non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub vm_error_code: Option<u64>,
}

/// Read a u64 returned by a view function (string-encoded, or a bare number)
pub fn parse_u64(value: &Value) -> Result<u64> {
    match value {
        Value::String(s) => s.parse().map_err(|_| eyre!("Expected u64, got {:?}", s)),
        Value::Number(n) => n.as_u64().ok_or_else(|| eyre!("Expected u64, got {}", n)),
        other => Err(eyre!("Expected u64, got {}", other)),
    }
}

/// Read the `index`-th u64 of a view result
pub fn view_u64(values: &[Value], index: usize) -> Result<u64> {
    let value = values
        .get(index)
        .ok_or_else(|| eyre!("View result has {} values, expected at least {}", values.len(), index + 1))?;
    parse_u64(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MODULE: &str = "0xf9656522a6359b1a81c55e625876d4bd7ecbca623422a9e3f103a84922820f76";

    #[test]
    fn test_address_forms() {
        let short: AccountAddress = "0x1".parse().unwrap();
        assert_eq!(
            short.to_string(),
            "0x0000000000000000000000000000000000000000000000000000000000000001"
        );
        let long: AccountAddress = MODULE.parse().unwrap();
        assert_eq!(long.to_string(), MODULE);
        let upper: AccountAddress = MODULE.to_uppercase().replace("0X", "0x").parse().unwrap();
        assert_eq!(upper, long);

        assert!("0x".parse::<AccountAddress>().is_err());
        assert!("0x0x1".parse::<AccountAddress>().is_err());
        assert_eq!("1".parse::<AccountAddress>().unwrap(), short);
        assert!("0xzz".parse::<AccountAddress>().is_err());
        assert!(format!("{}00", MODULE).parse::<AccountAddress>().is_err());
    }

    #[test]
    fn test_function_ids() {
        let module = ModuleId::new(MODULE.parse().unwrap(), "mfusd");
        assert_eq!(module.function("get_position"), format!("{}::mfusd::get_position", MODULE));

        let payload = module.entry_payload("add_collateral", vec![json!("500000000")]);
        let encoded = serde_json::to_value(&payload).unwrap();
        assert_eq!(encoded["type"], "entry_function_payload");
        assert_eq!(encoded["arguments"], json!(["500000000"]));
        assert_eq!(encoded["type_arguments"], json!([]));
    }

    #[test]
    fn test_signed_transaction_is_flat() {
        let module = ModuleId::new(MODULE.parse().unwrap(), "mfusd");
        let signed = SignedTransaction {
            raw: UnsignedTransaction {
                sender: "0x1".to_string(),
                sequence_number: "3".to_string(),
                max_gas_amount: "200000".to_string(),
                gas_unit_price: "100".to_string(),
                expiration_timestamp_secs: "1700000000".to_string(),
                payload: module.entry_payload("add_collateral", vec![json!("1")]),
            },
            signature: TransactionSignature::ed25519(&[1u8; 32], &[2u8; 64]),
        };
        let encoded = serde_json::to_value(&signed).unwrap();
        assert_eq!(encoded["sequence_number"], "3");
        assert_eq!(encoded["signature"]["type"], "ed25519_signature");
        assert!(encoded["signature"]["public_key"].as_str().unwrap().starts_with("0x0101"));
    }

    #[test]
    fn test_transaction_status() {
        let pending: TransactionInfo =
            serde_json::from_value(json!({"type": "pending_transaction", "hash": "0xaa"})).unwrap();
        assert!(pending.is_pending());
        assert!(!pending.is_success());

        let done: TransactionInfo = serde_json::from_value(json!({
            "type": "user_transaction",
            "hash": "0xaa",
            "version": "42",
            "success": false,
            "vm_status": "Move abort in 0x1::mfusd: E_INSUFFICIENT_COLLATERAL(0x3)"
        }))
        .unwrap();
        assert!(!done.is_pending());
        assert!(!done.is_success());
        assert!(done.vm_status.unwrap().contains("E_INSUFFICIENT_COLLATERAL"));
    }

    #[test]
    fn test_ledger_and_errors() {
        let ledger: LedgerInfo = serde_json::from_value(json!({
            "chain_id": 250,
            "epoch": "10",
            "ledger_version": "123",
            "node_role": "full_node"
        }))
        .unwrap();
        assert_eq!(ledger.chain_id, 250);
        assert_eq!(ledger.ledger_version.as_deref(), Some("123"));

        let err: ApiError = serde_json::from_value(json!({
            "message": "Account not found by Address(0x1)",
            "error_code": "account_not_found",
            "vm_error_code": null
        }))
        .unwrap();
        assert_eq!(err.error_code.as_deref(), Some("account_not_found"));
        assert_eq!(err.vm_error_code, None);
    }

    #[test]
    fn test_view_values() {
        let values = vec![json!("1510000000"), json!(1000000000u64)];
        assert_eq!(view_u64(&values, 0).unwrap(), 1_510_000_000);
        assert_eq!(view_u64(&values, 1).unwrap(), 1_000_000_000);
        assert!(view_u64(&values, 2).is_err());
        assert!(parse_u64(&json!("-1")).is_err());
        assert!(parse_u64(&json!(true)).is_err());
    }
}
