//! Fullnode access
//!
//! - `types`: REST wire types and the account address type
//! - `rest`: the reqwest-backed client
//! - `Fullnode`: the read/confirm seam the dashboard is written against

mod rest;
mod types;

pub use rest::MovementClient;
pub use types::{
    view_u64, AccountAddress, ModuleId, PendingTransaction, SignedTransaction, TransactionInfo,
    TransactionRequest, TransactionSignature, UnsignedTransaction, ViewRequest,
};

use eyre::Result;
use serde_json::Value;

/// Read-only calls and confirmation tracking against a fullnode
#[allow(async_fn_in_trait)]
pub trait Fullnode {
    /// Execute a Move view function and return its JSON-encoded results
    async fn view(&self, request: &ViewRequest) -> Result<Vec<Value>>;

    /// Wait until a submitted transaction is committed; errors if it failed or timed out
    async fn wait_for_transaction(&self, hash: &str) -> Result<TransactionInfo>;
}
