//! In-crate fakes for the wallet, fullnode and notifier

use eyre::{eyre, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::client::{
    AccountAddress, Fullnode, PendingTransaction, TransactionInfo, TransactionRequest, ViewRequest,
};
use crate::notify::{Notifier, Toast};
use crate::wallet::{NetworkChangeRequest, NetworkInfo, Wallet};

pub const ALICE: &str = "0xa11ce";

// ============================================
// FULLNODE
// ============================================

/// View results keyed by bare function name (`get_position`)
#[derive(Default)]
pub struct MockFullnode {
    views: HashMap<String, std::result::Result<Vec<Value>, String>>,
    wait_error: Option<String>,
    calls: Mutex<Vec<ViewRequest>>,
    waited: Mutex<Vec<String>>,
}

impl MockFullnode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_view(mut self, function: &str, values: Vec<Value>) -> Self {
        self.views.insert(function.to_string(), Ok(values));
        self
    }

    pub fn with_view_error(mut self, function: &str, message: &str) -> Self {
        self.views.insert(function.to_string(), Err(message.to_string()));
        self
    }

    pub fn with_wait_error(mut self, message: &str) -> Self {
        self.wait_error = Some(message.to_string());
        self
    }

    /// Bare names of the view functions called, in order
    pub fn view_calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|r| short_name(&r.function).to_string())
            .collect()
    }

    pub fn view_requests(&self) -> Vec<ViewRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn waited(&self) -> Vec<String> {
        self.waited.lock().unwrap().clone()
    }
}

fn short_name(function: &str) -> &str {
    function.rsplit("::").next().unwrap_or(function)
}

impl Fullnode for MockFullnode {
    async fn view(&self, request: &ViewRequest) -> Result<Vec<Value>> {
        self.calls.lock().unwrap().push(request.clone());
        match self.views.get(short_name(&request.function)) {
            Some(Ok(values)) => Ok(values.clone()),
            Some(Err(message)) => Err(eyre!("{}", message)),
            None => Err(eyre!("function not found: {}", request.function)),
        }
    }

    async fn wait_for_transaction(&self, hash: &str) -> Result<TransactionInfo> {
        self.waited.lock().unwrap().push(hash.to_string());
        if let Some(message) = &self.wait_error {
            return Err(eyre!("{}", message));
        }
        Ok(TransactionInfo {
            transaction_type: "user_transaction".to_string(),
            hash: hash.to_string(),
            version: Some("1".to_string()),
            success: Some(true),
            vm_status: Some("Executed successfully".to_string()),
        })
    }
}

// ============================================
// WALLET
// ============================================

pub struct MockWallet {
    account: Option<AccountAddress>,
    network: Option<NetworkInfo>,
    can_switch: bool,
    submit_error: Option<String>,
    switch_error: Option<String>,
    submitted: Mutex<Vec<TransactionRequest>>,
    pub switch_requests: Vec<NetworkChangeRequest>,
}

impl MockWallet {
    pub fn on_chain(chain_id: u64) -> Self {
        Self {
            account: Some(ALICE.parse().unwrap()),
            network: Some(NetworkInfo {
                name: crate::wallet::network_name(chain_id).to_string(),
                chain_id,
                url: None,
            }),
            can_switch: false,
            submit_error: None,
            switch_error: None,
            submitted: Mutex::new(vec![]),
            switch_requests: vec![],
        }
    }

    pub fn without_account(chain_id: u64) -> Self {
        Self {
            account: None,
            ..Self::on_chain(chain_id)
        }
    }

    pub fn switchable(mut self) -> Self {
        self.can_switch = true;
        self
    }

    /// Advertise switching but fail every change-network request
    pub fn with_switch_error(mut self, message: &str) -> Self {
        self.can_switch = true;
        self.switch_error = Some(message.to_string());
        self
    }

    pub fn with_submit_error(mut self, message: &str) -> Self {
        self.submit_error = Some(message.to_string());
        self
    }

    pub fn submitted(&self) -> Vec<TransactionRequest> {
        self.submitted.lock().unwrap().clone()
    }
}

impl Wallet for MockWallet {
    fn name(&self) -> &str {
        "Mock"
    }

    fn account(&self) -> Option<AccountAddress> {
        self.account
    }

    fn network(&self) -> Option<&NetworkInfo> {
        self.network.as_ref()
    }

    fn supports_network_change(&self) -> bool {
        self.can_switch
    }

    async fn change_network(&mut self, request: &NetworkChangeRequest) -> Result<()> {
        if !self.can_switch {
            return Err(eyre!("Mock does not support network switching"));
        }
        self.switch_requests.push(request.clone());
        if let Some(message) = &self.switch_error {
            return Err(eyre!("{}", message));
        }
        if let Some(network) = self.network.as_mut() {
            network.chain_id = request.chain_id;
        }
        Ok(())
    }

    async fn sign_and_submit_transaction(&self, request: &TransactionRequest) -> Result<PendingTransaction> {
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(request.clone());
        if let Some(message) = &self.submit_error {
            return Err(eyre!("{}", message));
        }
        Ok(PendingTransaction {
            hash: format!("0xfeed{:02}", submitted.len()),
        })
    }

    fn disconnect(&mut self) {
        self.account = None;
        self.network = None;
    }
}

// ============================================
// NOTIFIER
// ============================================

#[derive(Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Toast> {
        self.toasts.lock().unwrap().last().cloned()
    }

    pub fn errors(&self) -> Vec<String> {
        self.toasts()
            .into_iter()
            .filter_map(|t| match t {
                Toast::Error(m) => Some(m),
                _ => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }
}
