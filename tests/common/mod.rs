//! In-memory node and recording collaborators shared by integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use bitshares_market::chain::{
    Account, AccountLookup, ConfirmationMode, ConfirmationWatcher, ConfirmedTransaction,
    Operation, Permission, Signer, Transaction, TransactionFinalizer,
};
use bitshares_market::error::{MarketError, MarketResult};
use bitshares_market::prelude::BitsharesClient;
use bitshares_market::rpc::{RetryPolicy, RpcError, RpcResult, RpcTransport};

// ============================================================================
// Mock node
// ============================================================================

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub api: String,
    pub method: String,
    pub params: Vec<Value>,
    pub retry: RetryPolicy,
}

/// Answers RPC calls from canned JSON and records every call.
#[derive(Default)]
pub struct MockNode {
    responses: Mutex<HashMap<String, Value>>,
    errors: Mutex<HashMap<String, (i64, String)>>,
    objects: Mutex<HashMap<String, Value>>,
    assets: Mutex<Vec<Value>>,
    accounts: Mutex<Vec<Value>>,
    full_accounts: Mutex<HashMap<String, Value>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node with BTS, USD (backed by BTS), CNY (backed by BTS) and account alice.
    pub fn with_fixtures() -> Self {
        let node = Self::new();
        node.add_asset(asset_json("1.3.0", "BTS", 5, None));
        node.add_asset(asset_json("1.3.121", "USD", 4, Some("2.4.21")));
        node.add_asset(asset_json("1.3.113", "CNY", 4, Some("2.4.13")));
        // 1 USD = 300 BTS, 1 CNY = 45 BTS
        node.add_object(
            "2.4.21",
            bitasset_json("2.4.21", "1.3.121", 10_000, "1.3.0", 30_000_000, "1.3.0"),
        );
        node.add_object(
            "2.4.13",
            bitasset_json("2.4.13", "1.3.113", 10_000, "1.3.0", 4_500_000, "1.3.0"),
        );
        node.add_account("1.2.17", "alice");
        node.add_account("1.2.18", "bob");
        node.respond(
            "get_dynamic_global_properties",
            json!({
                "id": "2.1.0",
                "head_block_number": 0x01a2_b3c4u32,
                "head_block_id": "01a2b3c4deadbeef00000000000000000000000000",
                "time": "2020-01-01T00:00:00",
                "last_irreversible_block_num": 0x01a2_b3b0u32
            }),
        );
        node
    }

    pub fn respond(&self, method: &str, value: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(method.to_string(), value);
    }

    pub fn fail(&self, method: &str, code: i64, message: &str) {
        self.errors
            .lock()
            .unwrap()
            .insert(method.to_string(), (code, message.to_string()));
    }

    pub fn add_asset(&self, asset: Value) {
        self.assets.lock().unwrap().push(asset);
    }

    pub fn add_object(&self, id: &str, object: Value) {
        self.objects.lock().unwrap().insert(id.to_string(), object);
    }

    pub fn add_account(&self, id: &str, name: &str) {
        let account = json!({"id": id, "name": name});
        self.objects
            .lock()
            .unwrap()
            .insert(id.to_string(), account.clone());
        self.accounts.lock().unwrap().push(account);
    }

    pub fn set_limit_orders(&self, name: &str, orders: Value) {
        let account = self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a["name"] == name)
            .cloned()
            .unwrap_or_else(|| json!({"id": "1.2.999", "name": name}));
        let full = json!({"account": account, "limit_orders": orders});
        let mut full_accounts = self.full_accounts.lock().unwrap();
        if let Some(id) = account["id"].as_str() {
            full_accounts.insert(id.to_string(), full.clone());
        }
        full_accounts.insert(name.to_string(), full);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method)
            .collect()
    }

    fn lookup_assets(&self, keys: &Value) -> Value {
        let assets = self.assets.lock().unwrap();
        let found: Vec<Value> = keys
            .as_array()
            .map(|keys| {
                keys.iter()
                    .map(|k| {
                        assets
                            .iter()
                            .find(|a| a["symbol"] == *k || a["id"] == *k)
                            .cloned()
                            .unwrap_or(Value::Null)
                    })
                    .collect()
            })
            .unwrap_or_default();
        Value::Array(found)
    }

    fn lookup_objects(&self, ids: &Value) -> Value {
        let objects = self.objects.lock().unwrap();
        let found: Vec<Value> = ids
            .as_array()
            .map(|ids| {
                ids.iter()
                    .map(|id| {
                        id.as_str()
                            .and_then(|id| objects.get(id).cloned())
                            .unwrap_or(Value::Null)
                    })
                    .collect()
            })
            .unwrap_or_default();
        Value::Array(found)
    }

    fn lookup_account(&self, name: &Value) -> Value {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a["name"] == *name)
            .cloned()
            .unwrap_or(Value::Null)
    }

    fn lookup_full_accounts(&self, names: &Value) -> Value {
        let full = self.full_accounts.lock().unwrap();
        let pairs: Vec<Value> = names
            .as_array()
            .map(|names| {
                names
                    .iter()
                    .filter_map(|n| {
                        let n = n.as_str()?;
                        full.get(n).map(|f| json!([n, f]))
                    })
                    .collect()
            })
            .unwrap_or_default();
        Value::Array(pairs)
    }
}

#[async_trait]
impl RpcTransport for MockNode {
    async fn call(
        &self,
        api: &str,
        method: &str,
        params: Vec<Value>,
        retry: RetryPolicy,
    ) -> RpcResult<Value> {
        self.calls.lock().unwrap().push(RecordedCall {
            api: api.to_string(),
            method: method.to_string(),
            params: params.clone(),
            retry,
        });

        if let Some((code, message)) = self.errors.lock().unwrap().get(method).cloned() {
            return Err(RpcError::Node { code, message });
        }

        let first = params.first().cloned().unwrap_or(Value::Null);
        match method {
            "lookup_asset_symbols" => Ok(self.lookup_assets(&first)),
            "get_objects" => Ok(self.lookup_objects(&first)),
            "get_account_by_name" => Ok(self.lookup_account(&first)),
            "get_full_accounts" => Ok(self.lookup_full_accounts(&first)),
            "get_required_fees" => {
                let count = first.as_array().map(Vec::len).unwrap_or(0);
                let asset = params.get(1).cloned().unwrap_or(json!("1.3.0"));
                Ok(Value::Array(
                    (0..count)
                        .map(|_| json!({"amount": 578, "asset_id": asset}))
                        .collect(),
                ))
            }
            "broadcast_transaction" => Ok(Value::Null),
            _ => self
                .responses
                .lock()
                .unwrap()
                .get(method)
                .cloned()
                .ok_or_else(|| RpcError::Node {
                    code: -32601,
                    message: format!("no canned response for {}", method),
                }),
        }
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn asset_json(id: &str, symbol: &str, precision: u8, bitasset: Option<&str>) -> Value {
    let mut asset = json!({
        "id": id,
        "symbol": symbol,
        "precision": precision,
        "issuer": "1.2.0",
        "options": {
            "max_supply": "1000000000000000",
            "core_exchange_rate": {
                "base": {"amount": 1, "asset_id": id},
                "quote": {"amount": 1, "asset_id": "1.3.0"}
            }
        },
        "dynamic_asset_data_id": "2.3.0"
    });
    if let Some(bitasset) = bitasset {
        asset["bitasset_data_id"] = json!(bitasset);
    }
    asset
}

/// Feed of `base_amount` of `base_asset` per `quote_amount` of `quote_asset`.
pub fn bitasset_json(
    id: &str,
    base_asset: &str,
    base_amount: i64,
    quote_asset: &str,
    quote_amount: i64,
    backing: &str,
) -> Value {
    json!({
        "id": id,
        "current_feed": {
            "settlement_price": {
                "base": {"amount": base_amount, "asset_id": base_asset},
                "quote": {"amount": quote_amount, "asset_id": quote_asset}
            },
            "maintenance_collateral_ratio": 1750,
            "maximum_short_squeeze_ratio": 1100
        },
        "options": {"short_backing_asset": backing}
    })
}

// ============================================================================
// Recording collaborators
// ============================================================================

#[derive(Debug, Clone)]
pub struct FinalizeCall {
    pub operations: Vec<Operation>,
    pub account: Account,
    pub permission: Permission,
}

/// Records operations and returns them as an unsigned transaction.
#[derive(Default)]
pub struct RecordingFinalizer {
    pub calls: Mutex<Vec<FinalizeCall>>,
    pub error: Option<String>,
}

impl RecordingFinalizer {
    pub fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            error: Some(message.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<FinalizeCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransactionFinalizer for RecordingFinalizer {
    async fn finalize(
        &self,
        operations: Vec<Operation>,
        account: &Account,
        permission: Permission,
    ) -> MarketResult<Transaction> {
        self.calls.lock().unwrap().push(FinalizeCall {
            operations: operations.clone(),
            account: account.clone(),
            permission,
        });
        if let Some(message) = &self.error {
            return Err(MarketError::Rpc(RpcError::Node {
                code: 1,
                message: message.clone(),
            }));
        }
        Ok(Transaction::new(operations))
    }
}

/// Confirms every transaction with a fixed created object id.
pub struct FixedWatcher {
    pub order_id: String,
    pub modes: Mutex<Vec<ConfirmationMode>>,
}

impl FixedWatcher {
    pub fn new(order_id: &str) -> Self {
        Self {
            order_id: order_id.to_string(),
            modes: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ConfirmationWatcher for FixedWatcher {
    async fn await_confirmation(
        &self,
        transaction: &Transaction,
        mode: ConfirmationMode,
    ) -> MarketResult<ConfirmedTransaction> {
        self.modes.lock().unwrap().push(mode);
        Ok(ConfirmedTransaction {
            transaction: transaction.clone(),
            block_num: 27_000_000,
            trx_num: 3,
            operation_results: vec![json!([1, self.order_id])],
        })
    }
}

/// Returns fixed signatures and records what it signed.
#[derive(Default)]
pub struct RecordingSigner {
    pub signed: Mutex<Vec<(Transaction, Account, Permission)>>,
}

#[async_trait]
impl Signer for RecordingSigner {
    async fn sign(
        &self,
        transaction: &Transaction,
        account: &Account,
        permission: Permission,
    ) -> MarketResult<Vec<String>> {
        self.signed
            .lock()
            .unwrap()
            .push((transaction.clone(), account.clone(), permission));
        Ok(vec!["1f".repeat(65)])
    }
}

/// Resolves every name to one fixed account.
pub struct FixedAccountLookup {
    pub account: Account,
    pub requested: Mutex<Vec<String>>,
}

impl FixedAccountLookup {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            account: Account {
                id: id.parse().unwrap(),
                name: name.to_string(),
            },
            requested: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AccountLookup for FixedAccountLookup {
    async fn get_account(&self, name_or_id: &str) -> MarketResult<Account> {
        self.requested.lock().unwrap().push(name_or_id.to_string());
        Ok(self.account.clone())
    }
}

// ============================================================================
// Client helpers
// ============================================================================

pub fn read_only_client(node: Arc<MockNode>) -> BitsharesClient {
    BitsharesClient::builder()
        .transport(node)
        .build()
        .unwrap()
}

pub fn trading_client(
    node: Arc<MockNode>,
    finalizer: Arc<RecordingFinalizer>,
    default_account: Option<&str>,
) -> BitsharesClient {
    let mut builder = BitsharesClient::builder()
        .transport(node)
        .finalizer(finalizer);
    if let Some(account) = default_account {
        builder = builder.default_account(account);
    }
    builder.build().unwrap()
}
