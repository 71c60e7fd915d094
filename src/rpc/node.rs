//! Typed node API calls.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::rpc::error::{RpcError, RpcResult};
use crate::rpc::retry::RetryPolicy;
use crate::rpc::transport::RpcTransport;
use crate::rpc::wire::*;
use crate::shared::{AssetAmount, ObjectId};

/// API names on a Graphene node.
pub mod api {
    pub const DATABASE: &str = "database";
    pub const HISTORY: &str = "history";
    pub const NETWORK_BROADCAST: &str = "network_broadcast";
}

/// Typed wrapper over an [`RpcTransport`].
///
/// Reads use [`RetryPolicy::Idempotent`]; broadcasts use [`RetryPolicy::None`].
#[derive(Clone)]
pub struct NodeRpc {
    transport: Arc<dyn RpcTransport>,
}

impl std::fmt::Debug for NodeRpc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRpc").finish_non_exhaustive()
    }
}

impl NodeRpc {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &Arc<dyn RpcTransport> {
        &self.transport
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    async fn query<T: DeserializeOwned>(
        &self,
        api: &str,
        method: &str,
        params: Vec<Value>,
    ) -> RpcResult<T> {
        tracing::debug!(api, method, "RPC call");
        let value = self
            .transport
            .call(api, method, params, RetryPolicy::Idempotent)
            .await?;
        Self::decode(method, value)
    }

    fn decode<T: DeserializeOwned>(method: &str, value: Value) -> RpcResult<T> {
        serde_json::from_value(value)
            .map_err(|e| RpcError::Deserialize(format!("{}: {}", method, e)))
    }

    // =========================================================================
    // Market data
    // =========================================================================

    pub async fn get_ticker(&self, base: &ObjectId, quote: &ObjectId) -> RpcResult<TickerWire> {
        self.query(api::DATABASE, "get_ticker", vec![json!(base), json!(quote)])
            .await
    }

    pub async fn get_24_volume(&self, base: &ObjectId, quote: &ObjectId) -> RpcResult<VolumeWire> {
        self.query(api::DATABASE, "get_24_volume", vec![json!(base), json!(quote)])
            .await
    }

    pub async fn get_order_book(
        &self,
        base: &ObjectId,
        quote: &ObjectId,
        limit: u32,
    ) -> RpcResult<OrderBookWire> {
        self.query(
            api::DATABASE,
            "get_order_book",
            vec![json!(base), json!(quote), json!(limit)],
        )
        .await
    }

    /// Trades between `start` and `stop`, newest first. Times in node format.
    pub async fn get_trade_history(
        &self,
        base: &ObjectId,
        quote: &ObjectId,
        stop: &str,
        start: &str,
        limit: u32,
    ) -> RpcResult<Vec<TradeWire>> {
        self.query(
            api::DATABASE,
            "get_trade_history",
            vec![json!(base), json!(quote), json!(stop), json!(start), json!(limit)],
        )
        .await
    }

    pub async fn get_fill_order_history(
        &self,
        base: &ObjectId,
        quote: &ObjectId,
        limit: u32,
    ) -> RpcResult<Vec<FillOrderWire>> {
        self.query(
            api::HISTORY,
            "get_fill_order_history",
            vec![json!(base), json!(quote), json!(limit)],
        )
        .await
    }

    // =========================================================================
    // Objects, assets, accounts
    // =========================================================================

    /// Raw objects by id; missing ids come back as `None`.
    pub async fn get_objects(&self, ids: &[ObjectId]) -> RpcResult<Vec<Option<Value>>> {
        self.query(api::DATABASE, "get_objects", vec![json!(ids)]).await
    }

    /// A single object decoded as `T`.
    pub async fn get_object<T: DeserializeOwned>(&self, id: &ObjectId) -> RpcResult<Option<T>> {
        let mut objects = self.get_objects(std::slice::from_ref(id)).await?;
        match objects.pop().flatten() {
            Some(value) => Self::decode("get_objects", value).map(Some),
            None => Ok(None),
        }
    }

    /// Assets by symbol or id; unknown entries come back as `None`.
    pub async fn lookup_asset_symbols(
        &self,
        symbols_or_ids: &[&str],
    ) -> RpcResult<Vec<Option<AssetWire>>> {
        self.query(api::DATABASE, "lookup_asset_symbols", vec![json!(symbols_or_ids)])
            .await
    }

    pub async fn get_account_by_name(&self, name: &str) -> RpcResult<Option<AccountWire>> {
        self.query(api::DATABASE, "get_account_by_name", vec![json!(name)])
            .await
    }

    /// Full account records, without subscribing to updates.
    pub async fn get_full_accounts(
        &self,
        names_or_ids: &[&str],
    ) -> RpcResult<Vec<(String, FullAccountWire)>> {
        self.query(
            api::DATABASE,
            "get_full_accounts",
            vec![json!(names_or_ids), json!(false)],
        )
        .await
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Fees for `operations` (each `[op_id, body]`) paid in `fee_asset`.
    pub async fn get_required_fees(
        &self,
        operations: &[Value],
        fee_asset: &ObjectId,
    ) -> RpcResult<Vec<AssetAmount>> {
        self.query(
            api::DATABASE,
            "get_required_fees",
            vec![json!(operations), json!(fee_asset)],
        )
        .await
    }

    pub async fn get_dynamic_global_properties(&self) -> RpcResult<DynamicGlobalPropertiesWire> {
        self.query(api::DATABASE, "get_dynamic_global_properties", vec![])
            .await
    }

    /// Broadcast a signed transaction. Never retried.
    pub async fn broadcast_transaction(&self, transaction: Value) -> RpcResult<()> {
        tracing::debug!(api = api::NETWORK_BROADCAST, "Broadcasting transaction");
        self.transport
            .call(
                api::NETWORK_BROADCAST,
                "broadcast_transaction",
                vec![transaction],
                RetryPolicy::None,
            )
            .await?;
        Ok(())
    }
}
