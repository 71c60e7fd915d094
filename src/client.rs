//! `BitsharesClient`: node connection plus the collaborators markets use.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use bitshares_market::prelude::*;
//!
//! let client = BitsharesClient::builder()
//!     .node_url("https://api.bitshares.ws")
//!     .default_account("alice")
//!     .build()?;
//! let rpc = client.rpc().clone();
//! let client = client
//!     .to_builder()
//!     .finalizer(Arc::new(NodeFinalizer::builder(rpc, Arc::new(my_signer)).build()))
//!     .build()?;
//! ```

use std::sync::Arc;

use crate::chain::{
    AccountLookup, AssetLookup, ConfirmationWatcher, FinalizingCanceller, OrderCanceller,
    TransactionFinalizer,
};
use crate::error::{MarketError, MarketResult};
use crate::market::{Asset, Market, MarketSpec};
use crate::network::{DEFAULT_NODE_URL, DEFAULT_ORDER_EXPIRATION_SECS};
use crate::rpc::{NodeRpc, RpcTransport};

/// Environment variable naming the node URL.
pub const NODE_URL_ENV: &str = "BITSHARES_NODE_URL";
/// Environment variable naming the default account.
pub const DEFAULT_ACCOUNT_ENV: &str = "BITSHARES_DEFAULT_ACCOUNT";

/// Builder for configuring [`BitsharesClient`].
#[derive(Clone, Default)]
pub struct BitsharesClientBuilder {
    node_url: Option<String>,
    transport: Option<Arc<dyn RpcTransport>>,
    default_account: Option<String>,
    order_expiration_secs: Option<u64>,
    assets: Option<Arc<dyn AssetLookup>>,
    accounts: Option<Arc<dyn AccountLookup>>,
    finalizer: Option<Arc<dyn TransactionFinalizer>>,
    watcher: Option<Arc<dyn ConfirmationWatcher>>,
    canceller: Option<Arc<dyn OrderCanceller>>,
}

impl BitsharesClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder seeded from `BITSHARES_NODE_URL` and `BITSHARES_DEFAULT_ACCOUNT`.
    pub fn from_env() -> Self {
        let mut builder = Self::new();
        if let Ok(url) = std::env::var(NODE_URL_ENV) {
            builder = builder.node_url(url);
        }
        if let Ok(account) = std::env::var(DEFAULT_ACCOUNT_ENV) {
            builder = builder.default_account(account);
        }
        builder
    }

    /// Node URL for the default HTTP transport.
    pub fn node_url(mut self, url: impl Into<String>) -> Self {
        self.node_url = Some(url.into());
        self
    }

    /// Use a custom transport instead of HTTP.
    pub fn transport(mut self, transport: Arc<dyn RpcTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Account used when an operation is not given one.
    pub fn default_account(mut self, account: impl Into<String>) -> Self {
        self.default_account = Some(account.into());
        self
    }

    /// Default lifetime of placed orders (7 days unless set).
    pub fn order_expiration_secs(mut self, secs: u64) -> Self {
        self.order_expiration_secs = Some(secs);
        self
    }

    pub fn asset_lookup(mut self, assets: Arc<dyn AssetLookup>) -> Self {
        self.assets = Some(assets);
        self
    }

    pub fn account_lookup(mut self, accounts: Arc<dyn AccountLookup>) -> Self {
        self.accounts = Some(accounts);
        self
    }

    pub fn finalizer(mut self, finalizer: Arc<dyn TransactionFinalizer>) -> Self {
        self.finalizer = Some(finalizer);
        self
    }

    pub fn confirmation_watcher(mut self, watcher: Arc<dyn ConfirmationWatcher>) -> Self {
        self.watcher = Some(watcher);
        self
    }

    /// Defaults to a [`FinalizingCanceller`] when a finalizer is configured.
    pub fn canceller(mut self, canceller: Arc<dyn OrderCanceller>) -> Self {
        self.canceller = Some(canceller);
        self
    }

    /// Build the client.
    pub fn build(self) -> MarketResult<BitsharesClient> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Self::http_transport(self.node_url.as_deref().unwrap_or(DEFAULT_NODE_URL))?,
        };
        let rpc = NodeRpc::new(transport);

        let assets = self
            .assets
            .unwrap_or_else(|| Arc::new(rpc.clone()) as Arc<dyn AssetLookup>);
        let accounts = self
            .accounts
            .unwrap_or_else(|| Arc::new(rpc.clone()) as Arc<dyn AccountLookup>);

        let canceller = self.canceller.or_else(|| {
            self.finalizer.as_ref().map(|finalizer| {
                Arc::new(FinalizingCanceller::new(accounts.clone(), finalizer.clone()))
                    as Arc<dyn OrderCanceller>
            })
        });

        Ok(BitsharesClient {
            rpc,
            default_account: self.default_account.filter(|a| !a.is_empty()),
            order_expiration_secs: self
                .order_expiration_secs
                .unwrap_or(DEFAULT_ORDER_EXPIRATION_SECS),
            assets,
            accounts,
            finalizer: self.finalizer,
            watcher: self.watcher,
            canceller,
        })
    }

    #[cfg(feature = "http")]
    fn http_transport(url: &str) -> MarketResult<Arc<dyn RpcTransport>> {
        Ok(Arc::new(crate::rpc::HttpTransport::new(url)?))
    }

    #[cfg(not(feature = "http"))]
    fn http_transport(_url: &str) -> MarketResult<Arc<dyn RpcTransport>> {
        Err(MarketError::NotConfigured(
            "RPC transport (enable the `http` feature or call `transport`)",
        ))
    }
}

/// Entry point: holds the node RPC and the collaborators, hands out
/// [`Market`]s.
#[derive(Clone)]
pub struct BitsharesClient {
    rpc: NodeRpc,
    default_account: Option<String>,
    order_expiration_secs: u64,
    assets: Arc<dyn AssetLookup>,
    accounts: Arc<dyn AccountLookup>,
    finalizer: Option<Arc<dyn TransactionFinalizer>>,
    watcher: Option<Arc<dyn ConfirmationWatcher>>,
    canceller: Option<Arc<dyn OrderCanceller>>,
}

impl std::fmt::Debug for BitsharesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitsharesClient")
            .field("default_account", &self.default_account)
            .field("order_expiration_secs", &self.order_expiration_secs)
            .field("finalizer", &self.finalizer.is_some())
            .field("watcher", &self.watcher.is_some())
            .field("canceller", &self.canceller.is_some())
            .finish()
    }
}

impl BitsharesClient {
    /// Client on the given node with default settings.
    pub fn new(node_url: impl Into<String>) -> MarketResult<Self> {
        BitsharesClientBuilder::new().node_url(node_url).build()
    }

    pub fn builder() -> BitsharesClientBuilder {
        BitsharesClientBuilder::new()
    }

    /// A builder carrying this client's configuration, for adding collaborators.
    pub fn to_builder(&self) -> BitsharesClientBuilder {
        BitsharesClientBuilder {
            node_url: None,
            transport: Some(self.rpc.transport().clone()),
            default_account: self.default_account.clone(),
            order_expiration_secs: Some(self.order_expiration_secs),
            assets: Some(self.assets.clone()),
            accounts: Some(self.accounts.clone()),
            finalizer: self.finalizer.clone(),
            watcher: self.watcher.clone(),
            canceller: self.canceller.clone(),
        }
    }

    pub fn rpc(&self) -> &NodeRpc {
        &self.rpc
    }

    pub fn default_account(&self) -> Option<&str> {
        self.default_account.as_deref()
    }

    pub fn order_expiration_secs(&self) -> u64 {
        self.order_expiration_secs
    }

    pub fn assets(&self) -> &Arc<dyn AssetLookup> {
        &self.assets
    }

    pub fn accounts(&self) -> &Arc<dyn AccountLookup> {
        &self.accounts
    }

    pub(crate) fn finalizer(&self) -> MarketResult<&Arc<dyn TransactionFinalizer>> {
        self.finalizer
            .as_ref()
            .ok_or(MarketError::NotConfigured("transaction finalizer"))
    }

    pub(crate) fn watcher(&self) -> MarketResult<&Arc<dyn ConfirmationWatcher>> {
        self.watcher
            .as_ref()
            .ok_or(MarketError::NotConfigured("confirmation watcher"))
    }

    pub(crate) fn canceller(&self) -> MarketResult<&Arc<dyn OrderCanceller>> {
        self.canceller
            .as_ref()
            .ok_or(MarketError::NotConfigured("order canceller"))
    }

    // =========================================================================
    // Markets
    // =========================================================================

    /// Resolve `QUOTE/BASE` (or `-`, `:`) into a market.
    pub async fn market(&self, spec: &str) -> MarketResult<Market<'_>> {
        let spec: MarketSpec = spec.parse()?;
        self.market_from_spec(&spec).await
    }

    pub async fn market_from_spec(&self, spec: &MarketSpec) -> MarketResult<Market<'_>> {
        let quote = self.assets.get_asset(&spec.quote).await?;
        let base = self.assets.get_asset(&spec.base).await?;
        Market::new(self, quote, base)
    }

    /// Market over two already-resolved assets.
    pub fn market_from_assets(&self, quote: Asset, base: Asset) -> MarketResult<Market<'_>> {
        Market::new(self, quote, base)
    }
}
