//! # BitShares Market SDK
//!
//! A Rust client for trading on a BitShares (Graphene) market through a node's
//! JSON-RPC interface.
//!
//! ## Modules
//!
//! - [`rpc`]: JSON-RPC transport and typed node calls
//! - [`chain`]: collaborator traits (asset/account lookup, transaction
//!   finalization, confirmation, cancellation) and transaction building
//! - [`market`]: the market wrapper: ticker, volume, order book, trades,
//!   account history, buy/sell/cancel
//!
//! Plus a shared module:
//! - [`shared`]: object ids, fixed-point scaling, node time format
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bitshares_market::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BitsharesClient::builder()
//!         .node_url("https://api.bitshares.ws")
//!         .build()?;
//!
//!     let market = client.market("USD/BTS").await?;
//!     let ticker = market.ticker().await?;
//!     println!("latest: {}", ticker.latest);
//!
//!     let book = market.orderbook(10).await?;
//!     println!("{} bids, {} asks", book.bids.len(), book.asks.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Placing orders
//!
//! Write operations need a [`chain::TransactionFinalizer`]. The crate ships
//! [`chain::NodeFinalizer`], which fetches fees and reference block data from
//! the node and broadcasts, but delegates signing to a [`chain::Signer`]
//! supplied by the application.

// ============================================================================
// MODULES
// ============================================================================

/// Shared utilities: object ids, scaling, node time format.
pub mod shared;

/// Network constants.
pub mod network;

/// Crate-level error types.
pub mod error;

/// JSON-RPC transport and typed node calls.
pub mod rpc;

/// Collaborator traits and transaction building.
pub mod chain;

/// Market wrapper and domain types.
pub mod market;

/// `BitsharesClient`: the entry point.
pub mod client;

// ============================================================================
// PRELUDE
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use bitshares_market::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::{BitsharesClient, BitsharesClientBuilder};
    pub use crate::error::{MarketError, MarketResult};

    pub use crate::market::{
        Amount, AmountInput, Asset, FilledOrder, Market, MarketPair, MarketSpec, OpenOrder,
        OrderBook, OrderBookLevel, OrderOptions, OrderReceipt, Price, PriceInput, Ticker,
        TradeHistory, TradeRecord, Volume24h,
    };

    pub use crate::chain::{
        Account, AccountLookup, AssetLookup, ConfirmationMode, ConfirmationWatcher,
        ConfirmedTransaction, FinalizingCanceller, NodeFinalizer, Operation, OrderCanceller,
        Permission, Signer, Transaction, TransactionFinalizer,
    };

    pub use crate::rpc::{NodeRpc, RetryConfig, RetryPolicy, RpcError, RpcResult, RpcTransport};
    #[cfg(feature = "http")]
    pub use crate::rpc::{HttpTransport, HttpTransportBuilder};

    pub use crate::shared::{AssetAmount, ObjectId, ScalingError, Side};

    pub use crate::network::{CORE_ASSET_ID, DEFAULT_NODE_URL};
}
