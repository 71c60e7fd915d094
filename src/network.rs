//! Network constants for BitShares nodes.

use crate::shared::ObjectId;

/// Default public API node (JSON-RPC over HTTP).
pub const DEFAULT_NODE_URL: &str = "https://api.bitshares.ws";

/// Object id of the core asset (BTS). Fee placeholders are denominated in it.
pub const CORE_ASSET_ID: ObjectId = ObjectId::new(1, 3, 0);

/// Default lifetime of a limit order: 7 days.
pub const DEFAULT_ORDER_EXPIRATION_SECS: u64 = 7 * 24 * 60 * 60;

/// Default lifetime of a signed transaction before the node rejects it.
pub const DEFAULT_TX_EXPIRATION_SECS: u64 = 30;
