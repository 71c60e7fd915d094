//! Crate-level error type for market operations.

use thiserror::Error;

use crate::rpc::RpcError;
use crate::shared::ScalingError;

/// Error type for [`Market`](crate::market::Market) and client operations.
#[derive(Debug, Error)]
pub enum MarketError {
    /// No account was passed and no default account is configured
    #[error("No account given and no default account configured")]
    MissingAccount,

    /// A price or amount is denominated in assets that do not belong to the market
    #[error("Asset mismatch: {0}")]
    AssetMismatch(String),

    /// The market specifier does not split into two symbols
    #[error("Invalid market '{0}': expected QUOTE/BASE, QUOTE-BASE or QUOTE:BASE")]
    InvalidMarket(String),

    /// The node does not know this asset
    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    /// The node does not know this account
    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    /// A write collaborator (finalizer, watcher, canceller) is missing
    #[error("Not configured: {0}")]
    NotConfigured(&'static str),

    /// Invalid parameter provided
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Price/amount conversion failed
    #[error("Scaling error: {0}")]
    Scaling(#[from] ScalingError),

    /// RPC transport or node error
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// The signer refused or failed to sign
    #[error("Signing error: {0}")]
    Signing(String),

    /// Waiting for inclusion failed or timed out
    #[error("Confirmation error: {0}")]
    Confirmation(String),

    /// The node answered with a payload this crate does not understand
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Result type alias for market operations.
pub type MarketResult<T> = Result<T, MarketError>;
