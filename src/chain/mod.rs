//! Collaborators at the chain boundary.
//!
//! The market never signs, watches blocks or resolves names itself. It talks
//! to these traits, which the client wires up:
//!
//! - [`AssetLookup`] / [`AccountLookup`]: implemented for [`NodeRpc`](crate::rpc::NodeRpc)
//! - [`TransactionFinalizer`]: [`NodeFinalizer`] fills fees and reference block,
//!   asks a [`Signer`], and broadcasts
//! - [`ConfirmationWatcher`]: supplied by the application
//! - [`OrderCanceller`]: [`FinalizingCanceller`] builds `limit_order_cancel`
//!   operations and submits them through a finalizer

pub mod finalizer;
pub mod lookup;
pub mod transaction;

pub use finalizer::{NodeFinalizer, NodeFinalizerBuilder};
pub use lookup::FinalizingCanceller;
pub use transaction::{
    fee_placeholder, ref_block_params, ConfirmedTransaction, LimitOrderCancel, LimitOrderCreate,
    Operation, Transaction,
};

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MarketResult;
use crate::market::Asset;
use crate::shared::ObjectId;

/// An account's identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    pub id: ObjectId,
    pub name: String,
}

/// Authority an operation is signed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Active,
    Owner,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Permission::Active => write!(f, "active"),
            Permission::Owner => write!(f, "owner"),
        }
    }
}

/// How far a transaction must get before an order placement returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationMode {
    /// Included in the head block.
    Head,
    /// Included in an irreversible block.
    Irreversible,
}

/// Resolves asset symbols or ids to full asset metadata.
#[async_trait]
pub trait AssetLookup: Send + Sync {
    async fn get_asset(&self, symbol_or_id: &str) -> MarketResult<Asset>;
}

/// Resolves account names or ids.
#[async_trait]
pub trait AccountLookup: Send + Sync {
    async fn get_account(&self, name_or_id: &str) -> MarketResult<Account>;
}

/// Turns operations into a signed (and normally broadcast) transaction.
#[async_trait]
pub trait TransactionFinalizer: Send + Sync {
    async fn finalize(
        &self,
        operations: Vec<Operation>,
        account: &Account,
        permission: Permission,
    ) -> MarketResult<Transaction>;
}

/// Blocks until a broadcast transaction is included.
#[async_trait]
pub trait ConfirmationWatcher: Send + Sync {
    async fn await_confirmation(
        &self,
        transaction: &Transaction,
        mode: ConfirmationMode,
    ) -> MarketResult<ConfirmedTransaction>;
}

/// Cancels open orders on behalf of an account.
#[async_trait]
pub trait OrderCanceller: Send + Sync {
    async fn cancel(&self, order_ids: &[ObjectId], account: &str) -> MarketResult<Transaction>;
}

/// Produces signatures for a transaction.
///
/// Key storage and the signing digest are the implementor's concern.
#[async_trait]
pub trait Signer: Send + Sync {
    async fn sign(
        &self,
        transaction: &Transaction,
        account: &Account,
        permission: Permission,
    ) -> MarketResult<Vec<String>>;
}
