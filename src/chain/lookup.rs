//! Node-backed lookups and the default canceller.

use std::sync::Arc;

use async_trait::async_trait;

use crate::chain::{
    Account, AccountLookup, AssetLookup, LimitOrderCancel, Operation, OrderCanceller, Permission,
    Transaction, TransactionFinalizer,
};
use crate::error::{MarketError, MarketResult};
use crate::market::Asset;
use crate::rpc::wire::AccountWire;
use crate::rpc::NodeRpc;
use crate::shared::ObjectId;

#[async_trait]
impl AssetLookup for NodeRpc {
    async fn get_asset(&self, symbol_or_id: &str) -> MarketResult<Asset> {
        let symbol_or_id = symbol_or_id.trim();
        if symbol_or_id.is_empty() {
            return Err(MarketError::UnknownAsset(String::new()));
        }
        let mut assets = self.lookup_asset_symbols(&[symbol_or_id]).await?;
        match assets.pop().flatten() {
            Some(wire) => Ok(Asset::from(wire)),
            None => Err(MarketError::UnknownAsset(symbol_or_id.to_string())),
        }
    }
}

#[async_trait]
impl AccountLookup for NodeRpc {
    async fn get_account(&self, name_or_id: &str) -> MarketResult<Account> {
        let wire = match name_or_id.parse::<ObjectId>() {
            Ok(id) if id.is_account() => self.get_object::<AccountWire>(&id).await?,
            _ => self.get_account_by_name(name_or_id).await?,
        };
        wire.map(|a| Account {
            id: a.id,
            name: a.name,
        })
        .ok_or_else(|| MarketError::UnknownAccount(name_or_id.to_string()))
    }
}

/// Cancels orders by submitting `limit_order_cancel` operations through a
/// [`TransactionFinalizer`].
#[derive(Clone)]
pub struct FinalizingCanceller {
    accounts: Arc<dyn AccountLookup>,
    finalizer: Arc<dyn TransactionFinalizer>,
}

impl FinalizingCanceller {
    pub fn new(accounts: Arc<dyn AccountLookup>, finalizer: Arc<dyn TransactionFinalizer>) -> Self {
        Self {
            accounts,
            finalizer,
        }
    }
}

#[async_trait]
impl OrderCanceller for FinalizingCanceller {
    async fn cancel(&self, order_ids: &[ObjectId], account: &str) -> MarketResult<Transaction> {
        if order_ids.is_empty() {
            return Err(MarketError::InvalidParameter(
                "At least one order id is required".to_string(),
            ));
        }
        if let Some(bad) = order_ids.iter().find(|id| !id.is_limit_order()) {
            return Err(MarketError::InvalidParameter(format!(
                "{} is not a limit order id (1.7.x)",
                bad
            )));
        }

        let account = self.accounts.get_account(account).await?;
        let operations: Vec<Operation> = order_ids
            .iter()
            .map(|id| LimitOrderCancel::new(account.id, *id).into())
            .collect();

        tracing::info!(
            account = %account.name,
            orders = order_ids.len(),
            "Cancelling orders"
        );
        self.finalizer
            .finalize(operations, &account, Permission::Active)
            .await
    }
}
