//! Transaction finalization against a node.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::chain::transaction::ref_block_params;
use crate::chain::{Account, Operation, Permission, Signer, Transaction, TransactionFinalizer};
use crate::error::{MarketError, MarketResult};
use crate::network::DEFAULT_TX_EXPIRATION_SECS;
use crate::rpc::NodeRpc;
use crate::shared::{format_time_from_now, ObjectId};

/// Builder for [`NodeFinalizer`].
pub struct NodeFinalizerBuilder {
    rpc: NodeRpc,
    signer: Arc<dyn Signer>,
    tx_expiration_secs: u64,
    nobroadcast: bool,
}

impl NodeFinalizerBuilder {
    pub fn new(rpc: NodeRpc, signer: Arc<dyn Signer>) -> Self {
        Self {
            rpc,
            signer,
            tx_expiration_secs: DEFAULT_TX_EXPIRATION_SECS,
            nobroadcast: false,
        }
    }

    /// Seconds until the transaction expires (default 30).
    pub fn tx_expiration_secs(mut self, secs: u64) -> Self {
        self.tx_expiration_secs = secs;
        self
    }

    /// Sign but never broadcast.
    pub fn nobroadcast(mut self, nobroadcast: bool) -> Self {
        self.nobroadcast = nobroadcast;
        self
    }

    pub fn build(self) -> NodeFinalizer {
        NodeFinalizer {
            rpc: self.rpc,
            signer: self.signer,
            tx_expiration_secs: self.tx_expiration_secs,
            nobroadcast: self.nobroadcast,
        }
    }
}

/// [`TransactionFinalizer`] that fills in fees and reference block data from
/// the node, delegates signing, and broadcasts.
#[derive(Clone)]
pub struct NodeFinalizer {
    rpc: NodeRpc,
    signer: Arc<dyn Signer>,
    tx_expiration_secs: u64,
    nobroadcast: bool,
}

impl NodeFinalizer {
    pub fn builder(rpc: NodeRpc, signer: Arc<dyn Signer>) -> NodeFinalizerBuilder {
        NodeFinalizerBuilder::new(rpc, signer)
    }

    /// Replace zero fee placeholders with the node's required fees, one
    /// request per fee asset.
    async fn fill_fees(&self, operations: &mut [Operation]) -> MarketResult<()> {
        let fee_assets: BTreeSet<ObjectId> = operations
            .iter()
            .filter(|op| op.fee().amount == 0)
            .map(|op| op.fee().asset_id)
            .collect();

        for asset in fee_assets {
            let indices: Vec<usize> = operations
                .iter()
                .enumerate()
                .filter(|(_, op)| op.fee().amount == 0 && op.fee().asset_id == asset)
                .map(|(i, _)| i)
                .collect();

            let payload = indices
                .iter()
                .map(|&i| serde_json::to_value(&operations[i]))
                .collect::<Result<Vec<Value>, _>>()
                .map_err(|e| {
                    MarketError::InvalidParameter(format!("Failed to encode operation: {}", e))
                })?;

            let fees = self.rpc.get_required_fees(&payload, &asset).await?;
            if fees.len() != indices.len() {
                return Err(MarketError::UnexpectedResponse(format!(
                    "get_required_fees returned {} fees for {} operations",
                    fees.len(),
                    indices.len()
                )));
            }
            for (i, fee) in indices.into_iter().zip(fees) {
                operations[i].set_fee(fee);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionFinalizer for NodeFinalizer {
    async fn finalize(
        &self,
        mut operations: Vec<Operation>,
        account: &Account,
        permission: Permission,
    ) -> MarketResult<Transaction> {
        if operations.is_empty() {
            return Err(MarketError::InvalidParameter(
                "Transaction has no operations".to_string(),
            ));
        }

        self.fill_fees(&mut operations).await?;

        let props = self.rpc.get_dynamic_global_properties().await?;
        let (ref_block_num, ref_block_prefix) =
            ref_block_params(props.head_block_number, &props.head_block_id)
                .map_err(MarketError::UnexpectedResponse)?;

        let mut tx = Transaction {
            ref_block_num,
            ref_block_prefix,
            expiration: format_time_from_now(self.tx_expiration_secs),
            operations,
            extensions: Vec::new(),
            signatures: Vec::new(),
        };

        let signatures = self.signer.sign(&tx, account, permission).await?;
        if signatures.is_empty() {
            return Err(MarketError::Signing(format!(
                "No signatures produced for {} ({})",
                account.name, permission
            )));
        }
        tx.signatures = signatures;

        if self.nobroadcast {
            tracing::warn!(account = %account.name, "Not broadcasting anything!");
            return Ok(tx);
        }

        let payload = serde_json::to_value(&tx).map_err(|e| {
            MarketError::InvalidParameter(format!("Failed to encode transaction: {}", e))
        })?;
        self.rpc.broadcast_transaction(payload).await?;
        tracing::debug!(
            ref_block_num,
            ref_block_prefix,
            operations = tx.operations.len(),
            "Transaction broadcast"
        );
        Ok(tx)
    }
}
