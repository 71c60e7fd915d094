//! Operations and transactions in the node's JSON form.

use serde::de::Error as _;
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::network::CORE_ASSET_ID;
use crate::shared::{AssetAmount, ObjectId};

/// `limit_order_create` operation id.
pub const LIMIT_ORDER_CREATE_OP: u8 = 1;
/// `limit_order_cancel` operation id.
pub const LIMIT_ORDER_CANCEL_OP: u8 = 2;

/// Zero fee in the core asset. The finalizer replaces it with the required fee.
pub fn fee_placeholder() -> AssetAmount {
    AssetAmount::new(0, CORE_ASSET_ID)
}

// ─── Operations ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitOrderCreate {
    pub fee: AssetAmount,
    pub seller: ObjectId,
    pub amount_to_sell: AssetAmount,
    pub min_to_receive: AssetAmount,
    /// Node time format.
    pub expiration: String,
    pub fill_or_kill: bool,
    #[serde(default)]
    pub extensions: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitOrderCancel {
    pub fee: AssetAmount,
    pub fee_paying_account: ObjectId,
    pub order: ObjectId,
    #[serde(default)]
    pub extensions: Vec<Value>,
}

impl LimitOrderCancel {
    pub fn new(fee_paying_account: ObjectId, order: ObjectId) -> Self {
        Self {
            fee: fee_placeholder(),
            fee_paying_account,
            order,
            extensions: Vec::new(),
        }
    }
}

/// An operation, serialized as `[op_id, {body}]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    LimitOrderCreate(LimitOrderCreate),
    LimitOrderCancel(LimitOrderCancel),
}

impl Operation {
    pub fn op_id(&self) -> u8 {
        match self {
            Operation::LimitOrderCreate(_) => LIMIT_ORDER_CREATE_OP,
            Operation::LimitOrderCancel(_) => LIMIT_ORDER_CANCEL_OP,
        }
    }

    pub fn fee(&self) -> &AssetAmount {
        match self {
            Operation::LimitOrderCreate(op) => &op.fee,
            Operation::LimitOrderCancel(op) => &op.fee,
        }
    }

    pub fn set_fee(&mut self, fee: AssetAmount) {
        match self {
            Operation::LimitOrderCreate(op) => op.fee = fee,
            Operation::LimitOrderCancel(op) => op.fee = fee,
        }
    }
}

impl From<LimitOrderCreate> for Operation {
    fn from(op: LimitOrderCreate) -> Self {
        Operation::LimitOrderCreate(op)
    }
}

impl From<LimitOrderCancel> for Operation {
    fn from(op: LimitOrderCancel) -> Self {
        Operation::LimitOrderCancel(op)
    }
}

impl Serialize for Operation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.op_id())?;
        match self {
            Operation::LimitOrderCreate(op) => tuple.serialize_element(op)?,
            Operation::LimitOrderCancel(op) => tuple.serialize_element(op)?,
        }
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (op_id, body) = <(u8, Value)>::deserialize(deserializer)?;
        match op_id {
            LIMIT_ORDER_CREATE_OP => serde_json::from_value(body)
                .map(Operation::LimitOrderCreate)
                .map_err(D::Error::custom),
            LIMIT_ORDER_CANCEL_OP => serde_json::from_value(body)
                .map(Operation::LimitOrderCancel)
                .map_err(D::Error::custom),
            other => Err(D::Error::custom(format!("unsupported operation id {}", other))),
        }
    }
}

// ─── Transactions ────────────────────────────────────────────────────────────

/// A transaction as broadcast to the node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transaction {
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    /// Node time format.
    pub expiration: String,
    pub operations: Vec<Operation>,
    #[serde(default)]
    pub extensions: Vec<Value>,
    #[serde(default)]
    pub signatures: Vec<String>,
}

impl Transaction {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self {
            operations,
            ..Default::default()
        }
    }

    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }
}

/// A transaction after inclusion in a block.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConfirmedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub block_num: u32,
    pub trx_num: u32,
    /// One `[result_type, value]` pair per operation.
    #[serde(default)]
    pub operation_results: Vec<Value>,
}

impl ConfirmedTransaction {
    /// Object id created by the operation at `index`, e.g. the `1.7.x` of a
    /// `limit_order_create`.
    pub fn created_object_id(&self, index: usize) -> Option<ObjectId> {
        self.operation_results
            .get(index)?
            .get(1)?
            .as_str()?
            .parse()
            .ok()
    }
}

/// Reference block parameters for TaPoS.
///
/// `ref_block_num` is the low 16 bits of the head block number;
/// `ref_block_prefix` is the little-endian `u32` at bytes 4..8 of the head
/// block id.
pub fn ref_block_params(
    head_block_number: u32,
    head_block_id: &str,
) -> Result<(u16, u32), String> {
    let bytes = hex::decode(head_block_id)
        .map_err(|e| format!("head_block_id '{}' is not hex: {}", head_block_id, e))?;
    let prefix: [u8; 4] = bytes
        .get(4..8)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| format!("head_block_id '{}' is too short", head_block_id))?;
    Ok(((head_block_number & 0xFFFF) as u16, u32::from_le_bytes(prefix)))
}
