//! Shared newtypes and utilities used across the RPC, chain and market modules.
//!
//! These types are serialization-transparent: they serialize/deserialize
//! identically to the raw format the node sends, so they can be used directly
//! in wire types without conversion overhead.

pub mod scaling;
pub mod serde_util;
pub mod time;

pub use scaling::{
    from_raw_amount, precision_multiplier, scale_price_amount, scale_price_ratio, to_raw_amount,
    MarketDecimals, ScaledAmounts, ScalingError,
};
pub use time::{format_node_time, format_time_from_now, parse_node_time, to_epoch_seconds};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ─── ObjectId ────────────────────────────────────────────────────────────────

/// Graphene object identifier of the form `space.type.instance`.
///
/// Examples: `1.3.0` (core asset), `1.2.17` (account), `1.7.4242` (limit order),
/// `2.4.21` (bitasset data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    pub space: u8,
    pub type_id: u8,
    pub instance: u64,
}

impl ObjectId {
    pub const fn new(space: u8, type_id: u8, instance: u64) -> Self {
        Self {
            space,
            type_id,
            instance,
        }
    }

    /// `1.2.x`
    pub fn is_account(&self) -> bool {
        self.space == 1 && self.type_id == 2
    }

    /// `1.3.x`
    pub fn is_asset(&self) -> bool {
        self.space == 1 && self.type_id == 3
    }

    /// `1.7.x`
    pub fn is_limit_order(&self) -> bool {
        self.space == 1 && self.type_id == 7
    }
}

/// Error returned when a string is not a valid object id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidObjectId(pub String);

impl fmt::Display for InvalidObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid object id '{}' (expected space.type.instance)", self.0)
    }
}

impl std::error::Error for InvalidObjectId {}

impl FromStr for ObjectId {
    type Err = InvalidObjectId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InvalidObjectId(s.to_string());
        let mut parts = s.split('.');
        let (Some(space), Some(type_id), Some(instance), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(err());
        };
        Ok(ObjectId {
            space: space.parse().map_err(|_| err())?,
            type_id: type_id.parse().map_err(|_| err())?,
            instance: instance.parse().map_err(|_| err())?,
        })
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.space, self.type_id, self.instance)
    }
}

impl Serialize for ObjectId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ObjectId::from_str(&s).map_err(serde::de::Error::custom)
    }
}

// ─── AssetAmount / RawPrice ──────────────────────────────────────────────────

/// An integer amount of an asset in its smallest unit.
///
/// Serializes as `{"amount": 100000, "asset_id": "1.3.121"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetAmount {
    #[serde(with = "serde_util::raw_amount")]
    pub amount: i64,
    pub asset_id: ObjectId,
}

impl AssetAmount {
    pub fn new(amount: i64, asset_id: ObjectId) -> Self {
        Self { amount, asset_id }
    }
}

/// A ratio of two integer amounts as the node stores it (`base` per `quote`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPrice {
    pub base: AssetAmount,
    pub quote: AssetAmount,
}

impl RawPrice {
    /// True when the ratio is between exactly these two assets, in either order.
    pub fn involves(&self, a: &ObjectId, b: &ObjectId) -> bool {
        (self.base.asset_id == *a && self.quote.asset_id == *b)
            || (self.base.asset_id == *b && self.quote.asset_id == *a)
    }
}

// ─── Side ────────────────────────────────────────────────────────────────────

/// Order side from the perspective of the market's quote asset.
///
/// `Buy` sells base to receive quote; `Sell` sells quote to receive base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_parse() {
        let id: ObjectId = "1.3.121".parse().unwrap();
        assert_eq!(id, ObjectId::new(1, 3, 121));
        assert!(id.is_asset());
        assert!(!id.is_account());
        assert_eq!(id.to_string(), "1.3.121");
    }

    #[test]
    fn test_object_id_rejects_malformed() {
        assert!("1.3".parse::<ObjectId>().is_err());
        assert!("1.3.0.1".parse::<ObjectId>().is_err());
        assert!("a.b.c".parse::<ObjectId>().is_err());
        assert!("USD".parse::<ObjectId>().is_err());
        assert!("".parse::<ObjectId>().is_err());
    }

    #[test]
    fn test_object_id_serde() {
        let id = ObjectId::new(1, 7, 4242);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"1.7.4242\"");
        let back: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
        assert!(serde_json::from_str::<ObjectId>("\"nope\"").is_err());
    }

    #[test]
    fn test_asset_amount_accepts_string_amount() {
        let a: AssetAmount =
            serde_json::from_str(r#"{"amount":"9007199254740993","asset_id":"1.3.0"}"#).unwrap();
        assert_eq!(a.amount, 9_007_199_254_740_993);
        assert_eq!(
            serde_json::to_value(&AssetAmount::new(5, ObjectId::new(1, 3, 0))).unwrap(),
            serde_json::json!({"amount": 5, "asset_id": "1.3.0"})
        );
    }

    #[test]
    fn test_raw_price_involves() {
        let bts = ObjectId::new(1, 3, 0);
        let usd = ObjectId::new(1, 3, 121);
        let cny = ObjectId::new(1, 3, 113);
        let p = RawPrice {
            base: AssetAmount::new(300, bts),
            quote: AssetAmount::new(1, usd),
        };
        assert!(p.involves(&bts, &usd));
        assert!(p.involves(&usd, &bts));
        assert!(!p.involves(&usd, &cny));
    }

    #[test]
    fn test_side_serde() {
        let buy: Side = serde_json::from_str("\"buy\"").unwrap();
        assert_eq!(buy, Side::Buy);
        assert_eq!(serde_json::to_string(&Side::Sell).unwrap(), "\"sell\"");
    }
}
