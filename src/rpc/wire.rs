//! Raw node response shapes.
//!
//! These mirror what the node returns and are converted into the market's
//! domain types in `market::convert`. Unknown fields are ignored.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::shared::serde_util::{lenient_decimal, raw_amount};
use crate::shared::{AssetAmount, ObjectId, RawPrice};

// ─── Assets ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct AssetOptionsWire {
    pub core_exchange_rate: RawPrice,
    #[serde(default, with = "opt_raw_amount")]
    pub max_supply: Option<i64>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetWire {
    pub id: ObjectId,
    pub symbol: String,
    pub precision: u8,
    pub issuer: ObjectId,
    pub options: AssetOptionsWire,
    #[serde(default)]
    pub bitasset_data_id: Option<ObjectId>,
    #[serde(default)]
    pub dynamic_asset_data_id: Option<ObjectId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceFeedWire {
    pub settlement_price: RawPrice,
    #[serde(default)]
    pub maintenance_collateral_ratio: Option<u32>,
    #[serde(default)]
    pub maximum_short_squeeze_ratio: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BitAssetOptionsWire {
    pub short_backing_asset: ObjectId,
}

/// Settlement data of a market-pegged asset (`2.4.x`).
#[derive(Debug, Clone, Deserialize)]
pub struct BitAssetDataWire {
    pub id: ObjectId,
    pub current_feed: PriceFeedWire,
    pub options: BitAssetOptionsWire,
}

// ─── Market data ─────────────────────────────────────────────────────────────

/// `database.get_ticker`. Numeric fields arrive as decimal strings.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerWire {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(with = "lenient_decimal")]
    pub latest: Decimal,
    #[serde(with = "lenient_decimal")]
    pub lowest_ask: Decimal,
    #[serde(with = "lenient_decimal")]
    pub highest_bid: Decimal,
    #[serde(with = "lenient_decimal")]
    pub percent_change: Decimal,
    #[serde(with = "lenient_decimal")]
    pub base_volume: Decimal,
    #[serde(with = "lenient_decimal")]
    pub quote_volume: Decimal,
}

/// `database.get_24_volume`
#[derive(Debug, Clone, Deserialize)]
pub struct VolumeWire {
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(with = "lenient_decimal")]
    pub base_volume: Decimal,
    #[serde(with = "lenient_decimal")]
    pub quote_volume: Decimal,
}

/// One aggregated level of `database.get_order_book`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderBookLevelWire {
    #[serde(with = "lenient_decimal")]
    pub price: Decimal,
    #[serde(with = "lenient_decimal")]
    pub quote: Decimal,
    #[serde(with = "lenient_decimal")]
    pub base: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderBookWire {
    #[serde(default)]
    pub bids: Vec<OrderBookLevelWire>,
    #[serde(default)]
    pub asks: Vec<OrderBookLevelWire>,
}

/// One entry of `database.get_trade_history`.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeWire {
    pub date: String,
    #[serde(with = "lenient_decimal")]
    pub price: Decimal,
    #[serde(with = "lenient_decimal")]
    pub amount: Decimal,
    #[serde(default)]
    pub sequence: Option<i64>,
}

/// The `fill_order` operation inside a fill history entry.
#[derive(Debug, Clone, Deserialize)]
pub struct FillOpWire {
    #[serde(default)]
    pub fee: Option<AssetAmount>,
    pub order_id: ObjectId,
    pub account_id: ObjectId,
    pub pays: AssetAmount,
    pub receives: AssetAmount,
    #[serde(default)]
    pub is_maker: Option<bool>,
}

/// One entry of `history.get_fill_order_history`.
#[derive(Debug, Clone, Deserialize)]
pub struct FillOrderWire {
    pub op: FillOpWire,
    pub time: String,
}

// ─── Accounts ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct AccountWire {
    pub id: ObjectId,
    pub name: String,
}

/// An open order (`1.7.x`) as held in an account's full record.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitOrderWire {
    pub id: ObjectId,
    pub expiration: String,
    pub seller: ObjectId,
    #[serde(with = "raw_amount")]
    pub for_sale: i64,
    pub sell_price: RawPrice,
}

/// Value half of a `database.get_full_accounts` pair.
#[derive(Debug, Clone, Deserialize)]
pub struct FullAccountWire {
    pub account: AccountWire,
    #[serde(default)]
    pub limit_orders: Vec<LimitOrderWire>,
}

// ─── Chain state ─────────────────────────────────────────────────────────────

/// `database.get_dynamic_global_properties` (object `2.1.0`).
#[derive(Debug, Clone, Deserialize)]
pub struct DynamicGlobalPropertiesWire {
    pub head_block_number: u32,
    pub head_block_id: String,
    pub time: String,
    #[serde(default)]
    pub last_irreversible_block_num: u32,
}

mod opt_raw_amount {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wrapped(#[serde(with = "crate::shared::serde_util::raw_amount")] i64);

        Option::<Wrapped>::deserialize(deserializer).map(|w| w.map(|Wrapped(v)| v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_asset_with_bitasset() {
        let asset: AssetWire = serde_json::from_value(json!({
            "id": "1.3.121",
            "symbol": "USD",
            "precision": 4,
            "issuer": "1.2.0",
            "options": {
                "max_supply": "1000000000000000",
                "core_exchange_rate": {
                    "base": {"amount": 1, "asset_id": "1.3.121"},
                    "quote": {"amount": 300, "asset_id": "1.3.0"}
                }
            },
            "bitasset_data_id": "2.4.21",
            "dynamic_asset_data_id": "2.3.121"
        }))
        .unwrap();
        assert_eq!(asset.symbol, "USD");
        assert_eq!(asset.precision, 4);
        assert_eq!(asset.bitasset_data_id, Some(ObjectId::new(2, 4, 21)));
        assert_eq!(asset.options.max_supply, Some(1_000_000_000_000_000));
    }

    #[test]
    fn test_ticker_strings() {
        let ticker: TickerWire = serde_json::from_value(json!({
            "time": "2018-05-21T15:04:12",
            "base": "BTS",
            "quote": "USD",
            "latest": "300.1",
            "lowest_ask": "301",
            "highest_bid": "299.5",
            "percent_change": "-1.96",
            "base_volume": "361666.63617",
            "quote_volume": "1087"
        }))
        .unwrap();
        assert_eq!(ticker.latest, dec!(300.1));
        assert_eq!(ticker.percent_change, dec!(-1.96));
        assert_eq!(ticker.base_volume, dec!(361666.63617));
    }

    #[test]
    fn test_full_accounts_pairs() {
        let pairs: Vec<(String, FullAccountWire)> = serde_json::from_value(json!([
            ["alice", {
                "account": {"id": "1.2.17", "name": "alice"},
                "limit_orders": [{
                    "id": "1.7.42",
                    "expiration": "2030-01-01T00:00:00",
                    "seller": "1.2.17",
                    "for_sale": 300000000,
                    "sell_price": {
                        "base": {"amount": 300000000, "asset_id": "1.3.0"},
                        "quote": {"amount": 100000, "asset_id": "1.3.121"}
                    },
                    "deferred_fee": 578
                }]
            }]
        ]))
        .unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].1.account.id, ObjectId::new(1, 2, 17));
        assert_eq!(pairs[0].1.limit_orders[0].for_sale, 300_000_000);
    }
}
