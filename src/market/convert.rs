//! Wire → domain conversions.

use crate::market::types::{FilledOrder, MarketPair, OpenOrder};
use crate::market::{Asset, Price};
use crate::rpc::wire::{AssetWire, FillOrderWire, LimitOrderWire};
use crate::shared::{to_epoch_seconds, RawPrice, Side};

impl From<AssetWire> for Asset {
    fn from(wire: AssetWire) -> Self {
        Asset {
            id: wire.id,
            symbol: wire.symbol,
            precision: wire.precision,
            issuer: wire.issuer,
            core_exchange_rate: wire.options.core_exchange_rate,
            bitasset_data_id: wire.bitasset_data_id,
        }
    }
}

/// A node ratio between `base` and `quote` in either order, as base per quote.
///
/// `None` when the ratio involves other assets or has a zero side.
pub(crate) fn oriented_price(raw: &RawPrice, base: &Asset, quote: &Asset) -> Option<Price> {
    if raw.base.asset_id == base.id && raw.quote.asset_id == quote.id {
        Price::from_raw(raw, base, quote).ok()
    } else if raw.base.asset_id == quote.id && raw.quote.asset_id == base.id {
        Price::from_raw(raw, quote, base).ok().map(Price::invert)
    } else {
        None
    }
}

/// Buy when the account paid base for quote, sell otherwise.
pub(crate) fn filled_order_from_wire(
    wire: &FillOrderWire,
    base: &Asset,
    quote: &Asset,
) -> Result<FilledOrder, String> {
    let op = &wire.op;
    let (side, base_raw, quote_raw) = if op.pays.asset_id == base.id && op.receives.asset_id == quote.id
    {
        (Side::Buy, &op.pays, &op.receives)
    } else if op.pays.asset_id == quote.id && op.receives.asset_id == base.id {
        (Side::Sell, &op.receives, &op.pays)
    } else {
        return Err(format!(
            "fill of {} involves {} and {}, not this market",
            op.order_id, op.pays.asset_id, op.receives.asset_id
        ));
    };

    let total = base.amount_from_raw(base_raw.amount).map_err(|e| e.to_string())?;
    let amount = quote.amount_from_raw(quote_raw.amount).map_err(|e| e.to_string())?;
    let price = Price::new(total.clone(), amount.clone()).map_err(|e| e.to_string())?;
    let timestamp = to_epoch_seconds(&wire.time).map_err(|e| format!("{}: {}", wire.time, e))?;

    Ok(FilledOrder {
        market: MarketPair::new(base, quote),
        order_id: op.order_id,
        account_id: op.account_id,
        side,
        price: price.value(),
        amount: amount.value,
        total: total.value,
        timestamp,
    })
}

/// `None` when the order trades other assets.
pub(crate) fn open_order_from_wire(
    wire: &LimitOrderWire,
    base: &Asset,
    quote: &Asset,
) -> Result<Option<OpenOrder>, String> {
    let sell_price = &wire.sell_price;
    if !sell_price.involves(&base.id, &quote.id) {
        return Ok(None);
    }

    let side = if sell_price.base.asset_id == base.id {
        Side::Buy
    } else {
        Side::Sell
    };
    let price = oriented_price(sell_price, base, quote)
        .ok_or_else(|| format!("order {} has a zero sell price", wire.id))?;
    let expiration =
        to_epoch_seconds(&wire.expiration).map_err(|e| format!("{}: {}", wire.expiration, e))?;

    Ok(Some(OpenOrder {
        market: MarketPair::new(base, quote),
        order_id: wire.id,
        side,
        price: price.value(),
        amount: price.quote.value,
        status: "open".to_string(),
        expiration,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::asset::tests::asset;
    use crate::shared::{AssetAmount, ObjectId};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn bts() -> Asset {
        asset(0, "BTS", 5)
    }

    fn usd() -> Asset {
        asset(121, "USD", 4)
    }

    #[test]
    fn test_oriented_price_both_orders() {
        let raw = RawPrice {
            base: AssetAmount::new(300_000_000, bts().id),
            quote: AssetAmount::new(100_000, usd().id),
        };
        assert_eq!(oriented_price(&raw, &bts(), &usd()).unwrap().value(), dec!(300));

        let flipped = RawPrice {
            base: raw.quote.clone(),
            quote: raw.base.clone(),
        };
        assert_eq!(oriented_price(&flipped, &bts(), &usd()).unwrap().value(), dec!(300));
    }

    #[test]
    fn test_oriented_price_rejects_other_assets_and_zero() {
        let cny = asset(113, "CNY", 4);
        let raw = RawPrice {
            base: AssetAmount::new(1, cny.id),
            quote: AssetAmount::new(1, usd().id),
        };
        assert!(oriented_price(&raw, &bts(), &usd()).is_none());

        let zero = RawPrice {
            base: AssetAmount::new(0, bts().id),
            quote: AssetAmount::new(0, usd().id),
        };
        assert!(oriented_price(&zero, &bts(), &usd()).is_none());
    }

    #[test]
    fn test_fill_buy_and_sell() {
        let buy: FillOrderWire = serde_json::from_value(json!({
            "op": {
                "order_id": "1.7.1",
                "account_id": "1.2.17",
                "pays": {"amount": 30000000, "asset_id": "1.3.0"},
                "receives": {"amount": 10000, "asset_id": "1.3.121"}
            },
            "time": "2020-01-01T00:00:00"
        }))
        .unwrap();
        let fill = filled_order_from_wire(&buy, &bts(), &usd()).unwrap();
        assert_eq!(fill.side, Side::Buy);
        assert_eq!(fill.price, dec!(300));
        assert_eq!(fill.amount, dec!(1));
        assert_eq!(fill.total, dec!(300));
        assert_eq!(fill.timestamp, 1_577_836_800);

        let sell: FillOrderWire = serde_json::from_value(json!({
            "op": {
                "order_id": "1.7.2",
                "account_id": "1.2.18",
                "pays": {"amount": 20000, "asset_id": "1.3.121"},
                "receives": {"amount": 62000000, "asset_id": "1.3.0"}
            },
            "time": "2020-01-01T00:00:00"
        }))
        .unwrap();
        let fill = filled_order_from_wire(&sell, &bts(), &usd()).unwrap();
        assert_eq!(fill.side, Side::Sell);
        assert_eq!(fill.price, dec!(310));
        assert_eq!(fill.amount, dec!(2));
    }

    #[test]
    fn test_open_order_orientation() {
        let order: LimitOrderWire = serde_json::from_value(json!({
            "id": "1.7.9",
            "expiration": "2030-01-01T00:00:00",
            "seller": "1.2.17",
            "for_sale": 5000,
            "sell_price": {
                "base": {"amount": 5000, "asset_id": "1.3.121"},
                "quote": {"amount": 1600000, "asset_id": "1.3.0"}
            }
        }))
        .unwrap();
        let open = open_order_from_wire(&order, &bts(), &usd()).unwrap().unwrap();
        assert_eq!(open.side, Side::Sell);
        assert_eq!(open.price, dec!(32));
        assert_eq!(open.amount, dec!(0.5));
        assert_eq!(open.order_id, ObjectId::new(1, 7, 9));
        assert_eq!(open.status, "open");
    }

    #[test]
    fn test_open_order_other_market_skipped() {
        let order: LimitOrderWire = serde_json::from_value(json!({
            "id": "1.7.10",
            "expiration": "2030-01-01T00:00:00",
            "seller": "1.2.17",
            "for_sale": 5000,
            "sell_price": {
                "base": {"amount": 5000, "asset_id": "1.3.113"},
                "quote": {"amount": 1600000, "asset_id": "1.3.0"}
            }
        }))
        .unwrap();
        assert!(open_order_from_wire(&order, &bts(), &usd()).unwrap().is_none());
    }
}
