//! Result shapes returned by [`Market`](super::Market) operations.
//!
//! Prices are always base per quote; amounts are in quote unless noted.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::chain::{ConfirmedTransaction, Transaction};
use crate::market::Asset;
use crate::shared::{ObjectId, Side};

/// Ids and symbols of the two assets, carried by every result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketPair {
    pub base_id: ObjectId,
    pub base_symbol: String,
    pub quote_id: ObjectId,
    pub quote_symbol: String,
}

impl MarketPair {
    pub fn new(base: &Asset, quote: &Asset) -> Self {
        Self {
            base_id: base.id,
            base_symbol: base.symbol.clone(),
            quote_id: quote.id,
            quote_symbol: quote.symbol.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ticker {
    #[serde(flatten)]
    pub market: MarketPair,
    pub latest: Decimal,
    pub lowest_ask: Decimal,
    pub highest_bid: Decimal,
    pub base_volume: Decimal,
    pub quote_volume: Decimal,
    /// 24h change in percent, rounded to 3 places.
    pub percent_change: Decimal,
    /// Feed price of the quote asset when it is backed by the base asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_settlement_price: Option<Decimal>,
    /// Feed price of the base asset when it is backed by the quote asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_settlement_price: Option<Decimal>,
    /// Fee pool rate of the quote asset when it is expressed against the base asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_exchange_rate: Option<Decimal>,
}

/// 24h volume keyed by asset symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Volume24h {
    #[serde(flatten)]
    pub market: MarketPair,
    pub volumes: BTreeMap<String, Decimal>,
}

impl Volume24h {
    pub fn get(&self, symbol: &str) -> Option<Decimal> {
        self.volumes.get(symbol).copied()
    }

    pub fn base_volume(&self) -> Decimal {
        self.get(&self.market.base_symbol).unwrap_or_default()
    }

    pub fn quote_volume(&self) -> Decimal {
        self.get(&self.market.quote_symbol).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderBookLevel {
    pub price: Decimal,
    pub quote: Decimal,
    pub base: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderBook {
    #[serde(flatten)]
    pub market: MarketPair,
    pub bids: Vec<OrderBookLevel>,
    pub asks: Vec<OrderBookLevel>,
}

impl OrderBook {
    pub fn best_bid(&self) -> Option<&OrderBookLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&OrderBookLevel> {
        self.asks.first()
    }

    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()?.price - self.best_bid()?.price)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    pub price: Decimal,
    pub amount: Decimal,
    /// Unix epoch seconds.
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeHistory {
    #[serde(flatten)]
    pub market: MarketPair,
    pub trades: Vec<TradeRecord>,
}

/// One fill of an account's order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilledOrder {
    #[serde(flatten)]
    pub market: MarketPair,
    pub order_id: ObjectId,
    pub account_id: ObjectId,
    #[serde(rename = "type")]
    pub side: Side,
    pub price: Decimal,
    pub amount: Decimal,
    /// Base amount exchanged.
    pub total: Decimal,
    /// Unix epoch seconds.
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenOrder {
    #[serde(flatten)]
    pub market: MarketPair,
    pub order_id: ObjectId,
    #[serde(rename = "type")]
    pub side: Side,
    pub price: Decimal,
    pub amount: Decimal,
    pub status: String,
    /// Unix epoch seconds.
    pub expiration: i64,
}

/// What `buy` / `sell` return.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderReceipt {
    pub side: Side,
    pub price: Decimal,
    pub amount: Decimal,
    pub transaction: Transaction,
    /// Set when a confirmation mode was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<ConfirmedTransaction>,
    /// The created `1.7.x`, known only after confirmation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<ObjectId>,
}
