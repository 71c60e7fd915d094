//! Read operations: ticker, volume, order book, trades, account history.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::error::{MarketError, MarketResult};
use crate::market::convert::{filled_order_from_wire, open_order_from_wire, oriented_price};
use crate::market::types::*;
use crate::market::{Asset, Market};
use crate::rpc::wire::BitAssetDataWire;
use crate::shared::{format_node_time, to_epoch_seconds};

/// Default number of rows for paginated queries.
pub const DEFAULT_LIMIT: u32 = 25;

/// Node-side cap for `get_order_book`.
pub const MAX_ORDER_BOOK_LIMIT: u32 = 50;

/// Node-side cap for `get_trade_history` and `get_fill_order_history`.
pub const MAX_HISTORY_LIMIT: u32 = 100;

impl Market<'_> {
    // =========================================================================
    // Validation helpers
    // =========================================================================

    /// Validate that a limit is within bounds.
    fn validate_limit(limit: u32, max: u32) -> MarketResult<()> {
        if limit == 0 || limit > max {
            return Err(MarketError::InvalidParameter(format!(
                "Limit must be 1-{}",
                max
            )));
        }
        Ok(())
    }

    /// Feed price of `asset` when it is backed by `backing`, as base per quote.
    async fn settlement_price(&self, asset: &Asset, backing: &Asset) -> MarketResult<Option<Decimal>> {
        let Some(bitasset_id) = asset.bitasset_data_id else {
            return Ok(None);
        };
        let bitasset: Option<BitAssetDataWire> = self.client().rpc().get_object(&bitasset_id).await?;
        let Some(bitasset) = bitasset else {
            tracing::warn!(asset = %asset.symbol, bitasset = %bitasset_id, "Bitasset data not found");
            return Ok(None);
        };
        if bitasset.options.short_backing_asset != backing.id {
            return Ok(None);
        }
        Ok(oriented_price(
            &bitasset.current_feed.settlement_price,
            self.base(),
            self.quote(),
        )
        .map(|p| p.value()))
    }

    // =========================================================================
    // Market data
    // =========================================================================

    /// Last price, best bid/ask, 24h volume and change.
    ///
    /// Settlement prices are included only for a settlement-backed asset whose
    /// backing asset is the other side of this market.
    pub async fn ticker(&self) -> MarketResult<Ticker> {
        let quote_settlement_price = self.settlement_price(self.quote(), self.base()).await?;
        let base_settlement_price = self.settlement_price(self.base(), self.quote()).await?;

        let core_exchange_rate =
            oriented_price(&self.quote().core_exchange_rate, self.base(), self.quote())
                .map(|p| p.value());

        let wire = self
            .client()
            .rpc()
            .get_ticker(&self.base().id, &self.quote().id)
            .await?;

        Ok(Ticker {
            market: self.pair(),
            latest: wire.latest,
            lowest_ask: wire.lowest_ask,
            highest_bid: wire.highest_bid,
            base_volume: wire.base_volume,
            quote_volume: wire.quote_volume,
            percent_change: (wire.percent_change * Decimal::ONE_HUNDRED).round_dp(3),
            quote_settlement_price,
            base_settlement_price,
            core_exchange_rate,
        })
    }

    /// 24h volume of both assets, keyed by symbol.
    pub async fn volume24h(&self) -> MarketResult<Volume24h> {
        let wire = self
            .client()
            .rpc()
            .get_24_volume(&self.base().id, &self.quote().id)
            .await?;

        let mut volumes = BTreeMap::new();
        volumes.insert(self.base().symbol.clone(), wire.base_volume);
        volumes.insert(self.quote().symbol.clone(), wire.quote_volume);

        Ok(Volume24h {
            market: self.pair(),
            volumes,
        })
    }

    /// Top `limit` levels on each side (at most 50).
    pub async fn orderbook(&self, limit: u32) -> MarketResult<OrderBook> {
        Self::validate_limit(limit, MAX_ORDER_BOOK_LIMIT)?;

        let wire = self
            .client()
            .rpc()
            .get_order_book(&self.base().id, &self.quote().id, limit)
            .await?;

        let level = |l: crate::rpc::wire::OrderBookLevelWire| OrderBookLevel {
            price: l.price,
            quote: l.quote,
            base: l.base,
        };

        Ok(OrderBook {
            market: self.pair(),
            bids: wire.bids.into_iter().map(level).collect(),
            asks: wire.asks.into_iter().map(level).collect(),
        })
    }

    /// Up to `limit` trades (at most 100) between `start` and `stop`.
    ///
    /// `stop` defaults to now and `start` to 24 hours before `stop`.
    pub async fn trades(
        &self,
        limit: u32,
        start: Option<DateTime<Utc>>,
        stop: Option<DateTime<Utc>>,
    ) -> MarketResult<TradeHistory> {
        Self::validate_limit(limit, MAX_HISTORY_LIMIT)?;

        let stop = stop.unwrap_or_else(Utc::now);
        let start = start.unwrap_or(stop - Duration::hours(24));
        if start > stop {
            return Err(MarketError::InvalidParameter(format!(
                "start {} is after stop {}",
                start, stop
            )));
        }

        let wire = self
            .client()
            .rpc()
            .get_trade_history(
                &self.base().id,
                &self.quote().id,
                &format_node_time(stop),
                &format_node_time(start),
                limit,
            )
            .await?;

        let trades = wire
            .into_iter()
            .filter_map(|t| match to_epoch_seconds(&t.date) {
                Ok(timestamp) => Some(TradeRecord {
                    price: t.price,
                    amount: t.amount,
                    timestamp,
                }),
                Err(e) => {
                    tracing::warn!(date = %t.date, error = %e, "Skipping trade with malformed date");
                    None
                }
            })
            .collect();

        Ok(TradeHistory {
            market: self.pair(),
            trades,
        })
    }

    // =========================================================================
    // Account history
    // =========================================================================

    /// The account's fills among the latest `2 × limit` fills of this market,
    /// at most `limit` of them.
    ///
    /// Fills older than that window are not seen, so an account that trades
    /// rarely can get fewer than `limit` results (or none) even though older
    /// fills exist.
    pub async fn account_trades(
        &self,
        account: Option<&str>,
        limit: u32,
    ) -> MarketResult<Vec<FilledOrder>> {
        Self::validate_limit(limit, MAX_HISTORY_LIMIT / 2)?;
        let name = self.account_or_default(account)?;
        let account = self.client().accounts().get_account(name).await?;

        let fills = self
            .client()
            .rpc()
            .get_fill_order_history(&self.base().id, &self.quote().id, 2 * limit)
            .await?;

        let trades = fills
            .iter()
            .filter(|f| f.op.account_id == account.id)
            .filter_map(|f| match filled_order_from_wire(f, self.base(), self.quote()) {
                Ok(fill) => Some(fill),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed fill");
                    None
                }
            })
            .take(limit as usize)
            .collect();

        Ok(trades)
    }

    /// The account's open orders in this market.
    ///
    /// The account is resolved through the client's [`AccountLookup`] and
    /// its full record fetched by id.
    ///
    /// [`AccountLookup`]: crate::chain::AccountLookup
    pub async fn account_open_orders(&self, account: Option<&str>) -> MarketResult<Vec<OpenOrder>> {
        let name = self.account_or_default(account)?;
        let account = self.client().accounts().get_account(name).await?;
        let id = account.id.to_string();

        let mut full = self.client().rpc().get_full_accounts(&[id.as_str()]).await?;
        let (_, full) = full
            .pop()
            .ok_or_else(|| MarketError::UnknownAccount(name.to_string()))?;

        let mut orders = Vec::new();
        for order in &full.limit_orders {
            match open_order_from_wire(order, self.base(), self.quote()) {
                Ok(Some(open)) => orders.push(open),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "Skipping malformed order"),
            }
        }
        Ok(orders)
    }
}
