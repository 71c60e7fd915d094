//! Write operations: buy, sell, cancel.

use rust_decimal::Decimal;

use crate::chain::{ConfirmationMode, LimitOrderCreate, Permission, Transaction};
use crate::chain::transaction::fee_placeholder;
use crate::error::{MarketError, MarketResult};
use crate::market::types::OrderReceipt;
use crate::market::{Amount, Market, Price};
use crate::shared::{
    format_time_from_now, scale_price_ratio, AssetAmount, MarketDecimals, ObjectId, ScalingError,
    Side,
};

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// A limit price: a bare decimal in base per quote, or a [`Price`] in either
/// orientation.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceInput {
    Value(Decimal),
    Price(Price),
}

impl From<Decimal> for PriceInput {
    fn from(value: Decimal) -> Self {
        PriceInput::Value(value)
    }
}

impl From<Price> for PriceInput {
    fn from(price: Price) -> Self {
        PriceInput::Price(price)
    }
}

/// An order size in quote: a bare decimal, or an [`Amount`] of the quote asset.
#[derive(Debug, Clone, PartialEq)]
pub enum AmountInput {
    Value(Decimal),
    Amount(Amount),
}

impl From<Decimal> for AmountInput {
    fn from(value: Decimal) -> Self {
        AmountInput::Value(value)
    }
}

impl From<Amount> for AmountInput {
    fn from(amount: Amount) -> Self {
        AmountInput::Amount(amount)
    }
}

/// Optional settings for `buy` / `sell`.
#[derive(Debug, Clone, Default)]
pub struct OrderOptions {
    /// Order lifetime in seconds; the client default (7 days) when unset.
    pub expiration_secs: Option<u64>,
    /// Execute immediately and completely or not at all.
    pub fill_or_kill: bool,
    /// Selling account; the client default when unset.
    pub account: Option<String>,
    /// Wait for inclusion and report the created order id.
    pub confirm: Option<ConfirmationMode>,
}

impl OrderOptions {
    pub fn expiration_secs(mut self, secs: u64) -> Self {
        self.expiration_secs = Some(secs);
        self
    }

    pub fn fill_or_kill(mut self, fill_or_kill: bool) -> Self {
        self.fill_or_kill = fill_or_kill;
        self
    }

    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn confirm(mut self, mode: ConfirmationMode) -> Self {
        self.confirm = Some(mode);
        self
    }
}

// ─── Orders ──────────────────────────────────────────────────────────────────

impl Market<'_> {
    /// Price as base per quote, inverting a [`Price`] given as quote per base.
    pub fn resolve_price(&self, price: PriceInput) -> MarketResult<Decimal> {
        let (base, quote) = self.resolve_price_ratio(price)?;
        base.checked_div(quote)
            .ok_or_else(|| ScalingError::NonPositivePrice(format!("{}/{}", base, quote)).into())
    }

    /// Price as a (base, quote) pair of values, oriented to this market.
    ///
    /// A bare decimal is `(value, 1)`. A [`Price`] keeps both sides so the
    /// ratio is never rounded before scaling.
    pub fn resolve_price_ratio(&self, price: PriceInput) -> MarketResult<(Decimal, Decimal)> {
        match price {
            PriceInput::Value(value) => Ok((value, Decimal::ONE)),
            PriceInput::Price(p) if p.is_oriented(&self.base().id, &self.quote().id) => {
                Ok((p.base.value, p.quote.value))
            }
            PriceInput::Price(p) if p.is_oriented(&self.quote().id, &self.base().id) => {
                let p = p.invert();
                Ok((p.base.value, p.quote.value))
            }
            PriceInput::Price(p) => Err(MarketError::AssetMismatch(format!(
                "price in {}/{} does not match market {}",
                p.base_asset().symbol,
                p.quote_asset().symbol,
                self
            ))),
        }
    }

    /// Amount in quote.
    pub fn resolve_amount(&self, amount: AmountInput) -> MarketResult<Decimal> {
        match amount {
            AmountInput::Value(value) => Ok(value),
            AmountInput::Amount(a) if a.asset.id == self.quote().id => Ok(a.value),
            AmountInput::Amount(a) => Err(MarketError::AssetMismatch(format!(
                "amount in {} but market {} trades {}",
                a.asset.symbol,
                self,
                self.quote().symbol
            ))),
        }
    }

    /// Buy `amount` of quote at `price` (base per quote) by selling base.
    ///
    /// With `USD/BTS`, price 300 and amount 10 the order sells 3000 BTS for at
    /// least 10 USD.
    pub async fn buy(
        &self,
        price: impl Into<PriceInput>,
        amount: impl Into<AmountInput>,
        options: OrderOptions,
    ) -> MarketResult<OrderReceipt> {
        self.place_order(Side::Buy, price.into(), amount.into(), options)
            .await
    }

    /// Sell `amount` of quote at `price` (base per quote) for base.
    pub async fn sell(
        &self,
        price: impl Into<PriceInput>,
        amount: impl Into<AmountInput>,
        options: OrderOptions,
    ) -> MarketResult<OrderReceipt> {
        self.place_order(Side::Sell, price.into(), amount.into(), options)
            .await
    }

    /// Build the `limit_order_create` for `side` without submitting it.
    pub fn build_limit_order(
        &self,
        side: Side,
        price: impl Into<PriceInput>,
        amount: Decimal,
        seller: ObjectId,
        expiration_secs: u64,
        fill_or_kill: bool,
    ) -> MarketResult<LimitOrderCreate> {
        let decimals = MarketDecimals {
            base_precision: self.base().precision,
            quote_precision: self.quote().precision,
        };
        let (price_base, price_quote) = self.resolve_price_ratio(price.into())?;
        let scaled = scale_price_ratio(price_base, price_quote, amount, side, &decimals)?;

        let (sell_asset, receive_asset) = match side {
            Side::Buy => (self.base().id, self.quote().id),
            Side::Sell => (self.quote().id, self.base().id),
        };

        Ok(LimitOrderCreate {
            fee: fee_placeholder(),
            seller,
            amount_to_sell: AssetAmount::new(scaled.amount_to_sell, sell_asset),
            min_to_receive: AssetAmount::new(scaled.min_to_receive, receive_asset),
            expiration: format_time_from_now(expiration_secs),
            fill_or_kill,
            extensions: Vec::new(),
        })
    }

    async fn place_order(
        &self,
        side: Side,
        price: PriceInput,
        amount: AmountInput,
        options: OrderOptions,
    ) -> MarketResult<OrderReceipt> {
        let name = self.account_or_default(options.account.as_deref())?;
        let price_value = self.resolve_price(price.clone())?;
        let amount = self.resolve_amount(amount)?;

        let finalizer = self.client().finalizer()?;
        let watcher = match options.confirm {
            Some(_) => Some(self.client().watcher()?),
            None => None,
        };

        let account = self.client().accounts().get_account(name).await?;
        let expiration_secs = options
            .expiration_secs
            .unwrap_or(self.client().order_expiration_secs());
        let op = self.build_limit_order(
            side,
            price,
            amount,
            account.id,
            expiration_secs,
            options.fill_or_kill,
        )?;

        tracing::info!(
            market = %self,
            side = %side,
            price = %price_value,
            amount = %amount,
            account = %account.name,
            amount_to_sell = op.amount_to_sell.amount,
            min_to_receive = op.min_to_receive.amount,
            "Submitting limit order"
        );

        let transaction = finalizer
            .finalize(vec![op.into()], &account, Permission::Active)
            .await?;

        let (confirmation, order_id) = match (watcher, options.confirm) {
            (Some(watcher), Some(mode)) => {
                let confirmed = watcher.await_confirmation(&transaction, mode).await?;
                let order_id = confirmed.created_object_id(0).ok_or_else(|| {
                    MarketError::UnexpectedResponse(
                        "confirmed transaction has no created order id".to_string(),
                    )
                })?;
                (Some(confirmed), Some(order_id))
            }
            _ => (None, None),
        };

        Ok(OrderReceipt {
            side,
            price: price_value,
            amount,
            transaction,
            confirmation,
            order_id,
        })
    }

    /// Cancel one order (`1.7.x`).
    pub async fn cancel(&self, order_id: &str, account: Option<&str>) -> MarketResult<Transaction> {
        let id: ObjectId = order_id
            .parse()
            .map_err(|e: crate::shared::InvalidObjectId| MarketError::InvalidParameter(e.to_string()))?;
        self.cancel_many(&[id], account).await
    }

    /// Cancel several orders in one transaction.
    pub async fn cancel_many(
        &self,
        order_ids: &[ObjectId],
        account: Option<&str>,
    ) -> MarketResult<Transaction> {
        let name = self.account_or_default(account)?;
        self.client().canceller()?.cancel(order_ids, name).await
    }
}
