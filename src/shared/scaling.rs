//! Fixed-point conversion between human-readable amounts and the node's
//! integer asset units.
//!
//! All math uses `rust_decimal::Decimal` for exact arithmetic.
//! No async, no network calls.

use std::fmt;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::shared::Side;

/// Precision metadata for the two sides of a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketDecimals {
    pub base_precision: u8,
    pub quote_precision: u8,
}

/// Integer amounts for a `limit_order_create` operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaledAmounts {
    pub amount_to_sell: i64,
    pub min_to_receive: i64,
}

/// Errors that can occur during price/amount scaling.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalingError {
    NonPositivePrice(String),
    NonPositiveAmount(String),
    Overflow { context: String },
    ZeroAmount,
    InvalidPrecision(u8),
}

impl fmt::Display for ScalingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalingError::NonPositivePrice(v) => write!(f, "Price must be positive, got {}", v),
            ScalingError::NonPositiveAmount(v) => write!(f, "Amount must be positive, got {}", v),
            ScalingError::Overflow { context } => write!(f, "Overflow: {}", context),
            ScalingError::ZeroAmount => write!(f, "Computed amount is zero"),
            ScalingError::InvalidPrecision(p) => write!(f, "Unsupported asset precision {}", p),
        }
    }
}

impl std::error::Error for ScalingError {}

/// `10^precision` as a decimal.
pub fn precision_multiplier(precision: u8) -> Result<Decimal, ScalingError> {
    10u64
        .checked_pow(precision as u32)
        .map(Decimal::from)
        .ok_or_else(|| ScalingError::Overflow {
            context: format!("10^{} overflow", precision),
        })
}

/// Convert a decimal amount into integer units, truncating sub-unit digits.
///
/// ```text
/// raw = trunc(amount * 10^precision)
/// ```
pub fn to_raw_amount(amount: Decimal, precision: u8) -> Result<i64, ScalingError> {
    let scaled = amount
        .checked_mul(precision_multiplier(precision)?)
        .ok_or_else(|| ScalingError::Overflow {
            context: format!("{} * 10^{}", amount, precision),
        })?
        .trunc();

    scaled.to_i64().ok_or_else(|| ScalingError::Overflow {
        context: format!("{} does not fit in i64", scaled),
    })
}

/// Convert integer units back into a decimal amount. Exact.
pub fn from_raw_amount(raw: i64, precision: u8) -> Result<Decimal, ScalingError> {
    Decimal::try_new(raw, precision as u32).map_err(|_| ScalingError::InvalidPrecision(precision))
}

/// Convert a price (base per quote) and a quote amount into the integer
/// amounts of a limit order.
///
/// # Conversion math
///
/// ```text
/// quote_units = trunc(amount * 10^quote_precision)
/// base_units  = trunc(amount * price * 10^base_precision)
/// ```
///
/// Then assign based on side:
///
/// | Side | amount_to_sell | min_to_receive |
/// |------|----------------|----------------|
/// | Buy  | base_units     | quote_units    |
/// | Sell | quote_units    | base_units     |
pub fn scale_price_amount(
    price: Decimal,
    amount: Decimal,
    side: Side,
    decimals: &MarketDecimals,
) -> Result<ScaledAmounts, ScalingError> {
    scale_price_ratio(price, Decimal::ONE, amount, side, decimals)
}

/// Like [`scale_price_amount`] with the price given as `price_base` per
/// `price_quote`.
///
/// The base total is `amount * price_base / price_quote`, multiplied before
/// dividing.
pub fn scale_price_ratio(
    price_base: Decimal,
    price_quote: Decimal,
    amount: Decimal,
    side: Side,
    decimals: &MarketDecimals,
) -> Result<ScaledAmounts, ScalingError> {
    if price_base <= Decimal::ZERO || price_quote <= Decimal::ZERO {
        return Err(ScalingError::NonPositivePrice(format!(
            "{}/{}",
            price_base, price_quote
        )));
    }
    if amount <= Decimal::ZERO {
        return Err(ScalingError::NonPositiveAmount(amount.to_string()));
    }

    let base_total = amount
        .checked_mul(price_base)
        .and_then(|v| v.checked_div(price_quote))
        .ok_or_else(|| ScalingError::Overflow {
            context: "amount * price".to_string(),
        })?;

    let base_units = to_raw_amount(base_total, decimals.base_precision)?;
    let quote_units = to_raw_amount(amount, decimals.quote_precision)?;

    if base_units == 0 || quote_units == 0 {
        return Err(ScalingError::ZeroAmount);
    }

    let (amount_to_sell, min_to_receive) = match side {
        Side::Buy => (base_units, quote_units),
        Side::Sell => (quote_units, base_units),
    };

    Ok(ScaledAmounts {
        amount_to_sell,
        min_to_receive,
    })
}
