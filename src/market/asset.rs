//! Assets, amounts and prices.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::shared::{from_raw_amount, to_raw_amount, AssetAmount, ObjectId, RawPrice, ScalingError};

// ─── Asset ───────────────────────────────────────────────────────────────────

/// Immutable reference data of an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    pub id: ObjectId,
    pub symbol: String,
    /// Decimal digits of the smallest unit.
    pub precision: u8,
    pub issuer: ObjectId,
    /// Rate at which the fee pool converts this asset into the core asset.
    pub core_exchange_rate: RawPrice,
    /// Present for market-pegged (settlement-backed) assets.
    pub bitasset_data_id: Option<ObjectId>,
}

impl Asset {
    pub fn is_bitasset(&self) -> bool {
        self.bitasset_data_id.is_some()
    }

    /// A decimal amount of this asset.
    pub fn amount(&self, value: Decimal) -> Amount {
        Amount::new(value, self.clone())
    }

    /// Interpret an integer amount in this asset's precision.
    pub fn amount_from_raw(&self, raw: i64) -> Result<Amount, ScalingError> {
        Ok(self.amount(from_raw_amount(raw, self.precision)?))
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

// ─── Amount ──────────────────────────────────────────────────────────────────

/// A decimal quantity tagged with its asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Amount {
    pub value: Decimal,
    pub asset: Asset,
}

impl Amount {
    pub fn new(value: Decimal, asset: Asset) -> Self {
        Self { value, asset }
    }

    pub fn symbol(&self) -> &str {
        &self.asset.symbol
    }

    /// Integer units, truncating digits beyond the asset's precision.
    pub fn to_raw(&self) -> Result<i64, ScalingError> {
        to_raw_amount(self.value, self.asset.precision)
    }

    /// The `{amount, asset_id}` form used in operations.
    pub fn to_asset_amount(&self) -> Result<AssetAmount, ScalingError> {
        Ok(AssetAmount::new(self.to_raw()?, self.asset.id))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.*} {}",
            self.asset.precision as usize, self.value, self.asset.symbol
        )
    }
}

// ─── Price ───────────────────────────────────────────────────────────────────

/// A ratio of `base` per `quote`, kept as the pair of amounts so that
/// inversion is exact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Price {
    pub base: Amount,
    pub quote: Amount,
}

impl Price {
    /// Both sides must be positive.
    pub fn new(base: Amount, quote: Amount) -> Result<Self, ScalingError> {
        if base.value <= Decimal::ZERO {
            return Err(ScalingError::NonPositivePrice(base.value.to_string()));
        }
        if quote.value <= Decimal::ZERO {
            return Err(ScalingError::NonPositiveAmount(quote.value.to_string()));
        }
        Ok(Self { base, quote })
    }

    /// `value` units of `base` per one unit of `quote`.
    pub fn from_value(value: Decimal, base: &Asset, quote: &Asset) -> Result<Self, ScalingError> {
        Self::new(base.amount(value), quote.amount(Decimal::ONE))
    }

    /// Scale a node-side integer ratio with the precisions of the two assets.
    ///
    /// `base` and `quote` must match the ids in `raw` in the same orientation.
    pub fn from_raw(raw: &RawPrice, base: &Asset, quote: &Asset) -> Result<Self, ScalingError> {
        Self::new(
            base.amount_from_raw(raw.base.amount)?,
            quote.amount_from_raw(raw.quote.amount)?,
        )
    }

    /// Base per quote as a single decimal.
    pub fn value(&self) -> Decimal {
        self.base
            .value
            .checked_div(self.quote.value)
            .unwrap_or(Decimal::ZERO)
    }

    /// Swap base and quote. Exact.
    pub fn invert(self) -> Self {
        Self {
            base: self.quote,
            quote: self.base,
        }
    }

    pub fn base_asset(&self) -> &Asset {
        &self.base.asset
    }

    pub fn quote_asset(&self) -> &Asset {
        &self.quote.asset
    }

    /// True when this price is expressed as `base` per `quote`.
    pub fn is_oriented(&self, base: &ObjectId, quote: &ObjectId) -> bool {
        self.base.asset.id == *base && self.quote.asset.id == *quote
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{}",
            self.value().normalize(),
            self.base.asset.symbol,
            self.quote.asset.symbol
        )
    }
}
