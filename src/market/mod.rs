//! Market wrapper.
//!
//! A [`Market`] is a resolved (quote, base) pair bound to a
//! [`BitsharesClient`]. Prices are base per quote: in `USD/BTS` a price of 300
//! means one USD costs 300 BTS. Amounts are in quote.
//!
//! ```rust,ignore
//! let market = client.market("USD/BTS").await?;
//! let ticker = market.ticker().await?;
//! let receipt = market.buy(dec!(300), dec!(10), OrderOptions::default()).await?;
//! ```

pub mod asset;
mod convert;
pub mod order;
pub mod query;
pub mod types;

pub use asset::{Amount, Asset, Price};
pub use order::{AmountInput, OrderOptions, PriceInput};
pub use types::{
    FilledOrder, MarketPair, OpenOrder, OrderBook, OrderBookLevel, OrderReceipt, Ticker,
    TradeHistory, TradeRecord, Volume24h,
};

use std::fmt;
use std::str::FromStr;

use crate::client::BitsharesClient;
use crate::error::{MarketError, MarketResult};

/// Separators accepted between the quote and base symbols.
pub const MARKET_SEPARATORS: [char; 3] = ['/', '-', ':'];

// ─── MarketSpec ──────────────────────────────────────────────────────────────

/// An unresolved market: quote and base symbols (or ids).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarketSpec {
    pub quote: String,
    pub base: String,
}

impl MarketSpec {
    pub fn new(quote: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            quote: quote.into(),
            base: base.into(),
        }
    }
}

impl FromStr for MarketSpec {
    type Err = MarketError;

    /// `QUOTE/BASE`, `QUOTE-BASE` or `QUOTE:BASE`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(MARKET_SEPARATORS).map(str::trim).collect();
        match parts.as_slice() {
            [quote, base] if !quote.is_empty() && !base.is_empty() => {
                Ok(MarketSpec::new(*quote, *base))
            }
            _ => Err(MarketError::InvalidMarket(s.to_string())),
        }
    }
}

impl fmt::Display for MarketSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.quote, self.base)
    }
}

// ─── Market ──────────────────────────────────────────────────────────────────

/// A resolved market bound to a client.
#[derive(Clone)]
pub struct Market<'a> {
    client: &'a BitsharesClient,
    base: Asset,
    quote: Asset,
}

impl<'a> Market<'a> {
    /// Bind two already-resolved assets. They must differ.
    pub fn new(client: &'a BitsharesClient, quote: Asset, base: Asset) -> MarketResult<Self> {
        if quote.id == base.id {
            return Err(MarketError::InvalidMarket(format!(
                "{}/{}",
                quote.symbol, base.symbol
            )));
        }
        Ok(Self {
            client,
            base,
            quote,
        })
    }

    pub fn base(&self) -> &Asset {
        &self.base
    }

    pub fn quote(&self) -> &Asset {
        &self.quote
    }

    pub fn pair(&self) -> MarketPair {
        MarketPair::new(&self.base, &self.quote)
    }

    /// The same market with quote and base swapped.
    pub fn inverted(&self) -> Market<'a> {
        Market {
            client: self.client,
            base: self.quote.clone(),
            quote: self.base.clone(),
        }
    }

    pub(crate) fn client(&self) -> &'a BitsharesClient {
        self.client
    }

    /// Explicit account, or the client's default.
    pub(crate) fn account_or_default<'b>(&'b self, account: Option<&'b str>) -> MarketResult<&'b str> {
        account
            .or(self.client.default_account())
            .filter(|a| !a.is_empty())
            .ok_or(MarketError::MissingAccount)
    }
}

impl fmt::Debug for Market<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Market")
            .field("quote", &self.quote.symbol)
            .field("base", &self.base.symbol)
            .finish()
    }
}

impl fmt::Display for Market<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.quote.symbol, self.base.symbol)
    }
}
