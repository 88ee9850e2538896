//! Currency conversion abstractions

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Currencies understood when no list is configured.
pub const DEFAULT_KNOWN_CURRENCIES: [&str; 10] = [
    "USD", "EUR", "GBP", "JPY", "INR", "CAD", "AUD", "CHF", "CNY", "PHP",
];

/// Multipliers for each currency relative to a single base currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub base: String,
    pub rates: HashMap<String, f64>,
}

impl RateTable {
    pub fn new(base: &str, rates: HashMap<String, f64>) -> Self {
        Self {
            base: base.to_uppercase(),
            rates: rates
                .into_iter()
                .map(|(code, rate)| (code.to_uppercase(), rate))
                .collect(),
        }
    }

    /// Every known currency at rate 1, which turns conversion into a no-op.
    pub fn identity<S: AsRef<str>>(base: &str, currencies: &[S]) -> Self {
        let mut table = Self::new(base, HashMap::new());
        for code in currencies {
            table.rates.insert(code.as_ref().to_uppercase(), 1.0);
        }
        table.rates.insert(table.base.clone(), 1.0);
        table
    }

    /// Pins the base currency to exactly 1.
    pub fn normalized(mut self) -> Self {
        self.rates.insert(self.base.clone(), 1.0);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// A usable rate for `code`: present, finite and non-zero.
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates
            .get(code)
            .copied()
            .filter(|r| r.is_finite() && *r != 0.0)
    }

    fn is_base(&self, code: &str) -> bool {
        self.base == code
    }
}

/// Converts `amount` from one currency to another, pivoting through the
/// table's base currency.
///
/// Conversion is fail-soft: when the table is empty or a currency has no usable
/// rate, the amount comes back unchanged.
pub fn convert(amount: f64, from: &str, to: &str, table: &RateTable) -> f64 {
    let from = from.to_uppercase();
    let to = to.to_uppercase();
    if from == to {
        return amount;
    }
    if table.is_empty() {
        debug!("No rates loaded, leaving {amount} {from} unconverted");
        return amount;
    }

    let from_rate = if table.is_base(&from) {
        None
    } else {
        match table.rate(&from) {
            Some(rate) => Some(rate),
            None => {
                debug!("Missing rate for {from}, leaving {amount} unconverted");
                return amount;
            }
        }
    };
    let to_rate = if table.is_base(&to) {
        None
    } else {
        match table.rate(&to) {
            Some(rate) => Some(rate),
            None => {
                debug!("Missing rate for {to}, leaving {amount} {from} unconverted");
                return amount;
            }
        }
    };

    let in_base = from_rate.map_or(amount, |rate| amount / rate);
    to_rate.map_or(in_base, |rate| in_base * rate)
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the latest table relative to `base`.
    async fn fetch_rates(&self, base: &str) -> Result<RateTable>;
}
