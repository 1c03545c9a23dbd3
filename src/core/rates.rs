//! Currency conversion into BRL.
//!
//! Two rate sources coexist: the session [`RateTable`] and the `value` carried by each
//! [`Currency`] record. They are exposed as separate functions and are allowed to disagree.

use super::model::{Currency, ParseError};
use std::collections::BTreeMap;

pub const BASE_CURRENCY: &str = "BRL";

const DEFAULT_RATES: &[(&str, f64)] = &[("USD", 0.18), ("EUR", 0.16), ("BRL", 1.0)];

/// Session-level conversion rates relative to BRL (`1 BRL = rate <code>`)
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: BTreeMap<String, f64>,
}

impl Default for RateTable {
    fn default() -> Self {
        RateTable {
            rates: DEFAULT_RATES
                .iter()
                .map(|(code, rate)| (code.to_string(), *rate))
                .collect(),
        }
    }
}

impl RateTable {
    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    /// Set the rate for `code`. Non-positive rates are ignored and the previous rate kept.
    pub fn update(&mut self, code: &str, rate: f64) -> bool {
        if rate > 0.0 {
            log::debug!("Rate {} -> {}", code, rate);
            self.rates.insert(code.to_string(), rate);
            true
        } else {
            log::warn!("Ignoring non-positive rate {} for {}", rate, code);
            false
        }
    }

    pub fn reset(&mut self) {
        *self = RateTable::default();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(code, rate)| (code.as_str(), *rate))
    }
}

/// Parse a `CODE=RATE` override, e.g. `USD=0.19`
pub fn parse_rate_override(s: &str) -> Result<(String, f64), ParseError> {
    let err = || ParseError::Rate(s.to_string());
    let (code, rate) = s.split_once('=').ok_or_else(err)?;
    let code = code.trim().to_uppercase();
    if code.is_empty() {
        return Err(err());
    }
    let rate = rate.trim().parse::<f64>().map_err(|_| err())?;
    Ok((code, rate))
}

/// Convert into BRL with the currency record's own rate, ignoring the rate table.
pub fn convert_using_record_rate(amount: f64, currency: &Currency) -> f64 {
    if currency.is_brl() {
        amount
    } else {
        amount / currency.value
    }
}

/// Convert into `base` going through BRL, preferring the rate table over record rates.
///
/// `currencies` is consulted only when the rate table has no entry for `base`.
pub fn convert_using_rate_table(
    amount: f64,
    from: &Currency,
    rates: &RateTable,
    base: &str,
    currencies: &[Currency],
) -> f64 {
    if from.code == base {
        return amount;
    }

    let amount_brl = if from.is_brl() {
        amount
    } else {
        let rate = rates.get(&from.code).unwrap_or(from.value);
        amount / rate
    };

    if base == BASE_CURRENCY {
        return amount_brl;
    }

    match rates.get(base) {
        Some(target_rate) => amount_brl * target_rate,
        None => currencies
            .iter()
            .find(|c| c.code == base)
            .map_or(amount_brl, |c| amount_brl * c.value),
    }
}
