use std::collections::HashMap;

use crate::error::{Result, SoukError};

/// All rates are expressed relative to the Moroccan dirham.
pub const BASE_CURRENCY: &str = "MAD";

/// Seed rates used until the rate source has been queried.
pub fn default_rates() -> HashMap<String, f64> {
    HashMap::from([
        ("MAD".to_string(), 1.0),
        ("USD".to_string(), 10.12),
        ("EUR".to_string(), 11.05),
        ("GBP".to_string(), 12.78),
    ])
}

/// Exchange rate table anchored to one base currency. A rate of `r` for code
/// `C` means 1 unit of `C` = `r` units of the base currency; the base's own
/// rate is pinned at 1 no matter what the source reports.
#[derive(Debug, Clone)]
pub struct RateTable {
    base: String,
    rates: HashMap<String, f64>,
}

impl RateTable {
    pub fn new(base: &str, rates: HashMap<String, f64>) -> Self {
        let mut rates = rates;
        rates.insert(base.to_string(), 1.0);
        Self {
            base: base.to_string(),
            rates,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn rates(&self) -> &HashMap<String, f64> {
        &self.rates
    }

    /// Currency codes in display order.
    pub fn currencies(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.rates.keys().map(|c| c.as_str()).collect();
        codes.sort_unstable();
        codes
    }

    pub fn rate(&self, currency: &str) -> Result<f64> {
        self.rates
            .get(currency)
            .copied()
            .ok_or_else(|| SoukError::UnknownCurrency(currency.to_string()))
    }

    /// Refresh semantics are replace, never merge.
    pub fn set_rates(&mut self, rates: HashMap<String, f64>) {
        self.rates = rates;
        self.rates.insert(self.base.clone(), 1.0);
    }

    pub fn to_base(&self, amount: f64, from: &str) -> Result<f64> {
        if from == self.base {
            return Ok(amount);
        }
        Ok(amount * self.rate(from)?)
    }

    pub fn from_base(&self, amount_in_base: f64, to: &str) -> Result<f64> {
        if to == self.base {
            return Ok(amount_in_base);
        }
        Ok(amount_in_base / self.rate(to)?)
    }

    /// Same-currency conversions return the amount untouched instead of
    /// routing through the base, so no rounding creeps in.
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64> {
        if from == to {
            return Ok(amount);
        }
        self.from_base(self.to_base(amount, from)?, to)
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::new(BASE_CURRENCY, default_rates())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_rate_pinned_at_one() {
        let table = RateTable::new("MAD", HashMap::from([("MAD".to_string(), 7.5)]));
        assert_eq!(table.rate("MAD").unwrap(), 1.0);
    }

    #[test]
    fn test_identity_conversion() {
        let table = RateTable::default();
        for code in ["MAD", "USD", "EUR", "GBP"] {
            assert_eq!(table.convert(250.0, code, code).unwrap(), 250.0);
        }
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let table = RateTable::default();
        for code in ["USD", "EUR", "GBP"] {
            let there = table.to_base(123.45, code).unwrap();
            let back = table.from_base(there, code).unwrap();
            assert!((back - 123.45).abs() < 1e-9, "{code}: {back}");
        }
    }

    #[test]
    fn test_usd_to_eur() {
        let table = RateTable::default();
        let result = table.convert(100.0, "USD", "EUR").unwrap();
        assert!((result - 100.0 * 10.12 / 11.05).abs() < 1e-9);
        assert!((result - 91.58).abs() < 0.01);
    }

    #[test]
    fn test_to_base_of_base_is_identity() {
        let table = RateTable::default();
        assert_eq!(table.to_base(42.0, "MAD").unwrap(), 42.0);
        assert_eq!(table.from_base(42.0, "MAD").unwrap(), 42.0);
    }

    #[test]
    fn test_unknown_currency_fails() {
        let table = RateTable::default();
        assert!(matches!(
            table.convert(1.0, "JPY", "MAD"),
            Err(SoukError::UnknownCurrency(code)) if code == "JPY"
        ));
        assert!(table.to_base(1.0, "CHF").is_err());
        assert!(table.from_base(1.0, "CHF").is_err());
    }

    #[test]
    fn test_set_rates_replaces_wholesale() {
        let mut table = RateTable::default();
        table.set_rates(HashMap::from([("USD".to_string(), 9.8)]));
        assert_eq!(table.rate("USD").unwrap(), 9.8);
        assert_eq!(table.rate("MAD").unwrap(), 1.0);
        // EUR came from the old table and must be gone after a refresh
        assert!(table.rate("EUR").is_err());
    }
}
