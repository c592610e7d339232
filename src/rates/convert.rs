use std::collections::HashMap;

/// Mapping from 3-letter currency code to a multiplicative conversion
/// factor relative to the table's base currency.
pub type RateTable = HashMap<String, f64>;

/// Whether a string is a plausible ISO 4217 code (3 ASCII letters).
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

/// amount × rate, with no rounding; display formatting is the caller's concern.
pub fn convert_amount(amount: f64, rates: &RateTable, to: &str) -> Option<f64> {
    rates.get(to).map(|rate| amount * rate)
}

/// One currency conversion in progress: the inputs plus the last computed
/// result. The result is only valid for the rate table it was computed
/// against; anything that changes the base invalidates it.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub result: Option<f64>,
}

impl Conversion {
    pub fn new(from: &str, to: &str, amount: f64) -> Self {
        Self {
            from: from.to_uppercase(),
            to: to.to_uppercase(),
            amount,
            result: None,
        }
    }

    /// Exchanges the two currency codes. The amount is untouched, but any
    /// previous result is cleared until rates for the new base are applied.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
        self.result = None;
    }

    /// Recomputes the result from a rate table for `self.from`. Clears the
    /// result when the target code is absent or the amount is not positive.
    pub fn apply(&mut self, rates: &RateTable) {
        self.result = if self.amount > 0.0 {
            convert_amount(self.amount, rates, &self.to)
        } else {
            None
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd_rates() -> RateTable {
        [("EUR".to_string(), 0.9), ("GBP".to_string(), 0.8)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_unit_conversion() {
        // 1 USD at rates["EUR"] = 0.9 must come out as 0.9
        let result = convert_amount(1.0, &usd_rates(), "EUR").unwrap();
        assert!((result - 0.9).abs() < 1e-12);
        assert_eq!(format!("{:.2}", result), "0.90");
    }

    #[test]
    fn test_conversion_is_plain_multiplication() {
        let result = convert_amount(123.45, &usd_rates(), "GBP").unwrap();
        assert!((result - 123.45 * 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_missing_target_yields_none() {
        assert_eq!(convert_amount(1.0, &usd_rates(), "JPY"), None);
    }

    #[test]
    fn test_swap_keeps_amount_and_invalidates_result() {
        let mut conversion = Conversion::new("USD", "EUR", 42.0);
        conversion.apply(&usd_rates());
        assert!(conversion.result.is_some());

        conversion.swap();
        assert_eq!(conversion.from, "EUR");
        assert_eq!(conversion.to, "USD");
        assert_eq!(conversion.amount, 42.0);
        assert_eq!(conversion.result, None);
    }

    #[test]
    fn test_result_returns_after_new_rates_applied() {
        let mut conversion = Conversion::new("USD", "EUR", 10.0);
        conversion.swap(); // now EUR -> USD

        let eur_rates: RateTable = [("USD".to_string(), 1.1)].into_iter().collect();
        conversion.apply(&eur_rates);
        assert!((conversion.result.unwrap() - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_positive_amount_clears_result() {
        let mut conversion = Conversion::new("USD", "EUR", 0.0);
        conversion.apply(&usd_rates());
        assert_eq!(conversion.result, None);
    }

    #[test]
    fn test_currency_code_validation() {
        assert!(is_currency_code("USD"));
        assert!(is_currency_code("eur"));
        assert!(!is_currency_code("US"));
        assert!(!is_currency_code("USDX"));
        assert!(!is_currency_code("U5D"));
        assert!(!is_currency_code(""));
    }
}
