use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount must not be negative, got {0}")]
    Negative(Decimal),
}

/// A non-negative monetary amount as printed on a receipt.
///
/// Receipts come from any locale, so no currency or scale is attached: `4500`
/// stays `4500` and `4.50` stays `4.50`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Returns `None` for negative values.
    pub fn new(value: Decimal) -> Option<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            None
        } else {
            Some(Amount(value.normalize()))
        }
    }

    pub fn value(self) -> Decimal {
        self.0
    }

    /// The line total for `quantity` units at this price, `None` on overflow.
    pub fn times(self, quantity: u32) -> Option<Amount> {
        self.0.checked_mul(Decimal::from(quantity)).and_then(Amount::new)
    }

    /// Parses a printed amount such as `4,500`, `₩4,500`, `4500원` or `$12.99`.
    ///
    /// Thousands separators and a single leading or trailing currency symbol
    /// are accepted. Anything else is rejected.
    pub fn parse_printed(token: &str) -> Option<Self> {
        let body = token
            .trim()
            .trim_start_matches(is_currency_symbol)
            .trim_end_matches(is_currency_symbol);
        if body.is_empty() || !body.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        let clean: String = body.chars().filter(|c| *c != ',').collect();
        let dec = Decimal::from_str(&clean).ok()?;
        Amount::new(dec)
    }
}

pub fn is_currency_symbol(c: char) -> bool {
    matches!(c, '$' | '₩' | '€' | '£' | '¥' | '원' | '￦')
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Amount::new(value).ok_or(AmountError::Negative(value))
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<u32> for Amount {
    fn from(units: u32) -> Self {
        Amount(Decimal::from(units))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_integer() {
        assert_eq!(Amount::parse_printed("4500"), Some(Amount::from(4500)));
    }

    #[test]
    fn parse_thousands_and_currency() {
        assert_eq!(Amount::parse_printed("4,500"), Some(Amount::from(4500)));
        assert_eq!(Amount::parse_printed("₩4,500"), Some(Amount::from(4500)));
        assert_eq!(Amount::parse_printed("4,500원"), Some(Amount::from(4500)));
    }

    #[test]
    fn parse_decimal_fraction_keeps_precision() {
        let a = Amount::parse_printed("$12.99").unwrap();
        assert_eq!(a.value(), Decimal::new(1299, 2));
        assert_eq!(a.to_string(), "12.99");
    }

    #[test]
    fn trailing_zero_fraction_equals_integer() {
        assert_eq!(Amount::parse_printed("3000.00"), Some(Amount::from(3000)));
    }

    #[test]
    fn rejects_non_numeric() {
        assert_eq!(Amount::parse_printed(""), None);
        assert_eq!(Amount::parse_printed("원"), None);
        assert_eq!(Amount::parse_printed("latte"), None);
        assert_eq!(Amount::parse_printed("-300"), None);
        assert_eq!(Amount::parse_printed("1.2.3"), None);
    }

    #[test]
    fn new_rejects_negative() {
        assert!(Amount::new(Decimal::new(-1, 0)).is_none());
        assert!(Amount::new(Decimal::ZERO).is_some());
    }

    #[test]
    fn serializes_as_bare_decimal() {
        let json = serde_json::to_string(&Amount::from(3500)).unwrap();
        assert_eq!(json, "\"3500\"");
    }

    #[test]
    fn deserialize_rejects_negative() {
        let ok: Amount = serde_json::from_str("\"4500\"").unwrap();
        assert_eq!(ok, Amount::from(4500));
        assert!(serde_json::from_str::<Amount>("\"-4500\"").is_err());
        assert_eq!(
            Amount::try_from(Decimal::new(-1, 0)),
            Err(AmountError::Negative(Decimal::new(-1, 0)))
        );
    }

    #[test]
    fn times_multiplies_by_quantity() {
        assert_eq!(Amount::from(4500).times(2), Some(Amount::from(9000)));
        assert_eq!(Amount::parse_printed("3.25").unwrap().times(3), Amount::parse_printed("9.75"));
    }
}
