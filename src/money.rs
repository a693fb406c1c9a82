//! Money display

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors raised while formatting minor unit amounts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyFormatError {
    /// Amount does not fit the signed range money arithmetic works in.
    #[error("amount {0} is too large to display")]
    OutOfRange(u64),
}

/// Look up an ISO currency by its code (`"EUR"`, `"GBP"`).
pub fn currency(code: &str) -> Option<&'static Currency> {
    rusty_money::iso::find(code)
}

/// Formats an amount of minor units for display in the given currency.
///
/// # Errors
///
/// Returns [`MoneyFormatError::OutOfRange`] for amounts above `i64::MAX`.
pub fn format_minor(minor: u64, currency: &Currency) -> Result<String, MoneyFormatError> {
    let minor = i64::try_from(minor).map_err(|_overflow| MoneyFormatError::OutOfRange(minor))?;

    Ok(format!("{}", Money::from_minor(minor, currency)))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn formats_euro_with_european_separators() -> TestResult {
        assert_eq!(format_minor(123_456, iso::EUR)?, "€1.234,56");

        Ok(())
    }

    #[test]
    fn formats_zero() -> TestResult {
        assert_eq!(format_minor(0, iso::GBP)?, "£0.00");

        Ok(())
    }

    #[test]
    fn rejects_amounts_outside_i64() {
        assert_eq!(
            format_minor(u64::MAX, iso::EUR),
            Err(MoneyFormatError::OutOfRange(u64::MAX))
        );
    }

    #[test]
    fn finds_currency_by_code() {
        assert_eq!(currency("EUR").map(|c| c.iso_alpha_code), Some("EUR"));
        assert!(currency("XYZ").is_none());
    }
}
