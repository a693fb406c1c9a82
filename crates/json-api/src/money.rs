//! Money display for responses.

use rigenerato::money::{currency, format_minor};
use tracing::warn;

/// Format minor units in `currency_code` (case-insensitive), falling back to
/// the raw amount and code when the currency is unknown.
pub(crate) fn display_amount(minor: u64, currency_code: &str) -> String {
    let code = currency_code.to_ascii_uppercase();

    match currency(&code).map(|currency| format_minor(minor, currency)) {
        Some(Ok(formatted)) => formatted,
        Some(Err(error)) => {
            warn!(%error, "could not format amount");

            format!("{minor} {code}")
        }
        None => format!("{minor} {code}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_lowercase_codes() {
        assert_eq!(display_amount(64_900, "eur"), "€649,00");
    }

    #[test]
    fn unknown_currency_falls_back_to_minor_units() {
        assert_eq!(display_amount(1_250, "xyz"), "1250 XYZ");
    }
}
