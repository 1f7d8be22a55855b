use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when intake text cannot be read as a peso amount.
#[derive(Debug, Error)]
pub enum ParseAmountError {
    #[error("amount is empty")]
    Empty,

    #[error("invalid amount '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },
}

/// Error returned when intake text cannot be read as a yes/no flag.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid flag '{0}': expected yes/no, true/false, y/n or 1/0")]
pub struct ParseFlagError(pub String);

/// Strips an optional peso sign or `PHP` prefix, surrounding whitespace and
/// comma thousands separators.
fn normalize_amount_input(s: &str) -> String {
    let trimmed = s.trim();
    let unprefixed = trimmed
        .strip_prefix('₱')
        .or_else(|| {
            trimmed
                .get(..3)
                .filter(|prefix| prefix.eq_ignore_ascii_case("php"))
                .map(|_| &trimmed[3..])
        })
        .unwrap_or(trimmed);
    unprefixed.trim().replace(',', "")
}

/// Parses a peso amount as typed by staff, e.g. `"₱25,000.00"`,
/// `"PHP 1,234.56"` or `"7500"`.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Err(ParseAmountError::Empty);
    }
    normalized.parse().map_err(|e| {
        tracing::warn!(input = %s, "invalid amount: {}", e);
        ParseAmountError::Invalid {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Parses a yes/no cell. Empty input counts as `false`.
pub fn parse_flag(s: &str) -> Result<bool, ParseFlagError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "no" | "n" | "0" => Ok(false),
        "true" | "yes" | "y" | "1" => Ok(true),
        _ => Err(ParseFlagError(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_amount_accepts_plain_number() {
        assert_eq!(parse_amount("7500").unwrap(), dec!(7500));
    }

    #[test]
    fn parse_amount_accepts_peso_sign_and_commas() {
        assert_eq!(parse_amount("₱25,000.00").unwrap(), dec!(25000.00));
        assert_eq!(parse_amount(" ₱ 1,234,567.89 ").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn parse_amount_accepts_php_prefix() {
        assert_eq!(parse_amount("PHP 1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_amount("php500").unwrap(), dec!(500));
    }

    #[test]
    fn parse_amount_keeps_negative_sign() {
        assert_eq!(parse_amount("-100").unwrap(), dec!(-100));
    }

    #[test]
    fn parse_amount_rejects_empty() {
        assert!(matches!(parse_amount("   "), Err(ParseAmountError::Empty)));
        assert!(matches!(parse_amount("₱"), Err(ParseAmountError::Empty)));
    }

    #[test]
    fn parse_amount_rejects_garbage() {
        assert!(matches!(
            parse_amount("twenty"),
            Err(ParseAmountError::Invalid { ref input, .. }) if input == "twenty"
        ));
    }

    #[test]
    fn parse_flag_accepts_common_spellings() {
        for yes in ["true", "Yes", "Y", "1", " TRUE "] {
            assert_eq!(parse_flag(yes), Ok(true), "{yes}");
        }
        for no in ["", "false", "No", "n", "0"] {
            assert_eq!(parse_flag(no), Ok(false), "{no}");
        }
    }

    #[test]
    fn parse_flag_rejects_unknown() {
        assert_eq!(parse_flag("maybe"), Err(ParseFlagError("maybe".to_string())));
    }
}
