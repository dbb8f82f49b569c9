//! Money Conversion Module
//!
//! Conversion between client-facing decimal strings and the exact
//! [`BigDecimal`] values stored in `NUMERIC(78,18)` columns. All conversions
//! MUST go through this module.
//!
//! ## Design Principles
//! 1. Exact arithmetic only: no binary floating point anywhere on the money path
//! 2. Explicit Error Handling: no silent truncation or rounding
//! 3. Strict format: `0.5` not `.5`, `5.0` or `5` not `5.`, no exponents
//!
//! ## Usage
//! ```rust
//! use ledger_transfers::money::{format_decimal, parse_amount};
//!
//! let amount = parse_amount("0.123456789123456789").unwrap();
//! assert_eq!(format_decimal(&amount), "0.123456789123456789");
//! ```

use bigdecimal::{BigDecimal, Zero};
use std::str::FromStr;
use thiserror::Error;

/// Fractional digits kept by the ledger columns
pub const MAX_FRACTION_DIGITS: usize = 18;

/// Integer digits kept by the ledger columns (78 total - 18 fractional)
pub const MAX_INTEGER_DIGITS: usize = 60;

// ============================================================================
// Error Types
// ============================================================================

/// Money conversion errors
#[derive(Debug, Error, PartialEq)]
pub enum MoneyError {
    #[error("Precision overflow: provided {provided} decimals, max allowed {max}")]
    PrecisionOverflow { provided: usize, max: usize },

    #[error("Amount too large: {digits} integer digits, max allowed {max}")]
    Overflow { digits: usize, max: usize },

    #[error("Amount must be greater than zero")]
    NotPositive,

    #[error("Amount must be non-negative")]
    Negative,

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

// ============================================================================
// Parse: Client → Ledger (String → BigDecimal)
// ============================================================================

/// Parse a client decimal string into an exact [`BigDecimal`].
///
/// Accepts an optional leading `-` so callers can report sign errors
/// distinctly from format errors. Range and precision are checked against
/// the ledger column limits.
///
/// # Errors
/// * `InvalidFormat` - empty, stray characters, `.5`, `5.`, exponents
/// * `PrecisionOverflow` - more than 18 fractional digits
/// * `Overflow` - more than 60 integer digits
pub fn parse_decimal(input: &str) -> Result<BigDecimal, MoneyError> {
    if input.is_empty() {
        return Err(MoneyError::InvalidFormat("empty string".into()));
    }

    let unsigned = input.strip_prefix('-').unwrap_or(input);

    let (whole, frac) = match unsigned.split_once('.') {
        None => (unsigned, ""),
        Some((whole, frac)) => {
            // Require both sides of the dot to be non-empty
            if whole.is_empty() {
                return Err(MoneyError::InvalidFormat(
                    "missing leading zero (e.g., use 0.5 instead of .5)".into(),
                ));
            }
            if frac.is_empty() {
                return Err(MoneyError::InvalidFormat(
                    "missing fractional part (e.g., use 5.0 instead of 5.)".into(),
                ));
            }
            (whole, frac)
        }
    };

    if whole.is_empty() {
        return Err(MoneyError::InvalidFormat("missing digits".into()));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MoneyError::InvalidFormat(format!(
            "invalid character in whole part: {}",
            whole
        )));
    }
    if !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MoneyError::InvalidFormat(format!(
            "invalid character in fractional part: {}",
            frac
        )));
    }

    // REJECT excess precision instead of rounding
    if frac.len() > MAX_FRACTION_DIGITS {
        return Err(MoneyError::PrecisionOverflow {
            provided: frac.len(),
            max: MAX_FRACTION_DIGITS,
        });
    }

    let significant_whole = whole.trim_start_matches('0').len();
    if significant_whole > MAX_INTEGER_DIGITS {
        return Err(MoneyError::Overflow {
            digits: significant_whole,
            max: MAX_INTEGER_DIGITS,
        });
    }

    BigDecimal::from_str(input).map_err(|e| MoneyError::InvalidFormat(e.to_string()))
}

/// Parse a transfer amount: strictly greater than zero
pub fn parse_amount(input: &str) -> Result<BigDecimal, MoneyError> {
    let amount = parse_decimal(input)?;
    if amount <= BigDecimal::zero() {
        return Err(MoneyError::NotPositive);
    }
    Ok(amount)
}

/// Parse an opening balance: zero allowed, negative rejected
pub fn parse_balance(input: &str) -> Result<BigDecimal, MoneyError> {
    let balance = parse_decimal(input)?;
    if balance < BigDecimal::zero() {
        return Err(MoneyError::Negative);
    }
    Ok(balance)
}

// ============================================================================
// Format: Ledger → Client (BigDecimal → String)
// ============================================================================

/// Render without exponent and without trailing fractional zeros.
///
/// `NUMERIC(78,18)` reads back as `100.000000000000000000`; clients see `100`.
pub fn format_decimal(value: &BigDecimal) -> String {
    if value.is_zero() {
        return "0".to_string();
    }
    value.normalized().to_plain_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_decimal_basic() {
        assert_eq!(parse_decimal("100").unwrap(), dec("100"));
        assert_eq!(parse_decimal("100.50").unwrap(), dec("100.5"));
        assert_eq!(parse_decimal("-1.25").unwrap(), dec("-1.25"));
    }

    #[test]
    fn test_parse_decimal_rejects_bad_format() {
        for input in [
            "", "   ", "abc", ".5", "5.", "1.2.3", "1e5", "+1", "--1", "1,000", "0x10", " 7 ", "7 ",
            "\t7",
        ] {
            assert!(
                matches!(parse_decimal(input), Err(MoneyError::InvalidFormat(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_decimal_precision_limit() {
        assert!(parse_decimal("0.000000000000000001").is_ok());
        assert_eq!(
            parse_decimal("0.0000000000000000001"),
            Err(MoneyError::PrecisionOverflow {
                provided: 19,
                max: 18
            })
        );
    }

    #[test]
    fn test_parse_decimal_magnitude_limit() {
        let sixty = "9".repeat(60);
        assert!(parse_decimal(&sixty).is_ok());
        assert!(parse_decimal(&format!("000{}", sixty)).is_ok());

        let sixty_one = format!("1{}", "0".repeat(60));
        assert_eq!(
            parse_decimal(&sixty_one),
            Err(MoneyError::Overflow {
                digits: 61,
                max: 60
            })
        );
    }

    #[test]
    fn test_parse_amount_sign() {
        assert!(parse_amount("0.01").is_ok());
        assert_eq!(parse_amount("0"), Err(MoneyError::NotPositive));
        assert_eq!(parse_amount("0.00"), Err(MoneyError::NotPositive));
        assert_eq!(parse_amount("-1"), Err(MoneyError::NotPositive));
    }

    #[test]
    fn test_parse_balance_sign() {
        assert_eq!(parse_balance("0").unwrap(), BigDecimal::zero());
        assert_eq!(parse_balance("-0").unwrap(), BigDecimal::zero());
        assert_eq!(parse_balance("-100.00"), Err(MoneyError::Negative));
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(&dec("100.000000000000000000")), "100");
        assert_eq!(format_decimal(&dec("0.010")), "0.01");
        assert_eq!(format_decimal(&dec("0.000000000000000001")), "0.000000000000000001");
        assert_eq!(format_decimal(&dec("0.000000000000000000")), "0");
        assert_eq!(
            format_decimal(&dec("999999999999999999.999999999999999999")),
            "999999999999999999.999999999999999999"
        );
    }

    #[test]
    fn test_exact_arithmetic_at_18_digits() {
        let balance = dec("1000000000000000000.00");
        let amount = parse_amount("0.123456789123456789").unwrap();
        assert_eq!(
            format_decimal(&(&balance - &amount)),
            "999999999999999999.876543210876543211"
        );
    }
}
