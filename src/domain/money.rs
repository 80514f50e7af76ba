use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

/// Money is an exact base-10 decimal. Amounts never pass through binary
/// floating point: they are parsed from text, stored as text and summed as
/// decimals, so "12.50" + "7.25" is exactly "19.75".
pub type Amount = Decimal;

/// Parse a decimal string into an amount, keeping the scale as written.
/// Example: "12.50" -> 12.50, "7" -> 7, "-0.3" -> -0.3
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    // Decimal::from_str also accepts things like "1_000" and "1e3"; only plain
    // decimal notation is allowed here.
    let negative = input.starts_with('-');
    let digits = input.trim_start_matches(['-', '+']);
    if digits.len() + 1 < input.len() {
        return Err(ParseAmountError::InvalidFormat(input.to_string()));
    }

    let (units, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    let well_formed = !(units.is_empty() && fraction.is_empty())
        && units.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit());
    if !well_formed {
        return Err(ParseAmountError::InvalidFormat(input.to_string()));
    }

    let sign = if negative { "-" } else { "" };
    let units = if units.is_empty() { "0" } else { units };
    let canonical = if fraction.is_empty() {
        format!("{sign}{units}")
    } else {
        format!("{sign}{units}.{fraction}")
    };

    Decimal::from_str_exact(&canonical)
        .map_err(|_| ParseAmountError::OutOfRange(input.to_string()))
}

/// Format an amount for display with at least two fractional digits.
/// Example: 12.5 -> "12.50", 3 -> "3.00", 0.125 -> "0.125"
pub fn format_amount(amount: Amount) -> String {
    if amount.scale() < 2 {
        let mut padded = amount;
        padded.rescale(2);
        padded.to_string()
    } else {
        amount.to_string()
    }
}

/// Restore an amount from its persisted decimal text.
pub fn amount_from_storage(text: &str) -> Result<Amount, ParseAmountError> {
    Decimal::from_str(text).map_err(|_| ParseAmountError::InvalidFormat(text.to_string()))
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("amount is empty")]
    Empty,

    #[error("invalid money format: {0}")]
    InvalidFormat(String),

    #[error("amount exceeds supported precision: {0}")]
    OutOfRange(String),
}
