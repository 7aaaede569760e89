//! Canonical forms for locale-formatted amounts, tax ids and dates.
//!
//! Payroll reports print amounts as `1.234,56` (dot thousands separator,
//! comma decimal separator) and company tax ids as `12.345.678/0001-90`.
//! Every join in the crate goes through these functions, so two renderings
//! of the same value always compare equal after normalization.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::ParseError;

/// Marker the extractors store when a page carries no tax id.
pub const TAX_ID_NOT_FOUND: &str = "Não Encontrado";

/// Normalized form of a missing tax id. Never a digit string, so it cannot
/// collide with a real id.
pub const TAX_ID_PLACEHOLDER: &str = "N/A";

/// Date layout used by every report family.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Input accepted by [`to_number`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue<'a> {
    /// Text as printed in the report.
    Text(&'a str),
    /// A value that is already numeric.
    Number(Decimal),
    /// Absent cell.
    Missing,
}

impl<'a> From<&'a str> for RawValue<'a> {
    fn from(s: &'a str) -> Self {
        RawValue::Text(s)
    }
}

impl<'a> From<&'a String> for RawValue<'a> {
    fn from(s: &'a String) -> Self {
        RawValue::Text(s.as_str())
    }
}

impl From<Decimal> for RawValue<'_> {
    fn from(d: Decimal) -> Self {
        RawValue::Number(d)
    }
}

impl<'a, T: Into<RawValue<'a>>> From<Option<T>> for RawValue<'a> {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(RawValue::Missing)
    }
}

/// Convert a `1.234,56` style amount to a decimal.
///
/// Empty or missing input is zero; numeric input passes through unchanged.
/// Text that is neither empty nor a valid amount is a [`ParseError`].
pub fn to_number<'a>(raw: impl Into<RawValue<'a>>) -> Result<Decimal, ParseError> {
    to_number_field("value", raw)
}

/// Same as [`to_number`], naming the field in the error.
pub fn to_number_field<'a>(
    field: &str,
    raw: impl Into<RawValue<'a>>,
) -> Result<Decimal, ParseError> {
    let text = match raw.into() {
        RawValue::Number(d) => return Ok(d),
        RawValue::Missing => return Ok(Decimal::ZERO),
        RawValue::Text(t) => t.trim(),
    };

    if text.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let canonical = text.replace('.', "").replace(',', ".");
    Decimal::from_str(&canonical).map_err(|_| ParseError::Number {
        field: field.to_string(),
        value: text.to_string(),
    })
}

/// Strip every non-digit character from a tax id.
///
/// The not-found marker, a missing value and a string without any digit all
/// map to [`TAX_ID_PLACEHOLDER`].
pub fn to_digits_only(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return TAX_ID_PLACEHOLDER.to_string();
    };
    if raw.trim() == TAX_ID_NOT_FOUND {
        return TAX_ID_PLACEHOLDER.to_string();
    }

    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        TAX_ID_PLACEHOLDER.to_string()
    } else {
        digits
    }
}

/// Parse an employee code; anything non-numeric becomes 0.
pub fn parse_code(raw: &str) -> u64 {
    raw.trim().parse().unwrap_or(0)
}

/// Parse a `dd/mm/yyyy` date.
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| ParseError::Date {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_to_number_locale_format() {
        assert_eq!(to_number("1.234,56").unwrap(), dec("1234.56"));
        assert_eq!(to_number("12.345.678,90").unwrap(), dec("12345678.90"));
        assert_eq!(to_number("900,00").unwrap(), dec("900"));
        assert_eq!(to_number(" 10,5 ").unwrap(), dec("10.5"));
    }

    #[test]
    fn test_to_number_empty_and_missing() {
        assert_eq!(to_number("").unwrap(), Decimal::ZERO);
        assert_eq!(to_number(None::<&str>).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_to_number_passes_numbers_through() {
        assert_eq!(to_number(dec("1234.5")).unwrap(), dec("1234.5"));
    }

    #[test]
    fn test_to_number_rejects_garbage() {
        let err = to_number_field("Valor", "abc").unwrap_err();
        assert_eq!(
            err,
            ParseError::Number {
                field: "Valor".to_string(),
                value: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_to_digits_only() {
        assert_eq!(to_digits_only(Some("12.345.678/0001-90")), "12345678000190");
        assert_eq!(to_digits_only(Some("111")), "111");
    }

    #[test]
    fn test_to_digits_only_placeholder() {
        assert_eq!(to_digits_only(Some("Não Encontrado")), TAX_ID_PLACEHOLDER);
        assert_eq!(to_digits_only(None), TAX_ID_PLACEHOLDER);
        assert_eq!(to_digits_only(Some("--")), TAX_ID_PLACEHOLDER);
        assert!(!to_digits_only(Some("Não Encontrado")).is_empty());
    }

    #[test]
    fn test_parse_code() {
        assert_eq!(parse_code("0042"), 42);
        assert_eq!(parse_code(" 7 "), 7);
        assert_eq!(parse_code("A1"), 0);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("Admissão", "01/02/2020").unwrap(),
            NaiveDate::from_ymd_opt(2020, 2, 1).unwrap()
        );
        assert!(parse_date("Admissão", "31/02/2020").is_err());
    }
}
