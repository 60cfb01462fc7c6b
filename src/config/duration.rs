//! Human-readable duration strings (`"10s"`, `"250ms"`, `"1m30s"`).
//!
//! Accepted units: `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`. Components may
//! carry a fractional part (`"1.5s"`) and are summed left to right. All
//! arithmetic is done in whole nanoseconds; fraction digits below one
//! nanosecond are truncated.

use std::time::Duration;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Error returned when a duration string cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationError {
    #[error("empty duration string")]
    Empty,

    #[error("missing unit in duration \"{0}\"")]
    MissingUnit(String),

    #[error("unknown unit \"{unit}\" in duration \"{input}\"")]
    UnknownUnit { unit: String, input: String },

    #[error("invalid number in duration \"{0}\"")]
    InvalidNumber(String),

    #[error("duration \"{0}\" is out of range")]
    Overflow(String),
}

const NANOS_PER_UNIT: [(&str, u128); 7] = [
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60_000_000_000),
    ("h", 3_600_000_000_000),
];

// Enough to resolve one nanosecond of the largest unit.
const MAX_FRACTION_DIGITS: usize = 13;

/// Parse a duration string such as `"10s"` or `"1h30m"`.
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DurationError::Empty);
    }
    if trimmed == "0" {
        return Ok(Duration::ZERO);
    }

    let invalid = || DurationError::InvalidNumber(input.to_string());
    let overflow = || DurationError::Overflow(input.to_string());

    let mut total: u128 = 0;
    let mut rest = trimmed;

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| DurationError::MissingUnit(input.to_string()))?;
        let number = &rest[..number_len];
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];

        let scale = NANOS_PER_UNIT
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)
            .ok_or_else(|| DurationError::UnknownUnit {
                unit: unit.to_string(),
                input: input.to_string(),
            })?;

        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        if (whole.is_empty() && fraction.is_empty()) || fraction.contains('.') {
            return Err(invalid());
        }

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let mut nanos = whole.checked_mul(scale).ok_or_else(overflow)?;

        let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
        if !fraction.is_empty() {
            let digits: u128 = fraction.parse().map_err(|_| invalid())?;
            let denominator = 10u128.pow(fraction.len() as u32);
            nanos = nanos
                .checked_add(digits * scale / denominator)
                .ok_or_else(overflow)?;
        }

        total = total.checked_add(nanos).ok_or_else(overflow)?;
    }

    let total = u64::try_from(total).map_err(|_| overflow())?;
    Ok(Duration::from_nanos(total))
}

/// Serde `deserialize_with` for `Duration` fields written as strings.
pub fn deserialize_duration<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Duration, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_duration(&raw).map_err(serde::de::Error::custom)
}

/// Serde `deserialize_with` for `Option<Duration>` fields written as strings.
pub fn deserialize_optional_duration<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Duration>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.map(|s| parse_duration(&s).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_units() {
        assert_eq!(parse_duration("10s").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("15us").unwrap(), Duration::from_micros(15));
        assert_eq!(parse_duration("15µs").unwrap(), Duration::from_micros(15));
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_compound_and_fractional() {
        assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse_duration(".5s").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
        assert_eq!(
            parse_duration("1h2m3s").unwrap(),
            Duration::from_secs(3600 + 120 + 3)
        );
    }

    #[test]
    fn test_parse_is_exact() {
        // Exact at nanosecond resolution, up to the largest Duration in u64 nanos.
        assert_eq!(
            parse_duration("0.1s").unwrap(),
            Duration::from_nanos(100_000_000)
        );
        assert_eq!(
            parse_duration("5124095h34m33.709551615s").unwrap(),
            Duration::from_nanos(u64::MAX)
        );
        assert_eq!(
            parse_duration("1.0000000019s").unwrap(),
            Duration::from_nanos(1_000_000_001)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_duration(""), Err(DurationError::Empty));
        assert_eq!(
            parse_duration("10"),
            Err(DurationError::MissingUnit("10".into()))
        );
        assert!(matches!(
            parse_duration("5parsecs"),
            Err(DurationError::UnknownUnit { .. })
        ));
        assert!(matches!(
            parse_duration("s"),
            Err(DurationError::InvalidNumber(_))
        ));
        assert!(matches!(
            parse_duration("1..2s"),
            Err(DurationError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert!(matches!(
            parse_duration("5124096h"),
            Err(DurationError::Overflow(_))
        ));
        assert!(matches!(
            parse_duration("99999999999999999999999999999999999999999h"),
            Err(DurationError::Overflow(_))
        ));
    }
}
