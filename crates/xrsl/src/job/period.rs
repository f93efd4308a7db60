//! Durations written as free-form unit strings or ISO 8601 periods.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Errors from [`Period::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("empty time value")]
    Empty,

    #[error("invalid time value '{text}'")]
    Invalid { text: String },

    #[error("invalid ISO 8601 period '{text}'")]
    InvalidIso { text: String },

    #[error("time value '{text}' is out of range")]
    Overflow { text: String },
}

/// A length of time with one-second resolution.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Period {
    seconds: i64,
}

impl Period {
    pub fn from_seconds(seconds: i64) -> Period {
        Period { seconds }
    }

    pub fn seconds(self) -> i64 {
        self.seconds
    }

    /// Parse a duration.
    ///
    /// Accepts ISO 8601 periods (`PT1H30M`) and free-form values made of
    /// numbers followed by `w`, `d`, `h`, `m` or `s` (`1h 30m`, `90s`). A
    /// number without a unit counts in multiples of `unit_seconds`.
    ///
    /// ```
    /// use xrsl::job::Period;
    ///
    /// assert_eq!(Period::parse("1h30m", 60).unwrap().seconds(), 5400);
    /// assert_eq!(Period::parse("10", 60).unwrap().seconds(), 600);
    /// assert_eq!(Period::parse("PT10M", 1).unwrap().seconds(), 600);
    /// ```
    pub fn parse(text: &str, unit_seconds: i64) -> Result<Period, PeriodError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(PeriodError::Empty);
        }
        let seconds = match trimmed.strip_prefix('P') {
            Some(body) => parse_iso(body, text)?,
            None => parse_free(trimmed, unit_seconds, text)?,
        };
        Ok(Period { seconds })
    }
}

fn overflow(text: &str) -> PeriodError {
    PeriodError::Overflow {
        text: text.to_string(),
    }
}

fn accumulate(total: i64, amount: &str, scale: i64, text: &str) -> Result<i64, PeriodError> {
    let amount: i64 = amount.parse().map_err(|_| overflow(text))?;
    amount
        .checked_mul(scale)
        .and_then(|seconds| total.checked_add(seconds))
        .ok_or_else(|| overflow(text))
}

fn parse_free(body: &str, unit_seconds: i64, text: &str) -> Result<i64, PeriodError> {
    let invalid = || PeriodError::Invalid {
        text: text.to_string(),
    };
    let mut total = 0;
    let mut digits = String::new();
    let mut seen_digit = false;
    for c in body.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            seen_digit = true;
            continue;
        }
        if c == ' ' {
            continue;
        }
        if digits.is_empty() {
            return Err(invalid());
        }
        let scale = match c.to_ascii_lowercase() {
            'w' => WEEK,
            'd' => DAY,
            'h' => HOUR,
            'm' => MINUTE,
            's' => 1,
            _ => return Err(invalid()),
        };
        total = accumulate(total, &digits, scale, text)?;
        digits.clear();
    }
    if !seen_digit {
        return Err(invalid());
    }
    if !digits.is_empty() {
        total = accumulate(total, &digits, unit_seconds, text)?;
    }
    Ok(total)
}

fn parse_iso(body: &str, text: &str) -> Result<i64, PeriodError> {
    let invalid = || PeriodError::InvalidIso {
        text: text.to_string(),
    };
    let mut total = 0;
    let mut digits = String::new();
    let mut in_time = false;
    // Components read since the start or since `T`.
    let mut components = 0;
    for c in body.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if c == 'T' {
            if in_time || !digits.is_empty() {
                return Err(invalid());
            }
            in_time = true;
            components = 0;
            continue;
        }
        if digits.is_empty() {
            return Err(invalid());
        }
        let scale = match (c, in_time) {
            ('Y', false) => YEAR,
            ('M', false) => MONTH,
            ('W', false) => WEEK,
            ('D', false) => DAY,
            ('H', true) => HOUR,
            ('M', true) => MINUTE,
            ('S', true) => 1,
            _ => return Err(invalid()),
        };
        total = accumulate(total, &digits, scale, text)?;
        digits.clear();
        components += 1;
    }
    if !digits.is_empty() || components == 0 {
        return Err(invalid());
    }
    Ok(total)
}
