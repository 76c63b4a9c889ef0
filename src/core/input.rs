use std::num::NonZeroU32;

use serde::Deserialize;
use thiserror::Error;

pub const MAX_TERM_YEARS: u32 = 1_000;
pub const MAX_CAPITALIZATION_FREQUENCY: u32 = 366;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("capitalization frequency must be at least 1 per year (got {0})")]
    CapitalizationFrequency(i64),
    #[error(
        "capitalization frequency must be at most {max} per year (got {0})",
        max = MAX_CAPITALIZATION_FREQUENCY
    )]
    CapitalizationTooFrequent(u32),
    #[error("term must be at most {max} years (got {0})", max = MAX_TERM_YEARS)]
    TermTooLong(u32),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskProfile {
    pub fn annual_rate_pct(self) -> f64 {
        match self {
            RiskProfile::Conservative => 4.0,
            RiskProfile::Moderate => 7.0,
            RiskProfile::Aggressive => 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LenientNumber {
    Number(f64),
    Text(String),
}

impl LenientNumber {
    pub fn into_raw(self) -> String {
        match self {
            LenientNumber::Number(v) => v.to_string(),
            LenientNumber::Text(s) => s,
        }
    }
}

/// Parses the leading decimal number of a form value. Anything that does not
/// start with a finite number becomes 0.
pub fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let end = numeric_prefix_len(trimmed);
    trimmed[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parses the leading integer of a form value, truncating any fraction. Values
/// without leading digits become 0; out of range values saturate.
pub fn parse_count(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    if negative { -value } else { value }
}

pub fn clamp_count(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

pub fn capitalization_frequency(value: i64) -> Result<NonZeroU32, InputError> {
    if value < 1 {
        return Err(InputError::CapitalizationFrequency(value));
    }
    let periods = clamp_count(value);
    if periods > MAX_CAPITALIZATION_FREQUENCY {
        return Err(InputError::CapitalizationTooFrequent(periods));
    }
    NonZeroU32::new(periods).ok_or(InputError::CapitalizationFrequency(value))
}

pub fn term_years(value: i64) -> Result<u32, InputError> {
    let years = clamp_count(value);
    if years > MAX_TERM_YEARS {
        return Err(InputError::TermTooLong(years));
    }
    Ok(years)
}

// Longest prefix shaped like `[+-]digits[.digits][e[+-]digits]`.
fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if mantissa_digits > 0 || j > frac_start {
            mantissa_digits += j - frac_start;
            i = j;
        }
    }

    if mantissa_digits == 0 {
        return 0;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    i
}
