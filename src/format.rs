//! Value formatting and severity classification for table cells
//!
//! Every cell in the node table gets a display string and, for most columns,
//! a [`Severity`] the view maps to a color. Both are computed by the small
//! pure functions in this module.
//!
//! # Thresholds
//!
//! [`color_range`] takes an ascending list of thresholds where each position
//! corresponds to a severity level. A `None` position means "this level is
//! never used" for that column, so `[None, Some(0.0), Some(1.0)]` starts
//! matching at `ok` instead of `info`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder shown when a value is unknown
pub const NOT_AVAILABLE: &str = "n/a";

/// Names of 24 or more characters are shortened to this many plus an ellipsis
const NAME_LIMIT: usize = 24;
const NAME_KEEP: usize = 21;

/// Number of hex digits kept on each side of a shortened address
const ADDRESS_KEEP: usize = 8;

/// How concerning a cell value is, from least to most
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Ok,
    Warn1,
    Warn2,
    Warn3,
    Warn4,
    No,
}

impl Severity {
    /// All levels in ascending order
    pub const LEVELS: [Severity; 7] = [
        Severity::Info,
        Severity::Ok,
        Severity::Warn1,
        Severity::Warn2,
        Severity::Warn3,
        Severity::Warn4,
        Severity::No,
    ];

    /// Level at `index`, saturating at [`Severity::No`]
    pub fn from_index(index: usize) -> Self {
        Self::LEVELS[index.min(Self::LEVELS.len() - 1)]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Ok => "ok",
            Severity::Warn1 => "warn1",
            Severity::Warn2 => "warn2",
            Severity::Warn3 => "warn3",
            Severity::Warn4 => "warn4",
            Severity::No => "no",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify `value` against ascending `thresholds`.
///
/// Returns the level at the index of the first set threshold that `value` is
/// less than or equal to, or the level one past the last threshold when none
/// matches. NaN never matches.
pub fn color_range(value: f64, thresholds: &[Option<f64>]) -> Severity {
    let index = thresholds
        .iter()
        .position(|threshold| matches!(threshold, Some(t) if value <= *t))
        .unwrap_or(thresholds.len());
    Severity::from_index(index)
}

/// Whether `x` lies exactly halfway between two values with `decimals`
/// fraction digits. A binary fraction with `k` fraction bits has exactly `k`
/// decimal fraction digits, the last one a 5, so that is a tie exactly when
/// `k == decimals + 1`.
fn is_rounding_tie(x: f64, decimals: usize) -> bool {
    let bits = x.to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if exponent == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), exponent - 1075)
    };
    if mantissa == 0 {
        return false;
    }
    let lowest_bit = exponent + i64::from(mantissa.trailing_zeros());
    usize::try_from(-lowest_bit).is_ok_and(|fraction_bits| fraction_bits == decimals + 1)
}

/// Format `n` with `decimals` fraction digits, comma thousands separators and
/// trailing fraction zeros removed.
///
/// ```
/// use netstats_rs::format::format_number;
///
/// assert_eq!(format_number(1234.5, 2), "1,234.5");
/// assert_eq!(format_number(1234.0, 2), "1,234");
/// assert_eq!(format_number(f64::NAN, 2), "n/a");
/// ```
pub fn format_number(n: f64, decimals: usize) -> String {
    if !n.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let magnitude = if is_rounding_tie(n.abs(), decimals) {
        // Exact ties round away from zero; the next double up is past the tie.
        f64::from_bits(n.abs().to_bits() + 1)
    } else {
        n.abs()
    };
    let fixed = if n.is_sign_negative() {
        format!("-{:.*}", decimals, magnitude)
    } else {
        format!("{:.*}", decimals, magnitude)
    };
    let (natural, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let (sign, digits) = match natural.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", natural),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{fraction}")
    }
}

/// Shorten `0x` + 8 hex + ... + 8 hex to `0x{first8}...{last8}`.
///
/// Anything that does not look like a hex address is returned unchanged.
pub fn shorten_address(value: &str) -> String {
    let Some(body) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    else {
        return value.to_string();
    };

    // At least one character between the two kept halves.
    if !body.is_ascii() || body.len() <= ADDRESS_KEEP * 2 {
        return value.to_string();
    }

    let head = &body[..ADDRESS_KEEP];
    let tail = &body[body.len() - ADDRESS_KEEP..];
    let is_hex = |s: &str| s.chars().all(|c| c.is_ascii_hexdigit());
    if is_hex(head) && is_hex(tail) {
        format!("0x{head}...{tail}")
    } else {
        value.to_string()
    }
}

/// Cut long node names down to a fixed width
pub fn truncate_name(value: &str) -> String {
    if value.chars().count() >= NAME_LIMIT {
        let kept: String = value.chars().take(NAME_KEEP).collect();
        format!("{kept}...")
    } else {
        value.to_string()
    }
}
