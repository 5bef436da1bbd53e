//! Byte-size parsing and human-readable formatting.
//!
//! Sizes are written the way server limits usually are: a number with an
//! optional `k`, `m` or `g` unit (`"150k"`, `"2M"`, `"1.5 MB"`). Units are
//! binary; each step multiplies by 1024.

use thiserror::Error;

const KIB: f64 = 1024.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ByteSizeError {
    #[error("empty size value")]
    Empty,
    #[error("invalid size value: {0:?}")]
    Invalid(String),
}

/// Parses a size such as `"500"`, `"150k"`, `"2M"` or `"1.5 mb"` into bytes.
///
/// The unit letter is case-insensitive and may be followed by `b`. Fractions
/// and `,` thousands separators are allowed; the result is truncated after
/// scaling.
pub fn parse_byte_size(value: &str) -> Result<u64, ByteSizeError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ByteSizeError::Empty);
    }

    let lower = value.to_ascii_lowercase();
    let without_b = match lower.strip_suffix('b') {
        Some(rest) if rest.ends_with(['k', 'm', 'g']) => rest,
        _ => lower.as_str(),
    };

    let last = without_b.chars().last().unwrap_or_default();
    let (number, steps) = match last {
        'g' => (&without_b[..without_b.len() - 1], 3),
        'm' => (&without_b[..without_b.len() - 1], 2),
        'k' => (&without_b[..without_b.len() - 1], 1),
        _ => (without_b, 0),
    };

    let number = number.trim().replace(',', "");
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(ByteSizeError::Invalid(value.to_string()));
    }
    let n: f64 = number
        .parse()
        .map_err(|_| ByteSizeError::Invalid(value.to_string()))?;

    let scaled = n * KIB.powi(steps);
    if !scaled.is_finite() || scaled > u64::MAX as f64 {
        return Err(ByteSizeError::Invalid(value.to_string()));
    }
    Ok(scaled as u64)
}

/// Renders `bytes` as kilobytes with one decimal, or megabytes once the value
/// exceeds 1024 KB: `153600` → `"150.0 KB"`, `2097152` → `"2.0 MB"`.
pub fn format_bytes(bytes: u64) -> String {
    let kb = bytes as f64 / KIB;
    if kb > KIB {
        format!("{} MB", group_thousands(kb / KIB))
    } else {
        format!("{} KB", group_thousands(kb))
    }
}

/// One decimal place with `,` between thousands (`1234.56` → `"1,234.6"`).
fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.1}", value);
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "0"));

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*d as char);
    }
    format!("{}.{}", grouped, frac)
}
