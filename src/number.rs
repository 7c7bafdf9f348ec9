//! Permissive number parsing and formatting for operator-entered text.
//!
//! Nothing in this module fails: text that cannot be read as a number
//! degrades to `0` (or an empty string for the field normalizers) so that a
//! half-typed value never blocks recomputation.

use once_cell::sync::Lazy;
use regex::Regex;

static EOK_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*억").unwrap());
static CHEONMAN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*천만").unwrap());
static MAN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*만").unwrap());

/// Multipliers into 만 units, in scan order.
fn unit_patterns() -> [(&'static Lazy<Regex>, i64); 3] {
    [
        (&EOK_PATTERN, 10_000),
        (&CHEONMAN_PATTERN, 1_000),
        (&MAN_PATTERN, 1),
    ]
}

/// Strip every non-digit character and parse the rest as a base-10 integer.
///
/// Returns `0` for empty input, input without digits, or digit runs too long
/// to fit an `i64`.
pub fn parse_digits(text: &str) -> i64 {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Parse an amount written with Korean units into 만.
///
/// `억` counts 10,000, `천만` 1,000 and `만` 1. Each unit is scanned on its
/// own and only its last occurrence counts; the contributions are summed, so
/// `"1억 2천만"` is 12,000. When no unit contributes, the comma-free text is
/// read as a plain integer, and anything else yields `0`.
pub fn parse_localized_amount(text: &str) -> i64 {
    let txt = text.replace(',', "");
    let txt = txt.trim();

    let mut total: i64 = 0;
    for (pattern, multiplier) in unit_patterns() {
        let value = pattern
            .captures_iter(txt)
            .last()
            .and_then(|caps| caps[1].parse::<i64>().ok())
            .and_then(|n| n.checked_mul(multiplier));
        if let Some(v) = value {
            total = total.saturating_add(v);
        }
    }

    if total == 0 {
        total = txt.parse().unwrap_or(0);
    }
    total
}

/// Render an integer with `,` between groups of three digits.
pub fn format_with_commas(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Normalize a money field after editing: digits only, re-grouped, or empty.
pub fn format_digits_input(text: &str) -> String {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.parse::<i64>() {
        Ok(n) => format_with_commas(n),
        Err(_) => String::new(),
    }
}

/// Normalize an area field: keep digits and `.`, then append `㎡`.
pub fn format_area_input(text: &str) -> String {
    let clean: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if clean.is_empty() {
        String::new()
    } else {
        format!("{}㎡", clean)
    }
}

/// Read an LTV percentage. Only a whole number in `1..=100` is accepted.
pub fn parse_percentage(text: &str) -> Option<u32> {
    text.trim()
        .parse::<u32>()
        .ok()
        .filter(|v| (1..=100).contains(v))
}

/// Read a fee rate such as `"1.5"`. Negative or non-numeric input is rejected.
pub fn parse_fee_rate(text: &str) -> Option<f64> {
    text.trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}
