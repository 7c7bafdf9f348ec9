//! LTV limit computation for senior and subordinate lien positions.
//!
//! All amounts are in 만. Results are truncated to multiples of 10 with floor
//! semantics, including negative results: a negative `available` means the
//! existing principal already exceeds the limit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{LoanLine, LoanStatus};

/// Truncation unit applied to every limit and available amount.
pub const TRUNCATION_UNIT: i64 = 10;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Senior,
    Subordinate,
}

impl Position {
    pub fn label(&self) -> &'static str {
        match self {
            Position::Senior => "선순위",
            Position::Subordinate => "후순위",
        }
    }
}

// ---------------------------------------------------------------------------
// LimitPair
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LimitPair {
    pub limit: i64,
    pub available: i64,
}

/// Compute the lending limit and the amount still available under it.
///
/// A non-zero `maintained_face_sum` means a maintained lien ranks ahead, so
/// the position is subordinate and the maintained face amount is subtracted
/// along with the deduction. `available` is the limit minus `principal_sum`.
///
/// The exact value `total_value * rate / 100 - offset` is floored to a
/// multiple of 10 in one step, so no fractional part is rounded away early.
pub fn compute_limit(
    total_value: i64,
    deduction: i64,
    principal_sum: i64,
    maintained_face_sum: i64,
    rate_percent: u32,
) -> LimitPair {
    let offset = if maintained_face_sum > 0 {
        i128::from(maintained_face_sum) + i128::from(deduction)
    } else {
        i128::from(deduction)
    };
    let scaled = i128::from(total_value) * i128::from(rate_percent);
    let limit = truncate_hundredths(scaled - 100 * offset);
    let available = truncate_hundredths(scaled - 100 * (offset + i128::from(principal_sum)));
    LimitPair { limit, available }
}

/// Floor a value expressed in hundredths of 만 to a multiple of [`TRUNCATION_UNIT`].
fn truncate_hundredths(hundredths: i128) -> i64 {
    let unit = 100 * i128::from(TRUNCATION_UNIT);
    let truncated = hundredths.div_euclid(unit) * i128::from(TRUNCATION_UNIT);
    truncated.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

// ---------------------------------------------------------------------------
// LoanTotals
// ---------------------------------------------------------------------------

/// Per-status sums over the active loan lines. Sums saturate at `i64::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoanTotals {
    pub sum_refinanced: i64,
    pub sum_prepayable: i64,
    pub sum_maintained_face: i64,
    pub sum_subordinate_principal: i64,
}

impl LoanTotals {
    pub fn from_lines(lines: &[LoanLine]) -> Self {
        let mut totals = Self::default();
        for line in lines {
            match line.status {
                LoanStatus::Maintained => {
                    totals.sum_maintained_face =
                        totals.sum_maintained_face.saturating_add(line.face_amount)
                }
                LoanStatus::Refinanced => {
                    totals.sum_refinanced = totals.sum_refinanced.saturating_add(line.principal)
                }
                LoanStatus::Prepayable => {
                    totals.sum_prepayable = totals.sum_prepayable.saturating_add(line.principal)
                }
            }
            if line.status != LoanStatus::Maintained {
                totals.sum_subordinate_principal =
                    totals.sum_subordinate_principal.saturating_add(line.principal);
            }
        }
        totals
    }

    /// Principal that the new loan must pay down.
    pub fn principal_sum(&self) -> i64 {
        self.sum_refinanced.saturating_add(self.sum_prepayable)
    }

    pub fn position(&self) -> Position {
        if self.sum_maintained_face > 0 {
            Position::Subordinate
        } else {
            Position::Senior
        }
    }
}

// ---------------------------------------------------------------------------
// LtvResults
// ---------------------------------------------------------------------------

/// Limits keyed by rate. A rate lands in exactly one of the two maps per
/// evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LtvResults {
    pub senior: BTreeMap<u32, LimitPair>,
    pub subordinate: BTreeMap<u32, LimitPair>,
}

impl LtvResults {
    pub fn get(&self, rate: u32) -> Option<(Position, LimitPair)> {
        self.senior
            .get(&rate)
            .map(|p| (Position::Senior, *p))
            .or_else(|| self.subordinate.get(&rate).map(|p| (Position::Subordinate, *p)))
    }

    pub fn is_empty(&self) -> bool {
        self.senior.is_empty() && self.subordinate.is_empty()
    }
}

/// Evaluate every selected rate against the current loan lines.
///
/// With no loan lines only the senior formula applies and `available`
/// equals `limit`.
pub fn evaluate(
    total_value: i64,
    deduction: i64,
    lines: &[LoanLine],
    rates: &[u32],
) -> LtvResults {
    let mut results = LtvResults::default();

    if lines.is_empty() {
        for &rate in rates {
            let pair = compute_limit(total_value, deduction, 0, 0, rate);
            results.senior.insert(rate, pair);
        }
        return results;
    }

    let totals = LoanTotals::from_lines(lines);
    for &rate in rates {
        match totals.position() {
            Position::Subordinate => {
                let pair = compute_limit(
                    total_value,
                    deduction,
                    totals.sum_subordinate_principal,
                    totals.sum_maintained_face,
                    rate,
                );
                results.subordinate.insert(rate, pair);
            }
            Position::Senior => {
                let pair = compute_limit(total_value, deduction, totals.principal_sum(), 0, rate);
                results.senior.insert(rate, pair);
            }
        }
    }
    results
}

/// Reduce raw rate inputs to the active rate set: valid percentages only,
/// duplicates removed, highest first.
pub fn select_rates<S: AsRef<str>>(inputs: &[S]) -> Vec<u32> {
    let mut rates: Vec<u32> = Vec::new();
    for input in inputs {
        if let Some(rate) = crate::number::parse_percentage(input.as_ref()) {
            if !rates.contains(&rate) {
                rates.push(rate);
            }
        }
    }
    rates.sort_unstable_by(|a, b| b.cmp(a));
    rates
}
