//! Bidirectional face-amount / principal linking for loan lines.
//!
//! Each line keeps a baseline of the values seen at the end of the previous
//! recomputation. On the next pass, whichever side changed decides which
//! value is derived:
//!
//! 1. principal changed, ratio > 0: `face = floor(principal * ratio / 100)`
//! 2. otherwise face or ratio changed, both > 0:
//!    `principal = floor(face * 100 / ratio)`
//! 3. otherwise nothing is derived.
//!
//! Rule 1 wins when several fields changed in the same pass.

use serde::{Deserialize, Serialize};

use crate::models::LoanLine;

/// The field the operator touched most recently on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EditedField {
    #[default]
    None,
    FaceAmount,
    Ratio,
    Principal,
}

/// Values of the linked fields as of the end of the previous pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Baseline {
    pub face_amount: i64,
    pub ratio_percent: i64,
    pub principal: i64,
}

impl Baseline {
    pub fn of(line: &LoanLine) -> Self {
        Self {
            face_amount: line.face_amount,
            ratio_percent: line.ratio_percent,
            principal: line.principal,
        }
    }
}

/// A loan line together with its change-detection state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LineState {
    pub line: LoanLine,
    pub baseline: Baseline,
    pub edited: EditedField,
}

impl LineState {
    /// A fresh row: the baseline is all zeros so any entered amount counts
    /// as a change on the first pass.
    pub fn new(line: LoanLine) -> Self {
        Self {
            line,
            baseline: Baseline::default(),
            edited: EditedField::None,
        }
    }

    /// A row whose values are taken as given (e.g. just loaded from the
    /// store): nothing is re-derived until the operator edits it.
    pub fn synced(line: LoanLine) -> Self {
        Self {
            baseline: Baseline::of(&line),
            line,
            edited: EditedField::None,
        }
    }
}

/// Run one reconciliation pass over a line.
///
/// Returns the updated line, its new baseline, and a cleared edit marker.
pub fn reconcile(state: LineState) -> LineState {
    let LineState {
        mut line,
        baseline,
        edited,
    } = state;

    let principal_changed =
        line.principal != baseline.principal || edited == EditedField::Principal;
    let face_changed =
        line.face_amount != baseline.face_amount || edited == EditedField::FaceAmount;
    let ratio_changed =
        line.ratio_percent != baseline.ratio_percent || edited == EditedField::Ratio;

    if principal_changed {
        if line.ratio_percent > 0 {
            line.face_amount = scale(line.principal, line.ratio_percent, 100);
        }
    } else if (face_changed || ratio_changed) && line.face_amount > 0 && line.ratio_percent > 0 {
        line.principal = scale(line.face_amount, 100, line.ratio_percent);
    }

    LineState {
        baseline: Baseline::of(&line),
        line,
        edited: EditedField::None,
    }
}

/// `value * numerator / denominator` in `i128`, saturated to the `i64` range.
fn scale(value: i64, numerator: i64, denominator: i64) -> i64 {
    let scaled = i128::from(value) * i128::from(numerator) / i128::from(denominator);
    scaled.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// Reconcile every line in order.
pub fn reconcile_all(states: Vec<LineState>) -> Vec<LineState> {
    states.into_iter().map(reconcile).collect()
}
