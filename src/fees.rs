//! Consulting and bridge fee breakdown.

use serde::{Deserialize, Serialize};

use crate::models::FeeInputs;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FeeBreakdown {
    pub consult_fee: i64,
    pub bridge_fee: i64,
    pub total_fee: i64,
}

/// Fee for `amount` at `rate` percent, truncated to whole 만.
///
/// The rate is read to two decimal places (basis points); the product is
/// computed in integers.
pub fn fee_for(amount: i64, rate: f64) -> i64 {
    let basis_points = (rate * 100.0).round() as i64;
    amount.saturating_mul(basis_points) / 10_000
}

pub fn compute_fees(inputs: &FeeInputs) -> FeeBreakdown {
    let consult_fee = fee_for(inputs.consult_amount, inputs.consult_rate);
    let bridge_fee = fee_for(inputs.bridge_amount, inputs.bridge_rate);
    FeeBreakdown {
        consult_fee,
        bridge_fee,
        total_fee: consult_fee.saturating_add(bridge_fee),
    }
}
