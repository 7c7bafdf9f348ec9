use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::loan::LoanLine;
use crate::config::{DEFAULT_BRIDGE_RATE, DEFAULT_CONSULT_RATE};

// ---------------------------------------------------------------------------
// CoOwner — Registered owner found in a registry document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CoOwner {
    pub name: String,
    /// First six digits of the resident registration number (YYMMDD).
    pub birth: String,
}

// ---------------------------------------------------------------------------
// FeeInputs — Consulting and bridge fee inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FeeInputs {
    pub consult_amount: i64,
    pub consult_rate: f64,
    pub bridge_amount: i64,
    pub bridge_rate: f64,
}

impl Default for FeeInputs {
    fn default() -> Self {
        Self {
            consult_amount: 0,
            consult_rate: DEFAULT_CONSULT_RATE,
            bridge_amount: 0,
            bridge_rate: DEFAULT_BRIDGE_RATE,
        }
    }
}

// ---------------------------------------------------------------------------
// CustomerRecord — Everything persisted for one customer
// ---------------------------------------------------------------------------

/// A customer's saved desk state. `name` is the natural key in the store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CustomerRecord {
    pub name: String,
    pub address: String,
    pub region: String,
    pub deduction: i64,
    pub appraised_value: i64,
    pub area_text: String,
    /// Rate inputs exactly as entered (two slots).
    #[serde(default)]
    pub rate_inputs: Vec<String>,
    /// Deduplicated valid rates, descending.
    #[serde(default)]
    pub selected_rates: Vec<u32>,
    #[serde(default)]
    pub loan_lines: Vec<LoanLine>,
    #[serde(default)]
    pub fees: FeeInputs,
    #[serde(default)]
    pub co_owners: Vec<CoOwner>,
    #[serde(default)]
    pub summary_text: String,
    pub saved_at: Option<DateTime<FixedOffset>>,
}
