use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::DEFAULT_RATIO_PERCENT;

// ---------------------------------------------------------------------------
// LoanStatus — What happens to an existing lien in this deal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LoanStatus {
    /// Kept in place; its face amount ranks ahead of the new loan.
    #[default]
    #[serde(rename = "유지")]
    Maintained,
    /// Paid off with the proceeds of the new loan.
    #[serde(rename = "대환")]
    Refinanced,
    /// Cancelled before the new loan is registered.
    #[serde(rename = "선말소")]
    Prepayable,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 3] = [
        LoanStatus::Maintained,
        LoanStatus::Refinanced,
        LoanStatus::Prepayable,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Maintained => "유지",
            LoanStatus::Refinanced => "대환",
            LoanStatus::Prepayable => "선말소",
        }
    }

    /// Parse a status from its Korean label or English name (case-insensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|s| {
            s.label() == label || format!("{:?}", s).eq_ignore_ascii_case(label)
        })
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// LoanLine — One existing lien on the property
// ---------------------------------------------------------------------------

/// Amounts are in 만.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoanLine {
    pub lender: String,
    pub face_amount: i64,
    pub ratio_percent: i64,
    pub principal: i64,
    pub status: LoanStatus,
}

impl Default for LoanLine {
    fn default() -> Self {
        Self {
            lender: String::new(),
            face_amount: 0,
            ratio_percent: DEFAULT_RATIO_PERCENT,
            principal: 0,
            status: LoanStatus::default(),
        }
    }
}

impl LoanLine {
    /// Whether the line carries anything worth listing in a summary.
    pub fn is_meaningful(&self) -> bool {
        !self.lender.trim().is_empty() || self.face_amount != 0 || self.principal != 0
    }
}
