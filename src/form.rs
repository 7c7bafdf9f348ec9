//! The desk's form state, field edits, and the full recomputation pass.
//!
//! [`FormState`] is plain data. The interactive shell owns the only mutable
//! instance, applies one [`FieldEdit`] per operator action, and then replaces
//! the state with [`recompute_all`]'s output.

use serde::{Deserialize, Serialize};

use crate::config::{self, DEFAULT_LINE_COUNT, DEFAULT_RATE_INPUTS, MAX_LINE_COUNT, MIN_LINE_COUNT};
use crate::error::{LtvError, Result};
use crate::extract::{self, PriceTier, RegistryExtract};
use crate::fees::{compute_fees, FeeBreakdown};
use crate::ltv::{self, LoanTotals, LtvResults};
use crate::models::{CoOwner, CustomerRecord, FeeInputs, LoanLine, LoanStatus};
use crate::number::{
    format_area_input, format_digits_input, format_with_commas, parse_digits,
    parse_fee_rate, parse_localized_amount,
};
use crate::reconcile::{self, EditedField, LineState};
use crate::summary::compose_summary;

// ---------------------------------------------------------------------------
// FieldEdit
// ---------------------------------------------------------------------------

/// One operator edit. Line indexes are zero-based.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    CustomerName(String),
    Address(String),
    /// Selecting a region resets the deduction to that region's default.
    Region(String),
    Deduction(String),
    Price(String),
    Area(String),
    Rate(usize, String),
    LineCount(usize),
    Lender(usize, String),
    FaceAmount(usize, String),
    Ratio(usize, String),
    Principal(usize, String),
    Status(usize, LoanStatus),
    ConsultAmount(String),
    ConsultRate(String),
    BridgeAmount(String),
    BridgeRate(String),
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Everything derived from the form in one recomputation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Evaluation {
    pub appraised_value: i64,
    /// The price as typed; shown in the summary when it parses to zero.
    #[serde(default)]
    pub price_text: String,
    pub deduction: i64,
    pub floor: Option<u32>,
    pub tier: PriceTier,
    pub selected_rates: Vec<u32>,
    pub totals: LoanTotals,
    pub results: LtvResults,
    pub fees: FeeBreakdown,
}

// ---------------------------------------------------------------------------
// FormState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FormState {
    pub customer_name: String,
    pub address: String,
    pub region: String,
    pub deduction_input: String,
    pub price_input: String,
    pub area_input: String,
    pub rate_inputs: [String; 2],
    pub line_count: usize,
    pub lines: Vec<LineState>,
    pub fee_inputs: FeeInputs,
    pub co_owners: Vec<CoOwner>,
    pub evaluation: Evaluation,
    pub summary: String,
}

impl Default for FormState {
    fn default() -> Self {
        let state = Self {
            customer_name: String::new(),
            address: String::new(),
            region: String::new(),
            deduction_input: String::new(),
            price_input: String::new(),
            area_input: String::new(),
            rate_inputs: DEFAULT_RATE_INPUTS.map(String::from),
            line_count: DEFAULT_LINE_COUNT,
            lines: (0..DEFAULT_LINE_COUNT)
                .map(|_| LineState::new(LoanLine::default()))
                .collect(),
            fee_inputs: FeeInputs::default(),
            co_owners: Vec::new(),
            evaluation: Evaluation::default(),
            summary: String::new(),
        };
        recompute_all(state)
    }
}

impl FormState {
    /// Deduction in 만: the manual entry when it has digits, otherwise the
    /// selected region's default.
    pub fn deduction(&self) -> i64 {
        if self.deduction_input.chars().any(|c| c.is_ascii_digit()) {
            parse_digits(&self.deduction_input)
        } else {
            config::region_deduction(&self.region)
        }
    }

    pub fn appraised_value(&self) -> i64 {
        parse_localized_amount(&self.price_input)
    }

    /// Loan lines within the current row count.
    pub fn active_lines(&self) -> Vec<LoanLine> {
        self.lines
            .iter()
            .take(self.line_count)
            .map(|s| s.line.clone())
            .collect()
    }

    /// Apply a single operator edit. Values are stored as entered (money
    /// fields normalized); nothing is derived until [`recompute_all`].
    pub fn apply(&mut self, edit: FieldEdit) -> Result<()> {
        match edit {
            FieldEdit::CustomerName(v) => self.customer_name = v.trim().to_string(),
            FieldEdit::Address(v) => self.address = v,
            FieldEdit::Region(v) => {
                self.region = v.trim().to_string();
                let default = config::region_deduction(&self.region);
                self.deduction_input = format_with_commas(default);
            }
            FieldEdit::Deduction(v) => self.deduction_input = format_digits_input(&v),
            FieldEdit::Price(v) => self.price_input = v,
            FieldEdit::Area(v) => self.area_input = format_area_input(&v),
            FieldEdit::Rate(slot, v) => {
                let input = self.rate_inputs.get_mut(slot).ok_or_else(|| {
                    LtvError::InvalidArgument(format!("No LTV rate slot {}", slot + 1))
                })?;
                *input = v.trim().to_string();
            }
            FieldEdit::LineCount(n) => self.set_line_count(n),
            FieldEdit::Lender(i, v) => self.line_mut(i)?.line.lender = v.trim().to_string(),
            FieldEdit::FaceAmount(i, v) => {
                let state = self.line_mut(i)?;
                state.line.face_amount = parse_digits(&v);
                state.edited = EditedField::FaceAmount;
            }
            FieldEdit::Ratio(i, v) => {
                let state = self.line_mut(i)?;
                state.line.ratio_percent = parse_digits(&v);
                state.edited = EditedField::Ratio;
            }
            FieldEdit::Principal(i, v) => {
                let state = self.line_mut(i)?;
                state.line.principal = parse_digits(&v);
                state.edited = EditedField::Principal;
            }
            FieldEdit::Status(i, status) => self.line_mut(i)?.line.status = status,
            FieldEdit::ConsultAmount(v) => self.fee_inputs.consult_amount = parse_digits(&v),
            FieldEdit::ConsultRate(v) => {
                if let Some(rate) = parse_fee_rate(&v) {
                    self.fee_inputs.consult_rate = rate;
                }
            }
            FieldEdit::BridgeAmount(v) => self.fee_inputs.bridge_amount = parse_digits(&v),
            FieldEdit::BridgeRate(v) => {
                if let Some(rate) = parse_fee_rate(&v) {
                    self.fee_inputs.bridge_rate = rate;
                }
            }
        }
        Ok(())
    }

    fn line_mut(&mut self, index: usize) -> Result<&mut LineState> {
        if index >= self.line_count {
            return Err(LtvError::InvalidArgument(format!(
                "Loan line {} is outside the {} active rows",
                index + 1,
                self.line_count
            )));
        }
        self.lines
            .get_mut(index)
            .ok_or_else(|| LtvError::InvalidArgument(format!("No loan line {}", index + 1)))
    }

    /// Resize the loan table. Rows past the new count are discarded.
    pub fn set_line_count(&mut self, count: usize) {
        let count = count.clamp(MIN_LINE_COUNT, MAX_LINE_COUNT);
        self.line_count = count;
        self.lines.truncate(count);
        while self.lines.len() < count {
            self.lines.push(LineState::new(LoanLine::default()));
        }
    }

    /// Pre-fill fields from a registry document. The customer name is only
    /// filled when still blank.
    pub fn ingest_registry(&mut self, extract: &RegistryExtract) {
        self.address = extract.address.clone();
        self.area_input = extract.area.clone();
        self.co_owners = extract.co_owners.clone();
        if self.customer_name.is_empty() {
            self.customer_name = extract::default_customer_name(&extract.co_owners);
        }
    }

    /// Snapshot the form as a storable record.
    pub fn to_record(&self) -> CustomerRecord {
        CustomerRecord {
            name: self.customer_name.trim().to_string(),
            address: self.address.clone(),
            region: self.region.clone(),
            deduction: self.deduction(),
            appraised_value: self.appraised_value(),
            area_text: self.area_input.clone(),
            rate_inputs: self.rate_inputs.to_vec(),
            selected_rates: ltv::select_rates(&self.rate_inputs),
            loan_lines: self.active_lines(),
            fees: self.fee_inputs.clone(),
            co_owners: self.co_owners.clone(),
            summary_text: self.summary.clone(),
            saved_at: None,
        }
    }

    /// Rebuild a form from a stored record. Loan lines are taken as given:
    /// their baselines match their values, so nothing is re-derived until
    /// the operator edits them.
    pub fn from_record(record: &CustomerRecord) -> Self {
        let mut rate_inputs: [String; 2] = Default::default();
        if record.rate_inputs.is_empty() {
            for (slot, rate) in rate_inputs.iter_mut().zip(&record.selected_rates) {
                *slot = rate.to_string();
            }
        } else {
            for (slot, input) in rate_inputs.iter_mut().zip(&record.rate_inputs) {
                *slot = input.clone();
            }
        }

        let line_count = record
            .loan_lines
            .len()
            .clamp(MIN_LINE_COUNT, MAX_LINE_COUNT);
        let mut lines: Vec<LineState> = record
            .loan_lines
            .iter()
            .take(line_count)
            .cloned()
            .map(LineState::synced)
            .collect();
        while lines.len() < line_count {
            lines.push(LineState::new(LoanLine::default()));
        }

        Self {
            customer_name: record.name.clone(),
            address: record.address.clone(),
            region: record.region.clone(),
            deduction_input: format_with_commas(record.deduction),
            price_input: if record.appraised_value != 0 {
                format_with_commas(record.appraised_value)
            } else {
                String::new()
            },
            area_input: record.area_text.clone(),
            rate_inputs,
            line_count,
            lines,
            fee_inputs: record.fees.clone(),
            co_owners: record.co_owners.clone(),
            evaluation: Evaluation::default(),
            summary: record.summary_text.clone(),
        }
    }
}

/// One full recomputation pass: reconcile every active loan line, evaluate
/// each selected rate, compute fees, and re-render the summary.
pub fn recompute_all(mut state: FormState) -> FormState {
    state.set_line_count(state.line_count);
    state.lines = reconcile::reconcile_all(std::mem::take(&mut state.lines));

    let lines = state.active_lines();
    let appraised_value = state.appraised_value();
    let deduction = state.deduction();
    let selected_rates = ltv::select_rates(&state.rate_inputs);
    let floor = extract::floor_from_address(&state.address);

    let evaluation = Evaluation {
        appraised_value,
        price_text: state.price_input.trim().to_string(),
        deduction,
        floor,
        tier: PriceTier::from_floor(floor),
        totals: LoanTotals::from_lines(&lines),
        results: ltv::evaluate(appraised_value, deduction, &lines, &selected_rates),
        fees: compute_fees(&state.fee_inputs),
        selected_rates,
    };
    log::debug!(
        "Recomputed form for '{}': value={} deduction={} rates={:?}",
        state.customer_name,
        appraised_value,
        deduction,
        evaluation.selected_rates
    );

    state.evaluation = evaluation;
    state.summary = compose_summary(&state.to_record(), &state.evaluation);
    state
}
