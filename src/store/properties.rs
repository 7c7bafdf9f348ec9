//! Mapping between desk records and Notion page properties.
//!
//! Customers live in one database keyed by the `고객명` title; each loan line
//! is a page in a second database, linked back through the `고객` relation
//! and ordered by `순번`.

use chrono::DateTime;
use serde_json::{json, Value};

use crate::models::{CoOwner, CustomerRecord, FeeInputs, LoanLine, LoanStatus};

/// Notion caps a single rich-text segment at this many characters.
pub const RICH_TEXT_LIMIT: usize = 2000;

/// Property names in the customer database.
pub mod customer {
    pub const NAME: &str = "고객명";
    pub const ADDRESS: &str = "주소";
    pub const REGION: &str = "방공제 지역";
    pub const DEDUCTION: &str = "방공제 금액";
    pub const PRICE: &str = "KB시세";
    pub const AREA: &str = "전용면적";
    pub const RATE_1: &str = "LTV비율1";
    pub const RATE_2: &str = "LTV비율2";
    pub const MEMO: &str = "메모";
    pub const CO_OWNERS: &str = "공유자";
    pub const CONSULT_AMOUNT: &str = "컨설팅 금액";
    pub const CONSULT_RATE: &str = "컨설팅 수수료율";
    pub const BRIDGE_AMOUNT: &str = "브릿지 금액";
    pub const BRIDGE_RATE: &str = "브릿지 수수료율";
    pub const SAVED_AT: &str = "저장시각";
}

/// Property names in the loan-line database.
pub mod loan {
    pub const LENDER: &str = "설정자";
    pub const FACE_AMOUNT: &str = "채권최고액";
    pub const RATIO: &str = "설정비율";
    pub const PRINCIPAL: &str = "원금";
    pub const STATUS: &str = "진행구분";
    pub const ORDER: &str = "순번";
    pub const CUSTOMER: &str = "고객";
}

// ---------------------------------------------------------------------------
// Property value builders
// ---------------------------------------------------------------------------

fn text_segments(content: &str) -> Vec<Value> {
    let chars: Vec<char> = content.chars().collect();
    chars
        .chunks(RICH_TEXT_LIMIT)
        .map(|chunk| {
            let piece: String = chunk.iter().collect();
            json!({ "text": { "content": piece } })
        })
        .collect()
}

pub fn title(content: &str) -> Value {
    json!({ "title": text_segments(content) })
}

pub fn rich_text(content: &str) -> Value {
    json!({ "rich_text": text_segments(content) })
}

pub fn number_i64(value: i64) -> Value {
    json!({ "number": value })
}

pub fn number_f64(value: f64) -> Value {
    json!({ "number": value })
}

// ---------------------------------------------------------------------------
// Property value readers
// ---------------------------------------------------------------------------

fn joined_text(segments: Option<&Value>) -> Option<String> {
    let segments = segments?.as_array()?;
    Some(
        segments
            .iter()
            .filter_map(|s| {
                s.get("plain_text")
                    .and_then(Value::as_str)
                    .or_else(|| s.pointer("/text/content").and_then(Value::as_str))
            })
            .collect(),
    )
}

/// Plain text of a `title` or `rich_text` property; empty when absent.
pub fn read_text(props: &Value, name: &str) -> String {
    let Some(prop) = props.get(name) else {
        return String::new();
    };
    joined_text(prop.get("title"))
        .or_else(|| joined_text(prop.get("rich_text")))
        .unwrap_or_default()
}

pub fn read_i64(props: &Value, name: &str) -> Option<i64> {
    let number = props.get(name)?.get("number")?;
    number
        .as_i64()
        .or_else(|| number.as_f64().map(|f| f.trunc() as i64))
}

pub fn read_f64(props: &Value, name: &str) -> Option<f64> {
    props.get(name)?.get("number")?.as_f64()
}

fn read_select(props: &Value, name: &str) -> Option<String> {
    props
        .get(name)?
        .pointer("/select/name")?
        .as_str()
        .map(str::to_string)
}

fn read_date(props: &Value, name: &str) -> Option<String> {
    props
        .get(name)?
        .pointer("/date/start")?
        .as_str()
        .map(str::to_string)
}

fn read_relation_ids(props: &Value, name: &str) -> Vec<String> {
    props
        .get(name)
        .and_then(|p| p.get("relation"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|r| r.get("id").and_then(Value::as_str).map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Co-owner text
// ---------------------------------------------------------------------------

/// One `name,birth` pair per line.
pub fn co_owners_to_text(owners: &[CoOwner]) -> String {
    owners
        .iter()
        .map(|o| format!("{},{}", o.name, o.birth))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn co_owners_from_text(text: &str) -> Vec<CoOwner> {
    text.lines()
        .filter_map(|line| {
            let (name, birth) = line.split_once(',')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some(CoOwner {
                name: name.to_string(),
                birth: birth.trim().to_string(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Customer pages
// ---------------------------------------------------------------------------

/// Properties for a customer page. Loan lines are written separately.
pub fn customer_properties(record: &CustomerRecord) -> Value {
    let rate = |slot: usize| record.rate_inputs.get(slot).cloned().unwrap_or_default();
    let mut props = json!({
        (customer::NAME): title(&record.name),
        (customer::ADDRESS): rich_text(&record.address),
        (customer::REGION): rich_text(&record.region),
        (customer::DEDUCTION): number_i64(record.deduction),
        (customer::PRICE): number_i64(record.appraised_value),
        (customer::AREA): rich_text(&record.area_text),
        (customer::RATE_1): rich_text(&rate(0)),
        (customer::RATE_2): rich_text(&rate(1)),
        (customer::MEMO): rich_text(&record.summary_text),
        (customer::CO_OWNERS): rich_text(&co_owners_to_text(&record.co_owners)),
        (customer::CONSULT_AMOUNT): number_i64(record.fees.consult_amount),
        (customer::CONSULT_RATE): number_f64(record.fees.consult_rate),
        (customer::BRIDGE_AMOUNT): number_i64(record.fees.bridge_amount),
        (customer::BRIDGE_RATE): number_f64(record.fees.bridge_rate),
    });
    if let (Some(saved_at), Some(map)) = (record.saved_at, props.as_object_mut()) {
        map.insert(
            customer::SAVED_AT.to_string(),
            json!({ "date": { "start": saved_at.to_rfc3339() } }),
        );
    }
    props
}

/// Read a customer page. Returns `None` for pages without a name.
pub fn customer_from_page(page: &Value) -> Option<CustomerRecord> {
    let props = page.get("properties")?;
    let name = read_text(props, customer::NAME).trim().to_string();
    if name.is_empty() {
        return None;
    }

    let rate_inputs = vec![
        read_text(props, customer::RATE_1),
        read_text(props, customer::RATE_2),
    ];
    let defaults = FeeInputs::default();

    Some(CustomerRecord {
        name,
        address: read_text(props, customer::ADDRESS),
        region: read_text(props, customer::REGION),
        deduction: read_i64(props, customer::DEDUCTION).unwrap_or(0),
        appraised_value: read_i64(props, customer::PRICE).unwrap_or(0),
        area_text: read_text(props, customer::AREA),
        selected_rates: crate::ltv::select_rates(&rate_inputs),
        rate_inputs,
        loan_lines: Vec::new(),
        fees: FeeInputs {
            consult_amount: read_i64(props, customer::CONSULT_AMOUNT).unwrap_or(0),
            consult_rate: read_f64(props, customer::CONSULT_RATE).unwrap_or(defaults.consult_rate),
            bridge_amount: read_i64(props, customer::BRIDGE_AMOUNT).unwrap_or(0),
            bridge_rate: read_f64(props, customer::BRIDGE_RATE).unwrap_or(defaults.bridge_rate),
        },
        co_owners: co_owners_from_text(&read_text(props, customer::CO_OWNERS)),
        summary_text: read_text(props, customer::MEMO),
        saved_at: read_date(props, customer::SAVED_AT)
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok()),
    })
}

// ---------------------------------------------------------------------------
// Loan-line pages
// ---------------------------------------------------------------------------

/// A loan line read back from the store, with its owner and position.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredLoanLine {
    pub customer_page_ids: Vec<String>,
    pub order: i64,
    pub line: LoanLine,
}

pub fn loan_properties(line: &LoanLine, order: usize, customer_page_id: &str) -> Value {
    json!({
        (loan::LENDER): title(&line.lender),
        (loan::FACE_AMOUNT): number_i64(line.face_amount),
        (loan::RATIO): number_i64(line.ratio_percent),
        (loan::PRINCIPAL): number_i64(line.principal),
        (loan::STATUS): { "select": { "name": line.status.label() } },
        (loan::ORDER): number_i64(order as i64),
        (loan::CUSTOMER): { "relation": [ { "id": customer_page_id } ] },
    })
}

pub fn loan_from_page(page: &Value) -> Option<StoredLoanLine> {
    let props = page.get("properties")?;
    let defaults = LoanLine::default();
    let status = read_select(props, loan::STATUS)
        .and_then(|s| LoanStatus::from_label(&s))
        .unwrap_or(defaults.status);

    Some(StoredLoanLine {
        customer_page_ids: read_relation_ids(props, loan::CUSTOMER),
        order: read_i64(props, loan::ORDER).unwrap_or(0),
        line: LoanLine {
            lender: read_text(props, loan::LENDER),
            face_amount: read_i64(props, loan::FACE_AMOUNT).unwrap_or(0),
            ratio_percent: read_i64(props, loan::RATIO).unwrap_or(defaults.ratio_percent),
            principal: read_i64(props, loan::PRINCIPAL).unwrap_or(0),
            status,
        },
    })
}
