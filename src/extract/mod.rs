//! Field extraction from property-registry (등기부등본) text.
//!
//! Best-effort regex scraping only: every extractor returns an empty or
//! `None` value when its pattern is absent.

pub mod pdf;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::CoOwner;

static BUILDING_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[집합건물\]\s*([^\n]+)").unwrap());
static LOCATION_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"소재지\s*[:：]?\s*([^\n]+)").unwrap());
static AREA: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+\.\d+)\s*㎡").unwrap());
static FLOOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"제(\d+)층").unwrap());
static OWNER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([가-힣]+) \((?:공유자|소유자)\)").unwrap());
static BIRTH_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{6})-").unwrap());

/// Marker that opens the summary-of-registered-rights section.
pub const SUMMARY_MARKER: &str = "주요 등기사항 요약";

/// Address from the `[집합건물]` header, falling back to a `소재지` field.
pub fn extract_address(text: &str) -> String {
    BUILDING_ADDRESS
        .captures(text)
        .or_else(|| LOCATION_ADDRESS.captures(text))
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default()
}

/// Last decimal area in the document, with its `㎡` suffix.
pub fn extract_area(text: &str) -> String {
    let flat = text.replace('\n', " ");
    AREA.captures_iter(&flat)
        .last()
        .map(|caps| format!("{}㎡", &caps[1]))
        .unwrap_or_default()
}

/// Floor number from the last `제N층` in an address.
pub fn floor_from_address(address: &str) -> Option<u32> {
    FLOOR
        .captures_iter(address)
        .last()
        .and_then(|caps| caps[1].parse().ok())
}

/// Owners listed in the rights summary, each paired with the birth-date
/// prefix on the following line. Owners without that line are skipped.
pub fn extract_co_owners(text: &str) -> Vec<CoOwner> {
    let Some(start) = text.find(SUMMARY_MARKER) else {
        return Vec::new();
    };
    let lines: Vec<&str> = text[start..]
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut owners = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let Some(name) = OWNER_LINE.captures(line) else {
            continue;
        };
        let birth = lines
            .get(i + 1)
            .and_then(|next| BIRTH_LINE.captures(next))
            .map(|caps| caps[1].to_string());
        if let Some(birth) = birth {
            owners.push(CoOwner {
                name: name[1].to_string(),
                birth,
            });
        }
    }
    owners
}

/// Customer-name placeholder built from the first owner: `"{name}  {birth}"`.
pub fn default_customer_name(owners: &[CoOwner]) -> String {
    owners
        .first()
        .map(|o| format!("{}  {}", o.name, o.birth))
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// PriceTier
// ---------------------------------------------------------------------------

/// Which KB price tier applies to the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PriceTier {
    /// Low floors (2nd and below) are priced at the lower bound.
    Discounted,
    #[default]
    Standard,
}

impl PriceTier {
    pub fn from_floor(floor: Option<u32>) -> Self {
        match floor {
            Some(f) if f <= 2 => PriceTier::Discounted,
            _ => PriceTier::Standard,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriceTier::Discounted => "하안가",
            PriceTier::Standard => "일반가",
        }
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// RegistryExtract
// ---------------------------------------------------------------------------

/// Everything the desk pre-fills from a registry document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RegistryExtract {
    pub address: String,
    pub area: String,
    pub floor: Option<u32>,
    pub co_owners: Vec<CoOwner>,
    #[serde(default)]
    pub external_links: Vec<String>,
    #[serde(default)]
    pub page_count: usize,
}

impl RegistryExtract {
    pub fn from_text(text: &str) -> Self {
        let address = extract_address(text);
        let floor = floor_from_address(&address);
        Self {
            area: extract_area(text),
            floor,
            co_owners: extract_co_owners(text),
            address,
            external_links: Vec::new(),
            page_count: 0,
        }
    }

    /// Extract from raw PDF bytes, keeping the document's external links.
    pub fn from_pdf(bytes: &[u8]) -> crate::error::Result<Self> {
        let document = pdf::read_document(bytes)?;
        let mut extract = Self::from_text(&document.text);
        extract.external_links = document.external_links;
        extract.page_count = document.page_count;
        Ok(extract)
    }
}
