use crate::error::{LtvError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const API_BASE: &str = "https://api.notion.com/v1";
pub const NOTION_VERSION: &str = "2022-06-28";
pub const PAGE_SIZE: usize = 100;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const TOKEN_ENV: &str = "NOTION_TOKEN";
pub const CUSTOMER_DB_ENV: &str = "NOTION_DB_ID";
pub const LOAN_DB_ENV: &str = "NOTION_LOAN_DB_ID";

// Form defaults
pub const DEFAULT_RATIO_PERCENT: i64 = 120;
pub const DEFAULT_RATE_INPUTS: [&str; 2] = ["80", ""];
pub const DEFAULT_LINE_COUNT: usize = 3;
pub const MIN_LINE_COUNT: usize = 1;
pub const MAX_LINE_COUNT: usize = 10;
pub const DEFAULT_CONSULT_RATE: f64 = 1.5;
pub const DEFAULT_BRIDGE_RATE: f64 = 0.7;

/// Regional small-tenant priority deductions (방공제), in 만.
///
/// Ordered the way the region picker lists them.
pub fn region_deductions() -> &'static [(&'static str, i64)] {
    &[
        ("서울특별시", 5500),
        ("과밀억제권역 (세종, 용인, 화성, 김포 포함)", 4800),
        ("광역시 (안산, 광주, 파주, 이천, 평택 포함)", 2800),
        ("그 밖의 지역", 2500),
    ]
}

/// Default deduction for a region name, or 0 when the region is unknown or blank.
pub fn region_deduction(region: &str) -> i64 {
    region_deductions()
        .iter()
        .find(|(name, _)| *name == region.trim())
        .map(|(_, amount)| *amount)
        .unwrap_or(0)
}

pub fn default_config_path() -> PathBuf {
    if let Some(dir) = dirs::config_dir() {
        dir.join("ltv-desk").join("config.json")
    } else {
        PathBuf::from(".ltv-desk.json")
    }
}

// ---------------------------------------------------------------------------
// StoreConfig
// ---------------------------------------------------------------------------

/// On-disk shape of `config.json`. Every key is optional; environment
/// variables take precedence over whatever the file holds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConfigFile {
    pub token: Option<String>,
    pub customer_database_id: Option<String>,
    pub loan_database_id: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    /// Read a config file. A missing file yields the empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Resolved connection settings for the Notion-backed record store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub token: String,
    pub customer_database_id: String,
    pub loan_database_id: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl StoreConfig {
    /// Resolve settings from the process environment, falling back to `file`.
    pub fn resolve(file: &ConfigFile) -> Result<Self> {
        Self::resolve_with(file, |key| std::env::var(key).ok())
    }

    /// Resolve settings using `lookup` in place of the process environment.
    pub fn resolve_with<F>(file: &ConfigFile, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |env_key: &str, from_file: &Option<String>| -> Option<String> {
            lookup(env_key)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| from_file.clone())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let token = pick(TOKEN_ENV, &file.token)
            .ok_or_else(|| LtvError::Config(format!("{} is not set", TOKEN_ENV)))?;
        let customer_database_id = pick(CUSTOMER_DB_ENV, &file.customer_database_id)
            .ok_or_else(|| LtvError::Config(format!("{} is not set", CUSTOMER_DB_ENV)))?;
        let loan_database_id = pick(LOAN_DB_ENV, &file.loan_database_id)
            .ok_or_else(|| LtvError::Config(format!("{} is not set", LOAN_DB_ENV)))?;

        Ok(Self {
            token,
            customer_database_id,
            loan_database_id,
            base_url: file
                .base_url
                .clone()
                .unwrap_or_else(|| API_BASE.to_string()),
            timeout: file
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
        })
    }
}
