//! Tests for store settings resolution and the region deduction table.

use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

use ltv_desk::config::{
    region_deduction, region_deductions, ConfigFile, StoreConfig, API_BASE, DEFAULT_TIMEOUT,
};
use ltv_desk::{Desk, LtvError};
use tempfile::NamedTempFile;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

fn write_config(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

#[test]
fn region_table() {
    assert_eq!(region_deductions().len(), 4);
    assert_eq!(region_deduction("서울특별시"), 5500);
    assert_eq!(region_deduction(" 그 밖의 지역 "), 2500);
    assert_eq!(region_deduction(""), 0);
    assert_eq!(region_deduction("제주"), 0);
}

// ---------------------------------------------------------------------------
// ConfigFile
// ---------------------------------------------------------------------------

#[test]
fn missing_file_is_empty_config() {
    let dir = tempfile::tempdir().unwrap();
    let file = ConfigFile::load(&dir.path().join("config.json")).unwrap();
    assert!(file.token.is_none());
    assert!(file.base_url.is_none());
}

#[test]
fn malformed_file_is_an_error() {
    let tmp = write_config("{ not json");
    assert!(matches!(
        ConfigFile::load(tmp.path()),
        Err(LtvError::Json(_))
    ));
}

// ---------------------------------------------------------------------------
// StoreConfig
// ---------------------------------------------------------------------------

#[test]
fn environment_wins_over_file() {
    let file = ConfigFile {
        token: Some("file-token".into()),
        customer_database_id: Some("file-cust".into()),
        loan_database_id: Some("file-loan".into()),
        base_url: Some("http://localhost:9999".into()),
        timeout_secs: Some(5),
    };
    let config = StoreConfig::resolve_with(
        &file,
        env(&[("NOTION_TOKEN", "env-token"), ("NOTION_DB_ID", " ")]),
    )
    .unwrap();

    assert_eq!(config.token, "env-token");
    assert_eq!(config.customer_database_id, "file-cust");
    assert_eq!(config.loan_database_id, "file-loan");
    assert_eq!(config.base_url, "http://localhost:9999");
    assert_eq!(config.timeout, Duration::from_secs(5));
}

#[test]
fn defaults_for_optional_settings() {
    let config = StoreConfig::resolve_with(
        &ConfigFile::default(),
        env(&[
            ("NOTION_TOKEN", "t"),
            ("NOTION_DB_ID", "c"),
            ("NOTION_LOAN_DB_ID", "l"),
        ]),
    )
    .unwrap();
    assert_eq!(config.base_url, API_BASE);
    assert_eq!(config.timeout, DEFAULT_TIMEOUT);
}

#[test]
fn missing_setting_is_config_error() {
    let err = StoreConfig::resolve_with(
        &ConfigFile::default(),
        env(&[("NOTION_TOKEN", "t"), ("NOTION_DB_ID", "c")]),
    )
    .unwrap_err();
    match err {
        LtvError::Config(message) => assert!(message.contains("NOTION_LOAN_DB_ID")),
        other => panic!("expected Config error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// DeskBuilder
// ---------------------------------------------------------------------------

#[test]
fn builder_values_override_file() {
    let tmp = write_config(
        r#"{
            "token": "file-token",
            "customer_database_id": "file-cust",
            "loan_database_id": "file-loan",
            "timeout_secs": 7
        }"#,
    );
    let config = Desk::builder()
        .config_path(tmp.path())
        .token("builder-token")
        .base_url("http://127.0.0.1:1")
        .resolve()
        .unwrap();

    assert_eq!(config.token, "builder-token");
    assert_eq!(config.loan_database_id, "file-loan");
    assert_eq!(config.base_url, "http://127.0.0.1:1");
    assert_eq!(config.timeout, Duration::from_secs(7));
}

#[test]
fn builder_builds_without_network() {
    let dir = tempfile::tempdir().unwrap();
    let desk = Desk::builder()
        .config_path(dir.path().join("none.json"))
        .token("t")
        .customer_database("c")
        .loan_database("l")
        .timeout(Duration::from_secs(1))
        .build()
        .unwrap();
    assert_eq!(desk.store().connection().config.customer_database_id, "c");
    assert_eq!(desk.form().line_count, 3);
}
