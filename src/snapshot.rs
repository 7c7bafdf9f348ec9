//! Last fetched copy of the customer store.
//!
//! The desk loads records from this snapshot rather than hitting the store
//! on every selection. It is replaced wholesale on refresh and patched
//! locally after each successful save or delete.

use chrono::{DateTime, Local};
use std::collections::BTreeMap;

use crate::models::CustomerRecord;

#[derive(Debug, Default)]
pub struct CustomerSnapshot {
    records: BTreeMap<String, CustomerRecord>,
    fetched_at: Option<DateTime<Local>>,
}

impl CustomerSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole snapshot with a fresh fetch.
    pub fn replace(&mut self, records: BTreeMap<String, CustomerRecord>) {
        self.records = records;
        self.fetched_at = Some(Local::now());
    }

    /// When the snapshot was last replaced, if ever.
    pub fn fetched_at(&self) -> Option<DateTime<Local>> {
        self.fetched_at
    }

    pub fn names(&self) -> Vec<String> {
        self.records.keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<&CustomerRecord> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn upsert(&mut self, record: CustomerRecord) {
        self.records.insert(record.name.clone(), record);
    }

    pub fn remove(&mut self, name: &str) -> Option<CustomerRecord> {
        self.records.remove(name)
    }

    /// First `"{base} (n)"`, counting from 2, that is not in the snapshot.
    pub fn next_free_name(&self, base: &str) -> String {
        (2..)
            .map(|n| format!("{} ({})", base, n))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }
}
