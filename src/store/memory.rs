//! In-process record store.

use std::cell::RefCell;
use std::collections::BTreeMap;

use super::RecordStore;
use crate::error::{LtvError, Result};
use crate::models::CustomerRecord;

/// Keeps records in a map for the lifetime of the value. Deleted records
/// are moved to an archive rather than dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<BTreeMap<String, CustomerRecord>>,
    archived: RefCell<Vec<CustomerRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records removed by [`RecordStore::delete_record`], oldest first.
    pub fn archived(&self) -> Vec<CustomerRecord> {
        self.archived.borrow().clone()
    }
}

impl RecordStore for MemoryStore {
    fn fetch_all(&self) -> Result<BTreeMap<String, CustomerRecord>> {
        Ok(self.records.borrow().clone())
    }

    fn create_record(&self, record: &CustomerRecord) -> Result<()> {
        let mut records = self.records.borrow_mut();
        if records.contains_key(&record.name) {
            return Err(LtvError::Conflict(format!(
                "Customer '{}' already exists",
                record.name
            )));
        }
        records.insert(record.name.clone(), record.clone());
        Ok(())
    }

    fn update_record(&self, name: &str, record: &CustomerRecord) -> Result<()> {
        let mut records = self.records.borrow_mut();
        if !records.contains_key(name) {
            return Err(LtvError::NotFound(format!("Customer '{}'", name)));
        }
        if record.name != name && records.contains_key(&record.name) {
            return Err(LtvError::Conflict(format!(
                "Customer '{}' already exists",
                record.name
            )));
        }
        records.remove(name);
        records.insert(record.name.clone(), record.clone());
        Ok(())
    }

    fn delete_record(&self, name: &str) -> Result<()> {
        let removed = self
            .records
            .borrow_mut()
            .remove(name)
            .ok_or_else(|| LtvError::NotFound(format!("Customer '{}'", name)))?;
        self.archived.borrow_mut().push(removed);
        Ok(())
    }
}
