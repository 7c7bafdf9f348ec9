//! Customer record persistence.
//!
//! [`RecordStore`] is the seam between the desk and wherever records live.
//! [`NotionStore`] talks to the Notion API; [`MemoryStore`] keeps records in
//! process and backs the tests.

pub mod memory;
pub mod notion;
pub mod properties;

pub use memory::MemoryStore;
pub use notion::NotionStore;

use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::CustomerRecord;

/// Customer records keyed by customer name.
///
/// Methods take `&self`; implementations use interior mutability. Only one
/// writer per name is assumed: `create_record` checks for an existing name
/// before writing, and nothing guards the gap between check and write.
pub trait RecordStore {
    /// Names of every stored customer, sorted.
    fn list_customer_names(&self) -> Result<Vec<String>> {
        Ok(self.fetch_all()?.into_keys().collect())
    }

    /// Every stored record, loan lines included.
    fn fetch_all(&self) -> Result<BTreeMap<String, CustomerRecord>>;

    /// Store a new record. Fails with `LtvError::Conflict` if the name exists.
    fn create_record(&self, record: &CustomerRecord) -> Result<()>;

    /// Replace the record stored under `name`. Fails with
    /// `LtvError::NotFound` if there is none. `record.name` may differ from
    /// `name`, which renames the customer.
    fn update_record(&self, name: &str, record: &CustomerRecord) -> Result<()>;

    /// Archive the record and its loan lines. Fails with
    /// `LtvError::NotFound` if there is none.
    fn delete_record(&self, name: &str) -> Result<()>;
}
