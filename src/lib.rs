//! LTV desk.
//!
//! Computes loan-to-value lending limits for real-estate-backed loans,
//! pre-fills the inputs from a property-registry document, and keeps one
//! record per customer in a Notion workspace.
//!
//! The computation core ([`number`], [`ltv`], [`reconcile`], [`summary`],
//! [`fees`]) is pure. [`Desk`] owns the mutable [`FormState`] and a
//! [`RecordStore`], and is what an interactive front end drives.
//!
//! # Quick start
//!
//! ```no_run
//! use ltv_desk::{Desk, FieldEdit, LoanStatus};
//!
//! let mut desk = Desk::builder().build().unwrap();
//! desk.refresh().unwrap();
//!
//! desk.edit(FieldEdit::Price("5억".into())).unwrap();
//! desk.edit(FieldEdit::Deduction("2,000".into())).unwrap();
//! desk.edit(FieldEdit::FaceAmount(0, "10,000".into())).unwrap();
//! desk.edit(FieldEdit::Status(0, LoanStatus::Maintained)).unwrap();
//! println!("{}", desk.form().summary);
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod config;
pub mod connection;
pub mod error;
pub mod extract;
pub mod fees;
pub mod form;
pub mod ltv;
pub mod models;
pub mod number;
pub mod query_builder;
pub mod reconcile;
pub mod snapshot;
pub mod store;
pub mod summary;

#[cfg(feature = "async")]
pub use async_client::AsyncDesk;
pub use connection::Connection;
pub use error::{LtvError, Result};
pub use extract::RegistryExtract;
pub use form::{recompute_all, FieldEdit, FormState};
pub use models::{CustomerRecord, LoanLine, LoanStatus};
pub use query_builder::QueryBuilder;
pub use snapshot::CustomerSnapshot;
pub use store::{MemoryStore, NotionStore, RecordStore};

use chrono::Local;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{ConfigFile, StoreConfig};

// ---------------------------------------------------------------------------
// DeskBuilder
// ---------------------------------------------------------------------------

/// Builder for a [`Desk`] backed by Notion.
///
/// Settings are resolved in order: values set on the builder, then the
/// `NOTION_TOKEN` / `NOTION_DB_ID` / `NOTION_LOAN_DB_ID` environment
/// variables, then the JSON config file.
#[derive(Default)]
pub struct DeskBuilder {
    token: Option<String>,
    customer_database_id: Option<String>,
    loan_database_id: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    config_path: Option<PathBuf>,
}

impl DeskBuilder {
    /// Set the Notion integration token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the id of the customer database.
    pub fn customer_database(mut self, id: impl Into<String>) -> Self {
        self.customer_database_id = Some(id.into());
        self
    }

    /// Set the id of the loan-line database.
    pub fn loan_database(mut self, id: impl Into<String>) -> Self {
        self.loan_database_id = Some(id.into());
        self
    }

    /// Override the API base URL (defaults to the public Notion API).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read the config file from `path` instead of the platform default
    /// (e.g. `~/.config/ltv-desk/config.json` on Linux).
    pub fn config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Resolve the store settings without connecting.
    pub fn resolve(&self) -> Result<StoreConfig> {
        let path = self
            .config_path
            .clone()
            .unwrap_or_else(config::default_config_path);
        let file = ConfigFile::load(&path)?;

        let overrides = |key: &str| -> Option<String> {
            match key {
                config::TOKEN_ENV => self.token.clone(),
                config::CUSTOMER_DB_ENV => self.customer_database_id.clone(),
                config::LOAN_DB_ENV => self.loan_database_id.clone(),
                _ => None,
            }
        };
        let mut resolved = StoreConfig::resolve_with(&file, |key| {
            overrides(key).or_else(|| std::env::var(key).ok())
        })?;

        if let Some(url) = &self.base_url {
            resolved.base_url = url.clone();
        }
        if let Some(timeout) = self.timeout {
            resolved.timeout = timeout;
        }
        Ok(resolved)
    }

    /// Build the desk. No request is made until the first store operation.
    pub fn build(self) -> Result<Desk<NotionStore>> {
        let resolved = self.resolve()?;
        Ok(Desk::new(NotionStore::new(resolved)))
    }
}

// ---------------------------------------------------------------------------
// SaveChoice
// ---------------------------------------------------------------------------

/// How to resolve a save whose customer name already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChoice {
    /// Replace the stored record with the current form.
    Overwrite,
    /// Keep the stored record and save the form under a fresh name.
    AddNew,
}

// ---------------------------------------------------------------------------
// Desk
// ---------------------------------------------------------------------------

/// One operator session: the form, its store, and the last customer fetch.
///
/// Every edit is followed by a full [`recompute_all`] pass. Store failures
/// are returned to the caller and leave the form untouched.
pub struct Desk<S: RecordStore> {
    store: S,
    form: FormState,
    snapshot: CustomerSnapshot,
    loaded: Option<String>,
}

impl Desk<NotionStore> {
    /// Create a new builder for a Notion-backed desk.
    pub fn builder() -> DeskBuilder {
        DeskBuilder::default()
    }
}

impl<S: RecordStore> Desk<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            form: FormState::default(),
            snapshot: CustomerSnapshot::new(),
            loaded: None,
        }
    }

    // -- Form ---------------------------------------------------------------

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Apply one operator edit and recompute.
    pub fn edit(&mut self, edit: FieldEdit) -> Result<()> {
        self.form.apply(edit)?;
        self.recompute();
        Ok(())
    }

    /// Pre-fill from a registry document and recompute.
    pub fn ingest_registry(&mut self, extract: &RegistryExtract) {
        self.form.ingest_registry(extract);
        self.recompute();
    }

    /// Clear the form back to defaults.
    pub fn reset(&mut self) {
        self.form = FormState::default();
        self.loaded = None;
    }

    fn recompute(&mut self) {
        let form = std::mem::take(&mut self.form);
        self.form = recompute_all(form);
    }

    // -- Store --------------------------------------------------------------

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshot(&self) -> &CustomerSnapshot {
        &self.snapshot
    }

    /// Name of the customer the form was loaded from, if any.
    pub fn loaded_customer(&self) -> Option<&str> {
        self.loaded.as_deref()
    }

    /// Re-fetch every customer from the store.
    pub fn refresh(&mut self) -> Result<()> {
        let records = self.store.fetch_all()?;
        log::debug!("Refreshed snapshot with {} customers", records.len());
        self.snapshot.replace(records);
        Ok(())
    }

    /// Customer names from the last refresh.
    pub fn customer_names(&self) -> Vec<String> {
        self.snapshot.names()
    }

    /// Replace the form with a stored customer. Loan lines are taken as
    /// stored, without re-deriving face amounts or principals.
    pub fn load(&mut self, name: &str) -> Result<()> {
        let record = self
            .snapshot
            .get(name)
            .ok_or_else(|| LtvError::NotFound(format!("Customer '{}'", name)))?;
        self.form = recompute_all(FormState::from_record(record));
        self.loaded = Some(name.to_string());
        Ok(())
    }

    /// Archive a customer and its loan lines.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        self.store.delete_record(name)?;
        self.snapshot.remove(name);
        if self.loaded.as_deref() == Some(name) {
            self.loaded = None;
        }
        Ok(())
    }

    fn record_for_save(&self) -> Result<CustomerRecord> {
        let mut record = self.form.to_record();
        if record.name.is_empty() {
            return Err(LtvError::InvalidArgument(
                "Customer name is empty".to_string(),
            ));
        }
        record.saved_at = Some(Local::now().into());
        Ok(record)
    }

    /// Save the form as a new customer.
    ///
    /// Fails with [`LtvError::Conflict`] when the name already exists; the
    /// caller then decides via [`resolve_conflict`](Self::resolve_conflict).
    pub fn save_as_new(&mut self) -> Result<()> {
        let record = self.record_for_save()?;
        self.store.create_record(&record)?;
        self.loaded = Some(record.name.clone());
        self.snapshot.upsert(record);
        Ok(())
    }

    /// Overwrite the stored customer with the form.
    ///
    /// Targets the customer the form was loaded from, so a renamed form
    /// renames the stored record; otherwise the form's own name.
    pub fn update(&mut self) -> Result<()> {
        let record = self.record_for_save()?;
        let target = self.loaded.clone().unwrap_or_else(|| record.name.clone());
        self.store.update_record(&target, &record)?;
        self.snapshot.remove(&target);
        self.loaded = Some(record.name.clone());
        self.snapshot.upsert(record);
        Ok(())
    }

    /// Finish a save that hit a duplicate name.
    ///
    /// `AddNew` refreshes the snapshot first and saves under the first free
    /// `"{name} (n)"`. Returns the name the record was saved under.
    pub fn resolve_conflict(&mut self, choice: SaveChoice) -> Result<String> {
        let record = self.record_for_save()?;
        match choice {
            SaveChoice::Overwrite => {
                self.store.update_record(&record.name, &record)?;
                let name = record.name.clone();
                self.loaded = Some(name.clone());
                self.snapshot.upsert(record);
                Ok(name)
            }
            SaveChoice::AddNew => {
                self.refresh()?;
                let name = self.snapshot.next_free_name(&record.name);
                self.form.apply(FieldEdit::CustomerName(name.clone()))?;
                self.recompute();
                self.save_as_new()?;
                Ok(name)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl<S: RecordStore> fmt::Display for Desk<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Desk(customer={:?}, lines={}, rates={:?}, snapshot={})",
            self.form.customer_name,
            self.form.line_count,
            self.form.evaluation.selected_rates,
            self.snapshot.len()
        )
    }
}
