//! Async wrapper around [`Desk`] for use in async runtimes (Tokio, etc.).
//!
//! Runs every desk operation on the blocking thread pool via
//! [`tokio::task::spawn_blocking`]; the blocking `reqwest` client must not
//! run on the async event loop.
//!
//! # Example
//!
//! ```no_run
//! use ltv_desk::{AsyncDesk, FieldEdit};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let desk = AsyncDesk::builder().build().await.unwrap();
//!     desk.refresh().await.unwrap();
//!
//!     let summary = desk
//!         .run(|d| {
//!             d.edit(FieldEdit::Price("5억".into()))?;
//!             Ok(d.form().summary.clone())
//!         })
//!         .await
//!         .unwrap();
//!     println!("{summary}");
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{LtvError, Result};
use crate::store::{NotionStore, RecordStore};
use crate::{Desk, FormState, SaveChoice};

// ---------------------------------------------------------------------------
// AsyncDeskBuilder
// ---------------------------------------------------------------------------

/// Builder for a Notion-backed [`AsyncDesk`].
#[derive(Default)]
pub struct AsyncDeskBuilder {
    token: Option<String>,
    customer_database_id: Option<String>,
    loan_database_id: Option<String>,
    timeout: Option<Duration>,
    config_path: Option<PathBuf>,
}

impl AsyncDeskBuilder {
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

    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read the config file from `path`.
    pub fn config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Build the async desk.
    ///
    /// Config resolution reads a file, so it runs on the blocking pool.
    pub async fn build(self) -> Result<AsyncDesk<NotionStore>> {
        tokio::task::spawn_blocking(move || {
            let mut builder = Desk::builder();
            if let Some(token) = self.token {
                builder = builder.token(token);
            }
            if let Some(id) = self.customer_database_id {
                builder = builder.customer_database(id);
            }
            if let Some(id) = self.loan_database_id {
                builder = builder.loan_database(id);
            }
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            if let Some(path) = self.config_path {
                builder = builder.config_path(path);
            }
            Ok(AsyncDesk::new(builder.build()?))
        })
        .await
        .map_err(|e| LtvError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncDesk
// ---------------------------------------------------------------------------

/// Async wrapper around [`Desk`].
///
/// The desk is protected by a [`Mutex`] since its store uses `RefCell`
/// internally; operations are serialized.
pub struct AsyncDesk<S: RecordStore + Send + 'static> {
    inner: Arc<Mutex<Desk<S>>>,
}

impl<S: RecordStore + Send + 'static> Clone for AsyncDesk<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl AsyncDesk<NotionStore> {
    /// Create a new builder for a Notion-backed async desk.
    pub fn builder() -> AsyncDeskBuilder {
        AsyncDeskBuilder::default()
    }
}

impl<S: RecordStore + Send + 'static> AsyncDesk<S> {
    /// Wrap an existing desk.
    pub fn new(desk: Desk<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(desk)),
        }
    }

    /// Run a sync desk operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Desk<S>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let desk = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = desk
                .lock()
                .map_err(|_| LtvError::InvalidArgument("Desk lock poisoned".into()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| LtvError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Re-fetch every customer from the store.
    pub async fn refresh(&self) -> Result<()> {
        self.run(|d| d.refresh()).await
    }

    /// Customer names from the last refresh.
    pub async fn customer_names(&self) -> Result<Vec<String>> {
        self.run(|d| Ok(d.customer_names())).await
    }

    /// Load a customer into the form and return the resulting state.
    pub async fn load(&self, name: &str) -> Result<FormState> {
        let name = name.to_string();
        self.run(move |d| {
            d.load(&name)?;
            Ok(d.form().clone())
        })
        .await
    }

    pub async fn save_as_new(&self) -> Result<()> {
        self.run(|d| d.save_as_new()).await
    }

    pub async fn update(&self) -> Result<()> {
        self.run(|d| d.update()).await
    }

    pub async fn resolve_conflict(&self, choice: SaveChoice) -> Result<String> {
        self.run(move |d| d.resolve_conflict(choice)).await
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        let name = name.to_string();
        self.run(move |d| d.delete(&name)).await
    }
}
