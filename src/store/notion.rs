//! Record store backed by two Notion databases.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use super::properties::{self, StoredLoanLine};
use super::RecordStore;
use crate::config::StoreConfig;
use crate::connection::{page_id, Connection};
use crate::error::{LtvError, Result};
use crate::models::CustomerRecord;
use crate::query_builder::QueryBuilder;

/// Stores customers in the customer database and their loan lines as
/// related pages in the loan database.
pub struct NotionStore {
    conn: Connection,
}

impl NotionStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            conn: Connection::new(config),
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn customer_db(&self) -> &str {
        &self.conn.config.customer_database_id
    }

    fn loan_db(&self) -> &str {
        &self.conn.config.loan_database_id
    }

    /// Customer pages whose title equals `name`, most recently saved first.
    fn customer_pages(&self, name: &str) -> Result<Vec<Value>> {
        self.conn.query_all(
            self.customer_db(),
            QueryBuilder::new()
                .title_equals(properties::customer::NAME, name)
                .sort_descending(properties::customer::SAVED_AT),
        )
    }

    /// Loan-line pages linked to one customer page.
    fn loan_pages(&self, customer_page_id: &str) -> Result<Vec<Value>> {
        self.conn.query_all(
            self.loan_db(),
            QueryBuilder::new()
                .relation_contains(properties::loan::CUSTOMER, customer_page_id)
                .sort_ascending(properties::loan::ORDER),
        )
    }

    /// Create one loan page per line. Ids of the pages created so far are
    /// pushed to `written`, including when a later line fails.
    fn write_loan_lines(
        &self,
        customer_page_id: &str,
        record: &CustomerRecord,
        written: &mut Vec<String>,
    ) -> Result<()> {
        for (order, line) in record.loan_lines.iter().enumerate() {
            let id = self.conn.create_page(
                self.loan_db(),
                properties::loan_properties(line, order + 1, customer_page_id),
            )?;
            written.push(id);
        }
        Ok(())
    }

    fn archive_loan_lines(&self, customer_page_id: &str) -> Result<()> {
        for page in self.loan_pages(customer_page_id)? {
            self.conn.archive_page(&page_id(&page)?)?;
        }
        Ok(())
    }

    /// Best-effort archive of pages left behind by a failed write.
    fn roll_back(&self, page_ids: &[String]) {
        for id in page_ids {
            if let Err(e) = self.conn.archive_page(id) {
                log::warn!("Could not archive page {} after a failed write: {}", id, e);
            }
        }
    }
}

impl RecordStore for NotionStore {
    fn fetch_all(&self) -> Result<BTreeMap<String, CustomerRecord>> {
        let customer_pages = self.conn.query_all(
            self.customer_db(),
            QueryBuilder::new().sort_descending(properties::customer::SAVED_AT),
        )?;

        let mut lines_by_customer: HashMap<String, Vec<StoredLoanLine>> = HashMap::new();
        let loan_pages = self.conn.query_all(
            self.loan_db(),
            QueryBuilder::new().sort_ascending(properties::loan::ORDER),
        )?;
        for page in &loan_pages {
            let Some(stored) = properties::loan_from_page(page) else {
                log::warn!("Skipping loan page without properties");
                continue;
            };
            for id in &stored.customer_page_ids {
                lines_by_customer
                    .entry(id.clone())
                    .or_default()
                    .push(stored.clone());
            }
        }

        let mut records = BTreeMap::new();
        for page in &customer_pages {
            let Some(mut record) = properties::customer_from_page(page) else {
                continue;
            };
            if records.contains_key(&record.name) {
                log::warn!(
                    "Duplicate customer '{}' in store; keeping the most recent save",
                    record.name
                );
                continue;
            }
            if let Some(mut stored) = lines_by_customer.remove(&page_id(page)?) {
                stored.sort_by_key(|s| s.order);
                record.loan_lines = stored.into_iter().map(|s| s.line).collect();
            }
            records.insert(record.name.clone(), record);
        }

        log::debug!(
            "Fetched {} customers and {} loan lines",
            records.len(),
            loan_pages.len()
        );
        Ok(records)
    }

    fn create_record(&self, record: &CustomerRecord) -> Result<()> {
        if !self.customer_pages(&record.name)?.is_empty() {
            return Err(LtvError::Conflict(format!(
                "Customer '{}' already exists",
                record.name
            )));
        }
        let id = self.conn.create_page(
            self.customer_db(),
            properties::customer_properties(record),
        )?;
        let mut written = Vec::new();
        if let Err(e) = self.write_loan_lines(&id, record, &mut written) {
            log::warn!(
                "Saving loan lines for '{}' failed; archiving the new customer page",
                record.name
            );
            written.push(id);
            self.roll_back(&written);
            return Err(e);
        }
        log::info!(
            "Created customer '{}' with {} loan lines",
            record.name,
            record.loan_lines.len()
        );
        Ok(())
    }

    fn update_record(&self, name: &str, record: &CustomerRecord) -> Result<()> {
        let pages = self.customer_pages(name)?;
        let page = pages
            .first()
            .ok_or_else(|| LtvError::NotFound(format!("Customer '{}'", name)))?;
        if record.name != name && !self.customer_pages(&record.name)?.is_empty() {
            return Err(LtvError::Conflict(format!(
                "Customer '{}' already exists",
                record.name
            )));
        }

        let id = page_id(page)?;
        let previous = self.loan_pages(&id)?;

        // New lines go in before anything old is touched.
        let mut written = Vec::new();
        let written_ok = self
            .write_loan_lines(&id, record, &mut written)
            .and_then(|()| {
                self.conn
                    .update_page(&id, properties::customer_properties(record))
            });
        if let Err(e) = written_ok {
            log::warn!("Updating '{}' failed; keeping the stored loan lines", name);
            self.roll_back(&written);
            return Err(e);
        }

        for page in &previous {
            self.conn.archive_page(&page_id(page)?)?;
        }
        log::info!("Updated customer '{}'", record.name);
        Ok(())
    }

    fn delete_record(&self, name: &str) -> Result<()> {
        let pages = self.customer_pages(name)?;
        if pages.is_empty() {
            return Err(LtvError::NotFound(format!("Customer '{}'", name)));
        }
        for page in &pages {
            let id = page_id(page)?;
            self.archive_loan_lines(&id)?;
            self.conn.archive_page(&id)?;
        }
        log::info!("Archived customer '{}' ({} pages)", name, pages.len());
        Ok(())
    }
}
