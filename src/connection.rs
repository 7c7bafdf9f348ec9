//! Blocking HTTP connection to the Notion page-database API.
//!
//! Wraps a lazily built `reqwest` client with the workspace token and API
//! version headers, follows query pagination, and turns non-2xx responses
//! into [`LtvError::Api`].

use crate::config::{StoreConfig, NOTION_VERSION};
use crate::error::{LtvError, Result};
use crate::query_builder::QueryBuilder;
use reqwest::blocking::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::cell::RefCell;

/// Authenticated access to one Notion workspace.
pub struct Connection {
    /// Resolved store settings (token, database ids, base URL).
    pub config: StoreConfig,
    client: RefCell<Option<Client>>,
}

impl Connection {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            client: RefCell::new(None),
        }
    }

    /// Lazy HTTP client, created on first use.
    fn client(&self) -> Result<Client> {
        if let Some(client) = self.client.borrow().as_ref() {
            return Ok(client.clone());
        }
        let client = Client::builder()
            .timeout(self.config.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        *self.client.borrow_mut() = Some(client.clone());
        Ok(client)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.config.token)
            .header("Notion-Version", NOTION_VERSION)
    }

    /// Send a request and parse the JSON body, mapping error statuses.
    fn send(&self, request: RequestBuilder) -> Result<Value> {
        let resp = self.authorized(request).send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or(body);
            return Err(LtvError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp.json()?)
    }

    /// Run a database query, following `next_cursor` until every page of
    /// results has been collected.
    pub fn query_all(&self, database_id: &str, query: &mut QueryBuilder) -> Result<Vec<Value>> {
        let url = self.url(&format!("databases/{}/query", database_id));
        let client = self.client()?;
        let mut results = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let body = query.start_cursor(cursor.as_deref()).build();
            log::debug!("POST {} cursor={:?}", url, cursor);
            let data = self.send(client.post(&url).json(&body))?;

            if let Some(Value::Array(pages)) = data.get("results") {
                results.extend(pages.iter().cloned());
            }

            let has_more = data.get("has_more").and_then(Value::as_bool).unwrap_or(false);
            cursor = data
                .get("next_cursor")
                .and_then(Value::as_str)
                .map(str::to_string);
            if !has_more || cursor.is_none() {
                break;
            }
        }

        Ok(results)
    }

    /// Create a page under `database_id` with the given properties.
    ///
    /// Returns the new page's id.
    pub fn create_page(&self, database_id: &str, properties: Value) -> Result<String> {
        let url = self.url("pages");
        let body = json!({
            "parent": { "database_id": database_id },
            "properties": properties,
        });
        log::debug!("POST {}", url);
        let page = self.send(self.client()?.post(&url).json(&body))?;
        page_id(&page)
    }

    /// Replace properties on an existing page.
    pub fn update_page(&self, page_id: &str, properties: Value) -> Result<()> {
        let url = self.url(&format!("pages/{}", page_id));
        log::debug!("PATCH {}", url);
        self.send(
            self.client()?
                .patch(&url)
                .json(&json!({ "properties": properties })),
        )?;
        Ok(())
    }

    /// Archive (soft-delete) a page.
    pub fn archive_page(&self, page_id: &str) -> Result<()> {
        let url = self.url(&format!("pages/{}", page_id));
        log::debug!("PATCH {} archived=true", url);
        self.send(self.client()?.patch(&url).json(&json!({ "archived": true })))?;
        Ok(())
    }
}

/// The `id` of a page object.
pub fn page_id(page: &Value) -> Result<String> {
    page.get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| LtvError::NotFound("Page object without an id".to_string()))
}
