//! Builder for Notion database query payloads.
//!
//! Produces the JSON body for `POST /databases/{id}/query`. Multiple filters
//! are combined with `and`. Builder methods return `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use ltv_desk::QueryBuilder;
//! let body = QueryBuilder::new()
//!     .title_equals("고객명", "홍길동")
//!     .page_size(10)
//!     .build();
//! assert_eq!(body["filter"]["title"]["equals"], "홍길동");
//! ```

use serde_json::{json, Map, Value};

use crate::config::PAGE_SIZE;

/// Builds Notion database query bodies.
pub struct QueryBuilder {
    filters: Vec<Value>,
    sorts: Vec<Value>,
    page_size: usize,
    start_cursor: Option<String>,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryBuilder {
    /// Create a builder with no filters and the default page size.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            sorts: Vec::new(),
            page_size: PAGE_SIZE,
            start_cursor: None,
        }
    }

    /// Match pages whose title property equals `value`.
    pub fn title_equals(&mut self, property: &str, value: &str) -> &mut Self {
        self.filters.push(json!({
            "property": property,
            "title": { "equals": value }
        }));
        self
    }

    /// Match pages whose rich-text property equals `value`.
    pub fn rich_text_equals(&mut self, property: &str, value: &str) -> &mut Self {
        self.filters.push(json!({
            "property": property,
            "rich_text": { "equals": value }
        }));
        self
    }

    /// Match pages whose relation property links to `page_id`.
    pub fn relation_contains(&mut self, property: &str, page_id: &str) -> &mut Self {
        self.filters.push(json!({
            "property": property,
            "relation": { "contains": page_id }
        }));
        self
    }

    /// Add an ascending sort on a property.
    pub fn sort_ascending(&mut self, property: &str) -> &mut Self {
        self.sorts.push(json!({ "property": property, "direction": "ascending" }));
        self
    }

    /// Add a descending sort on a property.
    pub fn sort_descending(&mut self, property: &str) -> &mut Self {
        self.sorts.push(json!({ "property": property, "direction": "descending" }));
        self
    }

    /// Set the page size (clamped to Notion's 1..=100).
    pub fn page_size(&mut self, n: usize) -> &mut Self {
        self.page_size = n.clamp(1, PAGE_SIZE);
        self
    }

    /// Continue from a previous response's `next_cursor`.
    pub fn start_cursor(&mut self, cursor: Option<&str>) -> &mut Self {
        self.start_cursor = cursor.map(str::to_string);
        self
    }

    /// Build the request body.
    pub fn build(&self) -> Value {
        let mut body = Map::new();
        body.insert("page_size".to_string(), json!(self.page_size));

        match self.filters.len() {
            0 => {}
            1 => {
                body.insert("filter".to_string(), self.filters[0].clone());
            }
            _ => {
                body.insert("filter".to_string(), json!({ "and": self.filters }));
            }
        }

        if !self.sorts.is_empty() {
            body.insert("sorts".to_string(), json!(self.sorts));
        }

        if let Some(cursor) = &self.start_cursor {
            body.insert("start_cursor".to_string(), json!(cursor));
        }

        Value::Object(body)
    }
}
