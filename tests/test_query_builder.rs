//! Unit tests for Notion query body construction.

use ltv_desk::QueryBuilder;
use serde_json::json;

// ---------------------------------------------------------------------------
// Basic construction
// ---------------------------------------------------------------------------

#[test]
fn new_has_only_page_size() {
    let body = QueryBuilder::new().build();
    assert_eq!(body, json!({ "page_size": 100 }));
}

#[test]
fn page_size_is_clamped() {
    assert_eq!(QueryBuilder::new().page_size(0).build()["page_size"], 1);
    assert_eq!(QueryBuilder::new().page_size(500).build()["page_size"], 100);
    assert_eq!(QueryBuilder::new().page_size(25).build()["page_size"], 25);
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[test]
fn single_filter_is_not_wrapped() {
    let body = QueryBuilder::new().title_equals("고객명", "김철수").build();
    assert_eq!(
        body["filter"],
        json!({ "property": "고객명", "title": { "equals": "김철수" } })
    );
}

#[test]
fn multiple_filters_are_anded() {
    let body = QueryBuilder::new()
        .rich_text_equals("주소", "서울")
        .relation_contains("고객", "p-1")
        .build();
    let and = body["filter"]["and"].as_array().unwrap();
    assert_eq!(and.len(), 2);
    assert_eq!(and[0]["rich_text"]["equals"], "서울");
    assert_eq!(and[1]["relation"]["contains"], "p-1");
}

// ---------------------------------------------------------------------------
// Sorts and cursor
// ---------------------------------------------------------------------------

#[test]
fn sorts_keep_order() {
    let body = QueryBuilder::new()
        .sort_descending("저장시각")
        .sort_ascending("순번")
        .build();
    assert_eq!(
        body["sorts"],
        json!([
            { "property": "저장시각", "direction": "descending" },
            { "property": "순번", "direction": "ascending" }
        ])
    );
}

#[test]
fn start_cursor_set_and_cleared() {
    let mut query = QueryBuilder::new();
    query.start_cursor(Some("abc"));
    assert_eq!(query.build()["start_cursor"], "abc");

    query.start_cursor(None);
    assert!(query.build().get("start_cursor").is_none());
}
