//! Tests for the record store contract and the desk's save/load flows.

mod common;

use common::{sample_record, seeded_store};
use ltv_desk::store::RecordStore;
use ltv_desk::{Desk, FieldEdit, LtvError, MemoryStore, SaveChoice};

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[test]
fn list_names_sorted() {
    let store = seeded_store();
    assert_eq!(store.list_customer_names().unwrap(), vec!["김철수", "이영희"]);
}

#[test]
fn create_duplicate_conflicts() {
    let store = seeded_store();
    let err = store.create_record(&sample_record("김철수")).unwrap_err();
    assert!(matches!(err, LtvError::Conflict(_)));
}

#[test]
fn update_missing_is_not_found() {
    let store = MemoryStore::new();
    let err = store
        .update_record("없는사람", &sample_record("없는사람"))
        .unwrap_err();
    assert!(matches!(err, LtvError::NotFound(_)));
}

#[test]
fn update_can_rename() {
    let store = seeded_store();
    store
        .update_record("김철수", &sample_record("김철수2"))
        .unwrap();
    assert_eq!(store.list_customer_names().unwrap(), vec!["김철수2", "이영희"]);
}

#[test]
fn rename_onto_existing_conflicts() {
    let store = seeded_store();
    let err = store
        .update_record("김철수", &sample_record("이영희"))
        .unwrap_err();
    assert!(matches!(err, LtvError::Conflict(_)));
}

#[test]
fn delete_archives() {
    let store = seeded_store();
    store.delete_record("김철수").unwrap();
    assert_eq!(store.list_customer_names().unwrap(), vec!["이영희"]);
    assert_eq!(store.archived().len(), 1);
    assert_eq!(store.archived()[0].loan_lines.len(), 2);
    assert!(matches!(
        store.delete_record("김철수"),
        Err(LtvError::NotFound(_))
    ));
}

// ---------------------------------------------------------------------------
// Desk
// ---------------------------------------------------------------------------

fn desk() -> Desk<MemoryStore> {
    let mut desk = Desk::new(seeded_store());
    desk.refresh().unwrap();
    desk
}

#[test]
fn refresh_populates_snapshot() {
    let desk = desk();
    assert_eq!(desk.customer_names(), vec!["김철수", "이영희"]);
    assert!(desk.snapshot().fetched_at().is_some());
}

#[test]
fn load_reproduces_record() {
    let mut desk = desk();
    desk.load("김철수").unwrap();
    assert_eq!(desk.loaded_customer(), Some("김철수"));

    let expected = sample_record("김철수");
    let form = desk.form();
    assert_eq!(form.customer_name, "김철수");
    assert_eq!(form.address, expected.address);
    assert_eq!(form.evaluation.appraised_value, 85_000);
    assert_eq!(form.evaluation.deduction, 5_500);
    assert_eq!(form.lines[0].line, expected.loan_lines[0]);
    assert_eq!(form.lines[1].line, expected.loan_lines[1]);
    assert_eq!(form.fee_inputs, expected.fees);
}

#[test]
fn load_unknown_is_not_found() {
    let mut desk = desk();
    assert!(matches!(desk.load("없는사람"), Err(LtvError::NotFound(_))));
}

#[test]
fn save_then_load_round_trip() {
    let mut desk = Desk::new(MemoryStore::new());
    for e in [
        FieldEdit::CustomerName("박민수".into()),
        FieldEdit::Address("부산광역시 해운대구 우동 1 제15층".into()),
        FieldEdit::Price("6억 5천만".into()),
        FieldEdit::Region("그 밖의 지역".into()),
        FieldEdit::Rate(1, "75".into()),
        FieldEdit::Lender(0, "하나은행".into()),
        FieldEdit::Principal(0, "10000".into()),
        FieldEdit::Status(0, ltv_desk::LoanStatus::Refinanced),
    ] {
        desk.edit(e).unwrap();
    }
    let before = desk.form().to_record();
    desk.save_as_new().unwrap();

    desk.reset();
    assert_eq!(desk.form().customer_name, "");

    desk.refresh().unwrap();
    desk.load("박민수").unwrap();
    let after = desk.form().to_record();

    assert_eq!(after.appraised_value, 65_000);
    assert_eq!(after.deduction, 2_500);
    assert_eq!(after.loan_lines, before.loan_lines);
    assert_eq!(after.rate_inputs, before.rate_inputs);
    assert_eq!(after.selected_rates, vec![80, 75]);
    assert_eq!(after.summary_text, before.summary_text);

    let stored = desk.snapshot().get("박민수").unwrap();
    assert!(stored.saved_at.is_some());
}

#[test]
fn save_requires_name() {
    let mut desk = Desk::new(MemoryStore::new());
    assert!(matches!(desk.save_as_new(), Err(LtvError::InvalidArgument(_))));
}

#[test]
fn save_duplicate_then_overwrite() {
    let mut desk = desk();
    desk.edit(FieldEdit::CustomerName("김철수".into())).unwrap();
    desk.edit(FieldEdit::Price("3억".into())).unwrap();

    assert!(matches!(desk.save_as_new(), Err(LtvError::Conflict(_))));
    let name = desk.resolve_conflict(SaveChoice::Overwrite).unwrap();
    assert_eq!(name, "김철수");

    let stored = desk.store().fetch_all().unwrap();
    assert_eq!(stored["김철수"].appraised_value, 30_000);
    assert_eq!(stored.len(), 2);
}

#[test]
fn save_duplicate_then_add_new() {
    let mut desk = desk();
    desk.store().create_record(&sample_record("김철수 (2)")).unwrap();
    desk.edit(FieldEdit::CustomerName("김철수".into())).unwrap();

    assert!(matches!(desk.save_as_new(), Err(LtvError::Conflict(_))));
    let name = desk.resolve_conflict(SaveChoice::AddNew).unwrap();
    assert_eq!(name, "김철수 (3)");
    assert_eq!(desk.form().customer_name, "김철수 (3)");
    assert_eq!(desk.loaded_customer(), Some("김철수 (3)"));
    assert!(desk.customer_names().contains(&"김철수 (3)".to_string()));
    assert_eq!(desk.store().list_customer_names().unwrap().len(), 4);
}

#[test]
fn update_renames_loaded_customer() {
    let mut desk = desk();
    desk.load("이영희").unwrap();
    desk.edit(FieldEdit::CustomerName("이영희B".into())).unwrap();
    desk.update().unwrap();

    assert_eq!(
        desk.store().list_customer_names().unwrap(),
        vec!["김철수", "이영희B"]
    );
    assert_eq!(desk.customer_names(), vec!["김철수", "이영희B"]);
}

#[test]
fn update_without_stored_record_is_not_found() {
    let mut desk = desk();
    desk.edit(FieldEdit::CustomerName("신규고객".into())).unwrap();
    assert!(matches!(desk.update(), Err(LtvError::NotFound(_))));
}

#[test]
fn delete_removes_from_snapshot() {
    let mut desk = desk();
    desk.load("김철수").unwrap();
    desk.delete("김철수").unwrap();
    assert_eq!(desk.customer_names(), vec!["이영희"]);
    assert_eq!(desk.loaded_customer(), None);
    assert!(matches!(desk.delete("김철수"), Err(LtvError::NotFound(_))));
}

#[test]
fn failed_store_call_keeps_form() {
    let mut desk = desk();
    desk.edit(FieldEdit::CustomerName("김철수".into())).unwrap();
    desk.edit(FieldEdit::Price("4억".into())).unwrap();
    let before = desk.form().clone();
    let _ = desk.save_as_new();
    assert_eq!(desk.form(), &before);
}

// ---------------------------------------------------------------------------
// CustomerSnapshot
// ---------------------------------------------------------------------------

#[test]
fn snapshot_next_free_name_skips_taken() {
    let mut snapshot = ltv_desk::CustomerSnapshot::new();
    assert!(snapshot.fetched_at().is_none());
    assert_eq!(snapshot.next_free_name("김철수"), "김철수 (2)");

    snapshot.upsert(sample_record("김철수 (2)"));
    snapshot.upsert(sample_record("김철수 (3)"));
    assert_eq!(snapshot.next_free_name("김철수"), "김철수 (4)");
    assert_eq!(snapshot.len(), 2);

    assert!(snapshot.remove("김철수 (2)").is_some());
    assert_eq!(snapshot.next_free_name("김철수"), "김철수 (2)");
}
