//! Tests for face-amount / principal linking.

use ltv_desk::reconcile::{reconcile, reconcile_all, Baseline, EditedField, LineState};
use ltv_desk::LoanLine;

fn fresh() -> LineState {
    LineState::new(LoanLine::default())
}

#[test]
fn entering_face_derives_principal() {
    let mut state = reconcile(fresh());
    assert_eq!(state.line.ratio_percent, 120);

    state.line.face_amount = 12_000;
    state.edited = EditedField::FaceAmount;
    let state = reconcile(state);

    assert_eq!(state.line.principal, 10_000);
    assert_eq!(state.edited, EditedField::None);
    assert_eq!(state.baseline, Baseline::of(&state.line));
}

#[test]
fn principal_edit_wins_over_face() {
    let mut state = fresh();
    state.line.face_amount = 12_000;
    let mut state = reconcile(state);
    assert_eq!(state.line.principal, 10_000);

    state.line.principal = 9_000;
    state.edited = EditedField::Principal;
    let state = reconcile(state);
    assert_eq!(state.line.face_amount, 10_800);
    assert_eq!(state.line.principal, 9_000);

    let again = reconcile(state.clone());
    assert_eq!(again.line, state.line);
}

#[test]
fn principal_priority_when_both_changed() {
    let mut state = LineState::synced(LoanLine {
        face_amount: 12_000,
        principal: 10_000,
        ..LoanLine::default()
    });
    state.line.face_amount = 24_000;
    state.line.principal = 15_000;
    let state = reconcile(state);
    assert_eq!(state.line.face_amount, 18_000);
    assert_eq!(state.line.principal, 15_000);
}

#[test]
fn ratio_change_rederives_principal() {
    let mut state = LineState::synced(LoanLine {
        face_amount: 13_000,
        principal: 10_833,
        ..LoanLine::default()
    });
    state.line.ratio_percent = 130;
    state.edited = EditedField::Ratio;
    let state = reconcile(state);
    assert_eq!(state.line.principal, 10_000);
    assert_eq!(state.line.face_amount, 13_000);
}

#[test]
fn reconcile_is_idempotent() {
    let mut state = fresh();
    state.line.face_amount = 10_000;
    let once = reconcile(state);
    let twice = reconcile(once.clone());
    assert_eq!(once, twice);
}

#[test]
fn synced_line_is_not_rederived() {
    let line = LoanLine {
        face_amount: 12_000,
        principal: 7_777,
        ..LoanLine::default()
    };
    let state = reconcile(LineState::synced(line.clone()));
    assert_eq!(state.line, line);
}

#[test]
fn zero_ratio_is_guarded() {
    let mut state = LineState::synced(LoanLine {
        face_amount: 12_000,
        principal: 10_000,
        ..LoanLine::default()
    });
    state.line.ratio_percent = 0;
    state.edited = EditedField::Ratio;
    let state = reconcile(state);
    assert_eq!(state.line.principal, 10_000);
    assert_eq!(state.line.face_amount, 12_000);

    let mut state = state;
    state.line.principal = 5_000;
    let state = reconcile(state);
    assert_eq!(state.line.face_amount, 12_000);
    assert_eq!(state.line.principal, 5_000);
}

#[test]
fn reconcile_all_keeps_order() {
    let mut a = fresh();
    a.line.face_amount = 12_000;
    let mut b = fresh();
    b.line.principal = 1_000;
    let out = reconcile_all(vec![a, b]);
    assert_eq!(out[0].line.principal, 10_000);
    assert_eq!(out[1].line.face_amount, 1_200);
}

#[test]
fn large_principal_does_not_overflow() {
    let mut state = reconcile(fresh());
    state.line.principal = 100_000_000_000_000_000;
    state.edited = EditedField::Principal;
    let state = reconcile(state);
    assert_eq!(state.line.face_amount, 120_000_000_000_000_000);

    let mut state = state;
    state.line.principal = i64::MAX;
    let state = reconcile(state);
    assert_eq!(state.line.face_amount, i64::MAX);
}

#[test]
fn large_face_with_small_ratio_saturates_principal() {
    let mut state = LineState::synced(LoanLine::default());
    state.line.face_amount = 9_000_000_000_000_000_000;
    state.line.ratio_percent = 1;
    let state = reconcile(state);
    assert_eq!(state.line.principal, i64::MAX);
    assert_eq!(state.line.face_amount, 9_000_000_000_000_000_000);
}
