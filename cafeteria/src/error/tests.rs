//! Unit tests for error construction and rendering.

use rstest::rstest;

use super::{CafeteriaError, MergeOperation};
use crate::value::ValueKind;

#[rstest]
#[case(MergeOperation::Update, "update")]
#[case(MergeOperation::Append, "append")]
#[case(MergeOperation::Extend, "extend")]
#[case(MergeOperation::Replace, "replace")]
fn merge_operations_render_lowercase(#[case] op: MergeOperation, #[case] expected: &str) {
    assert_eq!(op.to_string(), expected);
}

#[rstest]
fn type_mismatch_names_both_sides() {
    let err = CafeteriaError::type_mismatch(
        "labels",
        MergeOperation::Update,
        ValueKind::Set,
        ValueKind::Integer,
    );
    assert_eq!(err.to_string(), "cannot update set at 'labels' with integer");
}

#[rstest]
fn key_not_found_is_classified() {
    assert!(CafeteriaError::key_not_found("missing").is_not_found());
    assert!(!CafeteriaError::EmptyPath.is_not_found());
}

#[rstest]
fn figment_errors_become_gathering() {
    let err = CafeteriaError::gathering(figment::Error::from("boom"));
    match err {
        CafeteriaError::Gathering(inner) => assert!(inner.to_string().contains("boom")),
        other => panic!("expected Gathering, got {other:?}"),
    }
}
