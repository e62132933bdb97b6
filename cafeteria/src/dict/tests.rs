//! Unit tests for merge-aware mappings.

use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::{MergeKind, MergingDict, Seed};
use crate::error::CafeteriaError;
use crate::value::MergeValue;

#[fixture]
fn simple() -> Value {
    json!({"dict": {"one": 1, "nested": {"a": "a"}}, "list": [1]})
}

#[fixture]
fn simple_update() -> Value {
    json!({"dict": {"two": 2, "nested": {"b": "b"}}, "list": [2, 3]})
}

fn dict(kind: MergeKind, value: Value) -> MergingDict {
    MergingDict::from_json_value(kind, value).expect("fixture is an object")
}

fn plain(value: Value) -> MergingDict {
    dict(MergeKind::Plain, value)
}

#[rstest]
fn shallow_update_overwrites_inside_nested_maps(simple: Value, simple_update: Value) {
    let mut d = dict(MergeKind::Shallow, simple);
    d.update(plain(simple_update)).expect("merge succeeds");
    assert_eq!(
        d.to_json_value(),
        json!({"dict": {"one": 1, "two": 2, "nested": {"b": "b"}}, "list": [1, 2, 3]})
    );
}

#[rstest]
fn shallow_set_merges_each_key(simple: Value) {
    let mut d = dict(MergeKind::Shallow, simple);
    d.set("dict", plain(json!({"two": 2}))).expect("map merge");
    d.set("list", MergeValue::list_of([2, 3])).expect("list merge");
    assert_eq!(
        d.to_json_value(),
        json!({"dict": {"one": 1, "two": 2, "nested": {"a": "a"}}, "list": [1, 2, 3]})
    );
}

#[rstest]
fn scalar_replaces_mapping_and_later_maps_bind_directly(simple: Value) {
    let mut d = dict(MergeKind::Shallow, simple);
    d.update(plain(json!({"dict": 0}))).expect("replace succeeds");
    assert_eq!(d.to_json_value(), json!({"dict": 0, "list": [1]}));

    d.set("dict", plain(json!({"z": "z"}))).expect("replace succeeds");
    assert_eq!(d.get("dict").map(MergeValue::to_json), Some(json!({"z": "z"})));
}

#[rstest]
fn deep_update_recurses_into_nested_maps(simple: Value, simple_update: Value) {
    let mut d = dict(MergeKind::Deep, simple);
    d.update(plain(simple_update)).expect("merge succeeds");
    assert_eq!(
        d.to_json_value(),
        json!({"dict": {"one": 1, "two": 2, "nested": {"a": "a", "b": "b"}}, "list": [1, 2, 3]})
    );
}

#[rstest]
fn deep_merge_extends_lists_at_depth() {
    let mut d = dict(MergeKind::Deep, json!({"a": {"b": {"c": [1]}}}));
    d.update(plain(json!({"a": {"b": {"c": [2], "d": true}}})))
        .expect("merge succeeds");
    assert_eq!(d.to_json_value(), json!({"a": {"b": {"c": [1, 2], "d": true}}}));
}

#[rstest]
fn deep_mappings_never_hold_plain_maps() {
    let mut d = MergingDict::deep();
    d.set("fresh", plain(json!({"inner": {"leaf": 1}}))).expect("bind");
    d.replace("swapped", plain(json!({"inner": {}})));
    d.update_pairs([("paired", plain(json!({"inner": {}})))]);

    for key in ["fresh", "swapped", "paired"] {
        let outer = d.get(key).and_then(MergeValue::as_map).expect("map value");
        assert_eq!(outer.kind(), MergeKind::Deep, "{key} should be deep");
        let inner = outer.get("inner").and_then(MergeValue::as_map).expect("inner map");
        assert_eq!(inner.kind(), MergeKind::Deep, "{key}.inner should be deep");
    }
}

#[rstest]
fn deep_mappings_keep_shallow_children() {
    let mut d = MergingDict::deep();
    d.set("child", MergingDict::shallow()).expect("bind");
    let child = d.get("child").and_then(MergeValue::as_map).expect("map");
    assert_eq!(child.kind(), MergeKind::Shallow);
}

#[rstest]
fn absent_keys_bind_directly() {
    let mut d = MergingDict::shallow();
    d.set("port", 8080).expect("bind");
    assert_eq!(d.get("port"), Some(&MergeValue::from(8080)));
}

#[rstest]
#[case(MergeKind::Plain)]
#[case(MergeKind::Shallow)]
#[case(MergeKind::Deep)]
fn replace_always_overwrites(#[case] kind: MergeKind) {
    let mut d = dict(kind, json!({"list": [1], "map": {"a": 1}}));
    let previous = d.replace("list", MergeValue::list_of([9]));
    d.replace("map", 0);
    assert_eq!(previous, Some(MergeValue::list_of([1])));
    assert_eq!(d.to_json_value(), json!({"list": [9], "map": 0}));
}

#[rstest]
fn plain_mappings_overwrite_on_set() {
    let mut d = plain(json!({"list": [1]}));
    d.set("list", MergeValue::list_of([2])).expect("overwrite");
    assert_eq!(d.to_json_value(), json!({"list": [2]}));
}

#[rstest]
fn sets_gain_whole_strings() {
    let mut d = MergingDict::shallow();
    d.set("tags", MergeValue::set_of(["alpha"])).expect("bind");
    d.set("tags", "beta").expect("merge");
    assert_eq!(d.get("tags"), Some(&MergeValue::set_of(["alpha", "beta"])));
}

#[rstest]
fn mismatched_merge_reports_key_and_keeps_value() {
    let mut d = MergingDict::shallow();
    d.set("tags", MergeValue::set_of(["alpha"])).expect("bind");
    let err = d
        .set("tags", MergeValue::list_of([7]))
        .expect_err("integers cannot join a set");
    assert!(
        matches!(err, CafeteriaError::TypeMismatch { ref key, .. } if key == "tags"),
        "unexpected error {err:?}"
    );
    assert_eq!(d.get("tags"), Some(&MergeValue::set_of(["alpha"])));
}

#[rstest]
fn failed_nested_set_keeps_the_whole_value() {
    let mut d = dict(
        MergeKind::Deep,
        json!({"a": {"x": {"k": 1}, "y": {"k": 1}}}),
    );
    let err = d
        .set("a", plain(json!({"x": {"new": 2}, "y": "text"})))
        .expect_err("text cannot update a map");
    assert!(
        matches!(err, CafeteriaError::TypeMismatch { ref key, .. } if key == "a.y"),
        "unexpected error {err:?}"
    );
    assert_eq!(
        d.to_json_value(),
        json!({"a": {"x": {"k": 1}, "y": {"k": 1}}})
    );
}

#[rstest]
fn failed_update_keeps_entries_merged_before_the_failure() {
    let mut d = dict(MergeKind::Shallow, json!({"a": [1], "b": ["x"], "c": [1]}));
    d.replace("b", MergeValue::set_of(["x"]));
    let err = d
        .update(plain(json!({"a": [2], "b": [3], "c": [2]})))
        .expect_err("integers cannot join a set");
    assert!(
        matches!(err, CafeteriaError::TypeMismatch { ref key, .. } if key == "b"),
        "unexpected error {err:?}"
    );
    assert_eq!(d.get("a"), Some(&MergeValue::list_of([1, 2])));
    assert_eq!(d.get("b"), Some(&MergeValue::set_of(["x"])));
    assert_eq!(d.get("c"), Some(&MergeValue::list_of([1])));
}

#[rstest]
fn pair_seeds_overwrite_without_merging() {
    let mut d = dict(MergeKind::Shallow, json!({"list": [1]}));
    d.update_with(
        Some(Seed::from(vec![("list", MergeValue::list_of([2]))])),
        [("extra", MergeValue::list_of([3]))],
    )
    .expect("update succeeds");
    assert_eq!(d.to_json_value(), json!({"list": [2], "extra": [3]}));
}

#[rstest]
fn update_with_none_only_applies_kwargs() {
    let mut d = dict(MergeKind::Shallow, json!({"list": [1]}));
    d.update_with(None, [("list", MergeValue::list_of([2]))])
        .expect("update succeeds");
    assert_eq!(d.to_json_value(), json!({"list": [1, 2]}));
}

#[rstest]
fn seeds_fold_in_order_before_kwargs() {
    let seeds = [
        Seed::from(plain(json!({"list": [1], "name": "first"}))),
        Seed::from(plain(json!({"list": [2], "name": "second"}))),
    ];
    let d = MergingDict::from_seeds(MergeKind::Shallow, seeds, [("list", MergeValue::list_of([3]))])
        .expect("construction succeeds");
    assert_eq!(d.to_json_value(), json!({"list": [1, 2, 3], "name": "second"}));
}

#[rstest]
fn seeds_round_trip_without_collisions(simple: Value) {
    let d = MergingDict::from_seeds(
        MergeKind::Deep,
        [Seed::from(plain(simple.clone()))],
        std::iter::empty::<(String, MergeValue)>(),
    )
    .expect("construction succeeds");
    assert_eq!(d.to_json_value(), simple);
}

#[rstest]
fn try_get_reports_missing_keys() {
    let d = MergingDict::shallow();
    let err = d.try_get("absent").expect_err("key is absent");
    assert!(err.is_not_found());
}

#[rstest]
fn equality_ignores_kind() {
    let left = dict(MergeKind::Deep, json!({"a": {"b": 1}}));
    let right = plain(json!({"a": {"b": 1}}));
    assert_eq!(left, right);
}

#[rstest]
fn collected_entries_keep_the_last_duplicate() {
    let d: MergingDict = [("k", 1), ("k", 2)].into_iter().collect();
    assert_eq!(d.kind(), MergeKind::Shallow);
    assert_eq!(d.get("k"), Some(&MergeValue::from(2)));
}
