//! Integration test: split, select and teardown in single-process mode.
//!
//! Without a communicator every consistency check sees exactly one value,
//! so these tests exercise the grouping, filtering and view semantics on
//! their own.

use regex::Regex;
use swath_comm::Comm;
use swath_core::{Observation, Value};
use swath_data::{Data, DataError, Selection, SplitBy, SplitKey};
use swath_test_utils::fixtures::{collection, flagged_scan};
use swath_test_utils::MockObservation;

// ── split ────────────────────────────────────────────────────

#[test]
fn split_by_index_shares_metadata() {
    let data = collection(Comm::single(), &["a", "b", "c"]);
    data.meta().insert("site", "atacama");

    let views = data.split(&SplitBy::Index, false).unwrap();
    let keys: Vec<_> = views.keys().cloned().collect();
    assert_eq!(
        keys,
        vec![SplitKey::Index(0), SplitKey::Index(1), SplitKey::Index(2)]
    );
    for view in views.values() {
        assert!(view.is_view());
        assert_eq!(view.len(), 1);
        assert!(view.meta().ptr_eq(data.meta()));
    }

    views[&SplitKey::Index(0)].meta().insert("band", "f090");
    assert_eq!(
        views[&SplitKey::Index(2)].meta().get("band"),
        Some(Value::from("f090"))
    );
    assert_eq!(data.meta().get("band"), Some(Value::from("f090")));
    assert_eq!(views[&SplitKey::Index(1)].meta().len(), 2);
}

#[test]
fn split_references_records_without_copying() {
    let data = collection(Comm::single(), &["a", "b"]);
    let views = data.split(&SplitBy::Name, false).unwrap();
    let b = &views[&SplitKey::Name("b".to_string())];
    assert!(std::rc::Rc::ptr_eq(&b.obs()[0], &data.obs()[1]));
}

#[test]
fn split_by_name_skips_or_rejects_unnamed() {
    let mut data = Data::new(Comm::single());
    data.push(MockObservation::named("a"));
    data.push(MockObservation::new());
    data.push(MockObservation::named("c"));

    let views = data.split(&SplitBy::Name, false).unwrap();
    let names: Vec<String> = views.keys().map(|k| k.to_string()).collect();
    assert_eq!(names, vec!["a", "c"]);

    match data.split(&SplitBy::Name, true) {
        Err(DataError::MissingField { index: 1, field }) => assert_eq!(field, "name"),
        other => panic!("expected MissingField, got {other:?}"),
    }
}

#[test]
fn split_by_uid_requires_full() {
    let mut data = Data::new(Comm::single());
    data.push(MockObservation::named("no-uid"));
    assert!(data.split(&SplitBy::Uid, false).unwrap().is_empty());
    assert!(matches!(
        data.split(&SplitBy::Uid, true),
        Err(DataError::MissingField { index: 0, .. })
    ));
}

#[test]
fn split_by_key_groups_in_first_seen_order() {
    let mut data = Data::new(Comm::single());
    data.push(MockObservation::named("a").with_value("band", "f150"));
    data.push(MockObservation::named("b").with_value("band", "f090"));
    data.push(MockObservation::named("c"));
    data.push(MockObservation::named("d").with_value("band", "f150"));

    let by = SplitBy::Key("band".to_string());
    let views = data.split(&by, false).unwrap();
    let keys: Vec<String> = views.keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["\"f150\"", "\"f090\""]);
    let f150 = &views[&SplitKey::Value(Value::from("f150"))];
    let names: Vec<String> = f150
        .obs()
        .iter()
        .map(|o| o.borrow().name().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, vec!["a", "d"]);

    match data.split(&by, true) {
        Err(DataError::MissingField { index: 2, field }) => assert_eq!(field, "key 'band'"),
        other => panic!("expected MissingField, got {other:?}"),
    }
}

// ── select ───────────────────────────────────────────────────

#[test]
fn select_combines_criteria_with_or_without_duplicates() {
    let data = collection(Comm::single(), &["scan_0", "scan_1", "cal_0", "scan_2"]);
    let sel = Selection::new().index(0).name("scan_0").uid(2u64);
    let view = data.select(&sel).unwrap();
    let names: Vec<String> = view
        .obs()
        .iter()
        .map(|o| o.borrow().name().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, vec!["scan_0", "cal_0"]);
    assert!(view.is_view());
    assert!(view.meta().ptr_eq(data.meta()));
}

#[test]
fn select_name_pattern_matches_at_start() {
    let data = collection(Comm::single(), &["scan_0", "cal_scan", "scan_1"]);
    let view = data
        .select(&Selection::new().name(Regex::new("scan_\\d").unwrap()))
        .unwrap();
    assert_eq!(view.len(), 2);
}

#[test]
fn select_by_key_and_value() {
    let mut data = Data::new(Comm::single());
    data.push(MockObservation::named("a").with_value("band", "f090"));
    data.push(MockObservation::named("b").with_value("band", "f150"));
    data.push(MockObservation::named("c"));
    data.push(MockObservation::named("d").with_value("band", 90));

    assert_eq!(data.select(&Selection::new().key("band")).unwrap().len(), 3);
    assert_eq!(
        data.select(&Selection::new().key("band").value("f150"))
            .unwrap()
            .len(),
        1
    );
    let pattern = Selection::new().key("band").value(Regex::new("f").unwrap());
    assert_eq!(data.select(&pattern).unwrap().len(), 2);
    assert_eq!(
        data.select(&Selection::new().key("band").value(90)).unwrap().len(),
        1
    );
}

#[test]
fn select_rejects_value_without_key() {
    let data = collection(Comm::single(), &["a"]);
    match data.select(&Selection::new().value("x")) {
        Err(DataError::ValueWithoutKey) => {}
        other => panic!("expected ValueWithoutKey, got {other:?}"),
    }
}

// ── teardown ─────────────────────────────────────────────────

#[test]
fn clear_on_owner_and_view() {
    let mock = MockObservation::named("a");
    let counter = mock.cleared.clone();
    let mut data = Data::new(Comm::single());
    data.push(mock);

    let mut view = data.select(&Selection::new().index(0)).unwrap();
    view.clear();
    assert!(view.is_empty());
    assert_eq!(counter.get(), 0);
    assert_eq!(data.len(), 1);

    data.clear();
    assert_eq!(counter.get(), 1);
    data.clear();
    assert_eq!(counter.get(), 1);
}

#[test]
fn drop_clears_owned_records() {
    let mock = MockObservation::named("a");
    let counter = mock.cleared.clone();
    {
        let mut data = Data::new(Comm::single());
        data.push(mock);
        let view = data.split(&SplitBy::Index, false).unwrap();
        drop(view);
        assert_eq!(counter.get(), 0);
    }
    assert_eq!(counter.get(), 1);
}

// ── reporting ────────────────────────────────────────────────

#[test]
fn info_writes_single_process_summary() {
    let mut data = Data::new(Comm::single());
    data.push(flagged_scan("scan", 4, 10, &[(0, 4)]));
    let mut buf = Vec::new();
    data.info(Some(&mut buf)).unwrap();
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        "Data distributed over a single process\n\
         <Record 'scan' (uid 4): 2 detectors, 10 samples, intervals [valid]>\n"
    );
}

#[test]
fn all_local_detectors_across_records() {
    let mut data = Data::new(Comm::single());
    let mut a = MockObservation::named("a");
    a.detectors = vec!["d1".into(), "d0".into()];
    let mut b = MockObservation::named("b");
    b.detectors = vec!["d0".into(), "d2".into()];
    data.push(a);
    data.push(b);
    assert_eq!(data.all_local_detectors(None), vec!["d1", "d0", "d2"]);
}
