#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::Session;
use dictdiff_core::{
    ChangeRecord, Commit, DictDiffError, DictionaryObjectFactory, MarkingLog, RecordedKind,
};
use dictdiff_versioning::{materialize_all, materialize_commit, CommitDocument, ObjectFactory};

#[test]
fn test_factory_instance_is_singular() {
    assert!(std::ptr::eq(
        DictionaryObjectFactory::instance(),
        DictionaryObjectFactory::instance()
    ));
}

#[test]
fn test_materialized_commit_replays_like_original() {
    let mut s = Session::new();
    let speed = s.add("Speed");
    let unit = s.add("Unit");

    let mut original = Commit::new();
    original.push(ChangeRecord::added(&speed)).unwrap();
    original
        .push(ChangeRecord::modified(&unit, "symbol", "km/h", "m/s"))
        .unwrap();
    original.seal();
    let json = original.to_document().to_json().unwrap();

    let factory = DictionaryObjectFactory::instance();
    let mut history = factory.create_history();
    let doc = CommitDocument::from_json(&json).unwrap();
    let restored = materialize_commit(factory, &mut history, &doc).unwrap();

    assert_eq!(restored, original);
    assert!(restored.is_sealed());
    assert_eq!(history.len(), 2);

    let mut marking = MarkingLog::new();
    original.replay(&mut s.dict, &s.table, &mut marking).unwrap();
    restored.replay(&mut s.dict, &s.table, &mut marking).unwrap();
    assert_eq!(
        marking.markings()[0].annotations,
        marking.markings()[1].annotations
    );
}

#[test]
fn test_isolated_factory_keeps_separate_history() {
    let mut s = Session::new();
    let speed = s.add("Speed");
    let mut commit = Commit::new();
    commit.push(ChangeRecord::added(&speed)).unwrap();
    let json = serde_json::to_string(&vec![commit.to_document()]).unwrap();

    let isolated = DictionaryObjectFactory::new();
    let mut isolated_history = isolated.create_history();
    let mut shared_history = DictionaryObjectFactory::instance().create_history();

    materialize_all(&isolated, &mut isolated_history, &json).unwrap();

    assert_eq!(isolated_history.changes_for(&speed.id()).len(), 1);
    assert!(shared_history.is_empty());
    materialize_all(
        DictionaryObjectFactory::instance(),
        &mut shared_history,
        &json,
    )
    .unwrap();
    assert_eq!(shared_history.len(), 1);
}

#[test]
fn test_corrupt_kind_survives_materialization_and_fails_replay() {
    let mut s = Session::new();
    let speed = s.add("Speed");
    let json = format!(
        r#"{{
            "commit_id": "00000000-0000-0000-0000-0000000000c0",
            "created_at": "2026-01-01T00:00:00Z",
            "changes": [
                {{"target": "{}", "kind": "add"}},
                {{"target": "{}", "kind": "transmogrify"}}
            ]
        }}"#,
        speed.id(),
        speed.id()
    );

    let factory = DictionaryObjectFactory::instance();
    let mut history = factory.create_history();
    let doc = CommitDocument::from_json(&json).unwrap();
    let commit = materialize_commit(factory, &mut history, &doc).unwrap();

    assert_eq!(
        commit.records()[1].recorded_kind(),
        &RecordedKind::Unrecognized("transmogrify".to_string())
    );
    assert_eq!(history.changes_for(&speed.id()).len(), 2);

    let err = commit
        .replay(&mut s.dict, &s.table, &mut MarkingLog::new())
        .unwrap_err();
    assert!(matches!(
        err,
        DictDiffError::UnrecognizedChangeKind { position: Some(1), .. }
    ));
    assert_eq!(s.text_of(&speed.id()), "Element was added");
}

#[test]
fn test_malformed_json_maps_to_serialization_error() {
    let factory = DictionaryObjectFactory::instance();
    let mut history = factory.create_history();

    let err: DictDiffError = materialize_all(factory, &mut history, "{oops")
        .unwrap_err()
        .into();

    assert!(matches!(err, DictDiffError::Serialization { .. }));
}
