use hiscore_tracker::record::{
    CaptureTime, EntityName, FileRecordStore, InMemoryRecordStore, RecordStore, SkillRecord,
    SkillTable, Snapshot, SnapshotLoader,
};
use hiscore_tracker::TrackerError;
use std::fs;

fn name(raw: &str) -> EntityName {
    EntityName::parse(raw).unwrap()
}

fn snapshot(at: &str, attack_level: i64) -> Snapshot {
    let mut metrics = SkillTable::new();
    metrics.insert("attack".to_string(), SkillRecord::new(5000, attack_level, 100_000));
    metrics.insert("overall".to_string(), SkillRecord::new(90_000, 500, 2_000_000));
    Snapshot::new(CaptureTime::parse(at).unwrap(), metrics)
}

#[test]
fn test_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileRecordStore::new(dir.path().join("records"));
    let zezima = name("zezima");
    let original = snapshot("2020-04-27 14:30:05", 70);

    store.append_snapshot(&zezima, &original).unwrap();

    let report = SnapshotLoader::load_all(&store, &zezima).unwrap();
    assert!(report.warnings.is_empty());
    assert_eq!(report.snapshots, vec![original]);
}

#[test]
fn test_record_layout_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileRecordStore::new(dir.path());
    store
        .append_snapshot(&name("Zezima"), &snapshot("2020-04-27 14:30:05", 70))
        .unwrap();

    let path = dir.path().join("zezima").join("2020-04-27_14-30-05.json");
    assert!(path.is_file(), "record should be named by its sanitized timestamp");

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(value["date"], "2020-04-27 14:30:05");
    assert_eq!(value["attack"]["level"], 70);
    assert_eq!(value["attack"]["experience"], 100_000);
    assert_eq!(value["attack"]["rank"], 5000);
}

#[test]
fn test_duplicate_timestamp_keeps_first_record() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileRecordStore::new(dir.path());
    let foo = name("foo");

    store.append_snapshot(&foo, &snapshot("2024-01-01 00:00:00", 50)).unwrap();
    let path = dir.path().join("foo").join("2024-01-01_00-00-00.json");
    let before = fs::read(&path).unwrap();

    let err = store
        .append_snapshot(&foo, &snapshot("2024-01-01 00:00:00", 99))
        .unwrap_err();
    assert!(matches!(err, TrackerError::DuplicateTimestamp { .. }), "got {err:?}");
    assert_eq!(fs::read(&path).unwrap(), before, "first record must be untouched");

    let report = SnapshotLoader::load_all(&store, &foo).unwrap();
    assert_eq!(report.snapshots.len(), 1);
    assert_eq!(report.snapshots[0].metrics["attack"].level, Some(50));
}

#[test]
fn test_list_entities_without_root_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileRecordStore::new(dir.path().join("never_created"));
    assert!(store.list_entities().unwrap().is_empty());
}

#[test]
fn test_list_entities_ignores_stray_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileRecordStore::new(dir.path());
    store.ensure_entity(&name("b0aty")).unwrap();
    store.ensure_entity(&name("zezima")).unwrap();
    store.ensure_entity(&name("zezima")).unwrap(); // idempotent
    fs::write(dir.path().join("notes.txt"), "not an account").unwrap();

    let names: Vec<String> = store
        .list_entities()
        .unwrap()
        .into_iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(names, vec!["b0aty", "zezima"]);
}

#[test]
fn test_rename_preserves_data() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileRecordStore::new(dir.path());
    let old = name("zezima");
    let new = name("zezima2");
    store.append_snapshot(&old, &snapshot("2020-04-27 14:30:05", 70)).unwrap();
    store.append_snapshot(&old, &snapshot("2020-05-01 09:00:00", 72)).unwrap();
    let mut before = SnapshotLoader::load_all(&store, &old).unwrap().snapshots;

    store.rename_entity(&old, &new).unwrap();

    let mut after = SnapshotLoader::load_all(&store, &new).unwrap().snapshots;
    before.sort_by_key(|s| s.captured_at);
    after.sort_by_key(|s| s.captured_at);
    assert_eq!(before, after);
    assert!(SnapshotLoader::load_all(&store, &old).unwrap().is_empty());
}

#[test]
fn test_rename_checks_before_mutating() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileRecordStore::new(dir.path());
    let a = name("alpha");
    let b = name("beta");
    store.append_snapshot(&a, &snapshot("2020-04-27 14:30:05", 70)).unwrap();
    store.append_snapshot(&b, &snapshot("2020-04-28 14:30:05", 71)).unwrap();

    let err = store.rename_entity(&name("ghost"), &name("spirit")).unwrap_err();
    assert!(matches!(err, TrackerError::UnknownEntity(ref n) if n == "ghost"));

    let err = store.rename_entity(&a, &b).unwrap_err();
    assert!(matches!(err, TrackerError::NameCollision(ref n) if n == "beta"));

    // Both entities untouched.
    assert_eq!(SnapshotLoader::load_all(&store, &a).unwrap().snapshots.len(), 1);
    assert_eq!(
        SnapshotLoader::load_all(&store, &b).unwrap().snapshots[0].metrics["attack"].level,
        Some(71)
    );
}

#[test]
fn test_delete_entity() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileRecordStore::new(dir.path());
    let foo = name("foo");
    store.append_snapshot(&foo, &snapshot("2024-01-01 00:00:00", 50)).unwrap();

    store.delete_entity(&foo).unwrap();
    assert!(!dir.path().join("foo").exists());
    assert!(store.list_entities().unwrap().is_empty());

    let err = store.delete_entity(&foo).unwrap_err();
    assert!(matches!(err, TrackerError::UnknownEntity(_)));
}

#[test]
fn test_entity_names_are_normalized_and_checked() {
    assert_eq!(name("  Zezima ").as_str(), "zezima");
    assert_eq!(name("Iron Man").as_str(), "iron man");

    for bad in ["", "   ", "../etc", "a/b", "a\\b", ".hidden"] {
        assert!(
            matches!(EntityName::parse(bad), Err(TrackerError::InvalidEntityName(_))),
            "{bad:?} should be rejected"
        );
    }
}

#[test]
fn test_in_memory_store_matches_file_contract() {
    let mut store = InMemoryRecordStore::new();
    let foo = name("foo");
    let bar = name("bar");

    assert!(store.list_entities().unwrap().is_empty());
    store.append_snapshot(&foo, &snapshot("2024-01-01 00:00:00", 50)).unwrap();
    assert!(matches!(
        store.append_snapshot(&foo, &snapshot("2024-01-01 00:00:00", 51)),
        Err(TrackerError::DuplicateTimestamp { .. })
    ));

    store.ensure_entity(&bar).unwrap();
    assert!(matches!(store.rename_entity(&foo, &bar), Err(TrackerError::NameCollision(_))));

    store.delete_entity(&bar).unwrap();
    store.rename_entity(&foo, &bar).unwrap();
    let report = SnapshotLoader::load_all(&store, &bar).unwrap();
    assert_eq!(report.snapshots.len(), 1);
    assert_eq!(report.snapshots[0].metrics["attack"].level, Some(50));
    assert!(store.records(&foo).unwrap().is_empty());
}

#[test]
fn test_reserved_date_metric_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileRecordStore::new(dir.path());
    let foo = name("foo");
    let mut bad = snapshot("2024-01-01 00:00:00", 50);
    bad.metrics.insert("date".to_string(), SkillRecord::new(1, 1, 1));

    let err = store.append_snapshot(&foo, &bad).unwrap_err();
    assert!(matches!(err, TrackerError::ReservedMetricName(ref k) if k == "date"));
    assert!(!dir.path().join("foo").exists(), "nothing should be written");

    let mut memory = InMemoryRecordStore::new();
    assert!(matches!(
        memory.append_snapshot(&foo, &bad),
        Err(TrackerError::ReservedMetricName(_))
    ));

    // The same capture without the reserved key round-trips.
    bad.metrics.remove("date");
    store.append_snapshot(&foo, &bad).unwrap();
    let report = SnapshotLoader::load_all(&store, &foo).unwrap();
    assert!(report.warnings.is_empty());
    assert_eq!(report.snapshots, vec![bad]);
}

#[test]
fn test_mixed_case_directories_are_not_listed() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileRecordStore::new(dir.path());
    store.append_snapshot(&name("zezima"), &snapshot("2024-01-01 00:00:00", 50)).unwrap();
    let legacy = dir.path().join("Zezima2");
    fs::create_dir(&legacy).unwrap();
    fs::copy(
        dir.path().join("zezima").join("2024-01-01_00-00-00.json"),
        legacy.join("2024-01-01_00-00-00.json"),
    )
    .unwrap();

    let names: Vec<String> = store
        .list_entities()
        .unwrap()
        .into_iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(names, vec!["zezima"]);
    // Every listed name resolves.
    for listed in store.list_entities().unwrap() {
        assert!(!SnapshotLoader::load_all(&store, &listed).unwrap().is_empty());
    }
}
