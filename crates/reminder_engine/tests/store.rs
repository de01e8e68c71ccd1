mod common;

use std::fs;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use common::{bundled_like, fresh_corpus};
use pretty_assertions::assert_eq;
use reminder_core::{ItemId, ScheduleState, SeenSet};
use reminder_engine::{
    CacheStore, ScheduleStore, StoreError, CORPUS_FILENAME, SCHEDULE_FILENAME, SEEN_FILENAME,
};
use tempfile::TempDir;

fn seen(ids: &[&str]) -> SeenSet {
    ids.iter().map(|id| ItemId::new(*id)).collect()
}

#[test]
fn missing_schedule_loads_as_none() {
    let temp = TempDir::new().unwrap();
    let store = ScheduleStore::new(temp.path().join("data"));
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn schedule_survives_restart() {
    let temp = TempDir::new().unwrap();
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    let mut schedule = ScheduleState::new(now, Duration::from_secs(45 * 60));
    schedule.last_shown_id = Some(ItemId::new("quran:2:286"));
    schedule.paused = true;

    ScheduleStore::new(temp.path().to_path_buf())
        .save(&schedule)
        .unwrap();
    let loaded = ScheduleStore::new(temp.path().to_path_buf())
        .load()
        .unwrap();

    assert_eq!(loaded, Some(schedule));
}

#[test]
fn schedule_from_older_build_defaults_missing_fields() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(SCHEDULE_FILENAME),
        r#"(next_fire_at: "2024-05-01T11:00:00Z", interval_secs: 3600)"#,
    )
    .unwrap();

    let loaded = ScheduleStore::new(temp.path().to_path_buf())
        .load()
        .unwrap()
        .unwrap();
    assert_eq!(
        loaded.next_fire_at,
        Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap()
    );
    assert_eq!(loaded.interval, Duration::from_secs(3600));
    assert_eq!(loaded.last_shown_id, None);
    assert!(!loaded.paused);
}

#[test]
fn schedule_from_newer_build_ignores_unknown_fields() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(SCHEDULE_FILENAME),
        r#"(
            format_version: 7,
            next_fire_at: "2024-05-01T11:00:00Z",
            interval_secs: 600,
            paused: false,
            snooze_count: 3,
        )"#,
    )
    .unwrap();

    let loaded = ScheduleStore::new(temp.path().to_path_buf())
        .load()
        .unwrap()
        .unwrap();
    assert_eq!(loaded.interval, Duration::from_secs(600));
}

#[test]
fn corrupt_schedule_is_a_parse_error() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(SCHEDULE_FILENAME), "(next_fire_at: ").unwrap();

    let err = ScheduleStore::new(temp.path().to_path_buf())
        .load()
        .unwrap_err();
    assert!(matches!(err, StoreError::Parse { .. }));
}

#[test]
fn corpus_survives_restart() {
    let temp = TempDir::new().unwrap();
    let store = CacheStore::new(temp.path().to_path_buf());
    let corpus = fresh_corpus("rev-1", &["a", "b", "c"]);

    store.save_corpus(&corpus).unwrap();
    let loaded = CacheStore::new(temp.path().to_path_buf())
        .load_corpus()
        .unwrap();

    assert_eq!(loaded, Some(corpus));
}

#[test]
fn stored_corpus_with_duplicate_ids_is_invalid() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(CORPUS_FILENAME),
        r#"(
            revision: "x",
            items: [
                (id: "a", text: "one"),
                (id: "a", text: "two"),
            ],
        )"#,
    )
    .unwrap();

    let err = CacheStore::new(temp.path().to_path_buf())
        .load_corpus()
        .unwrap_err();
    assert!(matches!(err, StoreError::Invalid { .. }));
}

#[test]
fn seen_set_survives_restart() {
    let temp = TempDir::new().unwrap();
    let store = CacheStore::new(temp.path().to_path_buf());
    let corpus = bundled_like("rev-1", &["a", "b", "c"]);

    store.save_seen(&corpus, &seen(&["a", "c"])).unwrap();
    let loaded = store.load_seen(&corpus).unwrap();

    assert_eq!(loaded, seen(&["a", "c"]));
}

#[test]
fn seen_set_for_other_revision_is_discarded() {
    let temp = TempDir::new().unwrap();
    let store = CacheStore::new(temp.path().to_path_buf());

    store
        .save_seen(&bundled_like("rev-1", &["a", "b"]), &seen(&["a"]))
        .unwrap();
    let loaded = store
        .load_seen(&bundled_like("rev-2", &["a", "b"]))
        .unwrap();

    assert!(loaded.is_empty());
}

#[test]
fn seen_ids_outside_the_corpus_are_dropped() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(SEEN_FILENAME),
        r#"(format_version: 1, revision: "rev-1", ids: ["a", "gone"])"#,
    )
    .unwrap();

    let loaded = CacheStore::new(temp.path().to_path_buf())
        .load_seen(&bundled_like("rev-1", &["a", "b"]))
        .unwrap();

    assert_eq!(loaded, seen(&["a"]));
}

#[test]
fn missing_seen_record_is_empty() {
    let temp = TempDir::new().unwrap();
    let loaded = CacheStore::new(temp.path().to_path_buf())
        .load_seen(&bundled_like("rev-1", &["a"]))
        .unwrap();
    assert!(loaded.is_empty());
}

#[test]
fn corpus_from_older_build_defaults_missing_fields() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(CORPUS_FILENAME),
        r#"(revision: "rev-0", items: [(id: "a", text: "one")])"#,
    )
    .unwrap();

    let loaded = CacheStore::new(temp.path().to_path_buf())
        .load_corpus()
        .unwrap()
        .unwrap();

    assert_eq!(loaded.revision(), "rev-0");
    assert_eq!(loaded.fetched_at(), None);
    assert_eq!(loaded.items()[0].reference(), None);
}

#[test]
fn corpus_from_newer_build_ignores_unknown_fields() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(CORPUS_FILENAME),
        r#"(
            format_version: 5,
            revision: "rev-9",
            fetched_at: Some("2024-05-01T10:00:00Z"),
            source: "endpoint",
            items: [
                (id: "a", text: "one", reference: Some("Quran 1:1"), tags: ["x"]),
            ],
        )"#,
    )
    .unwrap();

    let loaded = CacheStore::new(temp.path().to_path_buf())
        .load_corpus()
        .unwrap()
        .unwrap();

    assert_eq!(loaded.revision(), "rev-9");
    assert_eq!(
        loaded.fetched_at(),
        Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
    );
    assert_eq!(loaded.items()[0].reference(), Some("Quran 1:1"));
}

#[test]
fn seen_from_older_build_defaults_missing_fields() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(SEEN_FILENAME), r#"(revision: "rev-1")"#).unwrap();

    let loaded = CacheStore::new(temp.path().to_path_buf())
        .load_seen(&bundled_like("rev-1", &["a", "b"]))
        .unwrap();

    assert!(loaded.is_empty());
}

#[test]
fn seen_from_newer_build_ignores_unknown_fields() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(SEEN_FILENAME),
        r#"(format_version: 4, revision: "rev-1", ids: ["b"], cycle: 12)"#,
    )
    .unwrap();

    let loaded = CacheStore::new(temp.path().to_path_buf())
        .load_seen(&bundled_like("rev-1", &["a", "b"]))
        .unwrap();

    assert_eq!(loaded, seen(&["b"]));
}
