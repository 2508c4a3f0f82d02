use std::sync::Arc;

use chrono::{TimeZone, Utc};
use k1_core::{
    storage::{KeyValueStore, WORKSHEET_NAMES_KEY},
    FixedClock, ProgressService, SnapshotService, WorksheetService,
};
use k1_domain::{EntryDirection, Worksheet};
use k1_storage_json::JsonFileStore;
use tempfile::tempdir;

#[test]
fn json_store_sets_gets_and_removes() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("store")).expect("create store");

    assert_eq!(store.get("quizResults").expect("get"), None);
    store.set("quizResults", "{}").expect("set");
    assert_eq!(store.get("quizResults").expect("get").as_deref(), Some("{}"));
    assert!(store.record_path("quizResults").exists());

    store.remove("quizResults").expect("remove");
    assert_eq!(store.get("quizResults").expect("get"), None);
    store.remove("quizResults").expect("removing twice is fine");
}

#[test]
fn json_store_lists_decoded_keys() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().to_path_buf()).expect("create store");
    store.set("basisWorksheet_Tax Year/2024", "{}").expect("set");
    store.set("gameProgress", "[]").expect("set");
    std::fs::write(dir.path().join("notes.txt"), "ignored").expect("write stray file");

    assert_eq!(
        store.keys().expect("keys"),
        vec!["basisWorksheet_Tax Year/2024", "gameProgress"]
    );
    assert!(!dir.path().join("gameProgress.json.tmp").exists());
}

#[test]
fn snapshots_survive_a_new_store_instance() {
    let dir = tempdir().expect("tempdir");
    let clock = Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()));
    let mut sheet = Worksheet::new("50000");
    WorksheetService::add_entry_with(&mut sheet, EntryDirection::Decrease, "Distribution", "30000");

    {
        let store = Arc::new(JsonFileStore::new(dir.path().to_path_buf()).expect("store"));
        SnapshotService::new(store, clock.clone())
            .save("2024", &sheet)
            .expect("save");
    }

    let store = Arc::new(JsonFileStore::new(dir.path().to_path_buf()).expect("store"));
    let raw = store.get(WORKSHEET_NAMES_KEY).expect("get").expect("index");
    assert_eq!(raw, r#"["2024"]"#);

    let snapshots = SnapshotService::new(store.clone(), clock.clone());
    let loaded = snapshots.load("2024").expect("load");
    assert_eq!(WorksheetService::total(&loaded.to_worksheet()), k1_domain::Decimal::from(20000));

    let blob: serde_json::Value =
        serde_json::from_str(&store.get("basisWorksheet_2024").unwrap().unwrap()).unwrap();
    assert_eq!(blob["initialBasis"], "50000");
    assert_eq!(blob["items"][0]["type"], "decrease");
    assert_eq!(blob["items"][0]["amount"], "30000");

    let progress = ProgressService::new(store, clock);
    progress.record_quiz_result("basics", 4, 5).expect("record");
    assert_eq!(progress.quiz_results().expect("results")["basics"].score, 4);
}
