use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use k1_tutor::core::{worksheet_total, FixedClock, SnapshotService, WorksheetService};
use k1_tutor::domain::chrono::{TimeZone, Utc};
use k1_tutor::domain::{EntryDirection, Worksheet};
use k1_storage_json::JsonFileStore;
use tempfile::tempdir;

fn build_sample_worksheet(entry_count: usize) -> Worksheet {
    let mut worksheet = Worksheet::new("50000");
    for idx in 0..entry_count {
        let direction = if idx % 3 == 0 {
            EntryDirection::Decrease
        } else {
            EntryDirection::Increase
        };
        WorksheetService::add_entry_with(
            &mut worksheet,
            direction,
            format!("Entry {idx}"),
            format!("{}.25", 100 + idx % 500),
        );
    }
    worksheet
}

fn bench_running_total(c: &mut Criterion) {
    let worksheet = build_sample_worksheet(10_000);
    c.bench_function("worksheet_total_10k", |b| {
        b.iter(|| black_box(worksheet_total(black_box(&worksheet))))
    });
}

fn bench_snapshot_io(c: &mut Criterion) {
    let worksheet = build_sample_worksheet(black_box(2_000));
    let dir = tempdir().expect("tempdir");
    let store = Arc::new(JsonFileStore::new(dir.path().join("store")).expect("store"));
    let clock = Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().expect("date"),
    ));
    let snapshots = SnapshotService::new(store, clock);

    c.bench_function("snapshot_save_2k", |b| {
        b.iter(|| {
            snapshots.save("bench", &worksheet).expect("save snapshot");
        })
    });

    c.bench_function("snapshot_load_2k", |b| {
        b.iter(|| {
            let loaded = snapshots.load("bench").expect("load snapshot");
            black_box(loaded);
        })
    });
}

criterion_group!(benches, bench_running_total, bench_snapshot_io);
criterion_main!(benches);
