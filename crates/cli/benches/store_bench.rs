use analytics::{rank, sort, ClassStats, SortKey};
use config::SubjectConfig;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use store::RecordStore;
use tempfile::{tempdir, TempDir};

const N_RECORDS: i32 = 2_000;

fn build_store() -> (TempDir, RecordStore) {
    let dir = tempdir().unwrap();
    let store = RecordStore::new(
        dir.path().join("student.dat"),
        dir.path().join("student_backup.dat"),
        SubjectConfig::default(),
    );
    for r in 0..N_RECORDS {
        let m = (r % 100) as f32;
        store
            .insert(r, &format!("student {}", r), vec![m, 100.0 - m, 50.0])
            .unwrap();
    }
    (dir, store)
}

fn append_benchmark(c: &mut Criterion) {
    c.bench_function("store_append_100", |b| {
        b.iter_batched(
            || {
                let dir = tempdir().unwrap();
                let store = RecordStore::new(
                    dir.path().join("student.dat"),
                    dir.path().join("student_backup.dat"),
                    SubjectConfig::default(),
                );
                (dir, store)
            },
            |(_dir, store)| {
                for r in 0..100 {
                    store.insert(r, "bench", vec![50.0, 60.0, 70.0]).unwrap();
                }
            },
            BatchSize::SmallInput,
        );
    });
}

fn scan_benchmark(c: &mut Criterion) {
    let (_dir, store) = build_store();

    c.bench_function("store_load_all_2k", |b| {
        b.iter(|| {
            let all = store.load_all().unwrap();
            assert_eq!(all.len(), N_RECORDS as usize);
        });
    });

    c.bench_function("store_find_last_2k", |b| {
        b.iter(|| assert!(store.find(N_RECORDS - 1).unwrap().is_some()));
    });
}

fn rewrite_benchmark(c: &mut Criterion) {
    c.bench_function("store_update_middle_2k", |b| {
        b.iter_batched(
            build_store,
            |(_dir, store)| {
                store.update(N_RECORDS / 2, |s| s.marks[0] = 99.0).unwrap();
            },
            BatchSize::LargeInput,
        );
    });
}

fn analytics_benchmark(c: &mut Criterion) {
    let (_dir, store) = build_store();
    let records = store.load_all().unwrap();

    c.bench_function("analytics_stats_2k", |b| {
        b.iter(|| ClassStats::compute(&records, store.subjects()).unwrap().class_size);
    });

    c.bench_function("analytics_sort_name_2k", |b| {
        b.iter_batched(
            || records.clone(),
            |recs| sort(recs, SortKey::Name),
            BatchSize::SmallInput,
        );
    });

    c.bench_function("analytics_rank_2k", |b| {
        b.iter_batched(|| records.clone(), rank, BatchSize::SmallInput);
    });
}

criterion_group!(
    benches,
    append_benchmark,
    scan_benchmark,
    rewrite_benchmark,
    analytics_benchmark
);
criterion_main!(benches);
