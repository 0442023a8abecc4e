use std::{hint::black_box, sync::Arc};

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use slang_lexicon::{LexicalStore, Term};

fn sample_terms(count: usize) -> Vec<Term> {
    let templates = [
        "laugh out loud|lots of love",
        "rolling on the floor laughing",
        "be right back|back in a minute",
        "not gonna lie, honestly",
        "Déjà vu moment; café talk",
        "greatest of all time",
        "suspicious (suspect) behaviour",
    ];
    (0..count)
        .map(|i| {
            let definitions = templates[i % templates.len()]
                .split('|')
                .map(|d| format!("{d} v{}", i / templates.len()));
            Term::new(format!("term-{i}"), definitions).expect("generated key is non-empty")
        })
        .collect()
}

fn bench_store_build(c: &mut Criterion) {
    let terms = sample_terms(512);
    let mut group = c.benchmark_group("lexicon_build");

    for &count in &[64usize, 512usize] {
        let terms = terms.clone();
        group.bench_function(BenchmarkId::from_parameter(count), move |b| {
            b.iter_batched(
                || terms.iter().take(count).cloned().collect::<Vec<_>>(),
                |batch| black_box(LexicalStore::from_terms(batch)),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_definition_search(c: &mut Criterion) {
    let store = Arc::new(LexicalStore::from_terms(sample_terms(2048)));
    let mut group = c.benchmark_group("lexicon_search");

    let exact_store = Arc::clone(&store);
    group.bench_function("bounded_words", move |b| {
        b.iter(|| {
            black_box(
                exact_store
                    .find_by_definition_substring("on the floor")
                    .len(),
            )
        })
    });

    let partial_store = Arc::clone(&store);
    group.bench_function("partial_word", move |b| {
        b.iter(|| black_box(partial_store.find_by_definition_substring("augh").len()))
    });

    group.bench_function("full_scan", move |b| {
        b.iter(|| black_box(store.find_by_definition_substring(";").len()))
    });

    group.finish();
}

fn bench_index_snapshot(c: &mut Criterion) {
    let store = LexicalStore::from_terms(sample_terms(1024));
    let snapshot = store.index().to_snapshot();
    let snapshot_size = serde_json::to_vec(&snapshot)
        .expect("serialize snapshot for size")
        .len() as u64;

    let mut group = c.benchmark_group("lexicon_snapshot");
    group.throughput(Throughput::Bytes(snapshot_size));
    group.bench_function("serialize_index_json", move |b| {
        b.iter(|| {
            let bytes = serde_json::to_vec(&snapshot).expect("serialize snapshot");
            black_box(bytes.len());
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_store_build,
    bench_definition_search,
    bench_index_snapshot
);
criterion_main!(benches);
