mod common;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use dealsum::prelude::*;
use std::io::Cursor;
use tokio::runtime::Runtime;

const DEALS: usize = 20_000;

fn processor(mode: DecodeMode) -> DealProcessor {
    DealProcessor::new(RecordDecoder::new(mode), FilterCriteria::new())
}

/// Sequential runner vs the pipeline at increasing worker counts
fn bench_runner_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("runner_scaling");
    let runtime = Runtime::new().unwrap();
    let input = common::generate_ndjson_dataset(DEALS, 200, 50);
    let source = RecordSource::new(Framing::Ndjson);
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("sequential", |b| {
        b.to_async(&runtime).iter(|| async {
            let outcome = SequentialRunner::new(processor(DecodeMode::Partial), SilentSkip)
                .run(source.from_reader(Cursor::new(input.clone())), TableSink::new())
                .await
                .unwrap();
            black_box(outcome.output.total())
        })
    });

    for workers in [1, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::new("pipeline", workers), &workers, |b, &workers| {
            b.to_async(&runtime).iter(|| async {
                let outcome = Pipeline::new(processor(DecodeMode::Partial), SilentSkip)
                    .with_config(PipelineConfig::default().with_workers(workers))
                    .run(source.from_reader(Cursor::new(input.clone())), TableSink::new())
                    .await
                    .unwrap();
                black_box(outcome.output.total())
            })
        });
    }

    group.finish();
}

/// Partial decode of the filter fields vs full decode and re-encode
fn bench_decode_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_modes");
    let runtime = Runtime::new().unwrap();
    let input = common::generate_ndjson_dataset(DEALS, 200, 50);
    let source = RecordSource::new(Framing::Ndjson);
    group.throughput(Throughput::Elements(DEALS as u64));

    group.bench_function("aggregate_partial", |b| {
        b.to_async(&runtime).iter(|| async {
            let outcome = Pipeline::new(processor(DecodeMode::Partial), SilentSkip)
                .run(source.from_reader(Cursor::new(input.clone())), TableSink::new())
                .await
                .unwrap();
            black_box(outcome.stats)
        })
    });

    group.bench_function("emit_full", |b| {
        b.to_async(&runtime).iter(|| async {
            let outcome = Pipeline::new(processor(DecodeMode::Full), SilentSkip)
                .run(
                    source.from_reader(Cursor::new(input.clone())),
                    NdjsonSink::new(tokio::io::sink()),
                )
                .await
                .unwrap();
            black_box(outcome.output)
        })
    });

    group.finish();
}

/// NDJSON framing vs the streaming map-document walker
fn bench_framings(c: &mut Criterion) {
    let mut group = c.benchmark_group("framings");
    let runtime = Runtime::new().unwrap();

    for (name, framing, input) in [
        ("ndjson", Framing::Ndjson, common::generate_ndjson_dataset(DEALS, 200, 50)),
        ("map_document", Framing::MapDocument, common::generate_map_document(DEALS, 200, 50)),
    ] {
        let source = RecordSource::new(framing);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_function(name, |b| {
            b.to_async(&runtime).iter(|| async {
                let outcome = SequentialRunner::new(processor(DecodeMode::Partial), SilentSkip)
                    .run(source.from_reader(Cursor::new(input.clone())), TableSink::new())
                    .await
                    .unwrap();
                black_box(outcome.stats.processed)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_runner_scaling, bench_decode_modes, bench_framings);
criterion_main!(benches);
