//! Datagram decode benchmarks
//!
//! Measures both grammars over captured datagrams.

#[path = "../tests/common/mod.rs"]
mod common;

use common::*;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sflow_v5::{SflowDecoder, V5FormatOptions, v5_format, v5_metrics};
use std::hint::black_box;

const FIXTURES: [(&str, &str); 4] = [
    ("ipv4_switched", IPV4_SWITCHED),
    ("ipv4_routed", IPV4_ROUTED),
    ("ipv6_switched", IPV6_SWITCHED),
    ("expanded_flow_counter", EXPANDED_FLOW_COUNTER),
];

/// Benchmark metric extraction per datagram
fn bench_decode_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_metrics");
    let mut decoder = SflowDecoder::default();

    for (name, fixture) in FIXTURES {
        let bytes = datagram(fixture);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &bytes, |b, bytes| {
            b.iter(|| {
                let metrics = decoder.decode_metrics(black_box(bytes));
                black_box(metrics).ok();
            });
        });
    }

    group.finish();
}

/// Benchmark full attribute-tree decoding per datagram
fn bench_decode_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_tree");
    let mut decoder = SflowDecoder::default();

    for (name, fixture) in FIXTURES {
        let bytes = datagram(fixture);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &bytes, |b, bytes| {
            b.iter(|| {
                let tree = decoder.decode_tree(black_box(bytes));
                black_box(tree).ok();
            });
        });
    }

    group.finish();
}

/// Benchmark grammar construction, including chain validation
fn bench_build_grammar(c: &mut Criterion) {
    let options = V5FormatOptions::default();

    c.bench_function("build_metrics_grammar", |b| {
        b.iter(|| black_box(v5_metrics(black_box(&options))));
    });
    c.bench_function("build_tree_grammar", |b| {
        b.iter(|| black_box(v5_format(black_box(&options))));
    });
}

criterion_group!(
    benches,
    bench_decode_metrics,
    bench_decode_tree,
    bench_build_grammar
);
criterion_main!(benches);
