//! Performance benchmarks for the calculator engine.
//!
//! Measures operand parsing, bounded writes and the full
//! write-write-write-read session through the endpoint router.
//!
//! # Run Benchmarks
//!
//! ```sh
//! # Run all engine benchmarks
//! cargo bench --bench engine_bench
//!
//! # Run a specific benchmark group
//! cargo bench --bench engine_bench -- operand_parsing
//! ```

use std::hint::black_box;
use std::sync::Arc;

use calcdev_core::{Endpoint, Field};
use calcdev_engine::{CalculatorState, EndpointRouter, parse_operand};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

fn bench_operand_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("operand_parsing");
    group.throughput(Throughput::Elements(1));

    let operands: [(&str, &[u8]); 4] = [
        ("short", b"42"),
        ("negative_newline", b"-1234\n"),
        ("i64_max", b"9223372036854775807"),
        ("invalid", b"12ab"),
    ];

    for (name, operand) in operands {
        group.bench_with_input(BenchmarkId::from_parameter(name), operand, |b, operand| {
            b.iter(|| black_box(parse_operand(black_box(operand))));
        });
    }

    group.finish();
}

fn bench_field_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_write");
    let state = CalculatorState::new();

    for len in [1usize, 20, 100, 150] {
        let data = vec![b'7'; len];
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &data, |b, data| {
            b.iter(|| black_box(state.write_field(Field::OperandA, black_box(data), data.len())));
        });
    }

    group.finish();
}

fn bench_full_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_session");
    group.throughput(Throughput::Elements(1));

    for (name, op) in [("add", b"+"), ("divide", b"/")] {
        group.bench_function(name, |b| {
            let router = EndpointRouter::new(Arc::new(CalculatorState::new()));
            b.iter(|| {
                router.reset();
                router.write(Endpoint::First, black_box(b"123456\n"));
                router.write(Endpoint::Second, black_box(b"-789\n"));
                router.write(Endpoint::Sign, black_box(op));
                black_box(router.read(Endpoint::Result, 64))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_operand_parsing,
    bench_field_write,
    bench_full_session,
);

criterion_main!(benches);
