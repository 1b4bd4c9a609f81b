//! Performance benchmarks for envset
//!
//! Measures a full parse pass over environments of increasing size and the
//! duration grammar on its own.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use envset::{store::duration::parse_duration, EnvSet, Policy};
use std::hint::black_box;
use std::time::Duration;

/// Environment with `declared` matching entries plus `noise` unrelated ones
fn synthetic_environment(declared: usize, noise: usize) -> Vec<String> {
    let mut entries = Vec::with_capacity(declared + noise);
    for i in 0..declared {
        match i % 4 {
            0 => entries.push(format!("BENCH_S{}=value-{}", i, i)),
            1 => entries.push(format!("BENCH_S{}={}", i, i * 7)),
            2 => entries.push(format!("BENCH_S{}=true", i)),
            _ => entries.push(format!("BENCH_S{}=1m{}s", i, i % 60)),
        }
    }
    for i in 0..noise {
        entries.push(format!("UNRELATED_{}=/usr/local/bin:{}", i, i));
    }
    entries
}

fn declared_set(declared: usize) -> EnvSet {
    let mut env = EnvSet::new(
        Policy::new("BENCH_")
            .with_extra_keys_error(true)
            .with_missing_keys_error(true),
    );
    for i in 0..declared {
        let name = format!("S{}", i);
        let result = match i % 4 {
            0 => env.string(&name, "", "").map(|_| ()),
            1 => env.int(&name, 0, "").map(|_| ()),
            2 => env.bool(&name, false, "").map(|_| ()),
            _ => env.duration(&name, Duration::ZERO, "").map(|_| ()),
        };
        result.unwrap();
    }
    env
}

fn benchmark_parse_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_pass");

    for declared in [8usize, 64, 512] {
        let entries = synthetic_environment(declared, 200);
        let mut env = declared_set(declared);

        group.bench_with_input(BenchmarkId::new("settings", declared), &entries, |b, entries| {
            b.iter(|| black_box(env.parse_from(entries.as_slice())).is_ok())
        });
    }

    group.finish();
}

fn benchmark_problem_reporting(c: &mut Criterion) {
    let mut entries = synthetic_environment(64, 0);
    entries.extend((0..64).map(|i| format!("BENCH_TYPO{}=1", i)));
    entries.extend((0..64).map(|i| format!("BENCH_S{}=not-a-number", i * 4 + 1)));
    let mut env = declared_set(64);

    c.bench_function("parse_pass_with_problems", |b| {
        b.iter(|| black_box(env.parse_from(entries.as_slice())).is_err())
    });
}

fn benchmark_duration_grammar(c: &mut Criterion) {
    let inputs = ["0", "300ms", "1m3s", "1.5h", "2h45m30.5s", "-1s", "bogus"];

    c.bench_function("parse_duration", |b| {
        b.iter(|| {
            for input in inputs {
                let _ = black_box(parse_duration(black_box(input)));
            }
        })
    });
}

criterion_group!(
    benches,
    benchmark_parse_pass,
    benchmark_problem_reporting,
    benchmark_duration_grammar
);
criterion_main!(benches);
