use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use genprint::Value;
use genprint::format::sprint_varx;

fn make_map(n: usize) -> Value {
    Value::map((0..n).map(|i| (format!("key{}", i), i as i64)))
}

fn make_tree(depth: usize) -> Value {
    let mut value = Value::Int(0);
    for i in 0..depth {
        value = Value::map([
            ("left".to_string(), value.clone()),
            ("right".to_string(), Value::list(vec![Value::Int(i as i64), Value::Str("leaf".into())])),
        ]);
    }
    value
}

fn bench_scalar(c: &mut Criterion) {
    let value = Value::Int(255);
    c.bench_function("format_var/scalar", |b| {
        b.iter(|| sprint_varx(black_box("x"), black_box(&value), false, 0, 50, "\n"))
    });
    c.bench_function("format_var/scalar_hex", |b| {
        b.iter(|| sprint_varx(black_box("x"), black_box(&value), true, 0, 50, "\n"))
    });
}

fn bench_wide_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_var/map");
    for &n in &[10, 100, 1000] {
        let value = make_map(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &value, |b, value| {
            b.iter(|| sprint_varx("cfg", black_box(value), false, 0, 50, "\n"))
        });
    }
    group.finish();
}

fn bench_deep_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_var/tree");
    for &depth in &[4, 8, 12] {
        let value = make_tree(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &value, |b, value| {
            b.iter(|| sprint_varx("tree", black_box(value), false, 0, 50, "\n"))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scalar, bench_wide_map, bench_deep_tree);
criterion_main!(benches);
