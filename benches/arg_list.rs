use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use genprint::resolve::parse_arg_list;

fn make_flat_call(n: usize) -> String {
    let args = (0..n).map(|i| format!("arg{}", i)).collect::<Vec<_>>();
    format!("({})", args.join(", "))
}

fn make_nested_call(depth: usize) -> String {
    let mut text = "x".to_string();
    for i in 0..depth {
        text = format!("f{}({}, {})", i, text, i);
    }
    format!("({}, tail)", text)
}

fn bench_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("arg_list/flat");
    for &n in &[1, 10, 100] {
        let text = make_flat_call(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &text, |b, text| {
            b.iter(|| parse_arg_list(black_box(text)))
        });
    }
    group.finish();
}

fn bench_nested(c: &mut Criterion) {
    let mut group = c.benchmark_group("arg_list/nested");
    for &depth in &[2, 8, 32] {
        let text = make_nested_call(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &text, |b, text| {
            b.iter(|| parse_arg_list(black_box(text)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_flat, bench_nested);
criterion_main!(benches);
