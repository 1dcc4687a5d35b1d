use criterion::{black_box, criterion_group, criterion_main, Criterion};
use evalexpr::*;
use scicalc_rs::graph::{self, Domain, DEFAULT_STEPS};
use scicalc_rs::{Bindings, MathEngine};
use std::collections::HashMap;

/// Benchmark simple arithmetic expressions
fn benchmark_simple_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("Simple arithmetic Expression Evaluation");

    let engine = MathEngine::new();
    let context = Bindings::new();

    let expr = "2 + 3 * 4";
    let parsed = engine.parse(expr).unwrap();
    let precompiled_evalexpr = build_operator_tree::<DefaultNumericTypes>(expr).unwrap();

    group.bench_function("scicalc_arithmetic", |b| {
        b.iter(|| engine.evaluate(black_box(expr), black_box(&context)))
    });

    group.bench_function("parsed_arithmetic", |b| {
        b.iter(|| engine.evaluate_ast(black_box(&parsed), black_box(&context)))
    });

    group.bench_function("native_rust_arithmetic", |b| {
        b.iter(|| black_box(2.0) + black_box(3.0) * black_box(4.0))
    });

    group.bench_function("meval_arithmetic", |b| {
        b.iter(|| meval::eval_str(black_box(expr)).unwrap())
    });

    group.bench_function("evalexpr_arithmetic", |b| {
        b.iter(|| evalexpr::eval(black_box(expr)).unwrap())
    });

    group.bench_function("precompiled_evalexpr_arithmetic", |b| {
        b.iter(|| precompiled_evalexpr.eval().unwrap())
    });
}

/// Benchmark complex arithmetic expressions
fn benchmark_complex_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("Complex arithmetic Expression Evaluation");

    let engine = MathEngine::new();
    let context = Bindings::new();

    let expr = "(10 + 20) * 3 / (4 - 1) + 5 ^ 2 - -(7 / 2)";
    let parsed = engine.parse(expr).unwrap();

    group.bench_function("scicalc_complex_arithmetic", |b| {
        b.iter(|| engine.evaluate(black_box(expr), black_box(&context)))
    });

    group.bench_function("parsed_complex_arithmetic", |b| {
        b.iter(|| engine.evaluate_ast(black_box(&parsed), black_box(&context)))
    });

    group.bench_function("meval_complex_arithmetic", |b| {
        b.iter(|| meval::eval_str(black_box(expr)).unwrap())
    });
}

/// Benchmark expressions calling the standard functions
fn benchmark_function_calls(c: &mut Criterion) {
    let mut group = c.benchmark_group("Function Call Evaluation");

    let engine = MathEngine::new();
    let context = HashMap::from([("x".to_string(), 0.75)]);

    let expr = "sqrt(abs(sin(x) * 100)) + cos(x) ^ 2 - atan(x)";
    let parsed = engine.parse(expr).unwrap();
    let meval_expr: meval::Expr = expr.parse().unwrap();
    let meval_fn = meval_expr.bind("x").unwrap();

    group.bench_function("scicalc_function_calls", |b| {
        b.iter(|| engine.evaluate(black_box(expr), black_box(&context)))
    });

    group.bench_function("parsed_function_calls", |b| {
        b.iter(|| engine.evaluate_ast(black_box(&parsed), black_box(&context)))
    });

    group.bench_function("meval_bound_function_calls", |b| {
        b.iter(|| meval_fn(black_box(0.75)))
    });
}

/// Benchmark a full graph sweep
fn benchmark_graph_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("Graph Sweep");

    let engine = MathEngine::new();
    let expr = "sin(x) * x ^ 2 / (1 + abs(x))";

    group.bench_function("sample_default_steps", |b| {
        b.iter(|| graph::sample(&engine, black_box(expr), Domain::default(), DEFAULT_STEPS))
    });

    group.bench_function("sequential_parsed_sweep", |b| {
        let parsed = engine.parse(expr).unwrap();
        b.iter(|| {
            graph::linspace(-10.0, 10.0, DEFAULT_STEPS)
                .into_iter()
                .map(|x| {
                    let context = HashMap::from([("x".to_string(), x)]);
                    engine.evaluate_ast(&parsed, &context).unwrap_or(f64::NAN)
                })
                .sum::<f64>()
        })
    });
}

criterion_group!(
    benches,
    benchmark_simple_arithmetic,
    benchmark_complex_arithmetic,
    benchmark_function_calls,
    benchmark_graph_sweep
);
criterion_main!(benches);
