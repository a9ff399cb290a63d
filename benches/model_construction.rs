//! Benchmarks for model construction
//!
//! Measures how fast formulations are assembled, how term normalization scales
//! with repeated variables, and the cost of validating and lowering a model
//! before it is handed to an engine.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use modeler::model::{LinearExpression, Modeler};
use modeler::models::{coloring, facility};

/// Brand of benchmark models
struct Bench;

/// Graph sizes used for the coloring formulation
const GRAPH_SIZES: &[u32] = &[10, 20, 40];

/// Benchmark building coloring models on complete and cycle graphs
fn bench_coloring_formulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("coloring_formulation");

    for &size in GRAPH_SIZES {
        let complete = coloring::complete_graph(size);
        let cycle = coloring::cycle_graph(size);

        group.throughput(Throughput::Elements(complete.edge_count() as u64));
        group.bench_with_input(BenchmarkId::new("complete", size), &complete, |b, graph| {
            b.iter(|| black_box(coloring::formulate(black_box(graph))))
        });

        group.throughput(Throughput::Elements(cycle.edge_count() as u64));
        group.bench_with_input(BenchmarkId::new("cycle", size), &cycle, |b, graph| {
            b.iter(|| black_box(coloring::formulate(black_box(graph))))
        });
    }

    group.finish();
}

/// Benchmark merging repeated terms
fn bench_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalization");

    for &(vars, repeats) in &[(10usize, 10usize), (100, 10), (1000, 4)] {
        let mut model = Modeler::<Bench>::new();
        let x = model.num_var_array(vars, 0.0, 1.0, "x");

        let mut expression = LinearExpression::new(0.0);
        for round in 0..repeats {
            for var in x.iter() {
                expression.add_term((round + 1) as f64, var);
            }
        }

        group.throughput(Throughput::Elements((vars * repeats) as u64));
        group.bench_with_input(
            BenchmarkId::new("terms", vars * repeats),
            &expression,
            |b, expression| b.iter(|| black_box(black_box(expression).normalized())),
        );
    }

    group.finish();
}

/// Benchmark validation and text rendering of a complete formulation
fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");

    let facility = facility::formulate(&facility::FacilityInstance::sample()).expect("sample is consistent");
    group.bench_function("facility_validate", |b| {
        b.iter(|| black_box(black_box(&facility.model).validate()))
    });
    group.bench_function("facility_display", |b| {
        b.iter(|| black_box(black_box(&facility.model).to_string()))
    });

    let coloring = coloring::formulate(&coloring::complete_graph(20));
    group.bench_function("coloring_validate", |b| {
        b.iter(|| black_box(black_box(&coloring.model).validate()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_coloring_formulation,
    bench_normalization,
    bench_validation
);

criterion_main!(benches);
