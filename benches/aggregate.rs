//! This bench compares the per-bucket aggregation of a population against
//! evaluating every person individually.

#![allow(missing_docs)]

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use exam_planner::{
    aggregate_columns, aggregate_columns_per_individual, storage::builtin_catalog,
    AnalysisColumn, BucketKind, RequirementEngine,
};

/// Builds one column per catalog clause, plus a column selecting every clause.
fn columns(engine: &RequirementEngine, headcount: u64) -> Vec<AnalysisColumn> {
    let catalog = engine.catalog();
    let mut columns: Vec<AnalysisColumn> = catalog
        .iter()
        .map(|entry| AnalysisColumn {
            name: entry.id().to_string(),
            clauses: vec![entry.id().clone()],
            ..AnalysisColumn::default()
        })
        .collect();
    columns.push(AnalysisColumn {
        name: "All clauses".to_string(),
        clauses: catalog.iter().map(|entry| entry.id().clone()).collect(),
        ..AnalysisColumn::default()
    });

    for column in &mut columns {
        for kind in BucketKind::ALL {
            column.set_headcount(kind, headcount);
        }
    }
    columns
}

fn aggregate(c: &mut Criterion) {
    let engine = RequirementEngine::new(Arc::new(builtin_catalog()));
    let mut group = c.benchmark_group("aggregate");

    for headcount in [10, 100, 1_000] {
        let columns = columns(&engine, headcount);
        group.bench_with_input(
            BenchmarkId::new("per bucket", headcount),
            &columns,
            |b, columns| b.iter(|| aggregate_columns(&engine, columns)),
        );
        group.bench_with_input(
            BenchmarkId::new("per individual", headcount),
            &columns,
            |b, columns| b.iter(|| aggregate_columns_per_individual(&engine, columns)),
        );
    }
    group.finish();
}

criterion_group!(benches, aggregate);
criterion_main!(benches);
