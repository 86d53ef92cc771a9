//! Pagination throughput benchmarks
//!
//! Measures a full pass over the main data source with varying:
//! - Row counts (10, 100, 1000, 10000)
//! - Calculation load (none, four aggregates)
//!
//! Run benchmarks: `cargo bench --bench pagination_throughput`
//!
//! Compare specific groups:
//! ```
//! cargo bench --bench pagination_throughput -- "rows"
//! cargo bench --bench pagination_throughput -- "calculations"
//! ```

use banded::{
    Band, Calculation, CalculationKind, Drawable, RecordingRenderer, Report, ReportGenerator,
    ResetScope, VarType, Variable, VecDataSource,
};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::json;
use std::hint::black_box;

/// Listing with a page header, three body fields and a page footer.
fn listing(with_calculations: bool) -> Report {
    let mut report = Report::default();
    report.set_band_height(Band::Header, 10.0).expect("header height");
    report.set_band_height(Band::Body, 5.0).expect("body height");
    report.set_band_height(Band::Footer, 10.0).expect("footer height");

    report
        .add_to_band(
            Band::Header,
            (0.0, 0.0),
            Drawable::text((60.0, 8.0), "'Page %d' % system.page"),
        )
        .expect("header text");
    for (x, expression) in [
        (0.0, "row.name"),
        (80.0, "row.qty"),
        (120.0, "'%.2f' % (row.qty * row.price)"),
    ] {
        report
            .add_to_band(Band::Body, (x, 0.0), Drawable::text((40.0, 5.0), expression))
            .expect("body text");
    }
    report
        .add_to_band(Band::Footer, (0.0, 9.0), Drawable::hline(-1.0))
        .expect("footer rule");

    if with_calculations {
        for name in ["page_total", "total", "avg_price", "max_qty"] {
            report.add_variable(Variable::new(name, VarType::Float, 0));
        }
        report.add_calculation(
            Calculation::new(CalculationKind::Sum, "page_total", "row.qty * row.price")
                .with_reset(ResetScope::Page),
        );
        report.add_calculation(Calculation::new(
            CalculationKind::Sum,
            "total",
            "row.qty * row.price",
        ));
        report.add_calculation(Calculation::new(CalculationKind::Avg, "avg_price", "row.price"));
        report.add_calculation(Calculation::new(CalculationKind::Max, "max_qty", "row.qty"));
    }
    report
}

/// Generate test data rows
fn generate_rows(count: usize) -> Vec<serde_json::Value> {
    (0..count)
        .map(|i| {
            json!({
                "name": format!("Item {}", i),
                "qty": i % 7 + 1,
                "price": (i % 100) as f64 * 1.25
            })
        })
        .collect()
}

fn run(report: Report, rows: Vec<serde_json::Value>) -> usize {
    let mut renderer = RecordingRenderer::new();
    ReportGenerator::new(report)
        .with_source("main", VecDataSource::new(rows))
        .generate(&mut renderer)
        .expect("Failed to generate report");
    renderer.page_count()
}

/// Benchmark pagination throughput with varying row counts
fn benchmark_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("rows");

    for count in [10, 100, 1000, 10000] {
        group.throughput(Throughput::Elements(count as u64));
        let rows = generate_rows(count);

        group.bench_with_input(BenchmarkId::new("rows", count), &count, |b, _| {
            b.iter(|| black_box(run(listing(false), rows.clone())));
        });
    }

    group.finish();
}

/// Benchmark the cost of per-row aggregates
fn benchmark_calculations(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculations");

    let row_count = 1000;
    let rows = generate_rows(row_count);
    group.throughput(Throughput::Elements(row_count as u64));

    for (label, with_calculations) in [("none", false), ("four_aggregates", true)] {
        group.bench_function(label, |b| {
            b.iter(|| black_box(run(listing(with_calculations), rows.clone())));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_rows, benchmark_calculations);
criterion_main!(benches);
