mod common;

use banded::{
    Band, Calculation, CalculationKind, Drawable, GenerateError, ProcessConfig, RecordingRenderer,
    Report, ReportError, ReportGenerator, ResetScope, Value, VarType, Variable, VecDataSource,
};
use common::fixtures::{invoice_report, invoice_rows};
use common::{TestResult, generate};
use serde_json::json;

/// A one-page listing whose summary prints `vars.result`.
fn aggregate_report(calculation: Calculation, var_type: VarType) -> Report {
    let mut report = Report::default();
    report.set_band_height(Band::Body, 5.0).unwrap();
    report.set_band_height(Band::Summary, 5.0).unwrap();
    report
        .add_to_band(Band::Body, (0.0, 0.0), Drawable::text((40.0, 5.0), "row.name"))
        .unwrap();
    report
        .add_to_band(
            Band::Summary,
            (0.0, 0.0),
            Drawable::text((40.0, 5.0), "funcs.str(vars.result)"),
        )
        .unwrap();
    report.add_variable(Variable::new("result", var_type, Value::Null));
    report.add_calculation(calculation);
    report
}

fn prices() -> Vec<serde_json::Value> {
    vec![
        json!({"name": "tea", "price": 2.5}),
        json!({"name": "coffee", "price": 3.75}),
        json!({"name": "water", "price": 1.0}),
    ]
}

fn summary_text(report: Report, rows: Vec<serde_json::Value>) -> Result<String, GenerateError> {
    let result = generate(report, rows)?;
    Ok(result.page(1).last().cloned().unwrap_or_default())
}

#[test]
fn test_aggregate_kinds_over_float_column() -> TestResult {
    let cases = [
        (CalculationKind::Sum, "7.25"),
        (CalculationKind::Min, "1.0"),
        (CalculationKind::Max, "3.75"),
    ];
    for (kind, expected) in cases {
        let report = aggregate_report(
            Calculation::new(kind, "result", "row.price"),
            VarType::Float,
        );
        assert_eq!(summary_text(report, prices())?, expected, "{}", kind);
    }
    Ok(())
}

#[test]
fn test_average_divides_by_row_count() -> TestResult {
    let report = aggregate_report(
        Calculation::new(CalculationKind::Avg, "result", "row.qty"),
        VarType::Float,
    );
    let rows = vec![json!({"name": "a", "qty": 1}), json!({"name": "b", "qty": 2})];
    assert_eq!(summary_text(report, rows)?, "1.5");
    Ok(())
}

#[test]
fn test_min_over_strings() -> TestResult {
    let report = aggregate_report(
        Calculation::new(CalculationKind::Min, "result", "row.name"),
        VarType::String,
    );
    assert_eq!(summary_text(report, prices())?, "coffee");
    Ok(())
}

#[test]
fn test_start_value_seeds_the_sum() -> TestResult {
    let report = aggregate_report(
        Calculation::new(CalculationKind::Sum, "result", "1").with_start_value(100),
        VarType::Integer,
    );
    assert_eq!(summary_text(report, prices())?, "103");
    Ok(())
}

#[test]
fn test_calculation_reads_earlier_results() -> TestResult {
    let mut report = aggregate_report(
        Calculation::new(CalculationKind::Max, "result", "vars.running * 10"),
        VarType::Integer,
    );
    report.add_variable(Variable::new("running", VarType::Integer, 0));
    // Registered after `result`, so `result` sees the previous row's value.
    report.add_calculation(Calculation::new(CalculationKind::Sum, "running", "1"));
    assert_eq!(summary_text(report, prices())?, "20");
    Ok(())
}

#[test]
fn test_parsed_calculation_with_page_reset() -> TestResult {
    let mut report = invoice_report();
    report.add_variable(Variable::new("page_rows", VarType::Integer, 0));
    report.add_calculation(Calculation::parse("sum", "page_rows", "1", "page")?);
    report.add_to_band(
        Band::Footer,
        (120.0, 2.0),
        Drawable::text((60.0, 8.0), "'%d rows' % vars.page_rows"),
    )?;

    let result = generate(report, invoice_rows(60))?;
    assert_report_contains_text!(result, "52 rows");
    assert_report_contains_text!(result, "8 rows");
    Ok(())
}

#[test]
fn test_unknown_calculation_kind_is_rejected() {
    let err = Calculation::parse("median", "x", "row", "end").unwrap_err();
    assert!(err.to_string().contains("median"));
}

#[test]
fn test_unbound_variable_fails_generation() {
    let mut report = invoice_report();
    report.add_calculation(Calculation::new(CalculationKind::Sum, "nowhere", "row.price"));

    let err = generate(report, invoice_rows(3)).err().unwrap();
    assert!(matches!(
        err.as_report_error(),
        Some(ReportError::Reference { variable, kind: CalculationKind::Sum }) if variable == "nowhere"
    ));
}

#[test]
fn test_regeneration_restarts_totals() -> TestResult {
    let mut generator = ReportGenerator::new(invoice_report())
        .with_source("main", VecDataSource::new(invoice_rows(10)))
        .with_config(ProcessConfig::default().with_report_date(common::report_date()));

    for _ in 0..2 {
        let mut renderer = RecordingRenderer::new();
        generator.generate(&mut renderer)?;
        assert!(renderer.texts().any(|text| text == "Total: 107.00"));
    }
    Ok(())
}

#[test]
fn test_kept_calculations_carry_over_between_runs() -> TestResult {
    let mut generator = ReportGenerator::new(invoice_report())
        .with_source("main", VecDataSource::new(invoice_rows(10)))
        .with_config(
            ProcessConfig::default()
                .with_report_date(common::report_date())
                .keep_calculations(),
        );

    generator.generate(&mut RecordingRenderer::new())?;
    let mut renderer = RecordingRenderer::new();
    generator.generate(&mut renderer)?;
    assert!(renderer.texts().any(|text| text == "Total: 214.00"));
    assert_eq!(
        generator.report().variables().value("max_qty"),
        Some(&Value::Int(3))
    );
    Ok(())
}
