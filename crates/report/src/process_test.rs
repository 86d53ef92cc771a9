use crate::{
    Band, Calculation, CalculationKind, ProcessConfig, Report, ReportError, ResetScope, VarType,
    Variable,
};
use banded_expr::{EvalError, Value};
use banded_layout::{Drawable, LayoutError, Page};
use banded_render_core::{RecordingRenderer, RenderCommand};
use banded_source::{ConnectionParams, DataSource, VecDataSource};
use chrono::NaiveDate;
use serde_json::json;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn rows(n: i64) -> VecDataSource {
    let mut source = VecDataSource::new((1..=n).map(|i| json!(i)).collect());
    source.run(&ConnectionParams::default()).unwrap();
    source
}

fn config() -> ProcessConfig {
    ProcessConfig::default().with_report_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
}

/// A4 page, 20mm header and footer, 5mm body printing the row.
fn listing() -> Report {
    let mut report = Report::default();
    report.set_band_height(Band::Header, 20.0).unwrap();
    report.set_band_height(Band::Footer, 20.0).unwrap();
    report.set_band_height(Band::Body, 5.0).unwrap();
    report
        .add_to_band(Band::Header, (0.0, 0.0), Drawable::text((60.0, 10.0), "'Page %d' % system.page"))
        .unwrap();
    report
        .add_to_band(Band::Body, (10.0, 0.0), Drawable::text((30.0, 5.0), "row"))
        .unwrap();
    report
}

#[test]
fn test_86_rows_fill_two_pages() {
    init();
    let mut report = listing();
    let mut renderer = RecordingRenderer::new();
    let summary = report
        .process(&mut renderer, &mut rows(86), &config())
        .unwrap();

    assert_eq!(summary.pages, 2);
    assert_eq!(summary.rows, 86);
    assert_eq!(renderer.page_count(), 2);

    let pages = renderer.pages();
    assert_eq!(pages[0].first().map(String::as_str), Some("Page 1"));
    assert_eq!(pages[0].len(), 1 + 51);
    assert_eq!(pages[0].last().map(String::as_str), Some("51"));
    assert_eq!(pages[1].first().map(String::as_str), Some("Page 2"));
    assert_eq!(pages[1][1], "52");
    assert_eq!(pages[1].len(), 1 + 35);

    // Every page is closed exactly once.
    let finalized = renderer
        .commands()
        .iter()
        .filter(|c| matches!(c, RenderCommand::FinalizePage))
        .count();
    assert_eq!(finalized, 2);
}

#[test]
fn test_body_rows_are_stacked_below_the_header() {
    let mut report = listing();
    let mut renderer = RecordingRenderer::new();
    report.process(&mut renderer, &mut rows(3), &config()).unwrap();

    let body_frames: Vec<f32> = renderer
        .commands()
        .iter()
        .filter_map(|c| match c {
            RenderCommand::Text { text, frame, .. } if !text.starts_with("Page") => Some(frame.y),
            _ => None,
        })
        .collect();
    assert_eq!(body_frames, vec![20.0, 25.0, 30.0]);
}

#[test]
fn test_empty_source_is_no_data_and_draws_nothing() {
    let mut report = listing();
    let mut renderer = RecordingRenderer::new();
    let err = report
        .process(&mut renderer, &mut rows(0), &config())
        .unwrap_err();
    assert!(err.is_no_data());
    assert!(renderer.commands().is_empty());
}

#[test]
fn test_body_taller_than_usable_page_fails_fast() {
    let mut report = listing();
    report.set_band_height(Band::Body, 258.0).unwrap();
    let err = report
        .process(&mut RecordingRenderer::new(), &mut rows(1), &config())
        .unwrap_err();
    assert!(matches!(
        err,
        ReportError::Layout(LayoutError::BandTooTall { ref band, height, available })
            if band == "body" && height == 258.0 && available == 257.0
    ));
}

#[test]
fn test_overflow_on_the_last_row_leaves_the_final_page_without_footer() {
    init();
    for (count, pages, footers) in [
        (51, 1, vec!["F1"]),
        (52, 2, vec!["F1"]),
        (53, 2, vec!["F1", "F2"]),
    ] {
        let mut report = listing();
        report
            .add_to_band(Band::Footer, (0.0, 0.0), Drawable::text((30.0, 10.0), "'F%d' % system.page"))
            .unwrap();
        let mut renderer = RecordingRenderer::new();
        let summary = report
            .process(&mut renderer, &mut rows(count), &config())
            .unwrap();

        assert_eq!(summary.pages, pages, "{} rows", count);
        let drawn: Vec<&str> = renderer.texts().filter(|t| t.starts_with('F')).collect();
        assert_eq!(drawn, footers, "{} rows", count);
    }
}

/// 50mm page, 10mm body and footer: four rows per page.
fn small_report() -> Report {
    let mut report = Report::new(Page::new((100.0, 50.0)).unwrap());
    report.set_band_height(Band::Body, 10.0).unwrap();
    report.set_band_height(Band::Footer, 10.0).unwrap();
    report
        .add_to_band(Band::Body, (0.0, 0.0), Drawable::text((20.0, 10.0), "row"))
        .unwrap();
    report
}

#[test]
fn test_page_scoped_calculations_restart_on_every_page() {
    init();
    let mut report = small_report();
    report.set_band_height(Band::Summary, 5.0).unwrap();
    report.add_variable(Variable::new("page_total", VarType::Integer, 0));
    report.add_variable(Variable::new("total", VarType::Integer, 0));
    report.add_calculation(
        Calculation::new(CalculationKind::Sum, "page_total", "1").with_reset(ResetScope::Page),
    );
    report.add_calculation(Calculation::new(CalculationKind::Sum, "total", "row"));
    report
        .add_to_band(
            Band::Footer,
            (0.0, 0.0),
            Drawable::text((50.0, 10.0), "'page total %d' % vars.page_total"),
        )
        .unwrap();
    report
        .add_to_band(Band::Summary, (0.0, 0.0), Drawable::text((50.0, 5.0), "vars.total"))
        .unwrap();

    let mut renderer = RecordingRenderer::new();
    let summary = report
        .process(&mut renderer, &mut rows(10), &config())
        .unwrap();
    assert_eq!(summary.pages, 3);

    let pages = renderer.pages();
    assert_eq!(pages[0], ["1", "2", "3", "4", "page total 4"]);
    assert_eq!(pages[1], ["5", "6", "7", "8", "page total 4"]);
    assert_eq!(pages[2], ["9", "10", "page total 2", "55"]);
    assert_eq!(report.variables().value("total"), Some(&Value::Int(55)));
}

#[test]
fn test_summary_moves_to_a_new_page_when_it_does_not_fit() {
    let mut report = small_report();
    report.set_band_height(Band::Summary, 20.0).unwrap();
    report
        .add_to_band(Band::Summary, (0.0, 0.0), Drawable::text((50.0, 5.0), "'end at page %d' % system.page"))
        .unwrap();

    let mut renderer = RecordingRenderer::new();
    // Three rows leave 10mm above the footer, less than the summary.
    let summary = report
        .process(&mut renderer, &mut rows(3), &config())
        .unwrap();
    assert_eq!(summary.pages, 2);

    let pages = renderer.pages();
    assert_eq!(pages[0], ["1", "2", "3"]);
    assert_eq!(pages[1], ["end at page 2"]);
    match renderer.commands().iter().rev().nth(1) {
        Some(RenderCommand::Text { frame, .. }) => assert_eq!(frame.y, 0.0),
        other => panic!("expected the summary text, got {:?}", other),
    }
    assert!(matches!(renderer.commands().last(), Some(RenderCommand::FinalizePage)));
}

#[test]
fn test_summary_that_exactly_fills_the_space_moves_too() {
    let mut report = small_report();
    report.set_band_height(Band::Summary, 10.0).unwrap();
    let mut renderer = RecordingRenderer::new();
    // 3 rows: cursor 30, footer top 40, 10mm left is not strictly more.
    let summary = report
        .process(&mut renderer, &mut rows(3), &config())
        .unwrap();
    assert_eq!(summary.pages, 2);
}

#[test]
fn test_title_is_printed_once() {
    let mut report = small_report();
    report.set_band_height(Band::Title, 10.0).unwrap();
    report
        .add_to_band(Band::Title, (0.0, 0.0), Drawable::text((50.0, 10.0), "'Report of %s' % system.date.isoformat()"))
        .unwrap();

    let mut renderer = RecordingRenderer::new();
    report.process(&mut renderer, &mut rows(6), &config()).unwrap();
    let pages = renderer.pages();
    assert_eq!(pages[0], ["Report of 2024-03-01", "1", "2", "3"]);
    assert_eq!(pages[1], ["4", "5", "6"]);
}

#[test]
fn test_undefined_name_aborts_the_pass() {
    let mut report = small_report();
    report
        .add_to_band(Band::Body, (20.0, 0.0), Drawable::text((20.0, 10.0), "foo + 1"))
        .unwrap();
    let err = report
        .process(&mut RecordingRenderer::new(), &mut rows(2), &config())
        .unwrap_err();
    assert!(matches!(
        err,
        ReportError::Evaluation(EvalError::UndefinedName(ref name)) if name == "foo"
    ));
    assert!(err.to_string().contains("foo"));
}

#[test]
fn test_calculation_bound_to_unknown_variable() {
    let mut report = small_report();
    report.add_calculation(Calculation::new(CalculationKind::Max, "highest", "row"));
    let err = report
        .process(&mut RecordingRenderer::new(), &mut rows(1), &config())
        .unwrap_err();
    assert!(matches!(err, ReportError::Reference { ref variable, .. } if variable == "highest"));
}

#[test]
fn test_repeated_passes_start_from_reset_calculations() {
    let mut report = small_report();
    report.add_variable(Variable::new("total", VarType::Integer, 0));
    report.add_calculation(Calculation::new(CalculationKind::Sum, "total", "row"));

    let mut source = rows(4);
    report
        .process(&mut RecordingRenderer::new(), &mut source, &config())
        .unwrap();
    assert_eq!(report.variables().value("total"), Some(&Value::Int(10)));

    source.run(&ConnectionParams::default()).unwrap();
    report
        .process(&mut RecordingRenderer::new(), &mut source, &config())
        .unwrap();
    assert_eq!(report.variables().value("total"), Some(&Value::Int(10)));

    source.run(&ConnectionParams::default()).unwrap();
    report
        .process(
            &mut RecordingRenderer::new(),
            &mut source,
            &config().keep_calculations(),
        )
        .unwrap();
    assert_eq!(report.variables().value("total"), Some(&Value::Int(20)));
}

#[test]
fn test_max_rows_stops_early() {
    let mut report = small_report();
    let mut renderer = RecordingRenderer::new();
    let summary = report
        .process(&mut renderer, &mut rows(100), &config().with_max_rows(5))
        .unwrap();
    assert_eq!(summary.rows, 5);
    assert_eq!(summary.pages, 2);
}

#[test]
fn test_record_rows_expose_fields() {
    let mut report = small_report();
    report
        .add_to_band(
            Band::Body,
            (20.0, 0.0),
            Drawable::text((40.0, 10.0), "'%s: %.2f' % (row.name, row['price'])"),
        )
        .unwrap();
    let mut source = VecDataSource::new(vec![json!({"name": "tea", "price": 2.5})]);
    source.run(&ConnectionParams::default()).unwrap();

    let mut renderer = RecordingRenderer::new();
    report.process(&mut renderer, &mut source, &config()).unwrap();
    let texts: Vec<&str> = renderer.texts().collect();
    assert_eq!(texts[1], "tea: 2.50");
}
