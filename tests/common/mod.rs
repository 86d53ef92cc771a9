pub mod fixtures;
pub mod render_assertions;

use banded::{
    GenerateError, ProcessConfig, RecordingRenderer, Report, ReportGenerator, RunSummary,
    VecDataSource,
};
use chrono::NaiveDate;
use serde_json::Value;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// The outcome of a generation run with everything the renderer saw.
pub struct GeneratedReport {
    pub summary: RunSummary,
    pub renderer: RecordingRenderer,
}

impl GeneratedReport {
    pub fn page_count(&self) -> usize {
        self.renderer.page_count()
    }

    /// Displayed texts of one page (1-based, like `system.page`).
    pub fn page(&self, number: usize) -> Vec<String> {
        self.renderer
            .pages()
            .into_iter()
            .nth(number - 1)
            .unwrap_or_default()
    }

    /// Every displayed text, one per line.
    pub fn text(&self) -> String {
        self.renderer.texts().collect::<Vec<_>>().join("\n")
    }
}

/// The date every test report is generated on.
pub fn report_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

/// Runs `report` over `rows` as its main data source.
pub fn generate(report: Report, rows: Vec<Value>) -> Result<GeneratedReport, GenerateError> {
    generate_with_config(report, rows, ProcessConfig::default())
}

pub fn generate_with_config(
    report: Report,
    rows: Vec<Value>,
    config: ProcessConfig,
) -> Result<GeneratedReport, GenerateError> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut renderer = RecordingRenderer::new();
    let summary = ReportGenerator::new(report)
        .with_source("main", VecDataSource::new(rows))
        .with_config(config.with_report_date(report_date()))
        .generate(&mut renderer)?;
    Ok(GeneratedReport { summary, renderer })
}
