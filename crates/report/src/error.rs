//! The report error taxonomy.

use crate::calculation::CalculationKind;
use banded_expr::EvalError;
use banded_layout::LayoutError;
use banded_render_core::RenderError;
use banded_source::SourceError;
use banded_types::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvalError),
    #[error("Variable not found: '{variable}' (bound to a {kind} calculation)")]
    Reference {
        variable: String,
        kind: CalculationKind,
    },
    #[error("No data available: the main data source produced no rows")]
    NoData,
    #[error("Data source error: {0}")]
    Source(#[from] SourceError),
    #[error("Rendering error: {0}")]
    Render(RenderError),
}

impl From<RenderError> for ReportError {
    /// Keeps the error kind when a renderer passes through an evaluation,
    /// configuration or layout failure.
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Evaluation(e) => ReportError::Evaluation(e),
            RenderError::Config(e) => ReportError::Config(e),
            RenderError::Layout(e) => ReportError::Layout(e),
            other => ReportError::Render(other),
        }
    }
}

impl ReportError {
    /// True when the report is fine but there was nothing to render.
    pub fn is_no_data(&self) -> bool {
        matches!(self, ReportError::NoData)
    }
}
