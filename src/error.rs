// src/error.rs
use banded_report::ReportError;
use banded_source::SourceError;
use thiserror::Error;

/// Errors of a full generation run: selecting and opening the data sources
/// and processing the report.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Unknown main data source '{name}' (available: {available})")]
    UnknownSource { name: String, available: String },

    #[error("Failed to open data source '{name}': {source}")]
    OpenSource {
        name: String,
        #[source]
        source: SourceError,
    },
}

impl GenerateError {
    /// The report-level error, if this failure came from processing.
    pub fn as_report_error(&self) -> Option<&ReportError> {
        match self {
            GenerateError::Report(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        self.as_report_error().is_some_and(ReportError::is_no_data)
    }
}
