//! # banded
//!
//! A banded-report composition engine. A report is a tree of page bands
//! (title, header, body, footer, summary) laid out on fixed-size pages over
//! the rows of a data source, with field values and aggregates computed by a
//! restricted expression language.
//!
//! ```ignore
//! use banded::{Band, Drawable, RecordingRenderer, Report, ReportGenerator, VecDataSource};
//! use serde_json::json;
//!
//! let mut report = Report::default();
//! report.set_band_height(Band::Body, 5.0)?;
//! report.add_to_band(Band::Body, (0.0, 0.0), Drawable::text((40.0, 5.0), "row.name"))?;
//!
//! let mut renderer = RecordingRenderer::new();
//! ReportGenerator::new(report)
//!     .with_source("main", VecDataSource::new(vec![json!({"name": "tea"})]))
//!     .generate(&mut renderer)?;
//! ```

pub mod error;
pub mod generator;

pub use error::GenerateError;
pub use generator::ReportGenerator;

// Re-export the workspace crates
pub use banded_expr as expr;
pub use banded_layout as layout;
pub use banded_render_core as render;
pub use banded_report as report;
pub use banded_source as source;
pub use banded_style as style;
pub use banded_types as types;

// Re-export commonly used types
pub use banded_expr::{Environment, EvalError, SystemInfo, Value, safe_eval};
pub use banded_layout::{
    Alignment, Drawable, LayoutError, Margins, NodeId, ObjectTree, Page, PageSizes,
};
pub use banded_render_core::{
    RecordingRenderer, RenderCommand, RenderError, Renderer, ShapeRun, TextRun,
};
pub use banded_report::{
    Band, Calculation, CalculationKind, Group, Parameter, ProcessConfig, Report, ReportError,
    ResetScope, RunSummary, VarType, Variable,
};
pub use banded_source::{
    ConnectionParams, DataSource, IteratorDataSource, SourceError, VecDataSource,
};
pub use banded_style::{Font, FontRegistry, FontSpec, FontStyle};
pub use banded_types::{Color, ConfigError, Position, Size, SizeSpec, cm, mm};
