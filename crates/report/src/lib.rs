//! # banded-report
//!
//! The report object graph and its pagination loop.
//!
//! - **report**: the `Report` aggregate owning page, bands and registries
//! - **variable**: typed variables, parameters and the `vars` namespace
//! - **calculation**: per-row sum/avg/min/max aggregates
//! - **process**: the pass that lays bands out on pages
//! - **error**: the error taxonomy callers branch on

pub mod calculation;
pub mod config;
pub mod error;
pub mod process;
pub mod report;
pub mod variable;

pub use calculation::{Calculation, CalculationKind, ResetScope};
pub use config::ProcessConfig;
pub use error::ReportError;
pub use process::RunSummary;
pub use report::{Band, Group, Report};
pub use variable::{Parameter, VarType, Variable, VariableTable};

// Re-export the crates a report definition is built from
pub use banded_expr as expr;
pub use banded_layout as layout;
pub use banded_render_core as render;
pub use banded_source as source;
pub use banded_style as style;
pub use banded_types as types;

#[cfg(test)]
mod process_test;
