//! Rendering abstractions for banded reports.
//!
//! This crate provides:
//! - the `Renderer` trait concrete backends implement
//! - `paint`, which walks an object tree and forwards leaves to a renderer
//! - `RecordingRenderer`, a backend that captures draw calls for inspection

mod error;
mod paint;
mod recording;
mod traits;
mod types;
pub mod utils;

pub use error::RenderError;
pub use paint::paint;
pub use recording::{RecordingRenderer, RenderCommand};
pub use traits::Renderer;
pub use types::{ShapeRun, TextRun};
