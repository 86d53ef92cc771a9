//! Font definitions for report objects.
//!
//! Fonts live in a [`FontRegistry`] owned by one report; text objects refer
//! to them by [`FontId`](banded_types::FontId) and are bound to a concrete
//! font only when they are drawn.

pub mod font;

pub use font::{DEFAULT_FONT_ID, Font, FontRegistry, FontSpec, FontStyle};
