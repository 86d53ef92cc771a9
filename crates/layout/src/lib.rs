//! The report object tree: drawable kinds, the arena that owns them, page
//! descriptors and the fit checks pagination relies on.

pub mod error;
pub mod object;
pub mod page;
pub mod pagination;
pub mod tree;

pub use self::error::{Axis, LayoutError};
pub use self::object::{
    Alignment, ContainerObject, DEFAULT_FONT, DEFAULT_LINE_WIDTH, Drawable, LineType, ObjectKind,
    ShapeKind, ShapeObject, TextObject,
};
pub use self::page::{Margins, Page, PageSizes};
pub use self::pagination::{BreakAnalysis, check_band_fit, ensure_body_fits, summary_fits};
pub use self::tree::{NodeId, ObjectTree};

// Re-export geometry so callers do not need a direct dependency.
pub use banded_types::{Extent, Position, Rect, Size, SizeSpec};
