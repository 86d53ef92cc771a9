pub mod color;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod units;

pub use color::Color;
pub use error::ConfigError;
pub use geometry::{Extent, INHERIT, Position, Rect, Size, SizeSpec};
pub use ids::{FontId, ObjectName};
pub use units::{Unit, cm, cm_pair, mm, mm_pair, parse_length};
