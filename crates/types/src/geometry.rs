//! Millimetre geometry for report objects.
//!
//! Sizes are declared with [`SizeSpec`], whose components may be left open
//! to inheritance ([`Extent::Inherit`]). A declared size is never stored in
//! resolved form: callers resolve it against the parent's current resolved
//! [`Size`] every time they need concrete numbers, so resizing a parent is
//! always reflected by its inheriting children.

use std::fmt;
use std::ops::{Add, Sub, SubAssign};

/// Sentinel used by declarative inputs for "inherit from parent".
pub const INHERIT: f32 = -1.0;

/// One declared dimension of an object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extent {
    /// A concrete length in millimetres.
    Fixed(f32),
    /// Use the parent's corresponding resolved dimension.
    Inherit,
}

impl Extent {
    /// Resolves this extent against the parent's dimension.
    ///
    /// An inherited extent on a detached object (no parent) resolves to `0`.
    pub fn resolve(self, parent: Option<f32>) -> f32 {
        match self {
            Extent::Fixed(value) => value,
            Extent::Inherit => parent.unwrap_or(0.0),
        }
    }

    pub fn is_inherit(self) -> bool {
        matches!(self, Extent::Inherit)
    }
}

impl Default for Extent {
    fn default() -> Self {
        Extent::Fixed(0.0)
    }
}

impl From<f32> for Extent {
    fn from(value: f32) -> Self {
        if value == INHERIT {
            Extent::Inherit
        } else {
            Extent::Fixed(value)
        }
    }
}

impl From<Option<f32>> for Extent {
    fn from(value: Option<f32>) -> Self {
        value.map(Extent::from).unwrap_or(Extent::Inherit)
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extent::Fixed(v) => write!(f, "{}", v),
            Extent::Inherit => write!(f, "inherit"),
        }
    }
}

/// A declared (width, height) pair, possibly inheriting from the parent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeSpec {
    pub width: Extent,
    pub height: Extent,
}

impl SizeSpec {
    pub fn new(width: impl Into<Extent>, height: impl Into<Extent>) -> Self {
        Self {
            width: width.into(),
            height: height.into(),
        }
    }

    /// Both dimensions inherited from the parent.
    pub fn inherit() -> Self {
        Self {
            width: Extent::Inherit,
            height: Extent::Inherit,
        }
    }

    /// Resolves both dimensions. `parent` is the parent's *resolved* size,
    /// or `None` for a detached object.
    pub fn resolve(&self, parent: Option<Size>) -> Size {
        Size {
            width: self.width.resolve(parent.map(|p| p.width)),
            height: self.height.resolve(parent.map(|p| p.height)),
        }
    }

    pub fn with_width(self, width: impl Into<Extent>) -> Self {
        Self {
            width: width.into(),
            ..self
        }
    }

    pub fn with_height(self, height: impl Into<Extent>) -> Self {
        Self {
            height: height.into(),
            ..self
        }
    }
}

impl From<(f32, f32)> for SizeSpec {
    fn from((width, height): (f32, f32)) -> Self {
        Self::new(width, height)
    }
}

impl From<Size> for SizeSpec {
    fn from(size: Size) -> Self {
        Self {
            width: Extent::Fixed(size.width),
            height: Extent::Fixed(size.height),
        }
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.width, self.height)
    }
}

/// A resolved size in millimetres.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }
}

impl From<(f32, f32)> for Size {
    fn from((width, height): (f32, f32)) -> Self {
        Self { width, height }
    }
}

impl From<Size> for (f32, f32) {
    fn from(size: Size) -> Self {
        (size.width, size.height)
    }
}

impl Sub<f32> for Size {
    type Output = Size;

    fn sub(self, rhs: f32) -> Size {
        Size::new(self.width - rhs, self.height - rhs)
    }
}

impl Sub<(f32, f32)> for Size {
    type Output = Size;

    fn sub(self, (dw, dh): (f32, f32)) -> Size {
        Size::new(self.width - dw, self.height - dh)
    }
}

impl SubAssign<f32> for Size {
    fn sub_assign(&mut self, rhs: f32) {
        *self = *self - rhs;
    }
}

impl SubAssign<(f32, f32)> for Size {
    fn sub_assign(&mut self, rhs: (f32, f32)) {
        *self = *self - rhs;
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.width, self.height)
    }
}

/// A position relative to the parent's top-left corner, y growing downward.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::default()
    }
}

impl From<(f32, f32)> for Position {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An absolute frame on the page, in millimetres from the page's top-left.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(origin: Position, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn origin(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}
