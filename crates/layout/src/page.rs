//! Page descriptors and the named page-size table.

use crate::error::LayoutError;
use banded_types::Size;
use indexmap::IndexMap;

/// Page margins in millimetres.
///
/// Margins are carried on the page for renderers; pagination measures the
/// full page height.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// CSS order: top, right, bottom, left.
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Margins::default()
    }
}

/// Named standard page sizes. Starts with `A4` and `Letter`; more can be
/// registered. Names are case-insensitive.
#[derive(Debug, Clone)]
pub struct PageSizes {
    sizes: IndexMap<String, Size>,
}

impl Default for PageSizes {
    fn default() -> Self {
        let mut sizes = IndexMap::new();
        sizes.insert("a4".to_string(), Size::new(210.0, 297.0));
        sizes.insert("letter".to_string(), Size::new(210.0, 279.0));
        Self { sizes }
    }
}

impl PageSizes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a named size.
    pub fn register(&mut self, name: &str, size: impl Into<Size>) -> Result<(), LayoutError> {
        let size = size.into();
        check_dimensions(size)?;
        self.sizes.insert(name.to_ascii_lowercase(), size);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Size, LayoutError> {
        self.sizes
            .get(&name.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| LayoutError::UnknownPageSize(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sizes.keys().map(String::as_str)
    }
}

fn check_dimensions(size: Size) -> Result<(), LayoutError> {
    let valid = |v: f32| v.is_finite() && v > 0.0;
    if valid(size.width) && valid(size.height) {
        Ok(())
    } else {
        Err(LayoutError::InvalidPageSize {
            width: size.width,
            height: size.height,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page {
    size: Size,
    pub margins: Margins,
}

impl Page {
    pub fn new(size: impl Into<Size>) -> Result<Self, LayoutError> {
        let size = size.into();
        check_dimensions(size)?;
        Ok(Self {
            size,
            margins: Margins::default(),
        })
    }

    pub fn named(name: &str, sizes: &PageSizes) -> Result<Self, LayoutError> {
        Self::new(sizes.get(name)?)
    }

    pub fn a4() -> Self {
        Self {
            size: Size::new(210.0, 297.0),
            margins: Margins::default(),
        }
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::a4()
    }
}
