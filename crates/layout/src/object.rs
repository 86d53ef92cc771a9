//! Drawable object kinds.
//!
//! Objects are built detached, configured through the `with_*` builders and
//! then moved into an [`ObjectTree`](crate::ObjectTree). Once inside the
//! tree, geometry changes go through the tree so containment is re-checked.

use crate::tree::NodeId;
use banded_types::{Color, ConfigError, FontId, ObjectName, Position, SizeSpec};
use std::fmt;
use std::str::FromStr;

/// Line width of lines built without an explicit width, in millimetres.
pub const DEFAULT_LINE_WIDTH: f32 = 0.2;

/// The font id containers fall back to.
pub const DEFAULT_FONT: &str = "default";

/// Horizontal placement of text inside its frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl FromStr for Alignment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Alignment::Left),
            "center" | "centre" => Ok(Alignment::Center),
            "right" => Ok(Alignment::Right),
            other => Err(ConfigError::InvalidAlignment(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineType {
    #[default]
    Solid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    HLine,
    VLine,
    Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerObject {
    pub name: Option<ObjectName>,
    /// Used by text children that carry no font of their own.
    pub default_font: FontId,
    pub(crate) children: Vec<NodeId>,
}

impl ContainerObject {
    /// Children in insertion order, which is also draw order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextObject {
    /// The expression producing the displayed value.
    pub value: String,
    pub font: Option<FontId>,
    pub alignment: Alignment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeObject {
    pub kind: ShapeKind,
    pub line_width: f32,
    pub line_type: LineType,
    /// Interior color of rectangles; `None` leaves them unfilled.
    pub fill_color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Container(ContainerObject),
    Text(TextObject),
    Shape(ShapeObject),
}

/// A node of the object tree: geometry, colors and a kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub(crate) size: SizeSpec,
    pub(crate) position: Position,
    pub(crate) parent: Option<NodeId>,
    /// Foreground color: text color, or the stroke of a shape.
    pub color: Color,
    pub backcolor: Color,
    pub kind: ObjectKind,
}

impl Drawable {
    fn with_kind(size: SizeSpec, kind: ObjectKind) -> Self {
        Self {
            size,
            position: Position::origin(),
            parent: None,
            color: Color::BLACK,
            backcolor: Color::WHITE,
            kind,
        }
    }

    /// A container with no name, using the `default` font for its texts.
    pub fn container(size: impl Into<SizeSpec>) -> Self {
        Self::with_kind(
            size.into(),
            ObjectKind::Container(ContainerObject {
                name: None,
                default_font: FontId::new(DEFAULT_FONT),
                children: Vec::new(),
            }),
        )
    }

    /// A named container, i.e. a report band.
    pub fn section(name: &str, size: impl Into<SizeSpec>) -> Self {
        Self::container(size).with_name(name)
    }

    /// A text field whose value is the given expression.
    pub fn text(size: impl Into<SizeSpec>, value: impl Into<String>) -> Self {
        Self::with_kind(
            size.into(),
            ObjectKind::Text(TextObject {
                value: value.into(),
                font: None,
                alignment: Alignment::Left,
            }),
        )
    }

    fn shape(size: SizeSpec, kind: ShapeKind) -> Self {
        Self::with_kind(
            size,
            ObjectKind::Shape(ShapeObject {
                kind,
                line_width: DEFAULT_LINE_WIDTH,
                line_type: LineType::Solid,
                fill_color: None,
            }),
        )
    }

    /// A horizontal line; `-1` (or [`Extent::Inherit`](banded_types::Extent))
    /// spans the parent's width.
    pub fn hline(length: impl Into<banded_types::Extent>) -> Self {
        Self::shape(SizeSpec::new(length, DEFAULT_LINE_WIDTH), ShapeKind::HLine)
    }

    /// A vertical line; `-1` spans the parent's height.
    pub fn vline(length: impl Into<banded_types::Extent>) -> Self {
        Self::shape(SizeSpec::new(DEFAULT_LINE_WIDTH, length), ShapeKind::VLine)
    }

    pub fn rect(size: impl Into<SizeSpec>) -> Self {
        Self::shape(size.into(), ShapeKind::Rect)
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_backcolor(mut self, color: Color) -> Self {
        self.backcolor = color;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        if let ObjectKind::Container(container) = &mut self.kind {
            container.name = Some(ObjectName::from(name));
        }
        self
    }

    pub fn with_default_font(mut self, font: impl Into<FontId>) -> Self {
        if let ObjectKind::Container(container) = &mut self.kind {
            container.default_font = font.into();
        }
        self
    }

    pub fn with_font(mut self, font: impl Into<FontId>) -> Self {
        if let ObjectKind::Text(text) = &mut self.kind {
            text.font = Some(font.into());
        }
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        if let ObjectKind::Text(text) = &mut self.kind {
            text.alignment = alignment;
        }
        self
    }

    /// Sets the stroke width. Lines are as thick as their stroke, so this
    /// also sets a line's height (horizontal) or width (vertical).
    pub fn with_line_width(mut self, width: f32) -> Self {
        if let ObjectKind::Shape(shape) = &mut self.kind {
            shape.line_width = width;
            match shape.kind {
                ShapeKind::HLine => self.size.height = width.into(),
                ShapeKind::VLine => self.size.width = width.into(),
                ShapeKind::Rect => {}
            }
        }
        self
    }

    pub fn with_fill_color(mut self, color: Color) -> Self {
        if let ObjectKind::Shape(shape) = &mut self.kind {
            shape.fill_color = Some(color);
        }
        self
    }

    /// The declared size, with inherited components left open.
    pub fn size_spec(&self) -> SizeSpec {
        self.size
    }

    /// Position relative to the parent's origin.
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_attached(&self) -> bool {
        self.parent.is_some()
    }

    pub fn as_container(&self) -> Option<&ContainerObject> {
        match &self.kind {
            ObjectKind::Container(container) => Some(container),
            _ => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut ContainerObject> {
        match &mut self.kind {
            ObjectKind::Container(container) => Some(container),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextObject> {
        match &self.kind {
            ObjectKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextObject> {
        match &mut self.kind {
            ObjectKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeObject> {
        match &self.kind {
            ObjectKind::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&ObjectName> {
        self.as_container().and_then(|c| c.name.as_ref())
    }

    /// A short label for diagnostics, e.g. `Section 'body'` or `HLine`.
    pub fn label(&self) -> String {
        match &self.kind {
            ObjectKind::Container(ContainerObject { name: Some(name), .. }) => {
                format!("Section '{}'", name)
            }
            ObjectKind::Container(_) => "Container".to_string(),
            ObjectKind::Text(text) => format!("Text '{}'", text.value),
            ObjectKind::Shape(shape) => match shape.kind {
                ShapeKind::HLine => "HLine".to_string(),
                ShapeKind::VLine => "VLine".to_string(),
                ShapeKind::Rect => "Rect".to_string(),
            },
        }
    }
}

impl fmt::Display for Drawable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> size {}, pos {}", self.label(), self.size, self.position)
    }
}
