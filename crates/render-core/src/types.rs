use banded_layout::{Alignment, LineType, NodeId, ShapeKind};
use banded_style::Font;
use banded_types::{Color, Rect};

/// A text leaf ready to draw: absolute frame, resolved font and the
/// expression that produces the displayed value.
#[derive(Debug, Clone, Copy)]
pub struct TextRun<'a> {
    pub node: NodeId,
    /// Absolute frame in millimetres from the page's top-left corner.
    pub frame: Rect,
    pub expression: &'a str,
    pub font: &'a Font,
    pub alignment: Alignment,
    pub color: Color,
    pub backcolor: Color,
}

impl TextRun<'_> {
    /// The x coordinate the text is anchored at for its alignment.
    pub fn anchor_x(&self) -> f32 {
        match self.alignment {
            Alignment::Left => self.frame.x,
            Alignment::Center => self.frame.x + self.frame.width * 0.5,
            Alignment::Right => self.frame.x + self.frame.width,
        }
    }
}

/// A line or rectangle ready to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeRun {
    pub node: NodeId,
    pub frame: Rect,
    pub kind: ShapeKind,
    pub line_width: f32,
    pub line_type: LineType,
    pub color: Color,
    pub fill_color: Option<Color>,
}

impl ShapeRun {
    /// The four border strokes of a rectangle: top, bottom, left, right.
    pub fn edges(&self) -> [ShapeRun; 4] {
        let Rect {
            x,
            y,
            width,
            height,
        } = self.frame;
        let lw = self.line_width.min(width).min(height);
        let edge = |kind, frame| ShapeRun {
            kind,
            frame,
            fill_color: None,
            ..*self
        };
        [
            edge(ShapeKind::HLine, Rect { x, y, width, height: lw }),
            edge(
                ShapeKind::HLine,
                Rect { x, y: y + height - lw, width, height: lw },
            ),
            edge(ShapeKind::VLine, Rect { x, y, width: lw, height }),
            edge(
                ShapeKind::VLine,
                Rect { x: x + width - lw, y, width: lw, height },
            ),
        ]
    }
}
