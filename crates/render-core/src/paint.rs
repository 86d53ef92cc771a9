//! Walks the object tree and forwards every leaf to a [`Renderer`].

use crate::error::RenderError;
use crate::traits::Renderer;
use crate::types::{ShapeRun, TextRun};
use banded_expr::Environment;
use banded_layout::{DEFAULT_FONT, NodeId, ObjectKind, ObjectTree, ShapeKind};
use banded_style::FontRegistry;
use banded_types::FontId;

/// Draws `node` and its descendants in insertion order.
///
/// Painting only reads the tree. Text leaves without a font of their own use
/// the default font of the container they sit in, looked up now rather than
/// when the leaf was created.
pub fn paint<R: Renderer + ?Sized>(
    tree: &ObjectTree,
    node: NodeId,
    fonts: &FontRegistry,
    renderer: &mut R,
    env: &Environment<'_>,
) -> Result<(), RenderError> {
    let drawable = tree
        .get(node)
        .ok_or(banded_layout::LayoutError::UnknownNode(node.index()))?;

    match &drawable.kind {
        ObjectKind::Container(container) => {
            if container.name.is_some() {
                log::trace!("Painting {}", tree.describe(node));
            }
            for &child in container.children() {
                paint(tree, child, fonts, renderer, env)?;
            }
            Ok(())
        }
        ObjectKind::Text(text) => {
            let font_id = match &text.font {
                Some(font) => font.clone(),
                None => inherited_font(tree, node),
            };
            let run = TextRun {
                node,
                frame: tree.frame(node),
                expression: &text.value,
                font: fonts.get(&font_id)?,
                alignment: text.alignment,
                color: drawable.color,
                backcolor: drawable.backcolor,
            };
            renderer.draw_text(&run, env)
        }
        ObjectKind::Shape(shape) => {
            let run = ShapeRun {
                node,
                frame: tree.frame(node),
                kind: shape.kind,
                line_width: shape.line_width,
                line_type: shape.line_type,
                color: drawable.color,
                fill_color: shape.fill_color,
            };
            match shape.kind {
                ShapeKind::HLine => renderer.draw_hline(&run, env),
                ShapeKind::VLine => renderer.draw_vline(&run, env),
                ShapeKind::Rect => renderer.draw_rect(&run, env),
            }
        }
    }
}

fn inherited_font(tree: &ObjectTree, node: NodeId) -> FontId {
    tree.parent(node)
        .and_then(|parent| tree.get(parent))
        .and_then(|parent| parent.as_container())
        .map(|container| container.default_font.clone())
        .unwrap_or_else(|| FontId::new(DEFAULT_FONT))
}
