//! A renderer that records draw calls instead of producing a document.

use crate::error::RenderError;
use crate::traits::Renderer;
use crate::types::{ShapeRun, TextRun};
use crate::utils::primary_face;
use banded_expr::Environment;
use banded_layout::Alignment;
use banded_types::{Color, Rect};

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    StartPage,
    FinalizePage,
    Text {
        /// The evaluated, displayed value.
        text: String,
        frame: Rect,
        face: String,
        size: f32,
        alignment: Alignment,
        color: Color,
    },
    HLine {
        frame: Rect,
        line_width: f32,
    },
    VLine {
        frame: Rect,
        line_width: f32,
    },
}

/// Captures every page boundary and draw call in order.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    commands: Vec<RenderCommand>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<RenderCommand> {
        self.commands
    }

    /// Number of pages started.
    pub fn page_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::StartPage))
            .count()
    }

    /// Displayed texts grouped by page. Draws issued before the first
    /// `StartPage` are not attributed to any page.
    pub fn pages(&self) -> Vec<Vec<String>> {
        let mut pages: Vec<Vec<String>> = Vec::new();
        for command in &self.commands {
            match command {
                RenderCommand::StartPage => pages.push(Vec::new()),
                RenderCommand::Text { text, .. } => {
                    if let Some(page) = pages.last_mut() {
                        page.push(text.clone());
                    }
                }
                _ => {}
            }
        }
        pages
    }

    /// All displayed texts in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            RenderCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Renderer for RecordingRenderer {
    fn start_page(&mut self) -> Result<(), RenderError> {
        self.commands.push(RenderCommand::StartPage);
        Ok(())
    }

    fn finalize_page(&mut self) -> Result<(), RenderError> {
        self.commands.push(RenderCommand::FinalizePage);
        Ok(())
    }

    fn draw_text(&mut self, text: &TextRun<'_>, env: &Environment<'_>) -> Result<(), RenderError> {
        let value = self.safe_eval(text.expression, env)?;
        self.commands.push(RenderCommand::Text {
            text: value.to_string(),
            frame: text.frame,
            face: primary_face(text.font),
            size: text.font.size,
            alignment: text.alignment,
            color: text.color,
        });
        Ok(())
    }

    fn draw_hline(&mut self, shape: &ShapeRun, _env: &Environment<'_>) -> Result<(), RenderError> {
        self.commands.push(RenderCommand::HLine {
            frame: shape.frame,
            line_width: shape.line_width,
        });
        Ok(())
    }

    fn draw_vline(&mut self, shape: &ShapeRun, _env: &Environment<'_>) -> Result<(), RenderError> {
        self.commands.push(RenderCommand::VLine {
            frame: shape.frame,
            line_width: shape.line_width,
        });
        Ok(())
    }
}
