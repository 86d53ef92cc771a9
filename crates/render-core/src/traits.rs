use crate::error::RenderError;
use crate::types::{ShapeRun, TextRun};
use banded_expr::{Environment, Value};

/// A drawing backend driven by the pagination loop.
///
/// Coordinates arrive in millimetres from the page's top-left corner;
/// backends own any unit or origin conversion.
pub trait Renderer {
    fn start_page(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    fn finalize_page(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    /// Draws a text leaf. Backends evaluate `text.expression` through
    /// [`Renderer::safe_eval`] and display the result.
    fn draw_text(&mut self, text: &TextRun<'_>, env: &Environment<'_>) -> Result<(), RenderError>;

    fn draw_hline(&mut self, shape: &ShapeRun, env: &Environment<'_>) -> Result<(), RenderError>;

    fn draw_vline(&mut self, shape: &ShapeRun, env: &Environment<'_>) -> Result<(), RenderError>;

    /// Draws a rectangle as four strokes. Backends with native rectangles
    /// (and fills) override this.
    fn draw_rect(&mut self, shape: &ShapeRun, env: &Environment<'_>) -> Result<(), RenderError> {
        let [top, bottom, left, right] = shape.edges();
        self.draw_hline(&top, env)?;
        self.draw_hline(&bottom, env)?;
        self.draw_vline(&left, env)?;
        self.draw_vline(&right, env)
    }

    /// Evaluates a field or aggregate expression in the restricted sandbox.
    fn safe_eval(&self, expression: &str, env: &Environment<'_>) -> Result<Value, RenderError> {
        Ok(banded_expr::safe_eval(expression, env)?)
    }
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn start_page(&mut self) -> Result<(), RenderError> {
        (**self).start_page()
    }

    fn finalize_page(&mut self) -> Result<(), RenderError> {
        (**self).finalize_page()
    }

    fn draw_text(&mut self, text: &TextRun<'_>, env: &Environment<'_>) -> Result<(), RenderError> {
        (**self).draw_text(text, env)
    }

    fn draw_hline(&mut self, shape: &ShapeRun, env: &Environment<'_>) -> Result<(), RenderError> {
        (**self).draw_hline(shape, env)
    }

    fn draw_vline(&mut self, shape: &ShapeRun, env: &Environment<'_>) -> Result<(), RenderError> {
        (**self).draw_vline(shape, env)
    }

    fn draw_rect(&mut self, shape: &ShapeRun, env: &Environment<'_>) -> Result<(), RenderError> {
        (**self).draw_rect(shape, env)
    }

    fn safe_eval(&self, expression: &str, env: &Environment<'_>) -> Result<Value, RenderError> {
        (**self).safe_eval(expression, env)
    }
}
