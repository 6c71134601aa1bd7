//! Boundary to the external typesetter.
//!
//! The session only produces markup strings; drawing glyphs is somebody
//! else's job. Implementations are injected into the session and must not
//! assume anything about when they are dropped.

use ink_core::OverlayPosition;

/// Receives the full overlay log and current anchor after every reveal.
pub trait TypesetRenderer {
    fn render(&mut self, markup: &[String], anchor: OverlayPosition);
}

/// Renderer that discards everything. Default for headless sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl TypesetRenderer for NullRenderer {
    fn render(&mut self, _markup: &[String], _anchor: OverlayPosition) {}
}

/// Append-only record of revealed markup, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpressionLog {
    entries: Vec<String>,
}

impl ExpressionLog {
    pub fn push(&mut self, markup: String) {
        self.entries.push(markup);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Display-math TeX for a typesetter configured with `\(`…`\)` inline delimiters.
pub fn latex_display(expression: &str, answer: &str) -> String {
    format!("\\(\\LARGE{{{expression} = {answer}}}\\)")
}

/// Convert a plain `expr = answer` log entry to [`latex_display`] form.
pub fn latex_from_markup(markup: &str) -> String {
    match markup.split_once(" = ") {
        Some((expr, answer)) => latex_display(expr, answer),
        None => format!("\\(\\LARGE{{{markup}}}\\)"),
    }
}
