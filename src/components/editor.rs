use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::app::EditorPane;
use crate::theme::ThemeColors;

/// Read-only view of the editor input with a line-number gutter.
pub struct EditorWidget<'a> {
    pane: &'a EditorPane,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> EditorWidget<'a> {
    pub fn new(pane: &'a EditorPane, theme: &'a ThemeColors) -> Self {
        Self {
            pane,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl<'a> Widget for EditorWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.pane.location.is_none() {
            let line = Line::from(Span::styled(
                "No file open",
                Style::default().fg(self.theme.dim_fg),
            ));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        let gutter = self.pane.lines.len().max(1).to_string().len();
        let number_style = Style::default().fg(self.theme.editor_line_nr_fg);
        let text_style = Style::default().fg(self.theme.editor_fg);
        let lines = self
            .pane
            .lines
            .iter()
            .enumerate()
            .skip(self.pane.scroll)
            .take(inner.height as usize);
        for (row, (idx, text)) in lines.enumerate() {
            let mut spans = Vec::with_capacity(2);
            // Folder listings have no meaningful line numbers.
            if !self.pane.is_listing {
                spans.push(Span::styled(
                    format!("{:>width$} ", idx + 1, width = gutter),
                    number_style,
                ));
            }
            spans.push(Span::styled(text.replace('\t', "    "), text_style));
            buf.set_line(inner.x, inner.y + row as u16, &Line::from(spans), inner.width);
        }
    }
}
