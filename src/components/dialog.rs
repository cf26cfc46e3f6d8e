use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::app::{AppMode, DialogKind, DialogState};
use crate::fs::metadata::FileMetadata;
use crate::theme::ThemeColors;

/// Centered modal overlay for the open dialog, if any.
pub struct DialogWidget<'a> {
    mode: &'a AppMode,
    dialog_state: &'a DialogState,
    theme: &'a ThemeColors,
}

impl<'a> DialogWidget<'a> {
    pub fn new(mode: &'a AppMode, dialog_state: &'a DialogState, theme: &'a ThemeColors) -> Self {
        Self {
            mode,
            dialog_state,
            theme,
        }
    }

    fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        Rect::new(x, y, width.min(area.width), height.min(area.height))
    }

    /// Clear `rect`, draw a titled frame and return its inner area.
    fn frame(&self, title: &str, rect: Rect, border: Color, buf: &mut Buffer) -> Rect {
        Clear.render(rect, buf);
        let block = Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(self.theme.dialog_bg))
            .padding(Padding::horizontal(1));
        let inner = block.inner(rect);
        block.render(rect, buf);
        inner
    }

    fn hint(&self, text: &str, inner: Rect, buf: &mut Buffer) {
        if inner.height > 1 {
            let style = Style::default()
                .fg(self.theme.dim_fg)
                .add_modifier(Modifier::DIM);
            let line = Line::from(Span::styled(text, style));
            buf.set_line(inner.x, inner.y + inner.height - 1, &line, inner.width);
        }
    }

    fn render_input(&self, title: &str, area: Rect, buf: &mut Buffer) {
        let rect = Self::centered_rect(56.min(area.width.saturating_sub(4)), 5, area);
        let inner = self.frame(title, rect, self.theme.dialog_border_fg, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let input = &self.dialog_state.input;
        let pos = self.dialog_state.cursor_position.min(input.len());
        let (before, rest) = input.split_at(pos);
        let mut rest_chars = rest.chars();
        let cursor_char = rest_chars.next().map(String::from).unwrap_or_else(|| " ".into());
        let after = rest_chars.as_str();

        // Keep the cursor in view by dropping characters from the left.
        let max = (inner.width as usize).saturating_sub(2);
        let skip = before.chars().count().saturating_sub(max);
        let before: String = before.chars().skip(skip).collect();

        let text_style = Style::default().fg(self.theme.editor_fg);
        let cursor_style = Style::default()
            .bg(self.theme.editor_fg)
            .fg(self.theme.dialog_bg)
            .add_modifier(Modifier::BOLD);
        let line = Line::from(vec![
            Span::styled(before, text_style),
            Span::styled(cursor_char, cursor_style),
            Span::styled(after, text_style),
        ]);
        buf.set_line(inner.x, inner.y + inner.height / 2, &line, inner.width);
        self.hint("[Enter] Confirm  [Esc] Cancel", inner, buf);
    }

    fn render_confirm(&self, targets: &[FileMetadata], area: Rect, buf: &mut Buffer) {
        let longest = targets.iter().map(|t| t.name.len()).max().unwrap_or(10);
        let width = (longest as u16 + 10).max(40).min(area.width.saturating_sub(4));
        let height = (targets.len() as u16 + 6).min(area.height.saturating_sub(2));
        let rect = Self::centered_rect(width, height, area);
        let inner = self.frame("Delete Confirmation", rect, self.theme.error_fg, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let header = Line::from(Span::styled(
            "Delete the following?",
            Style::default()
                .fg(self.theme.warning_fg)
                .add_modifier(Modifier::BOLD),
        ));
        buf.set_line(inner.x, inner.y, &header, inner.width);

        let max_items = inner.height.saturating_sub(3) as usize;
        for (i, target) in targets.iter().take(max_items).enumerate() {
            let suffix = if target.is_folder() { "/" } else { "" };
            let line = Line::from(Span::styled(
                format!("  • {}{}", target.name, suffix),
                Style::default().fg(self.theme.editor_fg),
            ));
            buf.set_line(inner.x, inner.y + 2 + i as u16, &line, inner.width);
        }
        if targets.len() > max_items {
            let more = Line::from(Span::styled(
                format!("  … and {} more", targets.len() - max_items),
                Style::default().fg(self.theme.dim_fg),
            ));
            buf.set_line(inner.x, inner.y + 2 + max_items as u16, &more, inner.width);
        }
        self.hint("[y] Yes  [n/Esc] Cancel", inner, buf);
    }

    fn render_error(&self, message: &str, area: Rect, buf: &mut Buffer) {
        let width = (message.len() as u16 + 6).max(30).min(area.width.saturating_sub(4));
        let rect = Self::centered_rect(width, 5, area);
        let inner = self.frame("Error", rect, self.theme.error_fg, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }
        let line = Line::from(Span::styled(message, Style::default().fg(self.theme.error_fg)));
        buf.set_line(inner.x, inner.y + inner.height / 2, &line, inner.width);
        self.hint("[any key] Dismiss", inner, buf);
    }
}

impl<'a> Widget for DialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let AppMode::Dialog(kind) = self.mode else {
            return;
        };
        match kind {
            DialogKind::DeleteConfirm { targets } => self.render_confirm(targets, area, buf),
            DialogKind::Error { message } => self.render_error(message, area, buf),
            other => self.render_input(other.title(), area, buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;

    fn render(mode: &AppMode, state: &DialogState) -> String {
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        DialogWidget::new(mode, state, &tc).render(area, &mut buf);
        let mut s = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                s.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            s.push('\n');
        }
        s
    }

    #[test]
    fn input_dialog_shows_title_and_input() {
        let mode = AppMode::Dialog(DialogKind::CreateFile {
            parent: FileMetadata::from_location("/file/"),
        });
        let state = DialogState {
            input: "test.txt".into(),
            cursor_position: 8,
        };
        let content = render(&mode, &state);
        assert!(content.contains("New File"));
        assert!(content.contains("test.txt"));
    }

    #[test]
    fn cursor_inside_multibyte_input_does_not_panic() {
        let mode = AppMode::Dialog(DialogKind::CreateProject);
        let state = DialogState {
            input: "héllo".into(),
            cursor_position: 1,
        };
        let content = render(&mode, &state);
        assert!(content.contains("New Project"));
    }

    #[test]
    fn confirm_dialog_lists_targets() {
        let mode = AppMode::Dialog(DialogKind::DeleteConfirm {
            targets: vec![
                FileMetadata::from_location("/file/one.txt"),
                FileMetadata::from_location("/file/two.txt"),
            ],
        });
        let content = render(&mode, &DialogState::default());
        assert!(content.contains("Delete"));
        assert!(content.contains("one.txt"));
        assert!(content.contains("two.txt"));
    }

    #[test]
    fn error_dialog_shows_message() {
        let mode = AppMode::Dialog(DialogKind::Error {
            message: "Permission denied".into(),
        });
        let content = render(&mode, &DialogState::default());
        assert!(content.contains("Permission denied"));
    }

    #[test]
    fn normal_mode_draws_nothing() {
        let content = render(&AppMode::Normal, &DialogState::default());
        assert!(content.trim().is_empty());
    }
}
