use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::app::MenuState;
use crate::theme::ThemeColors;

/// Popup listing every command the toolbar currently offers.
pub struct MenuWidget<'a> {
    menu: &'a MenuState,
    theme: &'a ThemeColors,
}

impl<'a> MenuWidget<'a> {
    pub fn new(menu: &'a MenuState, theme: &'a ThemeColors) -> Self {
        Self { menu, theme }
    }
}

impl<'a> Widget for MenuWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let widest = self
            .menu
            .entries
            .iter()
            .map(|e| e.label.chars().count() + e.depth * 2)
            .max()
            .unwrap_or(0) as u16;
        let width = (widest + 6).max(24).min(area.width);
        let height = (self.menu.entries.len() as u16 + 2).min(area.height);
        let rect = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        );

        Clear.render(rect, buf);
        let block = Block::default()
            .title(" Commands ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.dialog_border_fg))
            .style(Style::default().bg(self.theme.dialog_bg));
        let inner = block.inner(rect);
        block.render(rect, buf);
        if inner.height == 0 {
            return;
        }

        // Keep the cursor on screen.
        let visible = inner.height as usize;
        let skip = (self.menu.cursor + 1).saturating_sub(visible);
        for (row, (idx, entry)) in self
            .menu
            .entries
            .iter()
            .enumerate()
            .skip(skip)
            .take(visible)
            .enumerate()
        {
            let style = if entry.command.is_none() {
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD)
            } else if idx == self.menu.cursor {
                Style::default()
                    .bg(self.theme.tree_selected_bg)
                    .fg(self.theme.tree_selected_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.editor_fg)
            };
            let text = format!(" {}{}", "  ".repeat(entry.depth), entry.label);
            let line = Line::from(Span::styled(text, style));
            buf.set_line(inner.x, inner.y + row as u16, &line, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::MenuEntry;
    use crate::theme;

    #[test]
    fn highlights_cursor_entry() {
        let menu = MenuState {
            entries: vec![
                MenuEntry {
                    label: "New".into(),
                    depth: 0,
                    command: None,
                },
                MenuEntry {
                    label: "File".into(),
                    depth: 1,
                    command: Some(("eclipse.newFile", "toolbarNew".into())),
                },
            ],
            cursor: 1,
        };
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        MenuWidget::new(&menu, &tc).render(area, &mut buf);

        let mut found = None;
        for y in 0..10 {
            let line: String = (0..40)
                .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
                .collect();
            if line.contains("File") {
                found = Some(y);
            }
        }
        let y = found.expect("menu entry rendered");
        let x = (0..40)
            .find(|&x| buf.cell((x, y)).unwrap().symbol() == "F")
            .unwrap();
        assert_eq!(buf.cell((x, y)).unwrap().bg, tc.tree_selected_bg);
    }
}
