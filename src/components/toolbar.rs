//! One-line rendering of the navigator toolbar sections.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::nav::commands::{RenderedCommand, RenderedSection};
use crate::theme::ThemeColors;

pub struct ToolbarWidget<'a> {
    sections: Vec<&'a RenderedSection>,
    theme: &'a ThemeColors,
}

impl<'a> ToolbarWidget<'a> {
    pub fn new(sections: Vec<&'a RenderedSection>, theme: &'a ThemeColors) -> Self {
        Self { sections, theme }
    }

    fn push_spans(&self, command: &RenderedCommand, spans: &mut Vec<Span<'a>>) {
        let item_style = Style::default().fg(self.theme.toolbar_fg);
        let group_style = Style::default()
            .fg(self.theme.accent_fg)
            .add_modifier(Modifier::BOLD);
        match command {
            RenderedCommand::Item { name, key_label, .. } => {
                let text = match key_label {
                    Some(key) => format!(" {} <{}> ", name, key),
                    None => format!(" {} ", name),
                };
                spans.push(Span::styled(text, item_style));
            }
            // Dropdowns collapse to their title; open them from the command menu.
            RenderedCommand::Group {
                title: Some(title),
                dropdown: true,
                ..
            } => spans.push(Span::styled(format!(" {} ▾ ", title), group_style)),
            RenderedCommand::Group {
                title, children, ..
            } => {
                if let Some(title) = title {
                    spans.push(Span::styled(format!(" {}:", title), group_style));
                }
                for child in children {
                    self.push_spans(child, spans);
                }
            }
        }
    }
}

impl<'a> Widget for ToolbarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let bar = Style::default()
            .bg(self.theme.toolbar_bg)
            .fg(self.theme.toolbar_fg);
        buf.set_style(area, bar);

        let separator = Style::default().fg(self.theme.border_fg);
        let mut spans = Vec::new();
        for section in self.sections.iter().filter(|s| !s.commands.is_empty()) {
            if !spans.is_empty() {
                spans.push(Span::styled("│", separator));
            }
            for command in &section.commands {
                self.push_spans(command, &mut spans);
            }
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::commands::RenderType;
    use crate::theme;

    fn item(id: &'static str, name: &'static str, key: Option<&str>) -> RenderedCommand {
        RenderedCommand::Item {
            command_id: id,
            name,
            tooltip: "",
            key_label: key.map(str::to_string),
        }
    }

    fn section(commands: Vec<RenderedCommand>) -> RenderedSection {
        RenderedSection {
            items: Vec::new(),
            render_type: RenderType::Button,
            commands,
        }
    }

    fn text(buf: &Buffer, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn renders_groups_items_and_dropdowns() {
        let new = section(vec![RenderedCommand::Group {
            id: "new".into(),
            title: Some("New".into()),
            dropdown: false,
            children: vec![item("a", "File", None), item("b", "Folder", None)],
        }]);
        let selection = section(vec![
            item("c", "Rename", Some("F2")),
            RenderedCommand::Group {
                id: "io".into(),
                title: Some("Import/Export".into()),
                dropdown: true,
                children: vec![item("d", "Export", None)],
            },
        ]);
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        ToolbarWidget::new(vec![&new, &selection], &tc).render(area, &mut buf);
        let line = text(&buf, 80);
        assert!(line.contains("New: File  Folder"));
        assert!(line.contains("Rename <F2>"));
        assert!(line.contains("Import/Export ▾"));
        assert!(!line.contains(" Export "));
    }

    #[test]
    fn empty_sections_draw_only_the_bar() {
        let empty = section(Vec::new());
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        ToolbarWidget::new(vec![&empty], &tc).render(area, &mut buf);
        assert!(text(&buf, 10).trim().is_empty());
        assert_eq!(buf.cell((0, 0)).unwrap().bg, tc.toolbar_bg);
    }
}
