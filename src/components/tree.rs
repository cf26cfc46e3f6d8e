use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::nav::renderer::{NavRenderer, FAKE_LINK_CLASS};
use crate::nav::tree::{Row, TreeModel};
use crate::theme::ThemeColors;

/// Navigator tree drawn with box-drawing connectors.
pub struct TreeWidget<'a> {
    model: &'a TreeModel,
    renderer: NavRenderer,
    theme: &'a ThemeColors,
    use_icons: bool,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(
        model: &'a TreeModel,
        renderer: NavRenderer,
        theme: &'a ThemeColors,
        use_icons: bool,
    ) -> Self {
        Self {
            model,
            renderer,
            theme,
            use_icons,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Connector prefix for `rows[index]`. Each ancestor level draws a rail
    /// unless that ancestor was the last of its siblings.
    fn build_prefix(rows: &[Row], index: usize) -> String {
        let row = &rows[index];
        let mut prefix = String::new();
        for depth in 0..row.depth {
            let ancestor_is_last = rows[..index]
                .iter()
                .rev()
                .take_while(|r| r.depth >= depth)
                .find(|r| r.depth == depth)
                .is_some_and(|r| r.is_last_sibling);
            prefix.push_str(if ancestor_is_last { "   " } else { "│  " });
        }
        prefix.push_str(if row.is_last_sibling { "└──" } else { "├──" });
        prefix
    }

    fn indicator(&self, row: &Row) -> &'static str {
        match (self.use_icons, row.is_folder, row.is_expanded) {
            (true, true, true) => "\u{f07c} ",
            (true, true, false) => "\u{f07b} ",
            (true, false, _) => Self::file_icon_by_ext(&row.name),
            (false, true, true) => "[-] ",
            (false, true, false) => "[+] ",
            (false, false, _) => "    ",
        }
    }

    /// Nerd Font glyph for a file extension.
    fn file_icon_by_ext(name: &str) -> &'static str {
        let ext = name.rsplit('.').next().unwrap_or("").to_lowercase();
        match ext.as_str() {
            "rs" => "\u{e7a8} ",
            "py" => "\u{e73c} ",
            "js" | "jsx" | "ts" | "tsx" => "\u{e74e} ",
            "html" | "htm" | "css" => "\u{e736} ",
            "json" | "toml" | "yaml" | "yml" => "\u{e60b} ",
            "md" | "txt" => "\u{f48a} ",
            "sh" | "bash" | "zsh" => "\u{f489} ",
            "png" | "jpg" | "jpeg" | "gif" | "svg" => "\u{f1c5} ",
            "zip" | "tar" | "gz" => "\u{f410} ",
            _ => "\u{f15b} ",
        }
    }

    fn row_style(&self, row: &Row, selected: bool) -> Style {
        if selected {
            return Style::default()
                .bg(self.theme.tree_selected_bg)
                .fg(self.theme.tree_selected_fg)
                .add_modifier(Modifier::BOLD);
        }
        if row.is_hidden {
            return Style::default().fg(self.theme.tree_hidden_fg);
        }
        if !row.is_folder {
            return Style::default().fg(self.theme.tree_file_fg);
        }
        let node = self.model.find_node(&row.location);
        match node.map(|folder| self.renderer.create_folder_node(folder)) {
            Some(folder) if folder.class == FAKE_LINK_CLASS => {
                Style::default().fg(self.theme.fake_link_fg)
            }
            _ => Style::default()
                .fg(self.theme.tree_dir_fg)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        }
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        let rows = &self.model.rows;
        if inner.height == 0 {
            return;
        }
        if rows.is_empty() {
            let line = Line::from(Span::styled(
                "(empty)",
                Style::default().fg(self.theme.dim_fg),
            ));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        let visible = rows
            .iter()
            .enumerate()
            .skip(self.model.scroll_offset)
            .take(inner.height as usize);
        for (i, (idx, row)) in visible.enumerate() {
            let style = self.row_style(row, idx == self.model.cursor);
            let text = format!(
                "{}{}{}",
                Self::build_prefix(rows, idx),
                self.indicator(row),
                row.name
            );
            let line = Line::from(Span::styled(text, style));
            buf.set_line(inner.x, inner.y + i as u16, &line, inner.width);
        }
    }
}
