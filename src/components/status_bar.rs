use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const KEY_HINTS: &str = " a:new  F2:ren  Del:del  m:menu  q:quit ";

/// Bottom bar: selection path and info, or a transient status message.
pub struct StatusBarWidget<'a> {
    path_str: &'a str,
    info: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    clipboard_info: Option<&'a str>,
    watcher_status: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path_str: &'a str, info: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            path_str,
            info,
            theme,
            status_message: None,
            clipboard_info: None,
            watcher_status: None,
        }
    }

    pub fn status_message(mut self, msg: &'a str) -> Self {
        self.status_message = Some(msg);
        self
    }

    pub fn clipboard_info(mut self, info: &'a str) -> Self {
        self.clipboard_info = Some(info);
        self
    }

    pub fn watcher_status(mut self, status: &'a str) -> Self {
        self.watcher_status = Some(status);
        self
    }
}

/// Keep the tail of `s` within `budget` chars, marking the cut with `...`.
fn truncate_left(s: &str, budget: usize) -> String {
    let len = s.chars().count();
    if len <= budget {
        return s.to_string();
    }
    if budget <= 3 {
        return s.chars().take(budget).collect();
    }
    let tail: String = s.chars().skip(len - (budget - 3)).collect();
    format!("...{}", tail)
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let width = area.width as usize;
        buf.set_style(
            area,
            Style::default().bg(self.theme.status_bg).fg(self.theme.status_fg),
        );

        if let Some(msg) = self.status_message {
            let line = Line::from(Span::styled(
                truncate_left(msg, width),
                Style::default().fg(self.theme.success_fg),
            ));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let mut extras = Vec::new();
        if let Some(clip) = self.clipboard_info {
            extras.push(Span::styled(
                format!(" {}", clip),
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        if let Some(watcher) = self.watcher_status {
            extras.push(Span::styled(
                format!(" {}", watcher),
                Style::default()
                    .fg(self.theme.warning_fg)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        let extras_len: usize = extras.iter().map(|s| s.content.chars().count()).sum();
        let info = format!(" {}", self.info);
        let fixed = KEY_HINTS.len() + extras_len + info.chars().count();
        let path = truncate_left(self.path_str, width.saturating_sub(fixed));
        let gap = width.saturating_sub(fixed + path.chars().count());

        let mut spans = vec![
            Span::styled(path, Style::default().fg(self.theme.status_fg)),
            Span::styled(info, Style::default().fg(self.theme.dim_fg)),
        ];
        spans.extend(extras);
        spans.push(Span::raw(" ".repeat(gap)));
        spans.push(Span::styled(
            KEY_HINTS,
            Style::default()
                .fg(self.theme.dim_fg)
                .add_modifier(Modifier::DIM),
        ));
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
