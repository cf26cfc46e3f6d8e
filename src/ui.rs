use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, AppMode, Focus};
use crate::components::dialog::DialogWidget;
use crate::components::editor::EditorWidget;
use crate::components::menu::MenuWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::toolbar::ToolbarWidget;
use crate::components::tree::TreeWidget;

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(outer[1]);

    let sections: Vec<_> = app
        .explorer
        .sections()
        .all()
        .iter()
        .filter_map(|scope| app.explorer.registry().rendered(scope))
        .collect();
    frame.render_widget(ToolbarWidget::new(sections, &app.theme), outer[0]);

    // Keep the cursor row visible inside the border.
    app.tree_area = panes[0];
    let visible_height = panes[0].height.saturating_sub(2) as usize;
    app.explorer.tree_mut().update_scroll(visible_height);

    let border = |focused: bool| {
        let color = if focused {
            app.theme.border_focused_fg
        } else {
            app.theme.border_fg
        };
        Style::default().fg(color)
    };

    let tree_block = Block::default()
        .title(format!(" {} ", app.explorer.root().name))
        .borders(Borders::ALL)
        .border_style(border(app.focus == Focus::Tree));
    let tree = TreeWidget::new(
        app.explorer.tree(),
        app.explorer.renderer(),
        &app.theme,
        app.use_icons,
    )
    .block(tree_block);
    frame.render_widget(tree, panes[0]);

    let editor_title = if app.editor.title.is_empty() {
        " Editor ".to_string()
    } else {
        format!(" {} ", app.editor.title)
    };
    let editor_block = Block::default()
        .title(editor_title)
        .borders(Borders::ALL)
        .border_style(border(app.focus == Focus::Editor));
    frame.render_widget(EditorWidget::new(&app.editor, &app.theme).block(editor_block), panes[1]);

    render_status_bar(app, frame, outer[2]);

    match &app.mode {
        AppMode::Dialog(_) => {
            frame.render_widget(DialogWidget::new(&app.mode, &app.dialog_state, &app.theme), frame.area())
        }
        AppMode::Menu => frame.render_widget(MenuWidget::new(&app.menu, &app.theme), frame.area()),
        AppMode::Normal => {}
    }
}

fn render_status_bar(app: &App, frame: &mut Frame, area: ratatui::layout::Rect) {
    let selections = app.explorer.selection().get_selections();
    let (path, info) = match selections.as_slice() {
        [] => (app.display_path(&app.explorer.root().location), String::from("no selection")),
        [item] => {
            let info = if item.is_folder() {
                "folder".to_string()
            } else {
                format!("{} bytes", item.length)
            };
            (app.display_path(&item.location), info)
        }
        items => (
            app.display_path(&app.explorer.root().location),
            format!("{} selected", items.len()),
        ),
    };
    let clipboard = (!app.clipboard.is_empty()).then(|| format!("{} in clipboard", app.clipboard.len()));

    let mut bar = StatusBarWidget::new(&path, &info, &app.theme);
    if let Some((msg, _)) = &app.status_message {
        bar = bar.status_message(msg);
    }
    if let Some(clip) = &clipboard {
        bar = bar.clipboard_info(clip);
    }
    if !app.watcher_active {
        bar = bar.watcher_status("watch off");
    }
    frame.render_widget(bar, area);
}
