use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::{App, AppMode, DialogKind, Focus};
use crate::error::Result;
use crate::nav::commands::NAV_DOM_SCOPE;
use crate::nav::file_commands::{NEW_FILE, NEW_FOLDER};

/// Handle a key event. Failures are shown in an error dialog.
pub async fn handle_key_event(app: &mut App, key: KeyEvent) {
    let result = match app.mode.clone() {
        AppMode::Dialog(kind) => handle_dialog_key(app, key, &kind).await,
        AppMode::Menu => handle_menu_key(app, key).await,
        AppMode::Normal => handle_normal_key(app, key).await,
    };
    if let Err(err) = result {
        app.show_error(err);
    }
}

pub async fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.mode != AppMode::Normal {
        return;
    }
    let area = app.tree_area;
    let in_tree = mouse.column >= area.x && mouse.column < area.x + area.width;
    let result = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if in_tree => app.click_tree_row(mouse.row).await,
        MouseEventKind::ScrollDown if in_tree => {
            app.explorer.tree_mut().select_next();
            app.explorer.select_cursor();
            Ok(())
        }
        MouseEventKind::ScrollUp if in_tree => {
            app.explorer.tree_mut().select_previous();
            app.explorer.select_cursor();
            Ok(())
        }
        MouseEventKind::ScrollDown => {
            app.scroll_editor(3);
            Ok(())
        }
        MouseEventKind::ScrollUp => {
            app.scroll_editor(-3);
            Ok(())
        }
        _ => Ok(()),
    };
    if let Err(err) = result {
        app.show_error(err);
    }
}

async fn handle_normal_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('q') => {
            app.quit();
            return Ok(());
        }
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::Tree => Focus::Editor,
                Focus::Editor => Focus::Tree,
            };
            return Ok(());
        }
        _ => {}
    }
    match app.focus {
        Focus::Tree => handle_tree_key(app, key).await,
        Focus::Editor => {
            handle_editor_key(app, key);
            Ok(())
        }
    }
}

async fn handle_tree_key(app: &mut App, key: KeyEvent) -> Result<()> {
    // Navigator keybindings take precedence over the built-in keys.
    let bound = app
        .explorer
        .registry()
        .find_key_binding(&key, NAV_DOM_SCOPE)
        .map(|(id, scope)| (id, scope.to_string()));
    if let Some((command_id, scope)) = bound {
        return app.run_command(command_id, &scope).await;
    }

    let tree = app.explorer.tree_mut();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => tree.select_next(),
        KeyCode::Char('k') | KeyCode::Up => tree.select_previous(),
        KeyCode::Char('g') | KeyCode::Home => tree.select_first(),
        KeyCode::Char('G') | KeyCode::End => tree.select_last(),
        KeyCode::Char('.') => tree.toggle_hidden(),
        KeyCode::Char('l') | KeyCode::Right => return app.expand_cursor().await,
        KeyCode::Char('h') | KeyCode::Left => {
            app.collapse_cursor();
            return Ok(());
        }
        KeyCode::Enter | KeyCode::Char(' ') => return app.activate_cursor().await,
        KeyCode::Char('m') => {
            app.open_menu();
            return Ok(());
        }
        KeyCode::F(5) => return app.refresh().await,
        KeyCode::Char('a') => {
            let scope = app.explorer.sections().new_actions.clone();
            return app.run_command(NEW_FILE, &scope).await;
        }
        KeyCode::Char('A') => {
            let scope = app.explorer.sections().new_actions.clone();
            return app.run_command(NEW_FOLDER, &scope).await;
        }
        _ => return Ok(()),
    }
    app.explorer.select_cursor();
    Ok(())
}

fn handle_editor_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.scroll_editor(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_editor(-1),
        KeyCode::PageDown => app.scroll_editor(20),
        KeyCode::PageUp => app.scroll_editor(-20),
        KeyCode::Char('g') | KeyCode::Home => app.editor.scroll = 0,
        KeyCode::Char('G') | KeyCode::End => app.scroll_editor(isize::MAX / 2),
        KeyCode::Esc => app.focus = Focus::Tree,
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => app.close_editor(),
        _ => {}
    }
}

async fn handle_menu_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.menu_move(1),
        KeyCode::Char('k') | KeyCode::Up => app.menu_move(-1),
        KeyCode::Enter => return app.run_menu_selection().await,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('m') => app.close_menu(),
        _ => {}
    }
    Ok(())
}

async fn handle_dialog_key(app: &mut App, key: KeyEvent, kind: &DialogKind) -> Result<()> {
    match kind {
        DialogKind::Error { .. } => app.close_dialog(),
        DialogKind::DeleteConfirm { .. } => match key.code {
            KeyCode::Char('y') | KeyCode::Enter => return app.confirm_dialog().await,
            KeyCode::Char('n') | KeyCode::Esc => app.close_dialog(),
            _ => {}
        },
        _ => match key.code {
            KeyCode::Enter => return app.confirm_dialog().await,
            KeyCode::Esc => app.close_dialog(),
            KeyCode::Backspace => app.dialog_delete_char(),
            KeyCode::Left => app.dialog_move_cursor_left(),
            KeyCode::Right => app.dialog_move_cursor_right(),
            KeyCode::Home => app.dialog_cursor_home(),
            KeyCode::End => app.dialog_cursor_end(),
            KeyCode::Char(c) => app.dialog_input_char(c),
            _ => {}
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use std::fs;
    use tempfile::TempDir;

    async fn setup_app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs").join("guide.md"), "# guide").unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        let root = dir.path().canonicalize().unwrap();
        let mut app = App::new(&root, &AppConfig::default(), None);
        app.start().await.unwrap();
        app.explorer.process_pending().await.unwrap();
        (dir, app)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn cursor_location(app: &App) -> String {
        app.explorer.tree().cursor_item().unwrap().location.clone()
    }

    #[tokio::test]
    async fn q_quits() {
        let (_dir, mut app) = setup_app().await;
        handle_key_event(&mut app, key(KeyCode::Char('q'))).await;
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn arrow_keys_move_and_select() {
        let (_dir, mut app) = setup_app().await;
        handle_key_event(&mut app, key(KeyCode::Down)).await;
        assert_eq!(cursor_location(&app), "/file/notes.txt");
        let selected = app.explorer.selection().get_selection().unwrap();
        assert_eq!(selected.location, "/file/notes.txt");
        handle_key_event(&mut app, key(KeyCode::Char('k'))).await;
        assert_eq!(cursor_location(&app), "/file/docs/");
    }

    #[tokio::test]
    async fn enter_opens_file_in_editor() {
        let (_dir, mut app) = setup_app().await;
        handle_key_event(&mut app, key(KeyCode::Down)).await;
        handle_key_event(&mut app, key(KeyCode::Enter)).await;
        assert_eq!(app.editor.location.as_deref(), Some("/file/notes.txt"));
        assert_eq!(app.editor.lines, vec!["hello"]);
    }

    #[tokio::test]
    async fn right_and_left_expand_and_collapse() {
        let (_dir, mut app) = setup_app().await;
        handle_key_event(&mut app, key(KeyCode::Right)).await;
        assert!(app.explorer.tree().is_expanded("/file/docs/"));
        handle_key_event(&mut app, key(KeyCode::Left)).await;
        assert!(!app.explorer.tree().is_expanded("/file/docs/"));
    }

    #[tokio::test]
    async fn delete_key_asks_for_confirmation() {
        let (_dir, mut app) = setup_app().await;
        handle_key_event(&mut app, key(KeyCode::Delete)).await;
        assert!(matches!(
            app.mode,
            AppMode::Dialog(DialogKind::DeleteConfirm { .. })
        ));
        handle_key_event(&mut app, key(KeyCode::Esc)).await;
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[tokio::test]
    async fn f2_renames_through_dialog() {
        let (dir, mut app) = setup_app().await;
        handle_key_event(&mut app, key(KeyCode::Down)).await;
        app.explorer.process_pending().await.unwrap();
        handle_key_event(&mut app, key(KeyCode::F(2))).await;
        assert_eq!(app.dialog_state.input, "notes.txt");
        for _ in 0.."txt".len() {
            handle_key_event(&mut app, key(KeyCode::Backspace)).await;
        }
        for c in "md".chars() {
            handle_key_event(&mut app, key(KeyCode::Char(c))).await;
        }
        handle_key_event(&mut app, key(KeyCode::Enter)).await;
        assert!(dir.path().join("notes.md").is_file());
        assert!(!dir.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn alt_down_scopes_into_folder() {
        let (_dir, mut app) = setup_app().await;
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Down, KeyModifiers::ALT)).await;
        while let Ok(event) = app.nav_rx.try_recv() {
            app.handle_nav_event(event).await.unwrap();
        }
        assert_eq!(app.explorer.root().location, "/file/docs/");
    }

    #[tokio::test]
    async fn errors_open_error_dialog_and_any_key_dismisses() {
        let (_dir, mut app) = setup_app().await;
        handle_key_event(&mut app, key(KeyCode::Char('A'))).await;
        for c in "docs".chars() {
            handle_key_event(&mut app, key(KeyCode::Char(c))).await;
        }
        handle_key_event(&mut app, key(KeyCode::Enter)).await;
        assert!(matches!(app.mode, AppMode::Dialog(DialogKind::Error { .. })));
        handle_key_event(&mut app, key(KeyCode::Char('x'))).await;
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[tokio::test]
    async fn tab_moves_focus_to_editor() {
        let (_dir, mut app) = setup_app().await;
        handle_key_event(&mut app, key(KeyCode::Tab)).await;
        assert_eq!(app.focus, Focus::Editor);
        handle_key_event(&mut app, key(KeyCode::Down)).await;
        assert_eq!(cursor_location(&app), "/file/docs/");
        handle_key_event(&mut app, key(KeyCode::Esc)).await;
        assert_eq!(app.focus, Focus::Tree);
    }

    #[tokio::test]
    async fn menu_runs_selected_command() {
        let (_dir, mut app) = setup_app().await;
        handle_key_event(&mut app, key(KeyCode::Char('m'))).await;
        assert_eq!(app.mode, AppMode::Menu);
        handle_key_event(&mut app, key(KeyCode::Enter)).await;
        assert!(matches!(app.mode, AppMode::Dialog(_)));
    }
}
