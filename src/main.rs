use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;

use common_nav::app::App;
use common_nav::config::AppConfig;
use common_nav::error::{NavError, Result};
use common_nav::event::{Event, EventHandler};
use common_nav::fs::local::LocalFileService;
use common_nav::fs::service::FileService;
use common_nav::fs::watcher::{self, FsWatcher};
use common_nav::tui::{install_panic_hook, Tui};
use common_nav::{handler, logging, ui};

/// A terminal file navigator that follows the open file.
#[derive(Parser, Debug)]
#[command(name = "cnav", version, about)]
struct Cli {
    /// Workspace directory (defaults to `[general] default_path`, then ".")
    path: Option<PathBuf>,

    /// Config file, applied over the discovered ones
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Location to display as the root, e.g. /file/src/
    #[arg(long, value_name = "LOCATION")]
    navigate: Option<String>,

    /// Disable filesystem watcher (auto-refresh)
    #[arg(long)]
    no_watcher: bool,

    /// Render folders as plain toggles instead of links
    #[arg(long)]
    no_folder_links: bool,

    /// Color scheme: dark, light or custom
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Print the root folder and its children as JSON, then exit
    #[arg(long)]
    list: bool,
}

impl Cli {
    fn overrides(&self) -> AppConfig {
        let mut config = AppConfig::default();
        if self.no_watcher {
            config.watcher.enabled = Some(false);
        }
        if self.no_folder_links {
            config.tree.show_folder_links = Some(false);
        }
        config.theme.scheme = self.theme.clone();
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    let requested = cli
        .path
        .clone()
        .or_else(|| config.general.default_path.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let workspace = requested
        .canonicalize()
        .map_err(|_| NavError::InvalidPath(format!("{} does not exist", requested.display())))?;

    if cli.list {
        return list(&workspace, &config, cli.navigate.as_deref()).await;
    }

    let _log_guard = match config.log_file() {
        Some(path) => Some(logging::init(&path, config.log_level())?),
        None => None,
    };
    install_panic_hook();

    let mut app = App::new(&workspace, &config, cli.navigate.clone());
    app.start().await?;

    let mut events = EventHandler::new(Duration::from_millis(250));
    let _watcher = if config.watcher_enabled() {
        let ignore_patterns = watcher::DEFAULT_IGNORE_PATTERNS
            .iter()
            .map(|s| s.to_string())
            .collect();
        match FsWatcher::new(
            &workspace,
            Duration::from_millis(config.debounce_ms()),
            ignore_patterns,
            watcher::DEFAULT_FLOOD_THRESHOLD,
            events.sender(),
        ) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::warn!(error = %e, "watcher unavailable");
                app.watcher_active = false;
                app.set_status_message(format!("Watcher unavailable: {}", e));
                None
            }
        }
    } else {
        app.watcher_active = false;
        None
    };

    let mut tui = Tui::new(config.mouse_enabled())?;
    let result = run(&mut tui, &mut app, &mut events).await;
    tui.restore()?;
    app.explorer.destroy();
    result
}

async fn run(tui: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    loop {
        tui.draw(|frame| ui::render(app, frame))?;

        tokio::select! {
            event = events.next() => match event? {
                Event::Key(key) => handler::handle_key_event(app, key).await,
                Event::Mouse(mouse) => handler::handle_mouse_event(app, mouse).await,
                Event::Tick => app.clear_expired_status(),
                Event::Resize(_, _) => {}
                Event::FsChange(paths) => {
                    if let Err(err) = app.handle_fs_change(paths).await {
                        tracing::warn!(error = %err, "failed to apply filesystem change");
                    }
                }
            },
            Some(inbound) = app.explorer.next_inbound() => {
                if let Err(err) = app.explorer.process(inbound).await {
                    app.show_error(err);
                }
            }
            Some(nav_event) = app.nav_rx.recv() => {
                if let Err(err) = app.handle_nav_event(nav_event).await {
                    app.show_error(err);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// `--list`: dump the root metadata, children included.
async fn list(workspace: &Path, config: &AppConfig, navigate: Option<&str>) -> Result<()> {
    let service = LocalFileService::new(workspace).dirs_first(config.dirs_first());
    let mut root = service.read(navigate.unwrap_or_default()).await?;
    if let Some(children_location) = root.children_location.clone() {
        root.children = Some(service.fetch_children(&children_location).await?);
    }
    println!("{}", serde_json::to_string_pretty(&root)?);
    Ok(())
}
