//! Navigator configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (later sources override earlier ones):
//! 1. Global `<config_dir>/cnav/config.toml`
//! 2. Project-local `.cnav.toml` in the current working directory
//! 3. `$CNAV_CONFIG` environment variable (path to config file)
//! 4. `--config FILE`
//! 5. CLI flags (`--theme`, `--no-watcher`, `--no-folder-links`)

use std::path::{Path, PathBuf};

use serde::Deserialize;

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Workspace directory (overridden by CLI positional arg).
    pub default_path: Option<String>,
    /// Confirm before delete operations.
    pub confirm_delete: Option<bool>,
    /// Enable mouse support.
    pub mouse: Option<bool>,
}

/// Navigator tree settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TreeConfig {
    pub show_hidden: Option<bool>,
    /// Render folders as links that also open them in the editor pane.
    pub show_folder_links: Option<bool>,
    /// Use nerd font icons (false = ASCII fallback).
    pub use_icons: Option<bool>,
    /// Directories always listed first.
    pub dirs_first: Option<bool>,
}

/// Filesystem watcher settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WatcherConfig {
    pub enabled: Option<bool>,
    /// Debounce interval in milliseconds.
    pub debounce_ms: Option<u64>,
}

/// Color settings for a single theme palette.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub tree_bg: Option<String>,
    pub tree_fg: Option<String>,
    pub tree_selected_bg: Option<String>,
    pub tree_selected_fg: Option<String>,
    pub tree_dir_fg: Option<String>,
    pub tree_file_fg: Option<String>,
    pub tree_hidden_fg: Option<String>,
    pub fake_link_fg: Option<String>,
    pub editor_bg: Option<String>,
    pub editor_fg: Option<String>,
    pub editor_line_nr_fg: Option<String>,
    pub toolbar_bg: Option<String>,
    pub toolbar_fg: Option<String>,
    pub status_bg: Option<String>,
    pub status_fg: Option<String>,
    pub border_fg: Option<String>,
    pub dialog_bg: Option<String>,
    pub dialog_border_fg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    pub custom: Option<ThemeColorsConfig>,
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. "debug".
    pub level: Option<String>,
    /// Log file path; defaults under the local data directory.
    pub file: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub tree: TreeConfig,
    pub watcher: WatcherConfig,
    pub theme: ThemeConfig,
    pub log: LogConfig,
}

/// Default debounce interval in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
/// Default log filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ── Config file locator ──────────────────────────────────────────────────────

/// Discovered config files, lowest priority first.
fn candidate_paths() -> Vec<PathBuf> {
    let global = dirs::config_dir().map(|d| d.join("cnav").join("config.toml"));
    let local = std::env::current_dir().ok().map(|d| d.join(".cnav.toml"));
    let env = std::env::var_os("CNAV_CONFIG").map(PathBuf::from);
    [global, local, env].into_iter().flatten().collect()
}

/// `None` for a missing or malformed file. Parse errors go to stderr
/// because logging is not set up yet.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content)
        .map_err(|e| eprintln!("cnav: ignoring {}: {}", path.display(), e))
        .ok()
}

// ── Layering ─────────────────────────────────────────────────────────────────

/// Copy every `Some` field of `$over` onto `$base`.
macro_rules! overlay {
    ($base:expr, $over:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = &$over.$field {
                $base.$field = Some(value.clone());
            }
        )+
    };
}

impl ThemeColorsConfig {
    fn overlay(&mut self, over: &ThemeColorsConfig) {
        overlay!(self, over;
            tree_bg, tree_fg, tree_selected_bg, tree_selected_fg, tree_dir_fg,
            tree_file_fg, tree_hidden_fg, fake_link_fg, editor_bg, editor_fg,
            editor_line_nr_fg, toolbar_bg, toolbar_fg, status_bg, status_fg,
            border_fg, dialog_bg, dialog_border_fg,
        );
    }
}

impl AppConfig {
    /// Layer `other` on top of `self`: `other`'s `Some` values win.
    pub fn merge(mut self, other: &AppConfig) -> AppConfig {
        overlay!(self.general, other.general; default_path, confirm_delete, mouse);
        overlay!(self.tree, other.tree; show_hidden, show_folder_links, use_icons, dirs_first);
        overlay!(self.watcher, other.watcher; enabled, debounce_ms);
        overlay!(self.theme, other.theme; scheme);
        overlay!(self.log, other.log; level, file);
        if let Some(over) = &other.theme.custom {
            self.theme
                .custom
                .get_or_insert_with(ThemeColorsConfig::default)
                .overlay(over);
        }
        self
    }

    /// Discovered files, then `--config`, then CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let files = candidate_paths()
            .into_iter()
            .chain(cli_config_path.map(Path::to_path_buf))
            .filter_map(|path| load_file(&path));
        let config = files.fold(AppConfig::default(), |acc, layer| acc.merge(&layer));
        match cli_overrides {
            Some(overrides) => config.merge(overrides),
            None => config,
        }
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    pub fn confirm_delete(&self) -> bool {
        self.general.confirm_delete.unwrap_or(true)
    }

    pub fn mouse_enabled(&self) -> bool {
        self.general.mouse.unwrap_or(true)
    }

    pub fn show_hidden(&self) -> bool {
        self.tree.show_hidden.unwrap_or(false)
    }

    pub fn show_folder_links(&self) -> bool {
        self.tree.show_folder_links.unwrap_or(true)
    }

    pub fn use_icons(&self) -> bool {
        self.tree.use_icons.unwrap_or(true)
    }

    pub fn dirs_first(&self) -> bool {
        self.tree.dirs_first.unwrap_or(true)
    }

    pub fn watcher_enabled(&self) -> bool {
        self.watcher.enabled.unwrap_or(true)
    }

    pub fn debounce_ms(&self) -> u64 {
        self.watcher.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS)
    }

    /// Theme scheme: "dark", "light", or "custom".
    pub fn theme_scheme(&self) -> &str {
        self.theme.scheme.as_deref().unwrap_or("dark")
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Log file path: `[log] file`, else `<data_local_dir>/cnav/logs/cnav.log`.
    pub fn log_file(&self) -> Option<PathBuf> {
        match &self.log.file {
            Some(file) => Some(PathBuf::from(file)),
            None => dirs::data_local_dir().map(|d| d.join("cnav").join("logs").join("cnav.log")),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
