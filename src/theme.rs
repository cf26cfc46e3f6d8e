//! Built-in palettes and their resolution from config.

use ratatui::style::Color;

use crate::config::{ThemeColorsConfig, ThemeConfig};

/// Every runtime color the navigator UI draws with.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Navigator tree
    pub tree_bg: Color,
    pub tree_fg: Color,
    pub tree_selected_bg: Color,
    pub tree_selected_fg: Color,
    pub tree_dir_fg: Color,
    pub tree_file_fg: Color,
    pub tree_hidden_fg: Color,
    /// Folders rendered without links.
    pub fake_link_fg: Color,

    // Editor pane
    pub editor_bg: Color,
    pub editor_fg: Color,
    pub editor_line_nr_fg: Color,

    // Toolbar and status bar
    pub toolbar_bg: Color,
    pub toolbar_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,

    pub border_fg: Color,
    pub border_focused_fg: Color,
    pub dialog_bg: Color,
    pub dialog_border_fg: Color,

    // Semantic colors, not configurable
    pub error_fg: Color,
    pub warning_fg: Color,
    pub success_fg: Color,
    pub accent_fg: Color,
    pub dim_fg: Color,
}

/// Catppuccin Mocha.
pub fn dark_theme() -> ThemeColors {
    let text = Color::Rgb(205, 214, 244); // #cdd6f4
    let overlay0 = Color::Rgb(108, 112, 134); // #6c7086
    let blue = Color::Rgb(137, 180, 250); // #89b4fa
    ThemeColors {
        tree_bg: Color::Reset,
        tree_fg: text,
        tree_selected_bg: Color::Rgb(69, 71, 90), // #45475a
        tree_selected_fg: text,
        tree_dir_fg: blue,
        tree_file_fg: text,
        tree_hidden_fg: overlay0,
        fake_link_fg: Color::Rgb(148, 226, 213), // #94e2d5

        editor_bg: Color::Reset,
        editor_fg: text,
        editor_line_nr_fg: overlay0,

        toolbar_bg: Color::Rgb(49, 50, 68), // #313244
        toolbar_fg: text,
        status_bg: Color::Rgb(30, 30, 46), // #1e1e2e
        status_fg: text,

        border_fg: Color::Rgb(88, 91, 112), // #585b70
        border_focused_fg: blue,
        dialog_bg: Color::Rgb(49, 50, 68),
        dialog_border_fg: blue,

        error_fg: Color::Rgb(243, 139, 168),
        warning_fg: Color::Rgb(249, 226, 175),
        success_fg: Color::Rgb(166, 227, 161),
        accent_fg: Color::Rgb(203, 166, 247),
        dim_fg: overlay0,
    }
}

/// Catppuccin Latte.
pub fn light_theme() -> ThemeColors {
    let text = Color::Rgb(76, 79, 105); // #4c4f69
    let overlay0 = Color::Rgb(156, 160, 176); // #9ca0b0
    let blue = Color::Rgb(30, 102, 245); // #1e66f5
    ThemeColors {
        tree_bg: Color::Reset,
        tree_fg: text,
        tree_selected_bg: Color::Rgb(204, 208, 218), // #ccd0da
        tree_selected_fg: text,
        tree_dir_fg: blue,
        tree_file_fg: text,
        tree_hidden_fg: overlay0,
        fake_link_fg: Color::Rgb(23, 146, 153), // #179299

        editor_bg: Color::Reset,
        editor_fg: text,
        editor_line_nr_fg: overlay0,

        toolbar_bg: Color::Rgb(230, 233, 239), // #e6e9ef
        toolbar_fg: text,
        status_bg: Color::Rgb(239, 241, 245), // #eff1f5
        status_fg: text,

        border_fg: Color::Rgb(172, 176, 190), // #acb0be
        border_focused_fg: blue,
        dialog_bg: Color::Rgb(230, 233, 239),
        dialog_border_fg: blue,

        error_fg: Color::Rgb(210, 15, 57),
        warning_fg: Color::Rgb(223, 142, 29),
        success_fg: Color::Rgb(64, 160, 43),
        accent_fg: Color::Rgb(136, 57, 239),
        dim_fg: overlay0,
    }
}

/// Parse `"#aabbcc"` (the `#` is optional). Returns `None` for malformed input.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Resolve the palette named by `config.scheme`; "custom" starts from the
/// dark palette and applies the configured overrides. Unknown names fall
/// back to dark.
pub fn resolve_theme(config: &ThemeConfig) -> ThemeColors {
    match config.scheme.as_deref().unwrap_or("dark") {
        "light" => light_theme(),
        "custom" => {
            let mut theme = dark_theme();
            if let Some(custom) = &config.custom {
                apply_custom_colors(&mut theme, custom);
            }
            theme
        }
        _ => dark_theme(),
    }
}

fn apply_custom_colors(theme: &mut ThemeColors, custom: &ThemeColorsConfig) {
    macro_rules! overrides {
        ($($field:ident),* $(,)?) => {
            $(
                if let Some(color) = custom.$field.as_deref().and_then(parse_hex_color) {
                    theme.$field = color;
                }
            )*
        };
    }
    overrides!(
        tree_bg,
        tree_fg,
        tree_selected_bg,
        tree_selected_fg,
        tree_dir_fg,
        tree_file_fg,
        tree_hidden_fg,
        fake_link_fg,
        editor_bg,
        editor_fg,
        editor_line_nr_fg,
        toolbar_bg,
        toolbar_fg,
        status_bg,
        status_fg,
        border_fg,
        dialog_bg,
        dialog_border_fg,
    );
}
