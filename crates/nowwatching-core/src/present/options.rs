use serde::Serialize;

use super::theme::Theme;

pub const DEFAULT_BAR_COLOR: &str = "53b14f";
pub const DEFAULT_BACKGROUND_COLOR: &str = "121212";
pub const DEFAULT_RECENTS_LIMIT: u32 = 5;

/// Colour scheme label handed to the templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Light,
    Dark,
}

impl Mode {
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("dark") {
            Mode::Dark
        } else {
            Mode::Light
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Light => "light",
            Mode::Dark => "dark",
        }
    }
}

/// Validated display options of one widget request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayOptions {
    pub cover_image: bool,
    pub redirect: bool,
    pub theme: Theme,
    /// Six hex digits, no `#`.
    pub bar_color: String,
    pub background_color: String,
    pub bar_color_cover: bool,
    pub show_offline: bool,
    pub interchange: bool,
    pub mode: Mode,
    pub profanity: bool,
    pub show_recents: bool,
    pub recents_limit: u32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            cover_image: true,
            redirect: false,
            theme: Theme::Default,
            bar_color: DEFAULT_BAR_COLOR.into(),
            background_color: DEFAULT_BACKGROUND_COLOR.into(),
            bar_color_cover: false,
            show_offline: false,
            interchange: false,
            mode: Mode::Light,
            profanity: false,
            show_recents: false,
            recents_limit: DEFAULT_RECENTS_LIMIT,
        }
    }
}

/// Query flags are on only for the literal `true`.
pub fn parse_flag(value: Option<&str>, default: bool) -> bool {
    value.map_or(default, |v| v == "true")
}

/// Accept exactly six hex digits, optionally prefixed with `#`.
pub fn parse_hex_color(value: Option<&str>, default: &str) -> String {
    value
        .map(|v| v.trim_start_matches('#'))
        .filter(|v| v.len() == 6 && v.chars().all(|c| c.is_ascii_hexdigit()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| default.to_string())
}

/// Parse a recents limit and clamp it to `1..=max`. Garbage gives the default.
pub fn parse_recents_limit(value: Option<&str>, max: u32) -> u32 {
    let max = max.max(1);
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .map_or(DEFAULT_RECENTS_LIMIT.min(max), |n| n.clamp(1, i64::from(max)) as u32)
}
