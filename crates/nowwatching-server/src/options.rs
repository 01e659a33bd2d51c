//! Query-string parsing for the widget route.

use nowwatching_core::present::options::{
    parse_flag, parse_hex_color, parse_recents_limit, DEFAULT_BACKGROUND_COLOR, DEFAULT_BAR_COLOR,
};
use nowwatching_core::present::{DisplayOptions, Mode, Theme};
use serde::Deserialize;

/// Raw widget query. Every field stays a string so that malformed values
/// fall back to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub uid: Option<String>,
    pub cover_image: Option<String>,
    pub redirect: Option<String>,
    pub theme: Option<String>,
    pub bar_color: Option<String>,
    pub background_color: Option<String>,
    pub bar_color_cover: Option<String>,
    pub show_offline: Option<String>,
    pub interchange: Option<String>,
    pub mode: Option<String>,
    pub profanity: Option<String>,
    pub show_recents: Option<String>,
    pub recents_limit: Option<String>,
}

impl ViewQuery {
    /// Non-empty user id, if any.
    pub fn user_id(&self) -> Option<&str> {
        self.uid.as_deref().map(str::trim).filter(|uid| !uid.is_empty())
    }

    pub fn display_options(&self, max_recents: u32) -> DisplayOptions {
        DisplayOptions {
            cover_image: parse_flag(self.cover_image.as_deref(), true),
            redirect: parse_flag(self.redirect.as_deref(), false),
            theme: Theme::from_name(self.theme.as_deref().unwrap_or_default()),
            bar_color: parse_hex_color(self.bar_color.as_deref(), DEFAULT_BAR_COLOR),
            background_color: parse_hex_color(
                self.background_color.as_deref(),
                DEFAULT_BACKGROUND_COLOR,
            ),
            bar_color_cover: parse_flag(self.bar_color_cover.as_deref(), false),
            show_offline: parse_flag(self.show_offline.as_deref(), false),
            interchange: parse_flag(self.interchange.as_deref(), false),
            mode: Mode::from_name(self.mode.as_deref().unwrap_or_default()),
            profanity: parse_flag(self.profanity.as_deref(), false),
            show_recents: parse_flag(self.show_recents.as_deref(), false),
            recents_limit: parse_recents_limit(self.recents_limit.as_deref(), max_recents),
        }
    }
}
