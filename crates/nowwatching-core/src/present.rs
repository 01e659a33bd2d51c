//! Presentation mapping: resolver output plus display options in, template
//! parameters out.
//!
//! Everything here is synchronous and deterministic apart from the bar
//! animation timings, which are random once per bar count and then memoized.

pub mod bars;
pub mod options;
pub mod palette;
pub mod progress;
pub mod sanitize;
pub mod theme;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::AppConfig;
use crate::models::{HistoryEntry, NowPlaying};
use crate::profanity::ProfanityFilter;

use self::bars::{bar_markup, BarStyles};
pub use self::options::{DisplayOptions, Mode};
use self::palette::{choose_bar_color, extract_palette};
pub use self::progress::ProgressData;
use self::sanitize::escape_html;
pub use self::theme::Theme;

pub const OFFLINE_INFO: &str = "Offline";
pub const OFFLINE_TITLE: &str = "Currently not playing on Stremio";

/// Palette entries considered when colouring bars from the cover.
const PALETTE_SIZE: usize = 5;

/// Heading state of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TitleState {
    NowPlaying,
    NotPlaying,
    RecentlyPlayed,
}

impl TitleState {
    pub fn label(self) -> &'static str {
        match self {
            TitleState::NowPlaying => "Now playing",
            TitleState::NotPlaying => "Not playing",
            TitleState::RecentlyPlayed => "Recently played",
        }
    }

    fn from_flags(is_now_playing: bool, show_offline: bool) -> Self {
        if is_now_playing {
            TitleState::NowPlaying
        } else if show_offline {
            TitleState::NotPlaying
        } else {
            TitleState::RecentlyPlayed
        }
    }
}

/// One escaped row of the recents list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentView {
    pub title: String,
    pub info: String,
    pub poster_url: Option<String>,
    pub kind: &'static str,
    /// `just now`, `5m ago`, ...; empty when the timestamp is unreadable.
    pub watched: String,
}

/// Everything a widget template needs. Text fields are already escaped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderParams {
    pub theme: Theme,
    pub height: u32,
    pub num_bars: u32,
    pub title_state: TitleState,
    pub title_text: &'static str,
    /// Bar elements, present only while something is playing.
    pub content_bar: String,
    /// Bar animation rules; `None` in the offline state.
    pub css_bar: Option<String>,
    pub media_info: String,
    pub media_title: String,
    /// Base64 cover bytes, empty without a cover.
    pub img_base64: String,
    pub img_mime: &'static str,
    pub cover_image: bool,
    pub bar_color: String,
    pub background_color: String,
    pub mode: Mode,
    pub is_now_playing: bool,
    /// `None` while the duration is unknown.
    pub progress: Option<ProgressData>,
    pub recents: Vec<RecentView>,
}

/// Maps resolver output to [`RenderParams`].
#[derive(Debug)]
pub struct Presenter {
    bars: BarStyles,
    profanity: ProfanityFilter,
}

impl Presenter {
    pub fn new(css_capacity: usize, profanity: ProfanityFilter) -> Self {
        Self {
            bars: BarStyles::new(css_capacity),
            profanity,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.cache.css_capacity,
            ProfanityFilter::new(&config.profanity.extra_words),
        )
    }

    /// Build render parameters. `cover` holds the poster bytes when they
    /// could be loaded.
    pub fn present(
        &self,
        now: &NowPlaying,
        cover: Option<&[u8]>,
        options: &DisplayOptions,
        recents: &[HistoryEntry],
    ) -> RenderParams {
        self.present_at(now, cover, options, recents, Utc::now())
    }

    pub fn present_at(
        &self,
        now: &NowPlaying,
        cover: Option<&[u8]>,
        options: &DisplayOptions,
        recents: &[HistoryEntry],
        clock: DateTime<Utc>,
    ) -> RenderParams {
        let layout = options.theme.layout();
        let recents: Vec<RecentView> = recents
            .iter()
            .map(|entry| self.recent_view(entry, options, clock))
            .collect();

        let offline = (options.show_offline && !now.is_now_playing) || now.item.is_none();
        let (media_info, media_title, cover) = match &now.item {
            Some(item) if !offline => {
                let cover = cover.filter(|bytes| options.cover_image && !bytes.is_empty());
                (
                    self.clean(&item.subtitle, options),
                    self.clean(&item.title, options),
                    cover,
                )
            }
            _ => {
                let (info, title) = if options.interchange {
                    (OFFLINE_TITLE, OFFLINE_INFO)
                } else {
                    (OFFLINE_INFO, OFFLINE_TITLE)
                };
                (info.to_string(), title.to_string(), None)
            }
        };

        // The offline copy is already in display order.
        let (media_info, media_title) = if options.interchange && !offline {
            (media_title, media_info)
        } else {
            (media_info, media_title)
        };

        let bar_color = match cover {
            Some(bytes) if options.bar_color_cover => {
                cover_bar_color(bytes, layout.skip_dark).unwrap_or_else(|| options.bar_color.clone())
            }
            _ => options.bar_color.clone(),
        };

        let title_state = TitleState::from_flags(now.is_now_playing, options.show_offline);
        let (content_bar, css_bar) = match title_state {
            TitleState::NowPlaying => (bar_markup(layout.num_bars), Some(self.bars.css(layout.num_bars))),
            TitleState::NotPlaying => (String::new(), None),
            TitleState::RecentlyPlayed => (String::new(), Some(self.bars.css(layout.num_bars))),
        };

        let progress = now.duration_ms.map(|duration| {
            let position = if now.is_now_playing { now.progress_ms } else { Some(0) };
            progress::progress(position, Some(duration))
        });

        RenderParams {
            theme: options.theme,
            height: options.theme.height(cover.is_some(), recents.len()),
            num_bars: layout.num_bars,
            title_state,
            title_text: title_state.label(),
            content_bar,
            css_bar,
            media_info,
            media_title,
            img_base64: cover.map(|bytes| STANDARD.encode(bytes)).unwrap_or_default(),
            img_mime: cover.map_or("image/jpeg", image_mime),
            cover_image: cover.is_some(),
            bar_color,
            background_color: options.background_color.clone(),
            mode: options.mode,
            is_now_playing: now.is_now_playing,
            progress,
            recents,
        }
    }

    /// Profanity masking (when enabled) followed by escaping.
    fn clean(&self, text: &str, options: &DisplayOptions) -> String {
        if options.profanity {
            escape_html(&self.profanity.censor(text))
        } else {
            escape_html(text)
        }
    }

    fn recent_view(&self, entry: &HistoryEntry, options: &DisplayOptions, clock: DateTime<Utc>) -> RecentView {
        RecentView {
            title: self.clean(&entry.title, options),
            info: self.clean(&entry.info, options),
            poster_url: entry.poster_url.as_deref().map(escape_html),
            kind: entry.kind.as_str(),
            watched: relative_label(&entry.watched_at, clock),
        }
    }
}

fn cover_bar_color(bytes: &[u8], skip_dark: bool) -> Option<String> {
    match extract_palette(bytes, PALETTE_SIZE) {
        Ok(palette) => choose_bar_color(&palette, skip_dark).map(|c| c.hex()),
        Err(e) => {
            tracing::warn!(error = %e, "could not extract cover palette");
            None
        }
    }
}

fn image_mime(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("image/jpeg")
}

/// Coarse age of an RFC 3339 timestamp relative to `clock`.
pub fn relative_label(timestamp: &str, clock: DateTime<Utc>) -> String {
    let Ok(watched) = DateTime::parse_from_rfc3339(timestamp) else {
        return String::new();
    };
    let secs = (clock - watched.with_timezone(&Utc)).num_seconds();
    match secs {
        s if s < 60 => "just now".into(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s => format!("{}d ago", s / 86_400),
    }
}
