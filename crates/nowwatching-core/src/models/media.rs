use serde::{Deserialize, Serialize};

/// Kind of media the provider reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Episode,
}

impl MediaKind {
    /// Classify a provider `type` field. Anything that is not an episode is
    /// handled as a movie.
    pub fn from_playback_type(kind: &str) -> Self {
        if kind == "episode" {
            Self::Episode
        } else {
            Self::Movie
        }
    }

    /// Strict classification used for history rows, which skips unknown kinds.
    pub fn from_history_type(kind: &str) -> Option<Self> {
        match kind {
            "episode" => Some(Self::Episode),
            "movie" => Some(Self::Movie),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Episode => "episode",
        }
    }
}

/// Normalized "what is playing" view model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackItem {
    pub kind: MediaKind,
    /// Movie title, or the `S01E05 - Title` label for episodes.
    pub title: String,
    /// Descriptor line: year, genres and runtime for movies; show name, year
    /// and genres for episodes.
    pub subtitle: String,
    pub poster_url: Option<String>,
    /// Provider page for the item, used by the redirect option.
    pub page_url: Option<String>,
    pub progress_ms: Option<i64>,
    pub duration_ms: Option<i64>,
}

/// Resolver output: the item, whether it is live, and playback position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NowPlaying {
    pub item: Option<PlaybackItem>,
    pub is_now_playing: bool,
    pub progress_ms: Option<i64>,
    pub duration_ms: Option<i64>,
}

impl NowPlaying {
    /// Nothing available: no credential, dead session, or nothing playing.
    pub fn nothing() -> Self {
        Self::default()
    }

    pub fn playing(item: PlaybackItem) -> Self {
        Self {
            progress_ms: item.progress_ms,
            duration_ms: item.duration_ms,
            item: Some(item),
            is_now_playing: true,
        }
    }
}

/// One row of recent watch history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub title: String,
    pub info: String,
    pub poster_url: Option<String>,
    pub kind: MediaKind,
    /// Provider timestamp, passed through untouched.
    pub watched_at: String,
}
