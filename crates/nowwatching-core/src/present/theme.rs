//! Per-theme layout constants.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    Default,
    Compact,
    NatemooRe,
    Novatorem,
    StremioEmbed,
}

/// Fixed sizing for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeLayout {
    /// Base height when a cover image is shown.
    pub cover_height: u32,
    /// Base height without a cover image.
    pub plain_height: u32,
    pub num_bars: u32,
    /// Skip dark palette entries when picking a bar colour from the cover.
    pub skip_dark: bool,
}

const LAYOUTS: [(Theme, ThemeLayout); 5] = [
    (Theme::Default, layout(560, 145, 75, true)),
    (Theme::Compact, layout(550, 100, 75, false)),
    (Theme::NatemooRe, layout(84, 84, 100, false)),
    (Theme::Novatorem, layout(100, 100, 100, false)),
    (Theme::StremioEmbed, layout(140, 140, 75, false)),
];

const fn layout(cover_height: u32, plain_height: u32, num_bars: u32, skip_dark: bool) -> ThemeLayout {
    ThemeLayout {
        cover_height,
        plain_height,
        num_bars,
        skip_dark,
    }
}

/// Heading plus padding of the recents block.
pub const RECENTS_HEADER_HEIGHT: u32 = 50;
pub const RECENTS_ROW_HEIGHT: u32 = 48;

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Default,
        Theme::Compact,
        Theme::NatemooRe,
        Theme::Novatorem,
        Theme::StremioEmbed,
    ];

    /// Look a theme up by its query-string name. Unknown names are `Default`.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|theme| theme.name() == name)
            .unwrap_or(Theme::Default)
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Compact => "compact",
            Theme::NatemooRe => "natemoo-re",
            Theme::Novatorem => "novatorem",
            Theme::StremioEmbed => "stremio-embed",
        }
    }

    pub fn layout(self) -> ThemeLayout {
        LAYOUTS
            .iter()
            .find(|(theme, _)| *theme == self)
            .map(|(_, layout)| *layout)
            .unwrap_or(LAYOUTS[0].1)
    }

    /// Widget height for the given cover state and number of recents rows.
    pub fn height(self, cover_present: bool, recents: usize) -> u32 {
        let layout = self.layout();
        let base = if cover_present {
            layout.cover_height
        } else {
            layout.plain_height
        };
        base + recents_height(recents)
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub fn recents_height(rows: usize) -> u32 {
    if rows == 0 {
        0
    } else {
        RECENTS_HEADER_HEIGHT + RECENTS_ROW_HEIGHT * rows as u32
    }
}
