//! Trait definitions for the tracking and catalog services.
//!
//! [`crate::trakt::TraktClient`] and [`crate::tmdb::TmdbClient`] implement
//! these, allowing the resolvers to be driven by fakes in tests.

use std::future::Future;

use crate::fetch::Fetched;
use crate::tmdb::types::CatalogDetails;
use crate::trakt::types::{HistoryItem, Profile, TokenOutcome, Watching};

/// The service that knows what a user is watching.
pub trait TrackingService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Exchange an OAuth authorization code for tokens.
    fn exchange_code(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<TokenOutcome, Self::Error>> + Send;

    /// Trade a refresh token for a new token set.
    fn refresh(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<TokenOutcome, Self::Error>> + Send;

    /// Profile of the token's owner.
    fn profile(&self, access_token: &str) -> impl Future<Output = Fetched<Profile>> + Send;

    /// What the user is watching right now.
    fn current_playback(&self, access_token: &str)
        -> impl Future<Output = Fetched<Watching>> + Send;

    /// Most recent watch events, newest first.
    fn history(
        &self,
        access_token: &str,
        limit: u32,
    ) -> impl Future<Output = Fetched<Vec<HistoryItem>>> + Send;
}

/// Kind of catalog record to look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Tv,
    Movie,
}

impl CatalogKind {
    pub fn as_path(self) -> &'static str {
        match self {
            Self::Tv => "tv",
            Self::Movie => "movie",
        }
    }
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_path())
    }
}

/// The service that supplies posters and descriptive metadata.
pub trait CatalogService: Send + Sync {
    /// Full poster URL, or `None` when the record or its poster is missing.
    fn poster_url(
        &self,
        id: Option<u64>,
        kind: CatalogKind,
    ) -> impl Future<Output = Option<String>> + Send;

    /// Genre/runtime metadata; an empty value when unavailable.
    fn details(
        &self,
        id: Option<u64>,
        kind: CatalogKind,
    ) -> impl Future<Output = Fetched<CatalogDetails>> + Send;

    /// Poster URL of an already fetched record.
    fn poster_for(&self, details: &CatalogDetails) -> Option<String>;
}
