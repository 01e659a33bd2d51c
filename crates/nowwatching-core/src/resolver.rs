//! Media status resolution.
//!
//! Turns a stored credential into a [`NowPlaying`] view model: refresh the
//! token when it has expired, ask the provider what is playing, then classify
//! and enrich the payload with catalog metadata.

use chrono::Utc;
use nowwatching_api::traits::{CatalogKind, CatalogService, TrackingService};
use nowwatching_api::trakt::types::{TokenOutcome, Watching};
use nowwatching_api::Fetched;

use crate::error::CoreError;
use crate::labels;
use crate::models::{CredentialRecord, MediaKind, NowPlaying, PlaybackItem};
use crate::store::CredentialStore;

/// Resolves playback state and history for stored users.
#[derive(Debug, Clone)]
pub struct MediaResolver<T, C, S> {
    tracker: T,
    catalog: C,
    store: S,
}

impl<T, C, S> MediaResolver<T, C, S>
where
    T: TrackingService,
    C: CatalogService,
    S: CredentialStore,
{
    pub fn new(tracker: T, catalog: C, store: S) -> Self {
        Self {
            tracker,
            catalog,
            store,
        }
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve what `user_id` is watching.
    ///
    /// A missing credential, a session the provider refuses to refresh, and
    /// an empty or unreachable playback endpoint all yield
    /// [`NowPlaying::nothing`]. `Err` is reserved for store failures and
    /// token-endpoint transport failures. The offline hint only matters to
    /// presentation.
    pub async fn resolve(&self, user_id: &str, show_offline: bool) -> Result<NowPlaying, CoreError> {
        tracing::debug!(user_id, show_offline, "resolving playback");

        let Some(access_token) = self.session_token(user_id).await? else {
            return Ok(NowPlaying::nothing());
        };

        let watching = match self.tracker.current_playback(&access_token).await {
            Fetched::Data(watching) => watching,
            Fetched::Empty => return Ok(NowPlaying::nothing()),
            Fetched::Unavailable(reason) => {
                tracing::warn!(user_id, %reason, "playback endpoint unavailable");
                return Ok(NowPlaying::nothing());
            }
        };

        let mut item = self.classify(watching).await;
        // The watching endpoint carries no scrub position.
        item.progress_ms = None;
        item.duration_ms = None;
        Ok(NowPlaying::playing(item))
    }

    /// Load the user's access token, refreshing it first when expired.
    ///
    /// Returns `None` when there is no usable session. A refresh the
    /// provider rejects deletes the stored credential.
    pub async fn session_token(&self, user_id: &str) -> Result<Option<String>, CoreError> {
        let Some(record) = self.store.load(user_id).await? else {
            return Ok(None);
        };

        if !record.is_expired_at(Utc::now().timestamp()) {
            return Ok(Some(record.access_token));
        }
        if record.refresh_token.is_empty() {
            tracing::info!(user_id, "token expired and no refresh token stored");
            return Ok(None);
        }

        let outcome = self
            .tracker
            .refresh(&record.refresh_token)
            .await
            .map_err(|e| CoreError::Provider(e.to_string()))?;

        match outcome {
            TokenOutcome::Rejected { error, .. } => {
                tracing::info!(user_id, %error, "refresh rejected, dropping credential");
                self.store.remove(user_id).await?;
                Ok(None)
            }
            TokenOutcome::Granted(grant) => {
                // Two requests refreshing at once both persist; the last write
                // wins and may hold an already-rotated refresh token.
                let refreshed = CredentialRecord {
                    access_token: grant.access_token,
                    refresh_token: grant.refresh_token.unwrap_or(record.refresh_token),
                    expired_ts: Some(Utc::now().timestamp() + grant.expires_in.unwrap_or(0)),
                };
                let access_token = refreshed.access_token.clone();
                self.store.save(user_id, refreshed).await?;
                tracing::debug!(user_id, "access token refreshed");
                Ok(Some(access_token))
            }
        }
    }

    /// Build the view model for a playback payload.
    async fn classify(&self, watching: Watching) -> PlaybackItem {
        match MediaKind::from_playback_type(&watching.kind) {
            MediaKind::Episode => {
                let show = watching.show.unwrap_or_default();
                let episode = watching.episode.unwrap_or_default();
                let tmdb_id = show.ids.tmdb;

                let details = self.catalog.details(tmdb_id, CatalogKind::Tv).await;
                let poster_url = details.as_data().and_then(|d| self.catalog.poster_for(d));
                let genres = details.as_data().map(labels::genre_list).unwrap_or_default();

                PlaybackItem {
                    kind: MediaKind::Episode,
                    title: labels::episode_label_for(&episode),
                    subtitle: labels::show_descriptor(
                        show.title.as_deref().unwrap_or_default(),
                        show.year,
                        &genres,
                    ),
                    poster_url,
                    page_url: labels::episode_page_url(&show, &episode),
                    progress_ms: None,
                    duration_ms: None,
                }
            }
            MediaKind::Movie => {
                let movie = watching.movie.unwrap_or_default();
                let tmdb_id = movie.ids.tmdb;

                let details = self.catalog.details(tmdb_id, CatalogKind::Movie).await;
                let poster_url = details.as_data().and_then(|d| self.catalog.poster_for(d));
                let details = details.unwrap_or_default();

                PlaybackItem {
                    kind: MediaKind::Movie,
                    title: movie
                        .title
                        .clone()
                        .or(watching.title)
                        .unwrap_or_default(),
                    subtitle: labels::movie_descriptor(
                        movie.year,
                        &labels::genre_list(&details),
                        details.runtime,
                    ),
                    poster_url,
                    page_url: labels::movie_page_url(&movie),
                    progress_ms: None,
                    duration_ms: None,
                }
            }
        }
    }
}
