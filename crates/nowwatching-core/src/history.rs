//! Recent watch history for the widget's "recents" list.

use futures::future::join_all;
use nowwatching_api::traits::{CatalogKind, CatalogService, TrackingService};
use nowwatching_api::trakt::types::HistoryItem;
use nowwatching_api::Fetched;

use crate::error::CoreError;
use crate::labels;
use crate::models::{HistoryEntry, MediaKind};
use crate::resolver::MediaResolver;
use crate::store::CredentialStore;

impl<T, C, S> MediaResolver<T, C, S>
where
    T: TrackingService,
    C: CatalogService,
    S: CredentialStore,
{
    /// Up to `limit` recent entries, newest first.
    ///
    /// Never fails: store errors and provider failures are logged and an
    /// empty list is returned. The stored token is used as is; an expired
    /// token simply yields nothing until the next [`Self::resolve`] refreshes
    /// it.
    pub async fn history(&self, user_id: &str, limit: u32) -> Vec<HistoryEntry> {
        match self.try_history(user_id, limit).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "history lookup failed");
                Vec::new()
            }
        }
    }

    async fn try_history(&self, user_id: &str, limit: u32) -> Result<Vec<HistoryEntry>, CoreError> {
        let Some(record) = self.store().load(user_id).await? else {
            return Ok(Vec::new());
        };

        let items = match self.tracker().history(&record.access_token, limit).await {
            Fetched::Data(items) => items,
            Fetched::Empty => return Ok(Vec::new()),
            Fetched::Unavailable(reason) => {
                tracing::debug!(user_id, %reason, "history endpoint unavailable");
                return Ok(Vec::new());
            }
        };

        let pending = items
            .into_iter()
            .take(limit as usize)
            .filter_map(|item| {
                let kind = MediaKind::from_history_type(&item.kind)?;
                Some(self.history_entry(kind, item))
            });
        Ok(join_all(pending).await)
    }

    async fn history_entry(&self, kind: MediaKind, item: HistoryItem) -> HistoryEntry {
        let watched_at = item.watched_at.unwrap_or_default();
        match kind {
            MediaKind::Episode => {
                let show = item.show.unwrap_or_default();
                let episode = item.episode.unwrap_or_default();
                let poster_url = match show.ids.tmdb {
                    Some(id) => self.catalog().poster_url(Some(id), CatalogKind::Tv).await,
                    None => None,
                };
                HistoryEntry {
                    title: labels::episode_label_for(&episode),
                    info: show.title.unwrap_or_default(),
                    poster_url,
                    kind,
                    watched_at,
                }
            }
            MediaKind::Movie => {
                let movie = item.movie.unwrap_or_default();
                let poster_url = match movie.ids.tmdb {
                    Some(id) => self.catalog().poster_url(Some(id), CatalogKind::Movie).await,
                    None => None,
                };
                HistoryEntry {
                    info: labels::movie_year_label(&movie),
                    title: movie.title.unwrap_or_default(),
                    poster_url,
                    kind,
                    watched_at,
                }
            }
        }
    }
}
