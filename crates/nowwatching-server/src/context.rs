use std::sync::Arc;

use nowwatching_api::tmdb::TmdbClient;
use nowwatching_api::trakt::{TraktApp, TraktClient};
use nowwatching_core::config::AppConfig;
use nowwatching_core::db::DbHandle;
use nowwatching_core::{MediaResolver, Presenter};

use crate::error::ServerError;
use crate::images::ImageLoader;

pub type Resolver = MediaResolver<TraktClient, TmdbClient, DbHandle>;

/// Everything a request handler needs, built once at startup.
#[derive(Debug)]
pub struct AppContext {
    pub config: AppConfig,
    pub resolver: Resolver,
    pub presenter: Presenter,
    pub images: ImageLoader,
}

impl AppContext {
    pub fn new(config: AppConfig, db: DbHandle) -> Result<Arc<Self>, ServerError> {
        let timeout = config.http_timeout();

        let trakt = TraktClient::new(
            TraktApp {
                client_id: config.trakt.client_id.clone(),
                client_secret: config.trakt.client_secret.clone(),
                redirect_uri: config.redirect_uri(),
            },
            timeout,
        )?
        .with_api_base(&config.trakt.api_base)
        .with_authorize_url(&config.trakt.authorize_url);

        let tmdb = TmdbClient::new(config.tmdb_api_key(), timeout)?
            .with_api_base(&config.tmdb.api_base)
            .with_image_base(&config.tmdb.image_base);
        if !tmdb.is_configured() {
            tracing::warn!("TMDB_API_KEY not set, posters and genres are disabled");
        }

        Ok(Arc::new(Self {
            presenter: Presenter::from_config(&config),
            images: ImageLoader::new(timeout, config.cache.image_capacity)?,
            resolver: MediaResolver::new(trakt, tmdb, db),
            config,
        }))
    }

    pub fn trakt(&self) -> &TraktClient {
        self.resolver.tracker()
    }

    pub fn db(&self) -> &DbHandle {
        self.resolver.store()
    }
}
