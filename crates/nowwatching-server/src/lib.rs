//! HTTP surface of the now-watching badge service.

pub mod context;
pub mod error;
pub mod handlers;
pub mod images;
pub mod options;
pub mod templates;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use context::AppContext;
pub use error::{AppError, ServerError};

/// Build the application router.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/api/view", get(handlers::view::view))
        .route("/api/login", get(handlers::login::login))
        .route("/api/trakt_login", get(handlers::login::login))
        .route("/api/trakt_callback", get(handlers::callback::trakt_callback))
        .fallback(handlers::view::view)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
