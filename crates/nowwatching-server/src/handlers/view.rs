use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::context::AppContext;
use crate::error::AppError;
use crate::options::ViewQuery;
use crate::templates::render_widget;

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";
pub const CACHE_CONTROL: &str = "s-maxage=1";

/// `GET /api/view` and every unmatched path.
pub async fn view(State(ctx): State<Arc<AppContext>>, Query(query): Query<ViewQuery>) -> Response {
    let Some(uid) = query.user_id() else {
        return "not ok".into_response();
    };
    let options = query.display_options(ctx.config.widget.max_recents);

    let recents = async {
        if options.show_recents {
            ctx.resolver.history(uid, options.recents_limit).await
        } else {
            Vec::new()
        }
    };
    let (recents, resolved) = tokio::join!(recents, ctx.resolver.resolve(uid, options.show_offline));

    let now = match resolved {
        Ok(now) => now,
        Err(e) => {
            tracing::error!(uid, error = %e, "playback resolution failed");
            return AppError::invalid_session().into_response();
        }
    };

    let item = now.item.as_ref().filter(|_| now.is_now_playing);

    if options.redirect {
        if let Some(url) = item.and_then(|item| item.page_url.as_deref()) {
            return (StatusCode::FOUND, [(header::LOCATION, url.to_string())]).into_response();
        }
    }

    let cover = match item.and_then(|item| item.poster_url.as_deref()) {
        Some(url) if options.cover_image => ctx.images.load(url).await,
        _ => None,
    };

    let params = ctx
        .presenter
        .present(&now, cover.as_deref(), &options, &recents);
    tracing::debug!(uid, theme = %options.theme, state = params.title_text, "rendering widget");

    (
        [
            (header::CONTENT_TYPE, SVG_CONTENT_TYPE),
            (header::CACHE_CONTROL, CACHE_CONTROL),
        ],
        render_widget(&params),
    )
        .into_response()
}
