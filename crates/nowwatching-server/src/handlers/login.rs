use std::sync::Arc;

use axum::extract::State;
use axum::response::Redirect;

use crate::context::AppContext;
use crate::error::{AppError, AppResult};

/// `GET /api/login`: send the browser to the Trakt consent page.
pub async fn login(State(ctx): State<Arc<AppContext>>) -> AppResult<Redirect> {
    let url = ctx.trakt().authorize_url().map_err(|e| {
        tracing::error!(error = %e, "authorize URL is misconfigured");
        AppError::internal("Login is not configured")
    })?;
    Ok(Redirect::temporary(url.as_str()))
}
