use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Response};
use chrono::Utc;
use nowwatching_api::traits::TrackingService;
use nowwatching_api::trakt::types::TokenOutcome;
use nowwatching_api::Fetched;
use nowwatching_core::models::CredentialRecord;
use nowwatching_core::store::CredentialStore;
use serde::Deserialize;

use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::templates::render_callback;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
}

/// `GET /api/trakt_callback`: exchange the code, store the tokens under the
/// user's handle and show the embed instructions.
pub async fn trakt_callback(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let Some(code) = query.code.filter(|c| !c.is_empty()) else {
        return "not ok".into_response();
    };
    match complete_login(&ctx, &code).await {
        Ok(uid) => Html(render_callback(&uid, ctx.config.base_url())).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn complete_login(ctx: &AppContext, code: &str) -> AppResult<String> {
    let trakt = ctx.trakt();

    let grant = match trakt.exchange_code(code).await {
        Ok(TokenOutcome::Granted(grant)) => grant,
        Ok(TokenOutcome::Rejected { error, description }) => {
            tracing::info!(%error, ?description, "authorization code rejected");
            return Err(AppError::bad_request(format!(
                "Trakt rejected the login ({error}). Please try again at /api/login"
            )));
        }
        Err(e) => {
            tracing::warn!(error = %e, "code exchange failed");
            return Err(AppError::bad_request(
                "Could not reach Trakt to finish the login. Please try again at /api/login",
            ));
        }
    };

    let uid = match trakt.profile(&grant.access_token).await {
        Fetched::Data(profile) => profile.stable_id(),
        Fetched::Empty => None,
        Fetched::Unavailable(reason) => {
            tracing::warn!(%reason, "profile lookup failed");
            None
        }
    }
    .ok_or_else(|| AppError::bad_request("Could not read the Trakt profile for this login"))?;

    let record = CredentialRecord {
        access_token: grant.access_token,
        refresh_token: grant.refresh_token.unwrap_or_default(),
        expired_ts: grant
            .expires_in
            .filter(|secs| *secs > 0)
            .map(|secs| Utc::now().timestamp() + secs),
    };
    ctx.db().save(&uid, record).await.map_err(|e| {
        tracing::error!(uid = %uid, error = %e, "could not store credential");
        AppError::internal("Could not store the login, please try again")
    })?;

    tracing::info!(uid = %uid, "trakt account linked");
    Ok(uid)
}
