use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};

use super::error::TraktError;
use super::types::{HistoryItem, Profile, TokenOutcome, Watching};
use crate::fetch::Fetched;
use crate::traits::TrackingService;

pub const API_BASE: &str = "https://api.trakt.tv";
pub const AUTHORIZE_URL: &str = "https://trakt.tv/oauth/authorize";

/// Registered OAuth application credentials.
#[derive(Debug, Clone)]
pub struct TraktApp {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Trakt API v2 client.
#[derive(Debug, Clone)]
pub struct TraktClient {
    pub(crate) app: TraktApp,
    pub(crate) api_base: String,
    pub(crate) authorize_url: String,
    pub(crate) http: Client,
}

impl TraktClient {
    pub fn new(app: TraktApp, timeout: Duration) -> Result<Self, TraktError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            app,
            api_base: API_BASE.into(),
            authorize_url: AUTHORIZE_URL.into(),
            http,
        })
    }

    /// Point the client at a different API host (used by tests and proxies).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_authorize_url(mut self, authorize_url: impl Into<String>) -> Self {
        self.authorize_url = authorize_url.into();
        self
    }

    pub fn app(&self) -> &TraktApp {
        &self.app
    }

    fn authed(&self, req: RequestBuilder, access_token: &str) -> RequestBuilder {
        req.header("Authorization", format!("Bearer {access_token}"))
            .header("trakt-api-version", "2")
            .header("trakt-api-key", &self.app.client_id)
            .header("Content-Type", "application/json")
    }

    /// Check the HTTP response for errors and return the body text on failure.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, TraktError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "Trakt API error");
            Err(TraktError::Api {
                status,
                message: body,
            })
        }
    }

    pub async fn get_profile(&self, access_token: &str) -> Result<Profile, TraktError> {
        let resp = self
            .authed(
                self.http.get(format!("{}/users/me", self.api_base)),
                access_token,
            )
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        resp.json()
            .await
            .map_err(|e| TraktError::Parse(e.to_string()))
    }

    /// Fetch the currently watching item.
    ///
    /// Trakt answers `204 No Content` when nothing is playing; a `404` is
    /// treated the same way.
    pub async fn get_watching(&self, access_token: &str) -> Result<Option<Watching>, TraktError> {
        let resp = self
            .authed(
                self.http.get(format!("{}/users/me/watching", self.api_base)),
                access_token,
            )
            .send()
            .await?;

        if matches!(resp.status(), StatusCode::NO_CONTENT | StatusCode::NOT_FOUND) {
            return Ok(None);
        }

        let resp = Self::check_response(resp).await?;
        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| TraktError::Parse(e.to_string()))
    }

    pub async fn get_history(
        &self,
        access_token: &str,
        limit: u32,
    ) -> Result<Vec<HistoryItem>, TraktError> {
        let resp = self
            .authed(
                self.http.get(format!("{}/users/me/history", self.api_base)),
                access_token,
            )
            .query(&[("limit", limit.to_string())])
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        resp.json()
            .await
            .map_err(|e| TraktError::Parse(e.to_string()))
    }
}

impl TrackingService for TraktClient {
    type Error = TraktError;

    async fn exchange_code(&self, code: &str) -> Result<TokenOutcome, TraktError> {
        self.exchange_authorization_code(code).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenOutcome, TraktError> {
        self.refresh_access_token(refresh_token).await
    }

    async fn profile(&self, access_token: &str) -> Fetched<Profile> {
        match self.get_profile(access_token).await {
            Ok(profile) => Fetched::Data(profile),
            Err(e) => Fetched::Unavailable(e.to_string()),
        }
    }

    async fn current_playback(&self, access_token: &str) -> Fetched<Watching> {
        match self.get_watching(access_token).await {
            Ok(Some(watching)) => Fetched::Data(watching),
            Ok(None) => Fetched::Empty,
            Err(e) => {
                tracing::debug!(error = %e, "current playback unavailable");
                Fetched::Unavailable(e.to_string())
            }
        }
    }

    async fn history(&self, access_token: &str, limit: u32) -> Fetched<Vec<HistoryItem>> {
        match self.get_history(access_token, limit).await {
            Ok(items) if items.is_empty() => Fetched::Empty,
            Ok(items) => Fetched::Data(items),
            Err(e) => {
                tracing::debug!(error = %e, "watch history unavailable");
                Fetched::Unavailable(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn test_client(server: &Server) -> TraktClient {
        TraktClient::new(
            TraktApp {
                client_id: "cid".into(),
                client_secret: "secret".into(),
                redirect_uri: "http://localhost/api/trakt_callback".into(),
            },
            Duration::from_secs(5),
        )
        .unwrap()
        .with_api_base(server.url())
    }

    #[tokio::test]
    async fn test_current_playback_sends_trakt_headers() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/users/me/watching")
            .match_header("authorization", "Bearer tok")
            .match_header("trakt-api-version", "2")
            .match_header("trakt-api-key", "cid")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"type":"movie","movie":{"title":"Inception","year":2010,"ids":{"tmdb":27205}}}"#)
            .create_async()
            .await;

        let client = test_client(&server);
        let watching = client.current_playback("tok").await.data().unwrap();
        assert_eq!(watching.kind, "movie");
        assert_eq!(watching.movie.unwrap().title.as_deref(), Some("Inception"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_current_playback_no_content_is_empty() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/users/me/watching")
            .with_status(204)
            .create_async()
            .await;

        let client = test_client(&server);
        assert_eq!(client.current_playback("tok").await.data().map(|w| w.kind), None);
        assert!(!client.current_playback("tok").await.is_unavailable());
    }

    #[tokio::test]
    async fn test_current_playback_not_found_is_empty() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/users/me/watching")
            .with_status(404)
            .create_async()
            .await;

        let client = test_client(&server);
        assert!(matches!(client.current_playback("tok").await, Fetched::Empty));
    }

    #[tokio::test]
    async fn test_current_playback_server_error_is_unavailable() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/users/me/watching")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let client = test_client(&server);
        assert!(client.current_playback("tok").await.is_unavailable());
    }

    #[tokio::test]
    async fn test_history_passes_limit() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/users/me/history")
            .match_query(Matcher::UrlEncoded("limit".into(), "3".into()))
            .with_status(200)
            .with_body(
                r#"[
                    {"id":1,"watched_at":"2024-05-01T20:00:00.000Z","type":"episode",
                     "show":{"title":"Severance","year":2022,"ids":{"tmdb":95396}},
                     "episode":{"season":1,"number":5,"title":"The Grim Barbarity"}},
                    {"id":2,"watched_at":"2024-04-30T20:00:00.000Z","type":"movie",
                     "movie":{"title":"Heat","year":1995,"ids":{"tmdb":949}}}
                ]"#,
            )
            .create_async()
            .await;

        let client = test_client(&server);
        let items = client.history("tok", 3).await.unwrap_or_default();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind, "episode");
        assert_eq!(items[1].movie.as_ref().unwrap().year, Some(1995));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_history_unauthorized_is_unavailable() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/users/me/history")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let client = test_client(&server);
        assert!(client.history("tok", 5).await.is_unavailable());
    }

    #[tokio::test]
    async fn test_profile() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/users/me")
            .with_status(200)
            .with_body(r#"{"username":"trakt_user","ids":{"slug":"trakt_user"}}"#)
            .create_async()
            .await;

        let client = test_client(&server);
        let profile = client.profile("tok").await.data().unwrap();
        assert_eq!(profile.stable_id().as_deref(), Some("trakt_user"));
    }
}
