use std::time::Duration;

use reqwest::Client;

use super::error::TmdbError;
use super::types::CatalogDetails;
use crate::fetch::Fetched;
use crate::traits::{CatalogKind, CatalogService};

pub const API_BASE: &str = "https://api.themoviedb.org/3";
pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w300";

/// TMDB v3 client. Without an API key every lookup is skipped.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    api_key: Option<String>,
    api_base: String,
    image_base: String,
    http: Client,
}

impl TmdbClient {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self, TmdbError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            api_base: API_BASE.into(),
            image_base: IMAGE_BASE.into(),
            http,
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_image_base(mut self, image_base: impl Into<String>) -> Self {
        self.image_base = image_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn get_details(
        &self,
        api_key: &str,
        id: u64,
        kind: CatalogKind,
    ) -> Result<CatalogDetails, TmdbError> {
        let resp = self
            .http
            .get(format!("{}/{}/{id}", self.api_base, kind.as_path()))
            .query(&[("api_key", api_key)])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(TmdbError::Api {
                status,
                message: body,
            });
        }

        resp.json()
            .await
            .map_err(|e| TmdbError::Parse(e.to_string()))
    }

    /// Look up a catalog record, skipping the call when there is nothing to
    /// look up with.
    pub async fn fetch_details(&self, id: Option<u64>, kind: CatalogKind) -> Fetched<CatalogDetails> {
        let (Some(api_key), Some(id)) = (self.api_key.as_deref(), id) else {
            return Fetched::Empty;
        };

        match self.get_details(api_key, id, kind).await {
            Ok(details) => Fetched::Data(details),
            Err(e) => {
                tracing::debug!(%kind, id, error = %e, "TMDB lookup failed");
                Fetched::Unavailable(e.to_string())
            }
        }
    }
}

impl CatalogService for TmdbClient {
    async fn poster_url(&self, id: Option<u64>, kind: CatalogKind) -> Option<String> {
        self.fetch_details(id, kind)
            .await
            .as_data()
            .and_then(|details| self.poster_for(details))
    }

    async fn details(&self, id: Option<u64>, kind: CatalogKind) -> Fetched<CatalogDetails> {
        self.fetch_details(id, kind).await
    }

    fn poster_for(&self, details: &CatalogDetails) -> Option<String> {
        details
            .poster_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}{p}", self.image_base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn test_client(server: &Server, api_key: Option<&str>) -> TmdbClient {
        TmdbClient::new(api_key.map(String::from), Duration::from_secs(5))
            .unwrap()
            .with_api_base(server.url())
    }

    #[tokio::test]
    async fn test_poster_url_joins_image_base() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/movie/27205")
            .match_query(Matcher::UrlEncoded("api_key".into(), "key".into()))
            .with_status(200)
            .with_body(r#"{"poster_path":"/inception.jpg","genres":[]}"#)
            .create_async()
            .await;

        let client = test_client(&server, Some("key"));
        let url = client.poster_url(Some(27205), CatalogKind::Movie).await;
        assert_eq!(
            url.as_deref(),
            Some("https://image.tmdb.org/t/p/w300/inception.jpg")
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_api_key_skips_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = test_client(&server, None);
        assert!(!client.is_configured());
        assert_eq!(client.poster_url(Some(1), CatalogKind::Tv).await, None);
        assert_eq!(client.details(Some(1), CatalogKind::Tv).await, Fetched::Empty);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_id_is_empty() {
        let server = Server::new_async().await;
        let client = test_client(&server, Some("key"));
        assert_eq!(client.details(None, CatalogKind::Movie).await, Fetched::Empty);
    }

    #[tokio::test]
    async fn test_not_found_degrades() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/tv/404")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"status_message":"The resource you requested could not be found."}"#)
            .create_async()
            .await;

        let client = test_client(&server, Some("key"));
        assert_eq!(client.poster_url(Some(404), CatalogKind::Tv).await, None);
        assert!(client.details(Some(404), CatalogKind::Tv).await.is_unavailable());
    }

    #[tokio::test]
    async fn test_missing_poster_field() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/tv/7")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"name":"Show","poster_path":null}"#)
            .create_async()
            .await;

        let client = test_client(&server, Some("key"));
        assert_eq!(client.poster_url(Some(7), CatalogKind::Tv).await, None);
    }
}
