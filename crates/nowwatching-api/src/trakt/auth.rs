use url::Url;

use super::client::TraktClient;
use super::error::TraktError;
use super::types::{TokenOutcome, TokenResponse};

impl TraktClient {
    /// Consent page URL the login route redirects to.
    pub fn authorize_url(&self) -> Result<Url, TraktError> {
        Url::parse_with_params(
            &self.authorize_url,
            &[
                ("response_type", "code"),
                ("client_id", self.app.client_id.as_str()),
                ("redirect_uri", self.app.redirect_uri.as_str()),
            ],
        )
        .map_err(|e| TraktError::Parse(format!("invalid authorize URL: {e}")))
    }

    /// Exchange the authorization code for tokens.
    pub async fn exchange_authorization_code(&self, code: &str) -> Result<TokenOutcome, TraktError> {
        self.post_token(serde_json::json!({
            "code": code,
            "client_id": self.app.client_id,
            "client_secret": self.app.client_secret,
            "redirect_uri": self.app.redirect_uri,
            "grant_type": "authorization_code",
        }))
        .await
    }

    /// Refresh an expired access token.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenOutcome, TraktError> {
        self.post_token(serde_json::json!({
            "refresh_token": refresh_token,
            "client_id": self.app.client_id,
            "client_secret": self.app.client_secret,
            "redirect_uri": self.app.redirect_uri,
            "grant_type": "refresh_token",
        }))
        .await
    }

    /// POST to the token endpoint.
    ///
    /// A rejected grant comes back as an `error` field, usually alongside a
    /// 4xx status, so the body is inspected before the status. Only that
    /// field yields [`TokenOutcome::Rejected`]; any other unusable body is
    /// an error and leaves the stored credential alone.
    async fn post_token(&self, body: serde_json::Value) -> Result<TokenOutcome, TraktError> {
        let resp = self
            .http
            .post(format!("{}/oauth/token", self.api_base))
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let text = resp.text().await?;

        let parsed = serde_json::from_str::<TokenResponse>(&text).map(TokenResponse::into_outcome);
        match parsed {
            Ok(Some(outcome)) => {
                if let TokenOutcome::Rejected { error, .. } = &outcome {
                    tracing::warn!(status, error = %error, "Trakt token grant rejected");
                }
                Ok(outcome)
            }
            _ if status >= 400 => Err(TraktError::Api {
                status,
                message: text,
            }),
            Ok(None) => Err(TraktError::Parse(
                "token response has neither access_token nor error".into(),
            )),
            Err(e) => Err(TraktError::Parse(e.to_string())),
        }
    }
}
