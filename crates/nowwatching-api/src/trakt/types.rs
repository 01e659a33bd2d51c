use serde::Deserialize;

// ── OAuth token responses ───────────────────────────────────────

/// Raw body of `POST /oauth/token`.
///
/// Trakt reports a rejected grant through the `error` field, so every field
/// is optional and the body is classified by [`TokenResponse::into_outcome`].
#[derive(Debug, Default, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub token_type: Option<String>,
    pub created_at: Option<i64>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// A successfully issued token set.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
}

/// Classified result of a code exchange or refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenOutcome {
    Granted(TokenGrant),
    /// The provider refused the grant; the credential cannot be recovered.
    Rejected {
        error: String,
        description: Option<String>,
    },
}

impl TokenResponse {
    /// `None` when the body carries neither an `error` nor an access token,
    /// which says nothing about the grant itself.
    pub fn into_outcome(self) -> Option<TokenOutcome> {
        if let Some(error) = self.error.filter(|e| !e.is_empty()) {
            return Some(TokenOutcome::Rejected {
                error,
                description: self.error_description,
            });
        }
        let access_token = self.access_token.filter(|t| !t.is_empty())?;
        Some(TokenOutcome::Granted(TokenGrant {
            access_token,
            refresh_token: self.refresh_token.filter(|t| !t.is_empty()),
            expires_in: self.expires_in,
        }))
    }
}

// ── Profile ─────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ids: Option<UserIds>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct UserIds {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
}

impl Profile {
    /// Stable user id: the handle when present, otherwise the profile id.
    pub fn stable_id(&self) -> Option<String> {
        let ids = self.ids.as_ref();
        self.username
            .clone()
            .or_else(|| ids.and_then(|i| i.slug.clone()))
            .or_else(|| ids.and_then(|i| i.uuid.clone()))
            .filter(|id| !id.is_empty())
    }
}

// ── Media objects ───────────────────────────────────────────────

/// Cross-reference identifiers attached to every Trakt media object.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct MediaIds {
    #[serde(default)]
    pub trakt: Option<u64>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub imdb: Option<String>,
    #[serde(default)]
    pub tmdb: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Movie {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub ids: MediaIds,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Show {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub ids: MediaIds,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Episode {
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub ids: MediaIds,
}

fn default_kind() -> String {
    "movie".into()
}

/// Body of `GET /users/me/watching`.
#[derive(Debug, Clone, Deserialize)]
pub struct Watching {
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub movie: Option<Movie>,
    #[serde(default)]
    pub show: Option<Show>,
    #[serde(default)]
    pub episode: Option<Episode>,
}

/// One element of `GET /users/me/history`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryItem {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub watched_at: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub movie: Option<Movie>,
    #[serde(default)]
    pub show: Option<Show>,
    #[serde(default)]
    pub episode: Option<Episode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_field_is_rejected() {
        let body: TokenResponse = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"The provided authorization grant is invalid"}"#,
        )
        .unwrap();
        match body.into_outcome() {
            Some(TokenOutcome::Rejected { error, description }) => {
                assert_eq!(error, "invalid_grant");
                assert!(description.unwrap().contains("invalid"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_grant_without_refresh_token() {
        let body: TokenResponse =
            serde_json::from_str(r#"{"access_token":"abc","expires_in":7200}"#).unwrap();
        assert_eq!(
            body.into_outcome(),
            Some(TokenOutcome::Granted(TokenGrant {
                access_token: "abc".into(),
                refresh_token: None,
                expires_in: Some(7200),
            }))
        );
    }

    #[test]
    fn test_body_without_error_or_token_is_unclassified() {
        for raw in ["{}", r#"{"message":"Service Unavailable"}"#] {
            let body: TokenResponse = serde_json::from_str(raw).unwrap();
            assert_eq!(body.into_outcome(), None, "{raw}");
        }
    }

    #[test]
    fn test_watching_defaults_to_movie() {
        let watching: Watching =
            serde_json::from_str(r#"{"movie":{"title":"Inception","year":2010,"ids":{"tmdb":27205}}}"#)
                .unwrap();
        assert_eq!(watching.kind, "movie");
        let movie = watching.movie.unwrap();
        assert_eq!(movie.ids.tmdb, Some(27205));
    }

    #[test]
    fn test_profile_stable_id_prefers_username() {
        let profile: Profile = serde_json::from_str(
            r#"{"username":"sean","ids":{"slug":"sean-slug","uuid":"u-1"}}"#,
        )
        .unwrap();
        assert_eq!(profile.stable_id().as_deref(), Some("sean"));

        let profile: Profile = serde_json::from_str(r#"{"ids":{"slug":"sean-slug"}}"#).unwrap();
        assert_eq!(profile.stable_id().as_deref(), Some("sean-slug"));

        assert_eq!(Profile::default().stable_id(), None);
    }
}
