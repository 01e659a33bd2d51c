use serde::{Deserialize, Serialize};

/// Stored OAuth tokens for one user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub access_token: String,
    pub refresh_token: String,
    /// Epoch seconds; `None` forces a refresh on next use.
    pub expired_ts: Option<i64>,
}

impl CredentialRecord {
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expired_ts.map_or(true, |ts| now >= ts)
    }

    /// Short, log-safe form of the access token.
    pub fn token_hint(&self) -> String {
        let prefix: String = self.access_token.chars().take(6).collect();
        format!("{prefix}…")
    }
}
