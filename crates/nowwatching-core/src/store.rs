//! Credential store seam.
//!
//! The resolvers only need read-modify-write access to one token record per
//! user id. [`crate::db::DbHandle`] is the SQLite implementation.

use std::future::Future;

use crate::error::CoreError;
use crate::models::CredentialRecord;

pub trait CredentialStore: Send + Sync {
    fn load(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<CredentialRecord>, CoreError>> + Send;

    fn save(
        &self,
        user_id: &str,
        record: CredentialRecord,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn remove(&self, user_id: &str) -> impl Future<Output = Result<(), CoreError>> + Send;
}
