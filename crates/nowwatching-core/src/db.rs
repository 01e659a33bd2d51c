use std::path::Path;

use tokio::sync::{mpsc, oneshot};

use crate::error::CoreError;
use crate::models::CredentialRecord;
use crate::storage::Storage;
use crate::store::CredentialStore;

/// Cloneable async handle to the credential database.
///
/// The SQLite connection lives on a dedicated thread; every clone sends
/// commands to it over a channel, so concurrent requests never share the
/// connection directly.
#[derive(Clone)]
pub struct DbHandle {
    tx: mpsc::UnboundedSender<DbCommand>,
}

impl std::fmt::Debug for DbHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbHandle").finish_non_exhaustive()
    }
}

enum DbCommand {
    GetCredential {
        user_id: String,
        reply: oneshot::Sender<Result<Option<CredentialRecord>, CoreError>>,
    },
    SaveCredential {
        user_id: String,
        record: CredentialRecord,
        reply: oneshot::Sender<Result<(), CoreError>>,
    },
    DeleteCredential {
        user_id: String,
        reply: oneshot::Sender<Result<bool, CoreError>>,
    },
    CredentialCount {
        reply: oneshot::Sender<Result<u64, CoreError>>,
    },
}

impl DbHandle {
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let storage = Storage::open(path)?;
        Self::spawn(storage)
    }

    /// In-memory database, for tests and throwaway runs.
    pub fn open_memory() -> Result<Self, CoreError> {
        Self::spawn(Storage::open_memory()?)
    }

    fn spawn(storage: Storage) -> Result<Self, CoreError> {
        let (tx, rx) = mpsc::unbounded_channel();

        std::thread::Builder::new()
            .name("db-actor".into())
            .spawn(move || actor_loop(storage, rx))?;

        Ok(Self { tx })
    }

    pub async fn get_credential(&self, user_id: &str) -> Result<Option<CredentialRecord>, CoreError> {
        let (reply, rx) = oneshot::channel();
        let _ = self.tx.send(DbCommand::GetCredential {
            user_id: user_id.to_string(),
            reply,
        });
        rx.await.unwrap_or(Err(CoreError::StoreClosed))
    }

    pub async fn save_credential(
        &self,
        user_id: &str,
        record: CredentialRecord,
    ) -> Result<(), CoreError> {
        let (reply, rx) = oneshot::channel();
        let _ = self.tx.send(DbCommand::SaveCredential {
            user_id: user_id.to_string(),
            record,
            reply,
        });
        rx.await.unwrap_or(Err(CoreError::StoreClosed))
    }

    pub async fn delete_credential(&self, user_id: &str) -> Result<bool, CoreError> {
        let (reply, rx) = oneshot::channel();
        let _ = self.tx.send(DbCommand::DeleteCredential {
            user_id: user_id.to_string(),
            reply,
        });
        rx.await.unwrap_or(Err(CoreError::StoreClosed))
    }

    pub async fn credential_count(&self) -> Result<u64, CoreError> {
        let (reply, rx) = oneshot::channel();
        let _ = self.tx.send(DbCommand::CredentialCount { reply });
        rx.await.unwrap_or(Err(CoreError::StoreClosed))
    }
}

impl CredentialStore for DbHandle {
    async fn load(&self, user_id: &str) -> Result<Option<CredentialRecord>, CoreError> {
        self.get_credential(user_id).await
    }

    async fn save(&self, user_id: &str, record: CredentialRecord) -> Result<(), CoreError> {
        self.save_credential(user_id, record).await
    }

    async fn remove(&self, user_id: &str) -> Result<(), CoreError> {
        self.delete_credential(user_id).await.map(|_| ())
    }
}

fn actor_loop(storage: Storage, mut rx: mpsc::UnboundedReceiver<DbCommand>) {
    while let Some(cmd) = rx.blocking_recv() {
        match cmd {
            DbCommand::GetCredential { user_id, reply } => {
                let _ = reply.send(storage.get_credential(&user_id));
            }
            DbCommand::SaveCredential {
                user_id,
                record,
                reply,
            } => {
                let _ = reply.send(storage.save_credential(&user_id, &record));
            }
            DbCommand::DeleteCredential { user_id, reply } => {
                let _ = reply.send(storage.delete_credential(&user_id));
            }
            DbCommand::CredentialCount { reply } => {
                let _ = reply.send(storage.credential_count());
            }
        }
    }
    tracing::debug!("db actor stopped");
}
