use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::CoreError;
use crate::models::CredentialRecord;

const SCHEMA_V1: &str = include_str!("../../../migrations/001_credentials.sql");

/// SQLite-backed credential storage.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open (or create) the database at the given path and run migrations.
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    // ── Credentials ─────────────────────────────────────────────

    /// Insert or replace the token record for a user.
    pub fn save_credential(&self, user_id: &str, record: &CredentialRecord) -> Result<(), CoreError> {
        self.conn.execute(
            "INSERT INTO credentials (user_id, access_token, refresh_token, expired_ts, updated_at)
             VALUES (?1, ?2, ?3, ?4, datetime('now'))
             ON CONFLICT(user_id) DO UPDATE SET
                 access_token = excluded.access_token,
                 refresh_token = excluded.refresh_token,
                 expired_ts = excluded.expired_ts,
                 updated_at = excluded.updated_at",
            params![
                user_id,
                record.access_token,
                record.refresh_token,
                record.expired_ts
            ],
        )?;
        Ok(())
    }

    /// Get the token record for a user.
    pub fn get_credential(&self, user_id: &str) -> Result<Option<CredentialRecord>, CoreError> {
        self.conn
            .query_row(
                "SELECT access_token, refresh_token, expired_ts FROM credentials WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(CredentialRecord {
                        access_token: row.get(0)?,
                        refresh_token: row.get(1)?,
                        expired_ts: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Delete the token record for a user. Returns whether a row existed.
    pub fn delete_credential(&self, user_id: &str) -> Result<bool, CoreError> {
        let removed = self
            .conn
            .execute("DELETE FROM credentials WHERE user_id = ?1", params![user_id])?;
        Ok(removed > 0)
    }

    /// Number of stored credentials.
    pub fn credential_count(&self) -> Result<u64, CoreError> {
        self.conn
            .query_row("SELECT COUNT(*) FROM credentials", [], |row| row.get(0))
            .map_err(Into::into)
    }
}

// ── Migrations ──────────────────────────────────────────────────

/// Run schema migrations using `PRAGMA user_version` for version tracking.
fn run_migrations(conn: &Connection) -> Result<(), CoreError> {
    let version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .unwrap_or(0);

    if version < 1 {
        conn.execute_batch(SCHEMA_V1)?;
        conn.pragma_update(None, "user_version", 1)?;
    }
    Ok(())
}
