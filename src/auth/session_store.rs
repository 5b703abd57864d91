//! Session Storage
//! Mission: Persist one refresh-token session per username

use crate::auth::models::Session;
use crate::db::Database;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::params;
use tracing::debug;
use uuid::Uuid;

/// Refresh-session storage over the shared database handle
pub struct SessionStore {
    db: Database,
}

impl SessionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert the session row for a username. Fails when the username has
    /// no user row behind it (foreign key).
    pub fn create_session(
        &self,
        username: &str,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session> {
        let session = Session {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            refresh_token: refresh_token.to_string(),
            expires_at,
            created_at: Utc::now(),
        };

        self.db
            .conn()
            .execute(
                "INSERT INTO sessions (id, username, refresh_token, expires_at, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    session.id,
                    session.username,
                    session.refresh_token,
                    session.expires_at,
                    session.created_at,
                ],
            )
            .context("Failed to insert session")?;

        debug!("Stored refresh session for {}", session.username);

        Ok(session)
    }

    /// Delete the session rows for a username. Deleting when none exist is
    /// not an error; returns the number of rows removed.
    pub fn delete_session(&self, username: &str) -> Result<usize> {
        let deleted = self
            .db
            .conn()
            .execute(
                "DELETE FROM sessions WHERE username = ?1",
                params![username],
            )
            .context("Failed to delete session")?;

        if deleted > 0 {
            debug!("Removed {} session row(s) for {}", deleted, username);
        }

        Ok(deleted)
    }

    /// Get the stored session for a username
    pub fn get_session(&self, username: &str) -> Result<Option<Session>> {
        let conn = self.db.conn();

        let mut stmt = conn.prepare(
            "SELECT id, username, refresh_token, expires_at, created_at
             FROM sessions WHERE username = ?1",
        )?;

        let result = stmt.query_row(params![username], |row| {
            Ok(Session {
                id: row.get(0)?,
                username: row.get(1)?,
                refresh_token: row.get(2)?,
                expires_at: row.get(3)?,
                created_at: row.get(4)?,
            })
        });

        match result {
            Ok(session) => Ok(Some(session)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Number of session rows held by a username
    pub fn session_count(&self, username: &str) -> Result<i64> {
        let count = self.db.conn().query_row(
            "SELECT COUNT(*) FROM sessions WHERE username = ?1",
            params![username],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
