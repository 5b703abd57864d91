//! User Storage
//! Mission: Securely store and manage user accounts with SQLite

use crate::auth::models::User;
use crate::db::Database;
use anyhow::{Context, Result};
use bcrypt::{hash, DEFAULT_COST};
use chrono::Utc;
use rusqlite::params;
use tracing::info;
use uuid::Uuid;

/// User storage over the shared database handle
pub struct UserStore {
    db: Database,
}

impl UserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create a new user with a freshly hashed password
    pub fn create_user(
        &self,
        username: &str,
        fullname: &str,
        email: &str,
        password: &str,
    ) -> Result<User> {
        let password_hash = hash(password, DEFAULT_COST).context("Failed to hash password")?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            fullname: fullname.to_string(),
            email: email.to_string(),
            password_hash,
            created_at: Utc::now(),
        };

        self.db
            .conn()
            .execute(
                "INSERT INTO users (id, fullname, username, password_hash, email, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    user.id,
                    user.fullname,
                    user.username,
                    user.password_hash,
                    user.email,
                    user.created_at,
                ],
            )
            .context("Failed to insert user")?;

        info!("✅ Created user: {}", user.username);

        Ok(user)
    }

    /// Get user by username
    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.db.conn();

        let mut stmt = conn.prepare(
            "SELECT id, username, fullname, email, password_hash, created_at
             FROM users WHERE username = ?1",
        )?;

        let user_result = stmt.query_row(params![username], |row| {
            Ok(User {
                id: row.get(0)?,
                username: row.get(1)?,
                fullname: row.get(2)?,
                email: row.get(3)?,
                password_hash: row.get(4)?,
                created_at: row.get(5)?,
            })
        });

        match user_result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// True when an insert failed on the UNIQUE constraint over usernames
pub fn is_duplicate_username(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
