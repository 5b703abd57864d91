//! Comment Storage
//! Mission: Threaded comments per post with author-scoped edits

use crate::db::Database;
use crate::models::{Comment, Page};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::params;
use uuid::Uuid;

const SELECT_COMMENT: &str = "SELECT c.id, c.post_id, c.user_id, c.content, c.parent_id,
        EXISTS(SELECT 1 FROM comments r WHERE r.parent_id = c.id) AS has_child,
        c.created_at, c.updated_at
 FROM comments c";

pub struct CommentStore {
    db: Database,
}

impl CommentStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn create(
        &self,
        post_id: &str,
        user_id: &str,
        content: &str,
        parent_id: Option<&str>,
    ) -> Result<Comment> {
        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            post_id: post_id.to_string(),
            user_id: user_id.to_string(),
            content: content.to_string(),
            parent_id: parent_id.map(|p| p.to_string()),
            has_child: false,
            created_at: now,
            updated_at: now,
        };

        self.db
            .conn()
            .execute(
                "INSERT INTO comments (id, post_id, user_id, content, parent_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    comment.id,
                    comment.post_id,
                    comment.user_id,
                    comment.content,
                    comment.parent_id,
                    comment.created_at,
                    comment.updated_at,
                ],
            )
            .context("Failed to insert comment")?;

        Ok(comment)
    }

    pub fn get(&self, id: &str) -> Result<Option<Comment>> {
        let conn = self.db.conn();

        let mut stmt = conn.prepare(&format!("{} WHERE c.id = ?1", SELECT_COMMENT))?;

        let result = stmt.query_row(params![id], map_comment);

        match result {
            Ok(comment) => Ok(Some(comment)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Top-level comments of a post, oldest first. `total_data` counts
    /// every comment on the post, replies included.
    pub fn list_for_post(&self, post_id: &str) -> Result<Page<Comment>> {
        let conn = self.db.conn();

        let mut stmt = conn.prepare(&format!(
            "{} WHERE c.post_id = ?1 AND c.parent_id IS NULL ORDER BY c.created_at",
            SELECT_COMMENT
        ))?;

        let data = stmt
            .query_map(params![post_id], map_comment)?
            .collect::<Result<Vec<_>, _>>()?;

        let total_data: i64 = conn.query_row(
            "SELECT COUNT(*) FROM comments WHERE post_id = ?1",
            params![post_id],
            |row| row.get(0),
        )?;

        Ok(Page { data, total_data })
    }

    /// Author-scoped update; None when no row matches id and user_id
    pub fn update(&self, id: &str, user_id: &str, content: &str) -> Result<Option<Comment>> {
        let updated = self
            .db
            .conn()
            .execute(
                "UPDATE comments SET content = ?1, updated_at = ?2
                 WHERE id = ?3 AND user_id = ?4",
                params![content, Utc::now(), id, user_id],
            )
            .context("Failed to update comment")?;

        if updated == 0 {
            return Ok(None);
        }

        self.get(id)
    }

    /// Author-scoped delete; returns the number of rows removed
    pub fn delete(&self, id: &str, user_id: &str) -> Result<usize> {
        let deleted = self
            .db
            .conn()
            .execute(
                "DELETE FROM comments WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )
            .context("Failed to delete comment")?;

        Ok(deleted)
    }
}

fn map_comment(row: &rusqlite::Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        post_id: row.get(1)?,
        user_id: row.get(2)?,
        content: row.get(3)?,
        parent_id: row.get(4)?,
        has_child: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
