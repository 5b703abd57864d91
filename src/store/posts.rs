//! Post Storage
//! Mission: Owner-scoped CRUD over user posts

use super::sort_direction;
use crate::db::Database;
use crate::models::{ListParams, Page, Post};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::params;
use uuid::Uuid;

pub struct PostStore {
    db: Database,
}

impl PostStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn create(&self, user_id: &str, description: &str) -> Result<Post> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            description: description.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.db
            .conn()
            .execute(
                "INSERT INTO posts (id, user_id, description, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    post.id,
                    post.user_id,
                    post.description,
                    post.created_at,
                    post.updated_at,
                ],
            )
            .context("Failed to insert post")?;

        Ok(post)
    }

    /// Read by id, not owner-scoped
    pub fn get(&self, id: &str) -> Result<Option<Post>> {
        let conn = self.db.conn();

        let mut stmt = conn.prepare(
            "SELECT id, user_id, description, created_at, updated_at FROM posts WHERE id = ?1",
        )?;

        let result = stmt.query_row(params![id], |row| {
            Ok(Post {
                id: row.get(0)?,
                user_id: row.get(1)?,
                description: row.get(2)?,
                created_at: row.get(3)?,
                updated_at: row.get(4)?,
            })
        });

        match result {
            Ok(post) => Ok(Some(post)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Posts owned by the user, ordered by creation time
    pub fn list_for_user(&self, user_id: &str, list: &ListParams) -> Result<Page<Post>> {
        let page = list.page.max(1) as i64;
        let limit = list.limit as i64;
        let offset = (page - 1) * limit;

        let sql = format!(
            "SELECT id, user_id, description, created_at, updated_at
             FROM posts
             WHERE user_id = ?1
             ORDER BY created_at {}
             LIMIT ?2 OFFSET ?3",
            sort_direction(&list.order),
        );

        let conn = self.db.conn();

        let mut stmt = conn.prepare(&sql)?;
        let data = stmt
            .query_map(params![user_id, limit, offset], |row| {
                Ok(Post {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    description: row.get(2)?,
                    created_at: row.get(3)?,
                    updated_at: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let total_data: i64 = conn.query_row(
            "SELECT COUNT(*) FROM posts WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;

        Ok(Page { data, total_data })
    }

    /// Owner-scoped update; None when no row matches id and user_id
    pub fn update(&self, id: &str, user_id: &str, description: &str) -> Result<Option<Post>> {
        let updated = self
            .db
            .conn()
            .execute(
                "UPDATE posts SET description = ?1, updated_at = ?2
                 WHERE id = ?3 AND user_id = ?4",
                params![description, Utc::now(), id, user_id],
            )
            .context("Failed to update post")?;

        if updated == 0 {
            return Ok(None);
        }

        self.get(id)
    }

    /// Owner-scoped delete; returns the number of rows removed
    pub fn delete(&self, id: &str, user_id: &str) -> Result<usize> {
        let deleted = self
            .db
            .conn()
            .execute(
                "DELETE FROM posts WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )
            .context("Failed to delete post")?;

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::user_store::UserStore;
    use tempfile::NamedTempFile;

    fn create_test_store() -> (PostStore, UserStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let db = Database::open(temp_file.path().to_str().unwrap()).unwrap();
        (PostStore::new(db.clone()), UserStore::new(db), temp_file)
    }

    fn seed_user(users: &UserStore, username: &str) -> String {
        users
            .create_user(username, "Test User", "test@example.com", "password123")
            .unwrap()
            .id
    }

    #[test]
    fn test_create_requires_existing_user() {
        let (posts, _users, _temp) = create_test_store();

        assert!(posts.create("ghost-user", "First post").is_err());
    }

    #[test]
    fn test_create_get_and_list_scoping() {
        let (posts, users, _temp) = create_test_store();
        let budi = seed_user(&users, "budi");
        let sari = seed_user(&users, "sari");

        let post = posts.create(&budi, "First post").unwrap();
        posts.create(&budi, "Second post").unwrap();
        posts.create(&sari, "Another voice").unwrap();

        // Unscoped read works across owners
        assert_eq!(posts.get(&post.id).unwrap().unwrap().description, "First post");

        let budi_page = posts.list_for_user(&budi, &ListParams::default()).unwrap();
        assert_eq!(budi_page.data.len(), 2);
        assert_eq!(budi_page.total_data, 2);
        assert!(budi_page.data.iter().all(|p| p.user_id == budi));

        let sari_page = posts.list_for_user(&sari, &ListParams::default()).unwrap();
        assert_eq!(sari_page.total_data, 1);
    }

    #[test]
    fn test_update_is_owner_scoped() {
        let (posts, users, _temp) = create_test_store();
        let budi = seed_user(&users, "budi");
        let sari = seed_user(&users, "sari");

        let post = posts.create(&budi, "First post").unwrap();

        // Wrong owner touches nothing
        assert!(posts.update(&post.id, &sari, "Hijacked").unwrap().is_none());

        let updated = posts.update(&post.id, &budi, "Edited post").unwrap().unwrap();
        assert_eq!(updated.description, "Edited post");
    }

    #[test]
    fn test_delete_is_owner_scoped() {
        let (posts, users, _temp) = create_test_store();
        let budi = seed_user(&users, "budi");
        let sari = seed_user(&users, "sari");

        let post = posts.create(&budi, "First post").unwrap();

        assert_eq!(posts.delete(&post.id, &sari).unwrap(), 0);
        assert_eq!(posts.delete(&post.id, &budi).unwrap(), 1);
        assert!(posts.get(&post.id).unwrap().is_none());
    }
}
