//! Product Storage
//! Mission: CRUD and paged search over the product catalog

use super::{sort_column, sort_direction};
use crate::db::Database;
use crate::models::{ListParams, Page, Product};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::params;
use uuid::Uuid;

pub struct ProductStore {
    db: Database,
}

impl ProductStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn create(&self, name: &str, price: f64) -> Result<Product> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            price,
            created_at: now,
            updated_at: now,
        };

        self.db
            .conn()
            .execute(
                "INSERT INTO products (id, name, price, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    product.id,
                    product.name,
                    product.price,
                    product.created_at,
                    product.updated_at,
                ],
            )
            .context("Failed to insert product")?;

        Ok(product)
    }

    pub fn get(&self, id: &str) -> Result<Option<Product>> {
        let conn = self.db.conn();

        let mut stmt = conn.prepare(
            "SELECT id, name, price, created_at, updated_at FROM products WHERE id = ?1",
        )?;

        let result = stmt.query_row(params![id], |row| {
            Ok(Product {
                id: row.get(0)?,
                name: row.get(1)?,
                price: row.get(2)?,
                created_at: row.get(3)?,
                updated_at: row.get(4)?,
            })
        });

        match result {
            Ok(product) => Ok(Some(product)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Paged name search. `total_data` counts every match, ignoring paging.
    pub fn list(&self, list: &ListParams) -> Result<Page<Product>> {
        let page = list.page.max(1) as i64;
        let limit = list.limit as i64;
        let offset = (page - 1) * limit;
        let pattern = format!("%{}%", list.search.as_deref().unwrap_or(""));

        // Column and direction come from the whitelists, never the caller
        let sql = format!(
            "SELECT id, name, price, created_at, updated_at
             FROM products
             WHERE name LIKE ?1
             ORDER BY {} {}
             LIMIT ?2 OFFSET ?3",
            sort_column(&list.by),
            sort_direction(&list.order),
        );

        let conn = self.db.conn();

        let mut stmt = conn.prepare(&sql)?;
        let data = stmt
            .query_map(params![pattern, limit, offset], |row| {
                Ok(Product {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    price: row.get(2)?,
                    created_at: row.get(3)?,
                    updated_at: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let total_data: i64 = conn.query_row(
            "SELECT COUNT(*) FROM products WHERE name LIKE ?1",
            params![pattern],
            |row| row.get(0),
        )?;

        Ok(Page { data, total_data })
    }

    /// Update name and price; None when the id has no row
    pub fn update(&self, id: &str, name: &str, price: f64) -> Result<Option<Product>> {
        let updated = self
            .db
            .conn()
            .execute(
                "UPDATE products SET name = ?1, price = ?2, updated_at = ?3 WHERE id = ?4",
                params![name, price, Utc::now(), id],
            )
            .context("Failed to update product")?;

        if updated == 0 {
            return Ok(None);
        }

        self.get(id)
    }

    /// Delete by id; returns the number of rows removed
    pub fn delete(&self, id: &str) -> Result<usize> {
        let deleted = self
            .db
            .conn()
            .execute("DELETE FROM products WHERE id = ?1", params![id])
            .context("Failed to delete product")?;

        Ok(deleted)
    }
}
