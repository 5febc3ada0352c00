//! User repository
//!
//! Database operations for users:
//! - `UserRepository` trait defining the interface for user data access
//! - `SqlxUserRepository` implementing the trait against SQLite
//!
//! Listing supports offset/limit pagination, an optional case-insensitive
//! substring filter, and sorting on the `name` or `email` column.

use crate::db::DbPool;
use crate::models::User;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

/// A user column that can be searched or sorted on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Name,
    Email,
}

impl UserField {
    /// The underlying column name.
    ///
    /// Only enum variants ever reach SQL, so interpolating this into a query
    /// string cannot inject.
    pub fn column(self) -> &'static str {
        match self {
            UserField::Name => "name",
            UserField::Email => "email",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Parameters for a paginated user listing
#[derive(Debug, Clone)]
pub struct UserListQuery {
    /// Rows to skip
    pub offset: i64,
    /// Maximum rows to return
    pub limit: i64,
    /// Column to sort on
    pub sort_field: UserField,
    /// Sort direction
    pub sort_order: SortOrder,
    /// Optional substring filter: (column, needle)
    pub search: Option<(UserField, String)>,
}

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, user: &User) -> Result<User>;

    /// Get user by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Get user by email
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Update a user's name and email
    async fn update_profile(&self, id: i64, name: &str, email: &str) -> Result<()>;

    /// Replace a user's password hash
    async fn change_password(&self, id: i64, password_hash: &str) -> Result<bool>;

    /// Delete a user
    async fn delete(&self, id: i64) -> Result<()>;

    /// Count users matching the optional search filter
    async fn count(&self, search: Option<&(UserField, String)>) -> Result<i64>;

    /// List users matching the query
    async fn list(&self, query: &UserListQuery) -> Result<Vec<User>>;
}

/// SQLx-based user repository implementation
pub struct SqlxUserRepository {
    pool: DbPool,
}

impl SqlxUserRepository {
    /// Create a new SQLx user repository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DbPool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, user: &User) -> Result<User> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create user")?;

        Ok(User {
            id: result.last_insert_rowid(),
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get user by ID")?;

        row.map(|row| row_to_user(&row)).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get user by email")?;

        row.map(|row| row_to_user(&row)).transpose()
    }

    async fn update_profile(&self, id: i64, name: &str, email: &str) -> Result<()> {
        sqlx::query("UPDATE users SET name = ?, email = ?, updated_at = ? WHERE id = ?")
            .bind(name)
            .bind(email)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update user")?;

        Ok(())
    }

    async fn change_password(&self, id: i64, password_hash: &str) -> Result<bool> {
        let result =
            sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
                .bind(password_hash)
                .bind(Utc::now())
                .bind(id)
                .execute(&self.pool)
                .await
                .context("Failed to change password")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete user")?;

        Ok(())
    }

    async fn count(&self, search: Option<&(UserField, String)>) -> Result<i64> {
        let row = match search {
            Some((field, needle)) => {
                let sql = format!(
                    "SELECT COUNT(*) as count FROM users WHERE {} LIKE ? ESCAPE '\\'",
                    field.column()
                );
                sqlx::query(&sql)
                    .bind(like_pattern(needle))
                    .fetch_one(&self.pool)
                    .await
            }
            None => {
                sqlx::query("SELECT COUNT(*) as count FROM users")
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .context("Failed to count users")?;

        Ok(row.get("count"))
    }

    async fn list(&self, query: &UserListQuery) -> Result<Vec<User>> {
        let mut sql = String::from(
            "SELECT id, name, email, password_hash, created_at, updated_at FROM users",
        );
        if let Some((field, _)) = &query.search {
            sql.push_str(&format!(" WHERE {} LIKE ? ESCAPE '\\'", field.column()));
        }
        sql.push_str(&format!(
            " ORDER BY {} {} LIMIT ? OFFSET ?",
            query.sort_field.column(),
            query.sort_order.sql()
        ));

        let mut q = sqlx::query(&sql);
        if let Some((_, needle)) = &query.search {
            q = q.bind(like_pattern(needle));
        }
        let rows = q
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list users")?;

        rows.iter().map(row_to_user).collect()
    }
}

/// Build a `%needle%` pattern with LIKE wildcards in the needle escaped.
///
/// SQLite's LIKE is case-insensitive for ASCII, which gives the
/// case-insensitive search the listing contract asks for.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    Ok(User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
