use crate::DbBackend;
use serde::{Deserialize, Serialize};
use sqlx::Executor;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UsersRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
}

/// Public view of a user: everything except the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

pub async fn insert_user<'e, E>(
    executor: E,
    username: &str,
    email: &str,
    password_hash: &str,
    created_at: &str,
) -> Result<UserView, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    sqlx::query_as::<_, UserView>(
        r#"
        INSERT INTO users (username, email, password_hash, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, username, email, created_at
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(created_at)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<UsersRow>, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    sqlx::query_as::<_, UsersRow>(
        "SELECT id, username, email, password_hash, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<UsersRow>, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    sqlx::query_as::<_, UsersRow>(
        "SELECT id, username, email, password_hash, created_at FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(executor)
    .await
}

pub async fn username_or_email_exists<'e, E>(
    executor: E,
    username: &str,
    email: &str,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ? OR email = ?")
            .bind(username)
            .bind(email)
            .fetch_one(executor)
            .await?;
    Ok(count > 0)
}
