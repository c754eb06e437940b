use crate::DbBackend;
use serde::{Deserialize, Serialize};
use sqlx::Executor;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GroupsRow {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
}

pub async fn insert_group<'e, E>(
    executor: E,
    user_id: i64,
    name: &str,
    description: Option<&str>,
    created_at: &str,
) -> Result<GroupsRow, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    sqlx::query_as::<_, GroupsRow>(
        r#"
        INSERT INTO groups (user_id, name, description, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, user_id, name, description, created_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(description)
    .bind(created_at)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<GroupsRow>, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    sqlx::query_as::<_, GroupsRow>(
        "SELECT id, user_id, name, description, created_at FROM groups WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}
