//! Typed key/value items attached to a group, keyed by `(group_id, type)`.

use crate::DbBackend;
use serde::{Deserialize, Serialize};
use sqlx::Executor;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GroupItemsRow {
    pub group_id: i64,
    pub r#type: String,
    pub data: String,
    pub updated_at: String,
}

/// Atomic upsert of a group item: insert-on-conflict-update in a single
/// statement, so concurrent writers race on whole payloads only
/// (last-write-wins, never a mix).
///
/// Returns the number of affected rows; zero indicates nothing was written,
/// which the caller treats as a store inconsistency.
pub async fn upsert_item<'e, E>(
    executor: E,
    group_id: i64,
    item_type: &str,
    data: &str,
    updated_at: &str,
) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO group_items (group_id, type, data, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (group_id, type)
        DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at
        "#,
    )
    .bind(group_id)
    .bind(item_type)
    .bind(data)
    .bind(updated_at)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn find_item<'e, E>(
    executor: E,
    group_id: i64,
    item_type: &str,
) -> Result<Option<GroupItemsRow>, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    sqlx::query_as::<_, GroupItemsRow>(
        "SELECT group_id, type, data, updated_at FROM group_items WHERE group_id = ? AND type = ?",
    )
    .bind(group_id)
    .bind(item_type)
    .fetch_optional(executor)
    .await
}
