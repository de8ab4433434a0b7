//! Database query functions for the `roadmaps` table.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use studymap_core::{PlanMode, Roadmap};

use crate::models::StoredRoadmap;

/// Insert a new roadmap row. Returns the inserted row with
/// server-generated defaults (id, timestamps).
pub async fn insert_roadmap(
    pool: &PgPool,
    owner_id: Uuid,
    roadmap: &Roadmap,
    mode: PlanMode,
) -> Result<StoredRoadmap> {
    let body = serde_json::to_value(roadmap).context("failed to serialize roadmap")?;

    let row = sqlx::query_as::<_, StoredRoadmap>(
        "INSERT INTO roadmaps (owner_id, title, mode, body, progress) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING *",
    )
    .bind(owner_id)
    .bind(&roadmap.title)
    .bind(mode.to_string())
    .bind(body)
    .bind(roadmap.progress_percent as i32)
    .fetch_one(pool)
    .await
    .context("failed to insert roadmap")?;

    Ok(row)
}

/// Fetch one roadmap, scoped to its owner.
pub async fn get_roadmap(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<Option<StoredRoadmap>> {
    let row = sqlx::query_as::<_, StoredRoadmap>(
        "SELECT * FROM roadmaps WHERE id = $1 AND owner_id = $2",
    )
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
    .context("failed to fetch roadmap")?;

    Ok(row)
}

/// List an owner's roadmaps, newest first.
pub async fn list_roadmaps(pool: &PgPool, owner_id: Uuid) -> Result<Vec<StoredRoadmap>> {
    let rows = sqlx::query_as::<_, StoredRoadmap>(
        "SELECT * FROM roadmaps WHERE owner_id = $1 ORDER BY created_at DESC",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
    .context("failed to list roadmaps")?;

    Ok(rows)
}

/// Replace a roadmap's body, guarded by the `updated_at` the caller read.
///
/// This is how toggled progress lands in the database: the caller reads a
/// row, applies a pure toggle, and writes the result back. A `None` return
/// means someone else updated the row in between (or it was deleted); the
/// caller should re-read and retry.
pub async fn replace_roadmap(
    pool: &PgPool,
    id: Uuid,
    owner_id: Uuid,
    roadmap: &Roadmap,
    expected_updated_at: DateTime<Utc>,
) -> Result<Option<StoredRoadmap>> {
    let body = serde_json::to_value(roadmap).context("failed to serialize roadmap")?;

    let row = sqlx::query_as::<_, StoredRoadmap>(
        "UPDATE roadmaps \
         SET title = $1, body = $2, progress = $3, updated_at = now() \
         WHERE id = $4 AND owner_id = $5 AND updated_at = $6 \
         RETURNING *",
    )
    .bind(&roadmap.title)
    .bind(body)
    .bind(roadmap.progress_percent as i32)
    .bind(id)
    .bind(owner_id)
    .bind(expected_updated_at)
    .fetch_optional(pool)
    .await
    .context("failed to replace roadmap")?;

    if row.is_none() {
        tracing::debug!(%id, "roadmap replace lost the optimistic-lock race");
    }

    Ok(row)
}

/// Delete a roadmap, scoped to its owner. Returns whether a row was
/// actually removed.
pub async fn delete_roadmap(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM roadmaps WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await
        .context("failed to delete roadmap")?;

    Ok(result.rows_affected() > 0)
}
