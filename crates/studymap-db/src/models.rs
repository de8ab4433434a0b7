use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use studymap_core::Roadmap;

/// A persisted roadmap row.
///
/// The roadmap structure itself is stored as JSONB in `body`; `title` and
/// `progress` are denormalized copies for cheap list views. `updated_at`
/// doubles as the optimistic-lock token for [`replace_roadmap`].
///
/// [`replace_roadmap`]: crate::queries::roadmaps::replace_roadmap
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredRoadmap {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    /// Plan mode string ("exam" or "placement") recorded at creation.
    pub mode: String,
    /// Full [`Roadmap`] serialized as JSON.
    pub body: serde_json::Value,
    /// Denormalized `progress_percent` for list queries.
    pub progress: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredRoadmap {
    /// Deserialize the JSONB body back into a [`Roadmap`].
    pub fn roadmap(&self) -> Result<Roadmap> {
        serde_json::from_value(self.body.clone())
            .with_context(|| format!("roadmap {} has a malformed body", self.id))
    }
}
