//! SQLite-backed feedback store
//!
//! Read-only queries over the tables created by [`super::init`].

use async_trait::async_trait;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::board::{BoardSection, SectionKind};
use crate::feedback::adapter::{FeedbackSource, RawFeedbackRecord};
use crate::Result;

/// Profile data kept outside feedback records
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewerProfile {
    pub reviewer_id: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Board metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardInfo {
    pub id: String,
    pub title: String,
    pub owner_name: Option<String>,
    pub published: bool,
}

#[derive(Debug, Clone)]
pub struct SqliteFeedbackStore {
    pool: SqlitePool,
}

impl SqliteFeedbackStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn board(&self, board_id: &str) -> Result<Option<BoardInfo>> {
        let row = sqlx::query_as::<_, (String, String, Option<String>, i64)>(
            "SELECT id, title, owner_name, published FROM boards WHERE id = ?",
        )
        .bind(board_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, title, owner_name, published)| BoardInfo {
            id,
            title,
            owner_name,
            published: published != 0,
        }))
    }

    /// Sections of a board in display order
    ///
    /// Rows with an unrecognized kind are skipped with a warning.
    pub async fn list_sections(&self, board_id: &str) -> Result<Vec<BoardSection>> {
        let rows = sqlx::query_as::<_, (String, String, String, i64)>(
            "SELECT id, kind, title, position FROM board_sections WHERE board_id = ? ORDER BY position ASC, id ASC",
        )
        .bind(board_id)
        .fetch_all(&self.pool)
        .await?;

        let sections = rows
            .into_iter()
            .filter_map(|(id, kind, title, position)| match kind.parse::<SectionKind>() {
                Ok(kind) => Some(BoardSection {
                    id,
                    kind,
                    title,
                    position,
                }),
                Err(e) => {
                    warn!(board_id, section_id = %id, "Skipping section: {}", e);
                    None
                }
            })
            .collect();

        Ok(sections)
    }

    pub async fn reviewer_profile(&self, reviewer_id: &str) -> Result<Option<ReviewerProfile>> {
        let row = sqlx::query_as::<_, (String, Option<String>, Option<String>)>(
            "SELECT reviewer_id, display_name, avatar_url FROM reviewer_profiles WHERE reviewer_id = ?",
        )
        .bind(reviewer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(reviewer_id, display_name, avatar_url)| ReviewerProfile {
            reviewer_id,
            display_name,
            avatar_url,
        }))
    }
}

#[async_trait]
impl FeedbackSource for SqliteFeedbackStore {
    async fn raw_records(&self, board_id: &str) -> Result<Vec<RawFeedbackRecord>> {
        let rows = sqlx::query_as::<_, (String, Option<String>, String)>(
            "SELECT board_id, reviewer_id, payload FROM board_feedback WHERE board_id = ?",
        )
        .bind(board_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(board_id, reviewer_id, payload)| RawFeedbackRecord {
                board_id,
                reviewer_id,
                payload,
            })
            .collect())
    }
}
