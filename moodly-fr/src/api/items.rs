//! Per-item feedback for one section

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use moodly_common::feedback::normalizer::ReviewerItemFeedback;
use moodly_common::feedback::items_by_reviewer;
use serde::Serialize;

use super::feedback::{load_board, FeedbackQuery};
use super::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionItemsResponse {
    pub board_id: String,
    pub section_id: String,
    pub demo: bool,
    /// Item id -> each reviewer's reaction and comments
    pub items: BTreeMap<String, Vec<ReviewerItemFeedback>>,
}

/// GET /api/boards/:board_id/sections/:section_id/items
pub async fn get_section_items(
    State(state): State<AppState>,
    Path((board_id, section_id)): Path<(String, String)>,
    Query(query): Query<FeedbackQuery>,
) -> Result<Json<SectionItemsResponse>, ApiError> {
    let loaded = load_board(&state, &board_id, query.demo).await?;

    if !loaded.sections.iter().any(|s| s.id == section_id) {
        return Err(ApiError::SectionNotFound { board_id, section_id });
    }

    let items = items_by_reviewer(&loaded.reviewers, &section_id);

    Ok(Json(SectionItemsResponse {
        board_id,
        section_id,
        demo: loaded.demo,
        items,
    }))
}
