//! Board statistics endpoint

use axum::{
    extract::{Path, Query, State},
    Json,
};
use moodly_common::feedback::{board_summary, BoardFeedbackSummary};
use serde::Serialize;

use super::feedback::{load_board, FeedbackQuery};
use super::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardStatsResponse {
    pub demo: bool,
    #[serde(flatten)]
    pub summary: BoardFeedbackSummary,
}

/// GET /api/boards/:board_id/stats
pub async fn get_board_stats(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    Query(query): Query<FeedbackQuery>,
) -> Result<Json<BoardStatsResponse>, ApiError> {
    let loaded = load_board(&state, &board_id, query.demo).await?;

    Ok(Json(BoardStatsResponse {
        demo: loaded.demo,
        summary: board_summary(&board_id, &loaded.reviewers),
    }))
}
