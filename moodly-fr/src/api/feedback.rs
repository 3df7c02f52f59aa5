//! Board feedback endpoint
//!
//! Also hosts the loading path shared by the stats and items endpoints:
//! board lookup, record parsing, profile enrichment, section alignment.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use moodly_common::board::BoardSection;
use moodly_common::db::BoardInfo;
use moodly_common::feedback::mock::mock_reviewers;
use moodly_common::feedback::{load_board_feedback, normalize_for_board, ReviewerFeedback};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::ApiError;
use crate::AppState;

/// Reviewers generated for a board in demo mode
pub const DEMO_REVIEWER_COUNT: usize = 4;

#[derive(Debug, Default, Deserialize)]
pub struct FeedbackQuery {
    /// Fall back to demo reviewers when the board has no feedback
    #[serde(default)]
    pub demo: bool,
}

/// A board's reviewers, aligned with its current sections
#[derive(Debug, Clone)]
pub struct LoadedBoard {
    pub board: BoardInfo,
    pub sections: Vec<BoardSection>,
    pub reviewers: Vec<ReviewerFeedback>,
    /// `true` when `reviewers` are generated demo data
    pub demo: bool,
}

pub async fn load_board(state: &AppState, board_id: &str, demo_requested: bool) -> Result<LoadedBoard, ApiError> {
    let board = state
        .store
        .board(board_id)
        .await?
        .ok_or_else(|| ApiError::BoardNotFound(board_id.to_string()))?;

    let sections = state.store.list_sections(board_id).await?;
    let reviewers = load_board_feedback(&state.store, board_id).await?;

    let (reviewers, demo) = if reviewers.is_empty() && (demo_requested || state.demo_mode) {
        info!(board_id, "No feedback yet, serving demo reviewers");
        (mock_reviewers(board_id, &sections, DEMO_REVIEWER_COUNT), true)
    } else {
        (state.profiles.enrich(reviewers).await?, false)
    };

    let reviewers = normalize_for_board(reviewers, &sections);
    debug!(board_id, reviewers = reviewers.len(), sections = sections.len(), demo, "Loaded board feedback");

    Ok(LoadedBoard {
        board,
        sections,
        reviewers,
        demo,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardFeedbackResponse {
    pub board_id: String,
    pub title: String,
    pub owner_name: Option<String>,
    pub published: bool,
    pub demo: bool,
    pub sections: Vec<BoardSection>,
    pub reviewers: Vec<ReviewerFeedback>,
}

/// GET /api/boards/:board_id/feedback
pub async fn get_board_feedback(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    Query(query): Query<FeedbackQuery>,
) -> Result<Json<BoardFeedbackResponse>, ApiError> {
    let loaded = load_board(&state, &board_id, query.demo).await?;

    Ok(Json(BoardFeedbackResponse {
        board_id,
        title: loaded.board.title,
        owner_name: loaded.board.owner_name,
        published: loaded.board.published,
        demo: loaded.demo,
        sections: loaded.sections,
        reviewers: loaded.reviewers,
    }))
}
