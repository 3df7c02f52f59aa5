//! moodly-fr library - Feedback Review service
//!
//! Read-only HTTP view over reviewer feedback stored in moodly.db.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use moodly_common::db::SqliteFeedbackStore;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod profiles;

use profiles::ProfileDirectory;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Queries over the read-only pool
    pub store: SqliteFeedbackStore,
    pub profiles: Arc<ProfileDirectory>,
    /// Serve demo reviewers for boards without feedback, without `?demo=true`
    pub demo_mode: bool,
}

impl AppState {
    pub fn new(db: SqlitePool, profile_cache_ttl: Duration, demo_mode: bool) -> Self {
        let store = SqliteFeedbackStore::new(db);
        let profiles = Arc::new(ProfileDirectory::new(store.clone(), profile_cache_ttl));
        Self {
            store,
            profiles,
            demo_mode,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let boards = Router::new()
        .route("/api/boards/:board_id/feedback", get(api::get_board_feedback))
        .route("/api/boards/:board_id/stats", get(api::get_board_stats))
        .route(
            "/api/boards/:board_id/sections/:section_id/items",
            get(api::get_section_items),
        );

    let public = Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes());

    Router::new()
        .merge(boards)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
