//! HTTP API handlers for moodly-fr

pub mod buildinfo;
pub mod error;
pub mod feedback;
pub mod health;
pub mod items;
pub mod stats;

pub use buildinfo::get_build_info;
pub use error::ApiError;
pub use feedback::get_board_feedback;
pub use health::health_routes;
pub use items::get_section_items;
pub use stats::get_board_stats;
