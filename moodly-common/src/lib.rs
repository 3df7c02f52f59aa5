//! # Moodly Common Library
//!
//! Shared code for Moodly services including:
//! - Reviewer feedback model, parsing, normalization and aggregation
//! - Board section descriptors
//! - Database schema and the SQLite feedback store
//! - Configuration loading
//! - TTL cache and seeded pseudo-random utilities

pub mod board;
pub mod cache;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod feedback;
pub mod seeded;
pub mod time;

pub use cache::TtlCache;
pub use error::{Error, Result};
pub use seeded::seeded_random;
