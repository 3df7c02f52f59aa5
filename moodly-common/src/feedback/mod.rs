//! Reviewer feedback: parsing, normalization and aggregation
//!
//! Raw stored records flow through three stages:
//! - [`adapter`] parses records into [`ReviewerFeedback`], skipping malformed ones
//! - [`normalizer`] resolves reactions and comments per item across every
//!   historical record shape
//! - [`aggregator`] folds reviewers into [`FeedbackStats`] and summaries
//!
//! All three stages are synchronous and side-effect free apart from the
//! store read in [`adapter::load_board_feedback`].

pub mod adapter;
pub mod aggregator;
pub mod mock;
pub mod model;
pub mod normalizer;

pub use adapter::{load_board_feedback, parse_records, FeedbackSource, RawFeedbackRecord, ANONYMOUS_REVIEWER};
pub use aggregator::{board_summary, compute_stats, BoardFeedbackSummary, FeedbackStats, ReviewerSummary};
pub use model::{
    FeedbackItem, ItemComment, PaletteComment, PaletteFeedback, Reaction, ReviewerFeedback, SectionFeedback,
};
pub use normalizer::{
    all_referenced_item_ids, canonical_items, comments_for_item, items_by_reviewer, normalize_for_board,
    resolve_reaction, section_or_empty, ItemCommentView, ItemFeedback, ReactionSource,
};
