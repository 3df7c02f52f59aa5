//! Feedback store adapter
//!
//! Turns raw stored feedback rows into [`ReviewerFeedback`]. Parsing is
//! fail-soft: a record that cannot be parsed is logged and skipped, and the
//! rest of the board still loads. Failures of the store itself are not
//! swallowed, because an unreachable store is not an empty board.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

use super::model::{ReviewerFeedback, SectionFeedback};
use crate::seeded::seeded_pick;
use crate::time::{deserialize_flexible_opt, now, Timestamp};
use crate::{Error, Result};

/// Display name used when a record carries none
pub const ANONYMOUS_REVIEWER: &str = "Anonymous Reviewer";

/// Avatar background colors; a reviewer's color is picked from their id
const AVATAR_BACKGROUNDS: [&str; 8] = [
    "F87171", "FB923C", "FBBF24", "34D399", "22D3EE", "60A5FA", "A78BFA", "F472B6",
];

/// One stored feedback row, as the persistence layer hands it over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFeedbackRecord {
    /// Board the row is filed under
    pub board_id: String,
    /// Reviewer column of the row, if the store keeps one
    pub reviewer_id: Option<String>,
    /// JSON payload exactly as written by the submission UI
    pub payload: String,
}

/// Persistence seam: yields every stored record filed under a board
#[async_trait]
pub trait FeedbackSource: Send + Sync {
    async fn raw_records(&self, board_id: &str) -> Result<Vec<RawFeedbackRecord>>;
}

/// Why a single record was left out of a board's feedback
#[derive(Error, Debug)]
pub enum RecordRejection {
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("payload has no responses")]
    MissingResponses,

    #[error("payload structure invalid: {0}")]
    InvalidStructure(serde_json::Error),

    #[error("record belongs to board {found}, not {expected}")]
    BoardMismatch { expected: String, found: String },

    #[error("record has no reviewer id")]
    MissingReviewerId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredPayload {
    #[serde(default)]
    board_id: Option<String>,
    #[serde(default)]
    reviewer_id: Option<String>,
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default)]
    reviewer_name: Option<String>,
    #[serde(default)]
    client_name: Option<String>,
    #[serde(default)]
    reviewer_avatar: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flexible_opt")]
    last_updated: Option<Timestamp>,
    responses: BTreeMap<String, SectionFeedback>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse one stored record for `board_id`
///
/// `read_at` substitutes for a missing `lastUpdated`.
pub fn parse_record(
    board_id: &str,
    record: &RawFeedbackRecord,
    read_at: Timestamp,
) -> std::result::Result<ReviewerFeedback, RecordRejection> {
    let value: serde_json::Value =
        serde_json::from_str(&record.payload).map_err(RecordRejection::InvalidJson)?;

    let object = value.as_object().ok_or(RecordRejection::NotAnObject)?;
    if object.get("responses").map_or(true, serde_json::Value::is_null) {
        return Err(RecordRejection::MissingResponses);
    }

    let stored: StoredPayload =
        serde_json::from_value(value).map_err(RecordRejection::InvalidStructure)?;

    let record_board = non_blank(stored.board_id).unwrap_or_else(|| record.board_id.clone());
    if record_board != board_id {
        return Err(RecordRejection::BoardMismatch {
            expected: board_id.to_string(),
            found: record_board,
        });
    }

    let reviewer_id = non_blank(stored.reviewer_id)
        .or_else(|| non_blank(stored.client_id))
        .or_else(|| non_blank(record.reviewer_id.clone()))
        .ok_or(RecordRejection::MissingReviewerId)?;

    let reviewer_name = non_blank(stored.reviewer_name)
        .or_else(|| non_blank(stored.client_name))
        .unwrap_or_else(|| ANONYMOUS_REVIEWER.to_string());

    let reviewer_avatar = non_blank(stored.reviewer_avatar)
        .unwrap_or_else(|| avatar_uri(&reviewer_id, &reviewer_name));

    Ok(ReviewerFeedback {
        reviewer_id,
        reviewer_name,
        reviewer_avatar,
        last_updated: stored.last_updated.unwrap_or(read_at),
        responses: stored.responses,
    })
}

/// Parse every record for `board_id`, skipping the ones that do not parse
///
/// When the store holds more than one record for the same reviewer, the most
/// recently updated one is kept. Output order is by reviewer id.
pub fn parse_records(board_id: &str, records: &[RawFeedbackRecord]) -> Vec<ReviewerFeedback> {
    let read_at = now();
    let mut by_reviewer: BTreeMap<String, ReviewerFeedback> = BTreeMap::new();
    let mut skipped = 0usize;

    for record in records {
        match parse_record(board_id, record, read_at) {
            Ok(feedback) => match by_reviewer.entry(feedback.reviewer_id.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(feedback);
                }
                Entry::Occupied(mut slot) => {
                    if feedback.last_updated > slot.get().last_updated {
                        slot.insert(feedback);
                    }
                }
            },
            Err(RecordRejection::BoardMismatch { expected, found }) => {
                skipped += 1;
                warn!(board_id = %expected, record_board = %found, "Excluding feedback record filed under another board");
            }
            Err(reason) => {
                skipped += 1;
                warn!(board_id, reviewer = ?record.reviewer_id, "Skipping malformed feedback record: {}", reason);
            }
        }
    }

    debug!(
        board_id,
        parsed = by_reviewer.len(),
        skipped,
        "Parsed feedback records"
    );

    by_reviewer.into_values().collect()
}

/// Read and parse all reviewer feedback for a board
///
/// Store errors propagate unchanged; record-level problems never do.
pub async fn load_board_feedback<S>(source: &S, board_id: &str) -> Result<Vec<ReviewerFeedback>>
where
    S: FeedbackSource + ?Sized,
{
    if board_id.trim().is_empty() {
        return Err(Error::InvalidInput("board id must not be empty".to_string()));
    }

    let records = source.raw_records(board_id).await?;
    Ok(parse_records(board_id, &records))
}

/// Up to two uppercase initials from a display name
pub fn initials(display_name: &str) -> String {
    let initials: String = display_name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();

    if initials.is_empty() {
        "?".to_string()
    } else {
        initials
    }
}

/// Stable avatar URI for a reviewer without one
///
/// The background color depends only on the reviewer id, so a reviewer keeps
/// the same color across reloads and renames.
pub fn avatar_uri(reviewer_id: &str, display_name: &str) -> String {
    let background = seeded_pick(reviewer_id, &AVATAR_BACKGROUNDS).copied().unwrap_or("9CA3AF");
    format!(
        "https://ui-avatars.com/api/?name={}&background={}&color=ffffff",
        urlencoding::encode(&initials(display_name)),
        background
    )
}
