//! Feedback aggregation
//!
//! Summary counts for dashboards. Always recomputed from the reviewers passed
//! in; nothing is cached or persisted here.

use serde::Serialize;
use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use super::model::{Reaction, ReviewerFeedback, SectionFeedback};
use super::normalizer::{all_referenced_item_ids, resolve_reaction};
use crate::time::Timestamp;

/// Reaction and comment totals over a set of reviewers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackStats {
    pub total_reactions: u64,
    pub positive_reactions: u64,
    pub negative_reactions: u64,
    pub neutral_reactions: u64,
    pub total_comments: u64,
    /// Only sections with at least one comment appear
    pub comments_by_section: BTreeMap<String, u64>,
}

impl FeedbackStats {
    fn record_reaction(&mut self, reaction: Reaction) {
        match reaction {
            Reaction::Positive => self.positive_reactions += 1,
            Reaction::Negative => self.negative_reactions += 1,
            Reaction::Neutral => self.neutral_reactions += 1,
        }
        self.total_reactions += 1;
    }

    fn record_section(&mut self, section_id: &str, section: &SectionFeedback) {
        for item_id in all_referenced_item_ids(section) {
            self.record_reaction(resolve_reaction(section, &item_id));
        }

        let comments = section.comment_count() as u64;
        if comments > 0 {
            self.total_comments += comments;
            *self.comments_by_section.entry(section_id.to_string()).or_insert(0) += comments;
        }
    }
}

impl AddAssign for FeedbackStats {
    fn add_assign(&mut self, other: Self) {
        self.total_reactions += other.total_reactions;
        self.positive_reactions += other.positive_reactions;
        self.negative_reactions += other.negative_reactions;
        self.neutral_reactions += other.neutral_reactions;
        self.total_comments += other.total_comments;
        for (section_id, count) in other.comments_by_section {
            *self.comments_by_section.entry(section_id).or_insert(0) += count;
        }
    }
}

impl Add for FeedbackStats {
    type Output = FeedbackStats;

    fn add(mut self, other: Self) -> Self::Output {
        self += other;
        self
    }
}

impl Sum for FeedbackStats {
    fn sum<I: Iterator<Item = FeedbackStats>>(iter: I) -> Self {
        iter.fold(FeedbackStats::default(), Add::add)
    }
}

/// Fold every section of every reviewer into one set of totals
///
/// Each item with any feedback counts once per reviewer, under the reaction
/// [`resolve_reaction`] assigns it (comment-only items count as neutral).
pub fn compute_stats(reviewers: &[ReviewerFeedback]) -> FeedbackStats {
    let mut stats = FeedbackStats::default();
    for reviewer in reviewers {
        for (section_id, section) in &reviewer.responses {
            stats.record_section(section_id, section);
        }
    }
    stats
}

/// Per-reviewer counts for the reviewer list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerSummary {
    pub reviewer_id: String,
    pub reviewer_name: String,
    pub reviewer_avatar: String,
    pub last_updated: Timestamp,
    /// Sections with any feedback from this reviewer
    pub sections_reviewed: usize,
    pub positive_reactions: u64,
    pub negative_reactions: u64,
    pub neutral_reactions: u64,
    pub comments: u64,
}

pub fn summarize_reviewer(reviewer: &ReviewerFeedback) -> ReviewerSummary {
    let stats = compute_stats(std::slice::from_ref(reviewer));
    ReviewerSummary {
        reviewer_id: reviewer.reviewer_id.clone(),
        reviewer_name: reviewer.reviewer_name.clone(),
        reviewer_avatar: reviewer.reviewer_avatar.clone(),
        last_updated: reviewer.last_updated,
        sections_reviewed: reviewer.responses.values().filter(|s| !s.is_empty()).count(),
        positive_reactions: stats.positive_reactions,
        negative_reactions: stats.negative_reactions,
        neutral_reactions: stats.neutral_reactions,
        comments: stats.total_comments,
    }
}

/// Everything the board feedback dashboard shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardFeedbackSummary {
    pub board_id: String,
    pub reviewer_count: usize,
    pub stats: FeedbackStats,
    pub reviewers: Vec<ReviewerSummary>,
}

pub fn board_summary(board_id: &str, reviewers: &[ReviewerFeedback]) -> BoardFeedbackSummary {
    BoardFeedbackSummary {
        board_id: board_id.to_string(),
        reviewer_count: reviewers.len(),
        stats: compute_stats(reviewers),
        reviewers: reviewers.iter().map(summarize_reviewer).collect(),
    }
}
