//! Feedback normalization
//!
//! A section's stored shape depends on which generation of the submission UI
//! wrote it, even within one board. Every consumer resolves reactions through
//! [`resolve_reaction`], which applies one fixed precedence:
//!
//! 1. `feedbackItems[item_id]`
//! 2. first `paletteFeedbacks` entry with `paletteId == item_id`
//! 3. `imageFeedback[item_id]`
//! 4. `neutral`
//!
//! The precedence does not depend on the section kind.

use serde::Serialize;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::model::{Reaction, ReviewerFeedback, SectionFeedback};
use crate::board::BoardSection;
use crate::time::Timestamp;

/// Which stored shape supplied an item's reaction, with the reaction itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionSource {
    FeedbackItem(Reaction),
    PaletteFeedback(Reaction),
    ImageFeedback(Reaction),
}

/// Origin tag of a [`ReactionSource`], for serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionOrigin {
    FeedbackItem,
    PaletteFeedback,
    ImageFeedback,
}

impl ReactionSource {
    pub fn reaction(&self) -> Reaction {
        match *self {
            ReactionSource::FeedbackItem(r)
            | ReactionSource::PaletteFeedback(r)
            | ReactionSource::ImageFeedback(r) => r,
        }
    }

    pub fn origin(&self) -> ReactionOrigin {
        match self {
            ReactionSource::FeedbackItem(_) => ReactionOrigin::FeedbackItem,
            ReactionSource::PaletteFeedback(_) => ReactionOrigin::PaletteFeedback,
            ReactionSource::ImageFeedback(_) => ReactionOrigin::ImageFeedback,
        }
    }
}

/// Find the highest-precedence stored reaction for `item_id`, if any
pub fn reaction_source(section: &SectionFeedback, item_id: &str) -> Option<ReactionSource> {
    if let Some(item) = section.feedback_items.get(item_id) {
        return Some(ReactionSource::FeedbackItem(item.reaction));
    }

    if let Some(palette) = section
        .palette_feedbacks
        .as_deref()
        .and_then(|entries| entries.iter().find(|fb| fb.palette_id == item_id))
    {
        return Some(ReactionSource::PaletteFeedback(palette.kind));
    }

    section
        .image_feedback
        .as_ref()
        .and_then(|images| images.get(item_id))
        .map(|raw| ReactionSource::ImageFeedback(Reaction::from_lossy(raw)))
}

/// Resolve the reaction a reviewer gave `item_id`; `neutral` when nothing matches
pub fn resolve_reaction(section: &SectionFeedback, item_id: &str) -> Reaction {
    reaction_source(section, item_id)
        .map(|source| source.reaction())
        .unwrap_or(Reaction::Neutral)
}

/// A single comment as shown next to an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCommentView {
    pub comment: String,
    pub timestamp: Timestamp,
}

/// All comments on `item_id`: generic comments first, then palette comments
///
/// Relative order within each list is preserved. Repeated comments are
/// distinct entries and are not collapsed.
pub fn comments_for_item(section: &SectionFeedback, item_id: &str) -> Vec<ItemCommentView> {
    let generic = section
        .comments
        .iter()
        .filter(|c| c.item_id == item_id)
        .map(|c| ItemCommentView {
            comment: c.comment.clone(),
            timestamp: c.timestamp,
        });

    let palette = section
        .palette_comments
        .iter()
        .flatten()
        .filter(|c| c.palette_id == item_id)
        .map(|c| ItemCommentView {
            comment: c.comment.clone(),
            timestamp: c.timestamp,
        });

    generic.chain(palette).collect()
}

/// Every item id that has any feedback at all in this section
pub fn all_referenced_item_ids(section: &SectionFeedback) -> BTreeSet<String> {
    let mut ids: BTreeSet<String> = section.feedback_items.keys().cloned().collect();

    ids.extend(section.palette_feedbacks.iter().flatten().map(|fb| fb.palette_id.clone()));
    ids.extend(section.palette_comments.iter().flatten().map(|c| c.palette_id.clone()));
    ids.extend(section.image_feedback.iter().flat_map(|images| images.keys().cloned()));
    ids.extend(section.comments.iter().map(|c| c.item_id.clone()));

    ids
}

/// The reviewer's feedback for `section_id`, or an empty section if they left none
pub fn section_or_empty<'a>(reviewer: &'a ReviewerFeedback, section_id: &str) -> Cow<'a, SectionFeedback> {
    match reviewer.responses.get(section_id) {
        Some(section) => Cow::Borrowed(section),
        None => Cow::Owned(SectionFeedback::default()),
    }
}

/// Canonical per-item feedback, independent of the stored shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFeedback {
    pub item_id: String,
    pub reaction: Reaction,
    /// `None` when the item only has comments
    pub source: Option<ReactionOrigin>,
    pub comments: Vec<ItemCommentView>,
}

/// Fold every stored shape of a section into one entry per referenced item
pub fn canonical_items(section: &SectionFeedback) -> BTreeMap<String, ItemFeedback> {
    all_referenced_item_ids(section)
        .into_iter()
        .map(|item_id| {
            let source = reaction_source(section, &item_id);
            let item = ItemFeedback {
                reaction: source.map(|s| s.reaction()).unwrap_or(Reaction::Neutral),
                source: source.map(|s| s.origin()),
                comments: comments_for_item(section, &item_id),
                item_id: item_id.clone(),
            };
            (item_id, item)
        })
        .collect()
}

/// One reviewer's canonical feedback on one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerItemFeedback {
    pub reviewer_id: String,
    pub reviewer_name: String,
    pub reviewer_avatar: String,
    pub reaction: Reaction,
    pub comments: Vec<ItemCommentView>,
}

/// Group every reviewer's feedback in `section_id` by item id
///
/// Items nobody reacted to or commented on are absent. Reviewer order follows
/// the input order.
pub fn items_by_reviewer(
    reviewers: &[ReviewerFeedback],
    section_id: &str,
) -> BTreeMap<String, Vec<ReviewerItemFeedback>> {
    let mut grouped: BTreeMap<String, Vec<ReviewerItemFeedback>> = BTreeMap::new();

    for reviewer in reviewers {
        let section = section_or_empty(reviewer, section_id);
        for (item_id, item) in canonical_items(&section) {
            grouped.entry(item_id).or_default().push(ReviewerItemFeedback {
                reviewer_id: reviewer.reviewer_id.clone(),
                reviewer_name: reviewer.reviewer_name.clone(),
                reviewer_avatar: reviewer.reviewer_avatar.clone(),
                reaction: item.reaction,
                comments: item.comments,
            });
        }
    }

    grouped
}

/// Align reviewers with the board's current section list
///
/// Responses for sections no longer on the board are dropped; sections the
/// reviewer never touched get an empty entry. Reviewers come back most
/// recently updated first (ties broken by reviewer id) so output does not
/// depend on storage order.
pub fn normalize_for_board(reviewers: Vec<ReviewerFeedback>, sections: &[BoardSection]) -> Vec<ReviewerFeedback> {
    let section_ids: HashSet<&str> = sections.iter().map(|s| s.id.as_str()).collect();

    let mut normalized: Vec<ReviewerFeedback> = reviewers
        .into_iter()
        .map(|mut reviewer| {
            reviewer
                .responses
                .retain(|section_id, _| section_ids.contains(section_id.as_str()));
            for section in sections {
                reviewer.responses.entry(section.id.clone()).or_default();
            }
            reviewer
        })
        .collect();

    normalized.sort_by(|a, b| {
        b.last_updated
            .cmp(&a.last_updated)
            .then_with(|| a.reviewer_id.cmp(&b.reviewer_id))
    });
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::SectionKind;
    use chrono::{Duration, TimeZone, Utc};

    fn t(minute: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, minute, 0).unwrap()
    }

    fn reviewer(id: &str, updated: Timestamp, responses: Vec<(&str, SectionFeedback)>) -> ReviewerFeedback {
        ReviewerFeedback {
            reviewer_id: id.to_string(),
            reviewer_name: id.to_uppercase(),
            reviewer_avatar: format!("https://avatars.test/{}", id),
            last_updated: updated,
            responses: responses.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }

    fn section(id: &str, kind: SectionKind, position: i64) -> BoardSection {
        BoardSection {
            id: id.to_string(),
            kind,
            title: id.to_string(),
            position,
        }
    }

    #[test]
    fn test_feedback_items_take_precedence_over_palette() {
        let sf = SectionFeedback::default()
            .with_item("p1", Reaction::Positive, t(0))
            .with_palette_feedback("p1", Reaction::Negative, t(1));
        assert_eq!(resolve_reaction(&sf, "p1"), Reaction::Positive);
        assert_eq!(
            reaction_source(&sf, "p1"),
            Some(ReactionSource::FeedbackItem(Reaction::Positive))
        );
    }

    #[test]
    fn test_palette_takes_precedence_over_image_map() {
        let sf = SectionFeedback::default()
            .with_palette_feedback("x", Reaction::Negative, t(0))
            .with_image_reaction("x", "positive");
        assert_eq!(resolve_reaction(&sf, "x"), Reaction::Negative);
    }

    #[test]
    fn test_first_matching_palette_entry_wins() {
        let sf = SectionFeedback::default()
            .with_palette_feedback("p1", Reaction::Negative, t(0))
            .with_palette_feedback("p1", Reaction::Positive, t(5));
        assert_eq!(resolve_reaction(&sf, "p1"), Reaction::Negative);
    }

    #[test]
    fn test_image_map_reaction() {
        let sf = SectionFeedback::default().with_image_reaction("https://x/img.png", "negative");
        assert_eq!(resolve_reaction(&sf, "https://x/img.png"), Reaction::Negative);
        assert_eq!(
            reaction_source(&sf, "https://x/img.png").map(|s| s.origin()),
            Some(ReactionOrigin::ImageFeedback)
        );
    }

    #[test]
    fn test_unknown_image_reaction_string_is_neutral() {
        let sf = SectionFeedback::default().with_image_reaction("img", "heart-eyes");
        assert_eq!(resolve_reaction(&sf, "img"), Reaction::Neutral);
    }

    #[test]
    fn test_unreferenced_item_is_neutral() {
        let sf = SectionFeedback::default()
            .with_item("a", Reaction::Positive, t(0))
            .with_palette_feedback("b", Reaction::Negative, t(0))
            .with_image_reaction("c", "negative");
        assert_eq!(resolve_reaction(&sf, "zzz"), Reaction::Neutral);
        assert_eq!(reaction_source(&sf, "zzz"), None);
        assert_eq!(resolve_reaction(&SectionFeedback::default(), "a"), Reaction::Neutral);
    }

    #[test]
    fn test_comments_for_item_scenario() {
        let sf = SectionFeedback::default()
            .with_item("img1", Reaction::Positive, t(0))
            .with_comment("img1", "nice", t(1));

        assert_eq!(resolve_reaction(&sf, "img1"), Reaction::Positive);
        assert_eq!(
            comments_for_item(&sf, "img1"),
            vec![ItemCommentView {
                comment: "nice".into(),
                timestamp: t(1)
            }]
        );
    }

    #[test]
    fn test_comments_keep_order_and_duplicates() {
        let sf = SectionFeedback::default()
            .with_comment("a", "first", t(3))
            .with_comment("b", "other item", t(4))
            .with_comment("a", "second", t(1))
            .with_comment("a", "second", t(1));

        let comments: Vec<String> = comments_for_item(&sf, "a").into_iter().map(|c| c.comment).collect();
        assert_eq!(comments, vec!["first", "second", "second"]);
    }

    #[test]
    fn test_comments_include_palette_comments_after_generic() {
        let sf = SectionFeedback::default()
            .with_palette_comment("p1", "too muted", t(0))
            .with_comment("p1", "generic", t(9));
        let comments: Vec<String> = comments_for_item(&sf, "p1").into_iter().map(|c| c.comment).collect();
        assert_eq!(comments, vec!["generic", "too muted"]);
    }

    #[test]
    fn test_all_referenced_item_ids_scenario() {
        let sf = SectionFeedback::default()
            .with_item("a", Reaction::Positive, t(0))
            .with_palette_feedback("b", Reaction::Neutral, t(0))
            .with_comment("c", "hmm", t(0));
        let ids: Vec<String> = all_referenced_item_ids(&sf).into_iter().collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_all_referenced_item_ids_covers_every_shape() {
        let sf = SectionFeedback::default()
            .with_item("a", Reaction::Positive, t(0))
            .with_palette_feedback("b", Reaction::Neutral, t(0))
            .with_palette_comment("d", "x", t(0))
            .with_image_reaction("e", "positive")
            .with_comment("a", "dup id", t(0));
        let ids = all_referenced_item_ids(&sf);
        assert_eq!(ids.len(), 4);
        for id in ["a", "b", "d", "e"] {
            assert!(ids.contains(id));
        }
        assert!(all_referenced_item_ids(&SectionFeedback::default()).is_empty());
    }

    #[test]
    fn test_section_or_empty() {
        let r = reviewer("r1", t(0), vec![("s1", SectionFeedback::default().with_comment("a", "x", t(0)))]);
        assert_eq!(section_or_empty(&r, "s1").comments.len(), 1);

        let missing = section_or_empty(&r, "s2");
        assert!(matches!(missing, Cow::Owned(_)));
        assert!(missing.feedback_items.is_empty());
        assert!(missing.comments.is_empty());
    }

    #[test]
    fn test_canonical_items_merges_shapes() {
        let sf = SectionFeedback::default()
            .with_palette_feedback("p1", Reaction::Negative, t(0))
            .with_palette_comment("p1", "clashes", t(1))
            .with_comment("only-comment", "what is this?", t(2));

        let items = canonical_items(&sf);
        assert_eq!(items.len(), 2);

        let p1 = &items["p1"];
        assert_eq!(p1.reaction, Reaction::Negative);
        assert_eq!(p1.source, Some(ReactionOrigin::PaletteFeedback));
        assert_eq!(p1.comments.len(), 1);

        let orphan = &items["only-comment"];
        assert_eq!(orphan.reaction, Reaction::Neutral);
        assert_eq!(orphan.source, None);
        assert_eq!(orphan.comments[0].comment, "what is this?");
    }

    #[test]
    fn test_items_by_reviewer_groups_and_skips_silent_items() {
        let r1 = reviewer(
            "r1",
            t(0),
            vec![("s1", SectionFeedback::default().with_item("a", Reaction::Positive, t(0)))],
        );
        let r2 = reviewer(
            "r2",
            t(0),
            vec![(
                "s1",
                SectionFeedback::default()
                    .with_image_reaction("a", "negative")
                    .with_comment("b", "blurry", t(1)),
            )],
        );
        let r3 = reviewer("r3", t(0), vec![]);

        let grouped = items_by_reviewer(&[r1, r2, r3], "s1");
        assert_eq!(grouped.len(), 2);

        let a = &grouped["a"];
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].reviewer_id, "r1");
        assert_eq!(a[0].reaction, Reaction::Positive);
        assert_eq!(a[1].reaction, Reaction::Negative);

        let b = &grouped["b"];
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].reaction, Reaction::Neutral);
        assert_eq!(b[0].comments.len(), 1);
    }

    #[test]
    fn test_normalize_for_board_drops_dangling_and_fills_missing() {
        let sections = vec![
            section("s1", SectionKind::ImageGallery, 0),
            section("s2", SectionKind::ColorPalette, 1),
        ];
        let r = reviewer(
            "r1",
            t(0),
            vec![
                ("s1", SectionFeedback::default().with_item("a", Reaction::Positive, t(0))),
                ("deleted-section", SectionFeedback::default().with_comment("z", "gone", t(0))),
            ],
        );

        let normalized = normalize_for_board(vec![r], &sections);
        let responses = &normalized[0].responses;
        assert_eq!(responses.len(), 2);
        assert!(responses.contains_key("s1"));
        assert!(responses["s2"].is_empty());
        assert!(!responses.contains_key("deleted-section"));
    }

    #[test]
    fn test_normalize_for_board_orders_newest_first() {
        let old = reviewer("b-old", t(0), vec![]);
        let new = reviewer("a-new", t(0) + Duration::hours(1), vec![]);
        let tie = reviewer("a-old", t(0), vec![]);

        let ids: Vec<String> = normalize_for_board(vec![old, new, tie], &[])
            .into_iter()
            .map(|r| r.reviewer_id)
            .collect();
        assert_eq!(ids, vec!["a-new", "a-old", "b-old"]);
    }
}
