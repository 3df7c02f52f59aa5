//! Deterministic demo feedback
//!
//! Boards without real reviews can still show the feedback views populated.
//! Every value is derived from [`seeded_random`] over the board id, reviewer
//! index and section id, so a board renders the same demo reviewers on every
//! load without storing them.

use chrono::{Duration, TimeZone, Utc};

use super::adapter::avatar_uri;
use super::model::{Reaction, ReviewerFeedback, SectionFeedback};
use crate::board::{BoardSection, SectionKind};
use crate::seeded::{seeded_pick, seeded_random, seeded_range};
use crate::time::Timestamp;

const DEMO_NAMES: [&str; 10] = [
    "Alex Morgan",
    "Sam Rivera",
    "Jordan Lee",
    "Taylor Kim",
    "Casey Novak",
    "Riley Chen",
    "Avery Patel",
    "Quinn Okafor",
    "Drew Santos",
    "Jamie Fischer",
];

const DEMO_COMMENTS: [&str; 8] = [
    "Love this direction.",
    "Feels a bit too busy for the brand.",
    "Could we try a warmer variant?",
    "This one really captures the mood.",
    "Not sure this fits with the rest.",
    "Great contrast here.",
    "Maybe a lighter weight?",
    "Let's keep this one.",
];

/// Most demo items per section
const MAX_DEMO_ITEMS: i64 = 3;

/// Demo timestamps fall within 30 days after this instant
fn demo_epoch() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

fn demo_reaction(seed: &str) -> Reaction {
    let roll = seeded_random(seed);
    if roll < 0.55 {
        Reaction::Positive
    } else if roll < 0.8 {
        Reaction::Negative
    } else {
        Reaction::Neutral
    }
}

fn demo_time(seed: &str) -> Timestamp {
    demo_epoch() + Duration::minutes(seeded_range(seed, 0, 30 * 24 * 60))
}

fn demo_section(reviewer_seed: &str, section: &BoardSection) -> SectionFeedback {
    let seed = format!("{}:{}", reviewer_seed, section.id);
    let item_count = seeded_range(&format!("{}:items", seed), 1, MAX_DEMO_ITEMS);
    let mut feedback = SectionFeedback::default();

    for n in 0..item_count {
        let item_id = format!("{}-item-{}", section.id, n + 1);
        let item_seed = format!("{}:{}", seed, item_id);
        let reaction = demo_reaction(&format!("{}:reaction", item_seed));
        let at = demo_time(&format!("{}:at", item_seed));
        let comment = (seeded_random(&format!("{}:commented", item_seed)) < 0.4)
            .then(|| seeded_pick(&format!("{}:comment", item_seed), &DEMO_COMMENTS))
            .flatten();

        feedback = match section.kind {
            SectionKind::ColorPalette => {
                let fb = feedback.with_palette_feedback(&item_id, reaction, at);
                match comment {
                    Some(text) => fb.with_palette_comment(&item_id, text, at),
                    None => fb,
                }
            }
            _ => {
                let fb = feedback.with_item(&item_id, reaction, at);
                match comment {
                    Some(text) => fb.with_comment(&item_id, text, at),
                    None => fb,
                }
            }
        };
    }

    feedback
}

/// Generate `count` demo reviewers for a board's sections
pub fn mock_reviewers(board_id: &str, sections: &[BoardSection], count: usize) -> Vec<ReviewerFeedback> {
    (0..count)
        .map(|index| {
            let seed = format!("{}:reviewer:{}", board_id, index);
            let reviewer_id = format!("demo-{}-{}", board_id, index + 1);
            let reviewer_name = seeded_pick(&format!("{}:name", seed), &DEMO_NAMES)
                .copied()
                .unwrap_or("Demo Reviewer")
                .to_string();

            ReviewerFeedback {
                reviewer_avatar: avatar_uri(&reviewer_id, &reviewer_name),
                reviewer_id,
                reviewer_name,
                last_updated: demo_time(&format!("{}:updated", seed)),
                responses: sections
                    .iter()
                    .map(|section| (section.id.clone(), demo_section(&seed, section)))
                    .collect(),
            }
        })
        .collect()
}
