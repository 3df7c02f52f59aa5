//! Feedback data model
//!
//! Field names follow the stored JSON (camelCase). Several generations of
//! the submission UI wrote slightly different shapes; the serde attributes
//! here accept all of them and the normalizer reconciles the rest.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::time::{deserialize_flexible, Timestamp};

/// A reviewer's reaction to one board element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Reaction {
    /// Decode a stored reaction string; anything unrecognized is neutral
    pub fn from_lossy(value: &str) -> Self {
        Self::recognize(value).unwrap_or_default()
    }

    /// Decode a stored reaction string, `None` if it is not one of the three values
    pub fn recognize(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "positive" => Some(Reaction::Positive),
            "negative" => Some(Reaction::Negative),
            "neutral" => Some(Reaction::Neutral),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Reaction::Positive => "positive",
            Reaction::Negative => "negative",
            Reaction::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Reaction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Reaction::from_lossy).unwrap_or_default())
    }
}

/// Treat an explicit JSON `null` like an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// First alias holding a recognized reaction, else neutral
fn first_recognized(aliases: [Option<&str>; 2]) -> Reaction {
    aliases
        .into_iter()
        .flatten()
        .find_map(Reaction::recognize)
        .unwrap_or_default()
}

/// Legacy image map; `null` or non-string values are kept as `"neutral"`
fn lossy_image_map<'de, D>(deserializer: D) -> Result<Option<BTreeMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw.map(|images| {
        images
            .into_iter()
            .map(|(url, value)| {
                let reaction = match value {
                    serde_json::Value::String(s) => s,
                    _ => Reaction::Neutral.as_str().to_string(),
                };
                (url, reaction)
            })
            .collect()
    }))
}

/// Generic per-item reaction (links, fonts, text, and newer image records)
///
/// `kind` (stored as `type`) and `reaction` are aliases from two historical
/// schemas. They are always equal on a constructed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredFeedbackItem")]
pub struct FeedbackItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: Reaction,
    pub reaction: Reaction,
    pub timestamp: Timestamp,
}

impl FeedbackItem {
    pub fn new(id: impl Into<String>, reaction: Reaction, timestamp: Timestamp) -> Self {
        Self {
            id: id.into(),
            kind: reaction,
            reaction,
            timestamp,
        }
    }

    /// Change the reaction, keeping both aliases in sync
    pub fn set_reaction(&mut self, reaction: Reaction) {
        self.kind = reaction;
        self.reaction = reaction;
    }
}

#[derive(Deserialize)]
struct StoredFeedbackItem {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    reaction: Option<String>,
    #[serde(deserialize_with = "deserialize_flexible")]
    timestamp: Timestamp,
}

impl From<StoredFeedbackItem> for FeedbackItem {
    fn from(stored: StoredFeedbackItem) -> Self {
        // `reaction` is the newer field and wins on disagreement
        let reaction = first_recognized([stored.reaction.as_deref(), stored.kind.as_deref()]);
        FeedbackItem::new(stored.id.unwrap_or_default(), reaction, stored.timestamp)
    }
}

/// Comment attached to a generic item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemComment {
    pub item_id: String,
    pub comment: String,
    #[serde(deserialize_with = "deserialize_flexible")]
    pub timestamp: Timestamp,
}

/// Palette-specific reaction record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredPaletteFeedback")]
pub struct PaletteFeedback {
    pub palette_id: String,
    #[serde(rename = "type")]
    pub kind: Reaction,
    pub timestamp: Timestamp,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredPaletteFeedback {
    palette_id: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    reaction: Option<String>,
    #[serde(deserialize_with = "deserialize_flexible")]
    timestamp: Timestamp,
}

impl From<StoredPaletteFeedback> for PaletteFeedback {
    fn from(stored: StoredPaletteFeedback) -> Self {
        Self {
            palette_id: stored.palette_id,
            kind: first_recognized([stored.kind.as_deref(), stored.reaction.as_deref()]),
            timestamp: stored.timestamp,
        }
    }
}

/// Palette-specific comment record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteComment {
    pub palette_id: String,
    pub comment: String,
    #[serde(deserialize_with = "deserialize_flexible")]
    pub timestamp: Timestamp,
}

/// One reviewer's feedback for one board section
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredSectionFeedback")]
pub struct SectionFeedback {
    pub feedback_items: BTreeMap<String, FeedbackItem>,
    /// Display order is insertion order
    pub comments: Vec<ItemComment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette_feedbacks: Option<Vec<PaletteFeedback>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette_comments: Option<Vec<PaletteComment>>,
    /// Legacy flat image map: image URL -> reaction string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_feedback: Option<BTreeMap<String, String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSectionFeedback {
    #[serde(default, deserialize_with = "null_as_default")]
    feedback_items: BTreeMap<String, FeedbackItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    comments: Vec<ItemComment>,
    #[serde(default)]
    palette_feedbacks: Option<Vec<PaletteFeedback>>,
    #[serde(default)]
    palette_comments: Option<Vec<PaletteComment>>,
    #[serde(default, deserialize_with = "lossy_image_map")]
    image_feedback: Option<BTreeMap<String, String>>,
}

impl From<StoredSectionFeedback> for SectionFeedback {
    fn from(stored: StoredSectionFeedback) -> Self {
        let feedback_items = stored
            .feedback_items
            .into_iter()
            .map(|(key, mut item)| {
                // Older records keyed items by id without repeating it inside
                if item.id.is_empty() {
                    item.id = key.clone();
                }
                (key, item)
            })
            .collect();

        Self {
            feedback_items,
            comments: stored.comments,
            palette_feedbacks: stored.palette_feedbacks,
            palette_comments: stored.palette_comments,
            image_feedback: stored.image_feedback,
        }
    }
}

impl SectionFeedback {
    /// True when the reviewer left nothing at all in this section
    pub fn is_empty(&self) -> bool {
        self.feedback_items.is_empty()
            && self.comments.is_empty()
            && self.palette_feedbacks.as_ref().map_or(true, Vec::is_empty)
            && self.palette_comments.as_ref().map_or(true, Vec::is_empty)
            && self.image_feedback.as_ref().map_or(true, BTreeMap::is_empty)
    }

    /// Number of comments across both comment shapes
    pub fn comment_count(&self) -> usize {
        self.comments.len() + self.palette_comments.as_ref().map_or(0, Vec::len)
    }

    pub fn with_item(mut self, id: &str, reaction: Reaction, timestamp: Timestamp) -> Self {
        self.feedback_items
            .insert(id.to_string(), FeedbackItem::new(id, reaction, timestamp));
        self
    }

    pub fn with_comment(mut self, item_id: &str, comment: &str, timestamp: Timestamp) -> Self {
        self.comments.push(ItemComment {
            item_id: item_id.to_string(),
            comment: comment.to_string(),
            timestamp,
        });
        self
    }

    pub fn with_palette_feedback(mut self, palette_id: &str, kind: Reaction, timestamp: Timestamp) -> Self {
        self.palette_feedbacks
            .get_or_insert_with(Vec::new)
            .push(PaletteFeedback {
                palette_id: palette_id.to_string(),
                kind,
                timestamp,
            });
        self
    }

    pub fn with_palette_comment(mut self, palette_id: &str, comment: &str, timestamp: Timestamp) -> Self {
        self.palette_comments
            .get_or_insert_with(Vec::new)
            .push(PaletteComment {
                palette_id: palette_id.to_string(),
                comment: comment.to_string(),
                timestamp,
            });
        self
    }

    pub fn with_image_reaction(mut self, image_url: &str, reaction: &str) -> Self {
        self.image_feedback
            .get_or_insert_with(BTreeMap::new)
            .insert(image_url.to_string(), reaction.to_string());
        self
    }
}

/// One reviewer's full feedback for one board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerFeedback {
    pub reviewer_id: String,
    pub reviewer_name: String,
    pub reviewer_avatar: String,
    #[serde(deserialize_with = "deserialize_flexible")]
    pub last_updated: Timestamp,
    /// Section id -> feedback
    pub responses: BTreeMap<String, SectionFeedback>,
}
