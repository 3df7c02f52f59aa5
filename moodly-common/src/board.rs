//! Board and section descriptors
//!
//! Only what the feedback layer needs: which sections a board has, in which
//! order, and what kind of elements they hold.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Kind of content held by a board section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Image gallery; items are image URLs
    ImageGallery,
    /// Color palettes; items are palette ids
    ColorPalette,
    /// Typography samples; items are font ids
    Typography,
    /// Link collection
    Links,
    /// Free text blocks
    Text,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::ImageGallery => "image_gallery",
            SectionKind::ColorPalette => "color_palette",
            SectionKind::Typography => "typography",
            SectionKind::Links => "links",
            SectionKind::Text => "text",
        }
    }

    /// All kinds, in the order the board editor offers them
    pub fn all() -> [SectionKind; 5] {
        [
            SectionKind::ImageGallery,
            SectionKind::ColorPalette,
            SectionKind::Typography,
            SectionKind::Links,
            SectionKind::Text,
        ]
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Older boards stored the editor's component names
        match s {
            "image_gallery" | "images" | "gallery" => Ok(SectionKind::ImageGallery),
            "color_palette" | "palette" | "colors" => Ok(SectionKind::ColorPalette),
            "typography" | "fonts" => Ok(SectionKind::Typography),
            "links" => Ok(SectionKind::Links),
            "text" => Ok(SectionKind::Text),
            other => Err(Error::InvalidInput(format!("Unknown section kind: {}", other))),
        }
    }
}

/// One section of a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSection {
    pub id: String,
    pub kind: SectionKind,
    pub title: String,
    /// Display position, ascending
    pub position: i64,
}
