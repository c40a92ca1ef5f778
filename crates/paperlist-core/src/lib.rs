//! Data model and derivation pipeline for a personal publication list.
//!
//! Records are loaded once from a JSON asset ([`load`]), then every view of
//! them is recomputed from a [`view::ViewState`] by the pure functions in
//! [`pipeline`]. Nothing here renders; see `paperlist-reporting`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config_file;
pub mod load;
pub mod pipeline;
pub mod view;

// Re-export for convenience
pub use load::{load_records, parse_records};
pub use pipeline::{
    ChoicePosition, FilterChoice, GroupBy, GroupKey, InclusionFlags, distinct_filter_choices,
    distinct_group_keys_present, filter_records, order_records, section_records,
};
pub use view::{DerivedView, Section, ViewAction, ViewController, ViewState, derive_view};

#[derive(Error, Debug)]
pub enum PaperListError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid publication data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
}

/// Category of publication outlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VenueType {
    Conference,
    Workshop,
    Journal,
    Preprint,
    Thesis,
    Talk,
}

impl VenueType {
    pub fn all() -> &'static [VenueType] {
        &[
            VenueType::Conference,
            VenueType::Workshop,
            VenueType::Journal,
            VenueType::Preprint,
            VenueType::Thesis,
            VenueType::Talk,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Conference => "Conference",
            Self::Workshop => "Workshop",
            Self::Journal => "Journal",
            Self::Preprint => "Preprint",
            Self::Thesis => "Thesis",
            Self::Talk => "Talk",
        }
    }
}

impl fmt::Display for VenueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VenueType {
    type Err = String;

    /// Case-insensitive, so CLI values like `journal` work.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        VenueType::all()
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown venue type: {}", s))
    }
}

/// Links to the materials accompanying a paper. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arxiv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slide: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_transcript: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_video_transcript: Option<String>,
}

/// One entry of the publication list, as stored in the data asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperRecord {
    pub title: String,
    pub author_names: Vec<String>,
    /// Authors credited as first author. More than one means equal contribution.
    #[serde(default)]
    pub first_authors: Vec<String>,
    pub venue_name: String,
    pub venue_type: VenueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_oral_presentation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub award_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptance_count: Option<u32>,
    pub published_year: i32,
    pub published_month: u32,
    #[serde(default)]
    pub urls: MaterialLinks,
}

impl PaperRecord {
    /// Whether `owner` is credited as a first author. An empty owner matches nobody.
    pub fn is_first_author(&self, owner: &str) -> bool {
        let owner = owner.trim();
        !owner.is_empty() && self.first_authors.iter().any(|a| a.trim() == owner)
    }

    /// Whether more than one author shares first authorship.
    pub fn has_equal_contribution(&self) -> bool {
        self.first_authors.len() > 1
    }

    pub fn is_oral(&self) -> bool {
        self.is_oral_presentation.unwrap_or(false)
    }

    /// Year and month as one composite key.
    pub fn published(&self) -> (i32, u32) {
        (self.published_year, self.published_month)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn paper(title: &str, venue_type: VenueType, year: i32, month: u32) -> PaperRecord {
        PaperRecord {
            title: title.to_string(),
            author_names: vec!["Jane Roe".to_string(), "John Doe".to_string()],
            first_authors: vec!["Jane Roe".to_string()],
            venue_name: format!("{} venue", venue_type),
            venue_type,
            is_oral_presentation: None,
            award_info: None,
            submission_count: None,
            acceptance_count: None,
            published_year: year,
            published_month: month,
            urls: MaterialLinks::default(),
        }
    }
}
