//! Pure derivations over the static record list: filter choices, ordering,
//! filtering and the group keys that survive filtering.
//!
//! Every function here takes the records plus explicit parameters and returns
//! a fresh result; nothing is cached and no record is mutated.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{PaperRecord, VenueType};

/// Display name of the synthetic first-author filter.
pub const FIRST_AUTHOR_LABEL: &str = "First Author Papers";

/// Dimension used to partition the list into sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    #[default]
    VenueType,
    Year,
}

impl GroupBy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VenueType => "venue-type",
            Self::Year => "year",
        }
    }
}

impl std::str::FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "venue-type" | "venue_type" | "venue" => Ok(Self::VenueType),
            "year" => Ok(Self::Year),
            other => Err(format!("unknown grouping: {}", other)),
        }
    }
}

/// Where the synthetic first-author choice sits in the filter choice list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoicePosition {
    First,
    #[default]
    Last,
}

impl std::str::FromStr for ChoicePosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            other => Err(format!("unknown choice position: {}", other)),
        }
    }
}

/// One toggle in the filter menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterChoice {
    Venue(VenueType),
    FirstAuthorOnly,
}

impl FilterChoice {
    pub fn label(self) -> &'static str {
        match self {
            Self::Venue(v) => v.as_str(),
            Self::FirstAuthorOnly => FIRST_AUTHOR_LABEL,
        }
    }
}

impl fmt::Display for FilterChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The section a record belongs to under a given [`GroupBy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Venue(VenueType),
    Year(i32),
}

impl GroupKey {
    pub fn of(record: &PaperRecord, group_by: GroupBy) -> Self {
        match group_by {
            GroupBy::VenueType => Self::Venue(record.venue_type),
            GroupBy::Year => Self::Year(record.published_year),
        }
    }

    /// Build a key from loosely supplied parts. Exactly one part must be set;
    /// anything else is logged and yields `None`.
    pub fn from_parts(year: Option<i32>, venue: Option<VenueType>) -> Option<Self> {
        match (year, venue) {
            (Some(y), None) => Some(Self::Year(y)),
            (None, Some(v)) => Some(Self::Venue(v)),
            (y, v) => {
                tracing::warn!(
                    year = ?y,
                    venue = ?v,
                    "single-group render needs exactly one of year or venue type"
                );
                None
            }
        }
    }

    pub fn matches(self, record: &PaperRecord) -> bool {
        match self {
            Self::Venue(v) => record.venue_type == v,
            Self::Year(y) => record.published_year == y,
        }
    }

    pub fn label(self) -> String {
        match self {
            Self::Venue(v) => v.as_str().to_string(),
            Self::Year(y) => y.to_string(),
        }
    }
}

/// Per-choice inclusion toggles. A choice with no entry counts as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InclusionFlags {
    flags: BTreeMap<FilterChoice, bool>,
}

impl InclusionFlags {
    /// Every venue choice on, first-author-only off.
    pub fn all_venues(choices: &[FilterChoice]) -> Self {
        let flags = choices
            .iter()
            .map(|&c| (c, matches!(c, FilterChoice::Venue(_))))
            .collect();
        Self { flags }
    }

    pub fn is_set(&self, choice: FilterChoice) -> bool {
        self.flags.get(&choice).copied().unwrap_or(false)
    }

    pub fn set(&mut self, choice: FilterChoice, on: bool) {
        self.flags.insert(choice, on);
    }

    pub fn toggle(&mut self, choice: FilterChoice) {
        let on = self.is_set(choice);
        self.flags.insert(choice, !on);
    }

    pub fn first_author_only(&self) -> bool {
        self.is_set(FilterChoice::FirstAuthorOnly)
    }
}

/// Rank of a venue type in the filter menu: alphabetical by display name.
fn venue_rank(v: VenueType) -> u8 {
    match v {
        VenueType::Conference => 0,
        VenueType::Journal => 1,
        VenueType::Preprint => 2,
        VenueType::Talk => 3,
        VenueType::Thesis => 4,
        VenueType::Workshop => 5,
    }
}

/// Venue types present in `records`, alphabetically, plus the first-author choice.
pub fn distinct_filter_choices(
    records: &[PaperRecord],
    position: ChoicePosition,
) -> Vec<FilterChoice> {
    let present: BTreeSet<(u8, VenueType)> = records
        .iter()
        .map(|r| (venue_rank(r.venue_type), r.venue_type))
        .collect();
    let venues = present.into_iter().map(|(_, v)| FilterChoice::Venue(v));

    let mut choices = Vec::with_capacity(VenueType::all().len() + 1);
    if position == ChoicePosition::First {
        choices.push(FilterChoice::FirstAuthorOnly);
    }
    choices.extend(venues);
    if position == ChoicePosition::Last {
        choices.push(FilterChoice::FirstAuthorOnly);
    }
    choices
}

/// Comparator for the default (newest first) order.
///
/// Venue grouping: venue rank, then newest first. Year grouping: newest
/// first, then venue rank. Title breaks any remaining tie.
fn newest_first(a: &PaperRecord, b: &PaperRecord, group_by: GroupBy) -> Ordering {
    let by_date = b.published().cmp(&a.published());
    let by_venue = venue_rank(a.venue_type).cmp(&venue_rank(b.venue_type));
    let primary = match group_by {
        GroupBy::VenueType => by_venue.then(by_date),
        GroupBy::Year => by_date.then(by_venue),
    };
    primary.then_with(|| a.title.cmp(&b.title))
}

fn record_order(a: &PaperRecord, b: &PaperRecord, group_by: GroupBy, descending: bool) -> Ordering {
    if descending {
        return newest_first(a, b, group_by);
    }
    match group_by {
        // Sections keep their menu order; only the inside of each flips.
        GroupBy::VenueType => venue_rank(a.venue_type)
            .cmp(&venue_rank(b.venue_type))
            .then_with(|| newest_first(a, b, group_by).reverse()),
        GroupBy::Year => newest_first(a, b, group_by).reverse(),
    }
}

/// Sort records for display. The sort is stable and depends only on record
/// content, so re-sorting the output is a no-op.
pub fn order_records<'a, I>(records: I, group_by: GroupBy, descending: bool) -> Vec<&'a PaperRecord>
where
    I: IntoIterator<Item = &'a PaperRecord>,
{
    let mut ordered: Vec<&PaperRecord> = records.into_iter().collect();
    ordered.sort_by(|a, b| record_order(a, b, group_by, descending));
    ordered
}

/// Keep records whose venue flag is set and, when first-author-only is on,
/// whose first authors include `owner`. Relative order is preserved.
pub fn filter_records<'a>(
    ordered: &[&'a PaperRecord],
    flags: &InclusionFlags,
    owner: &str,
) -> Vec<&'a PaperRecord> {
    let first_author_only = flags.first_author_only();
    ordered
        .iter()
        .copied()
        .filter(|r| flags.is_set(FilterChoice::Venue(r.venue_type)))
        .filter(|r| !first_author_only || r.is_first_author(owner))
        .collect()
}

/// Group keys that occur in `filtered`: venue types in menu order, years in
/// order of first appearance.
pub fn distinct_group_keys_present(filtered: &[&PaperRecord], group_by: GroupBy) -> Vec<GroupKey> {
    match group_by {
        GroupBy::VenueType => {
            let present: BTreeSet<(u8, VenueType)> = filtered
                .iter()
                .map(|r| (venue_rank(r.venue_type), r.venue_type))
                .collect();
            present.into_iter().map(|(_, v)| GroupKey::Venue(v)).collect()
        }
        GroupBy::Year => {
            let mut keys = Vec::new();
            for r in filtered {
                let key = GroupKey::Year(r.published_year);
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
            keys
        }
    }
}

/// Records of one section, or `None` when the section would be empty.
pub fn section_records<'a>(filtered: &[&'a PaperRecord], key: GroupKey) -> Option<Vec<&'a PaperRecord>> {
    let records: Vec<&PaperRecord> = filtered.iter().copied().filter(|r| key.matches(r)).collect();
    if records.is_empty() {
        None
    } else {
        Some(records)
    }
}
