//! View state and the controller that re-derives the visible list from it.

use crate::pipeline::{self, ChoicePosition, FilterChoice, GroupBy, GroupKey, InclusionFlags};
use crate::PaperRecord;

/// Everything that decides what the list shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub group_by: GroupBy,
    pub sort_descending: bool,
    pub inclusion_flags: InclusionFlags,
}

impl ViewState {
    /// Grouped by venue type, newest first, every venue shown.
    pub fn new(choices: &[FilterChoice]) -> Self {
        Self {
            group_by: GroupBy::VenueType,
            sort_descending: true,
            inclusion_flags: InclusionFlags::all_venues(choices),
        }
    }
}

/// A user interaction with the list controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    ToggleChoice(FilterChoice),
    SetChoice(FilterChoice, bool),
    ToggleSort,
    SetSortDescending(bool),
    SetGroupBy(GroupBy),
    /// Turn every venue choice back on. Leaves first-author-only alone.
    IncludeAllVenues,
}

/// One rendered section: its header key and the records under it.
#[derive(Debug, Clone)]
pub struct Section<'a> {
    pub key: GroupKey,
    pub records: Vec<&'a PaperRecord>,
}

/// Result of running the pipeline for one state.
#[derive(Debug, Clone)]
pub struct DerivedView<'a> {
    pub group_by: GroupBy,
    pub sections: Vec<Section<'a>>,
}

impl<'a> DerivedView<'a> {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.sections.iter().map(|s| s.records.len()).sum()
    }

    /// Records in display order, across sections.
    pub fn records(&self) -> impl Iterator<Item = &'a PaperRecord> + '_ {
        self.sections.iter().flat_map(|s| s.records.iter().copied())
    }
}

/// Owns the static records and the current [`ViewState`].
#[derive(Debug, Clone)]
pub struct ViewController {
    records: Vec<PaperRecord>,
    choices: Vec<FilterChoice>,
    owner: String,
    state: ViewState,
}

impl ViewController {
    pub fn new(records: Vec<PaperRecord>, owner: impl Into<String>, position: ChoicePosition) -> Self {
        let choices = pipeline::distinct_filter_choices(&records, position);
        let state = ViewState::new(&choices);
        Self {
            records,
            choices,
            owner: owner.into(),
            state,
        }
    }

    pub fn records(&self) -> &[PaperRecord] {
        &self.records
    }

    pub fn choices(&self) -> &[FilterChoice] {
        &self.choices
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Apply one interaction. Returns whether the state changed.
    pub fn update(&mut self, action: ViewAction) -> bool {
        let before = self.state.clone();
        match action {
            ViewAction::ToggleChoice(choice) => self.state.inclusion_flags.toggle(choice),
            ViewAction::SetChoice(choice, on) => self.state.inclusion_flags.set(choice, on),
            ViewAction::ToggleSort => self.state.sort_descending = !self.state.sort_descending,
            ViewAction::SetSortDescending(on) => self.state.sort_descending = on,
            ViewAction::SetGroupBy(group_by) => self.state.group_by = group_by,
            ViewAction::IncludeAllVenues => {
                for &choice in &self.choices {
                    if matches!(choice, FilterChoice::Venue(_)) {
                        self.state.inclusion_flags.set(choice, true);
                    }
                }
            }
        }
        let changed = self.state != before;
        tracing::debug!(?action, changed, "view action applied");
        changed
    }

    /// Run the full pipeline for the current state.
    pub fn derive(&self) -> DerivedView<'_> {
        derive_view(&self.records, &self.state, &self.owner)
    }
}

/// Order, filter and section `records` under `state`.
pub fn derive_view<'a>(records: &'a [PaperRecord], state: &ViewState, owner: &str) -> DerivedView<'a> {
    let ordered = pipeline::order_records(records, state.group_by, state.sort_descending);
    let filtered = pipeline::filter_records(&ordered, &state.inclusion_flags, owner);
    let sections = pipeline::distinct_group_keys_present(&filtered, state.group_by)
        .into_iter()
        .filter_map(|key| {
            pipeline::section_records(&filtered, key).map(|records| Section { key, records })
        })
        .collect();
    DerivedView {
        group_by: state.group_by,
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VenueType;
    use crate::test_support::paper;

    fn controller() -> ViewController {
        let mut mine = paper("Mine", VenueType::Workshop, 2022, 4);
        mine.first_authors = vec!["Owner".to_string()];
        ViewController::new(
            vec![
                paper("Conf", VenueType::Conference, 2021, 6),
                mine,
                paper("Journal", VenueType::Journal, 2022, 9),
            ],
            "Owner",
            ChoicePosition::Last,
        )
    }

    #[test]
    fn initial_state_shows_everything_by_venue() {
        let c = controller();
        assert_eq!(c.state().group_by, GroupBy::VenueType);
        assert!(c.state().sort_descending);
        let view = c.derive();
        assert_eq!(view.record_count(), 3);
        let keys: Vec<GroupKey> = view.sections.iter().map(|s| s.key).collect();
        assert_eq!(
            keys,
            vec![
                GroupKey::Venue(VenueType::Conference),
                GroupKey::Venue(VenueType::Journal),
                GroupKey::Venue(VenueType::Workshop),
            ]
        );
    }

    #[test]
    fn toggling_a_venue_drops_its_section() {
        let mut c = controller();
        assert!(c.update(ViewAction::ToggleChoice(FilterChoice::Venue(VenueType::Journal))));
        let view = c.derive();
        assert_eq!(view.sections.len(), 2);
        assert!(view.records().all(|r| r.venue_type != VenueType::Journal));
    }

    #[test]
    fn first_author_only_narrows_to_owner() {
        let mut c = controller();
        c.update(ViewAction::SetChoice(FilterChoice::FirstAuthorOnly, true));
        let titles: Vec<&str> = c.derive().records().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Mine"]);
    }

    #[test]
    fn group_by_year_sections_newest_first() {
        let mut c = controller();
        c.update(ViewAction::SetGroupBy(GroupBy::Year));
        let keys: Vec<GroupKey> = c.derive().sections.iter().map(|s| s.key).collect();
        assert_eq!(keys, vec![GroupKey::Year(2022), GroupKey::Year(2021)]);

        c.update(ViewAction::ToggleSort);
        let keys: Vec<GroupKey> = c.derive().sections.iter().map(|s| s.key).collect();
        assert_eq!(keys, vec![GroupKey::Year(2021), GroupKey::Year(2022)]);
    }

    #[test]
    fn all_filters_off_is_empty() {
        let mut c = controller();
        for choice in c.choices().to_vec() {
            c.update(ViewAction::SetChoice(choice, false));
        }
        assert!(c.derive().is_empty());

        c.update(ViewAction::IncludeAllVenues);
        assert_eq!(c.derive().record_count(), 3);
    }

    #[test]
    fn noop_action_reports_unchanged() {
        let mut c = controller();
        assert!(!c.update(ViewAction::SetSortDescending(true)));
        assert!(!c.update(ViewAction::IncludeAllVenues));
    }

    #[test]
    fn derive_is_idempotent() {
        let c = controller();
        let a: Vec<String> = c.derive().records().map(|r| r.title.clone()).collect();
        let b: Vec<String> = c.derive().records().map(|r| r.title.clone()).collect();
        assert_eq!(a, b);
    }
}
