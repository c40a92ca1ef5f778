use paperlist_core::{DerivedView, GroupKey, PaperRecord, Section};

use crate::doc::{Block, Document};
use crate::present::render_paper_entry;
use crate::types::RenderOptions;

/// Shown instead of sections when every record is filtered out.
pub const NO_RESULTS_NOTICE: &str = "No publications match the selected filters.";

fn section_blocks(key: GroupKey, records: &[&PaperRecord], options: &RenderOptions) -> [Block; 2] {
    let entries = records
        .iter()
        .map(|r| render_paper_entry(r, options))
        .collect();
    [
        Block::Heading {
            level: 2,
            text: key.label(),
        },
        Block::List(entries),
    ]
}

/// Page for a derived view: one heading and list per non-empty section.
pub fn build_document(view: &DerivedView<'_>, options: &RenderOptions) -> Document {
    let mut blocks = vec![Block::Heading {
        level: 1,
        text: options.page_title.clone(),
    }];
    if view.is_empty() {
        blocks.push(Block::Notice(NO_RESULTS_NOTICE.to_string()));
    }
    for Section { key, records } in &view.sections {
        blocks.extend(section_blocks(*key, records, options));
    }
    Document {
        title: options.page_title.clone(),
        blocks,
    }
}

/// Page holding a single section. `None` when the section has no records.
pub fn build_section_document(
    view: &DerivedView<'_>,
    key: GroupKey,
    options: &RenderOptions,
) -> Option<Document> {
    let section = view.sections.iter().find(|s| s.key == key)?;
    let title = format!("{} \u{2014} {}", options.page_title, key.label());
    Some(Document {
        title,
        blocks: section_blocks(key, &section.records, options).into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::LineKind;
    use paperlist_core::{
        ChoicePosition, FilterChoice, GroupBy, MaterialLinks, VenueType, ViewAction, ViewController,
    };

    fn paper(title: &str, venue_type: VenueType, year: i32) -> PaperRecord {
        PaperRecord {
            title: title.to_string(),
            author_names: vec!["Jane Roe".to_string()],
            first_authors: vec!["Jane Roe".to_string()],
            venue_name: "Venue".to_string(),
            venue_type,
            is_oral_presentation: None,
            award_info: None,
            submission_count: None,
            acceptance_count: None,
            published_year: year,
            published_month: 1,
            urls: MaterialLinks::default(),
        }
    }

    fn controller() -> ViewController {
        ViewController::new(
            vec![
                paper("C1", VenueType::Conference, 2020),
                paper("J1", VenueType::Journal, 2021),
                paper("C2", VenueType::Conference, 2022),
            ],
            "Jane Roe",
            ChoicePosition::Last,
        )
    }

    #[test]
    fn headings_only_for_present_groups() {
        let mut c = controller();
        c.update(ViewAction::SetChoice(
            FilterChoice::Venue(VenueType::Journal),
            false,
        ));
        let doc = build_document(&c.derive(), &RenderOptions::new("Jane Roe"));
        let headings: Vec<&str> = doc.headings().collect();
        assert_eq!(headings, vec!["Publications", "Conference"]);
        let titles: Vec<String> = doc
            .entries()
            .map(|e| crate::doc::plain_text(&e.line(LineKind::Title).unwrap().content))
            .collect();
        assert_eq!(titles, vec!["C2", "C1"]);
    }

    #[test]
    fn empty_view_renders_notice_only() {
        let mut c = controller();
        for choice in c.choices().to_vec() {
            c.update(ViewAction::SetChoice(choice, false));
        }
        let doc = build_document(&c.derive(), &RenderOptions::new("Jane Roe"));
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.blocks[1], Block::Notice(NO_RESULTS_NOTICE.to_string()));
        assert_eq!(doc.entries().count(), 0);
    }

    #[test]
    fn year_sections_use_year_headings() {
        let mut c = controller();
        c.update(ViewAction::SetGroupBy(GroupBy::Year));
        let doc = build_document(&c.derive(), &RenderOptions::new("Jane Roe"));
        let headings: Vec<&str> = doc.headings().skip(1).collect();
        assert_eq!(headings, vec!["2022", "2021", "2020"]);
    }

    #[test]
    fn single_section_document() {
        let c = controller();
        let view = c.derive();
        let options = RenderOptions::new("Jane Roe");
        let doc = build_section_document(&view, GroupKey::Venue(VenueType::Journal), &options)
            .unwrap();
        assert_eq!(doc.entries().count(), 1);
        assert!(
            build_section_document(&view, GroupKey::Venue(VenueType::Thesis), &options).is_none()
        );
    }
}
