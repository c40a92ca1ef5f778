//! Turns a derived publication view into display fragments and pages.
//!
//! [`present`] builds the per-paper fragments, [`page`] assembles them into
//! a format-neutral [`Document`], and [`export`] serializes that document.

pub mod doc;
pub mod export;
pub mod page;
pub mod present;
pub mod types;

pub use doc::{Block, Document, EQUAL_CONTRIBUTION_MARKER, Entry, Inline, Line, LineKind};
pub use export::{export_document, export_results, export_view};
pub use page::{NO_RESULTS_NOTICE, build_document, build_section_document};
pub use present::{
    SourceGroup, SourceLink, format_source_links, render_acceptance_rate, render_author_list,
    render_paper_entry, render_source_links,
};
pub use types::{AuthorSeparator, DEFAULT_PAGE_TITLE, ExportFormat, RenderOptions};
