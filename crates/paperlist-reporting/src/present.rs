//! Per-paper display fragments: author list, acceptance rate, source links
//! and the entry that composes them.

use std::fmt;

use paperlist_core::{MaterialLinks, PaperRecord};

use crate::doc::{Entry, Inline, Line, LineKind};
use crate::types::{AuthorSeparator, RenderOptions};

/// Author names in display order, with the owner emphasized and shared
/// first authors marked.
pub fn render_author_list(
    record: &PaperRecord,
    owner_name: &str,
    separator: AuthorSeparator,
) -> Vec<Inline> {
    let owner = owner_name.trim();
    let last = record.author_names.len().saturating_sub(1);
    let mark_first_authors = record.has_equal_contribution();

    let mut out = Vec::with_capacity(record.author_names.len() * 2);
    for (i, name) in record.author_names.iter().enumerate() {
        let name_string = match (i == last, separator) {
            (false, _) => format!("{}, ", name),
            (true, AuthorSeparator::Comma) => name.clone(),
            (true, AuthorSeparator::Period) => format!("{}.", name),
        };
        if mark_first_authors && record.first_authors.contains(name) {
            out.push(Inline::Marker);
            out.push(Inline::text(" "));
        }
        if !owner.is_empty() && name.contains(owner) {
            out.push(Inline::Strong(vec![Inline::Text(name_string)]));
        } else {
            out.push(Inline::Text(name_string));
        }
    }
    out
}

/// `"<rate>% (=<accepted>/<submitted>)"`, or `None` when either count is
/// missing or zero. The rate rounds half up.
pub fn render_acceptance_rate(
    submission_count: Option<u32>,
    acceptance_count: Option<u32>,
) -> Option<String> {
    let submitted = submission_count.filter(|&n| n > 0)?;
    let accepted = acceptance_count.filter(|&n| n > 0)?;
    let (s, a) = (u64::from(submitted), u64::from(accepted));
    let rate = (200 * a + s) / (2 * s);
    Some(format!("{}% (={}/{})", rate, accepted, submitted))
}

/// A single labeled link inside a [`SourceGroup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLink {
    pub label: &'static str,
    pub url: String,
}

/// Links shown together as one parenthesized unit, e.g. `(slides/video)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceGroup {
    pub links: Vec<SourceLink>,
}

impl SourceGroup {
    fn of(pairs: &[(&'static str, &str)]) -> Self {
        Self {
            links: pairs
                .iter()
                .map(|&(label, url)| SourceLink {
                    label,
                    url: url.to_string(),
                })
                .collect(),
        }
    }

    fn to_inlines(&self) -> Vec<Inline> {
        let mut out = vec![Inline::text("(")];
        for (i, link) in self.links.iter().enumerate() {
            if i > 0 {
                out.push(Inline::text("/"));
            }
            out.push(Inline::link(&link.url, link.label));
        }
        out.push(Inline::text(")"));
        out
    }
}

impl fmt::Display for SourceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.links.iter().map(|l| l.label).collect();
        write!(f, "({})", labels.join("/"))
    }
}

/// Build link groups in fixed order: arXiv, PDF, code, poster,
/// slides/video/transcript, short video.
pub fn render_source_links(urls: &MaterialLinks) -> Vec<SourceGroup> {
    let mut groups = Vec::new();

    if let Some(arxiv) = urls.arxiv.as_deref() {
        groups.push(SourceGroup::of(&[("arXiv", arxiv)]));
    }
    if let Some(pdf) = urls.pdf.as_deref() {
        let label = if urls.arxiv.is_some() { "Outdated PDF" } else { "PDF" };
        groups.push(SourceGroup::of(&[(label, pdf)]));
    }
    if let Some(code) = urls.code.as_deref() {
        groups.push(SourceGroup::of(&[("code", code)]));
    }
    if let Some(poster) = urls.poster.as_deref() {
        groups.push(SourceGroup::of(&[("poster", poster)]));
    }

    let talk: Vec<(&'static str, &str)> = match (
        urls.slide.as_deref(),
        urls.video.as_deref(),
        urls.video_transcript.as_deref(),
    ) {
        (Some(slide), video, transcript) => {
            let mut pairs = vec![("slides", slide)];
            pairs.extend(video.map(|v| ("video", v)));
            pairs.extend(transcript.map(|t| ("transcript", t)));
            pairs
        }
        (None, Some(video), transcript) => {
            let mut pairs = vec![("video", video)];
            pairs.extend(transcript.map(|t| ("transcript", t)));
            pairs
        }
        // A transcript alone is not shown.
        (None, None, _) => Vec::new(),
    };
    if !talk.is_empty() {
        groups.push(SourceGroup::of(&talk));
    }

    if let (Some(short), Some(transcript)) =
        (urls.short_video.as_deref(), urls.short_video_transcript.as_deref())
    {
        groups.push(SourceGroup::of(&[
            ("short video", short),
            ("transcript", transcript),
        ]));
    }

    groups
}

/// Groups joined with `, `, labels only.
pub fn format_source_links(groups: &[SourceGroup]) -> String {
    groups
        .iter()
        .map(|g| g.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn acceptance_rate_line(record: &PaperRecord) -> Option<Line> {
    let rate = render_acceptance_rate(record.submission_count, record.acceptance_count)?;
    Some(Line {
        kind: LineKind::AcceptanceRate,
        content: vec![
            Inline::text("The acceptance rate was about "),
            Inline::Strong(vec![Inline::Text(rate)]),
            Inline::text("."),
        ],
    })
}

fn sources_line(urls: &MaterialLinks) -> Option<Line> {
    let groups = render_source_links(urls);
    if groups.is_empty() {
        return None;
    }
    let mut content = Vec::new();
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            content.push(Inline::text(", "));
        }
        content.extend(group.to_inlines());
    }
    Some(Line {
        kind: LineKind::Sources,
        content,
    })
}

/// Compose the full display fragment for one paper.
pub fn render_paper_entry(record: &PaperRecord, options: &RenderOptions) -> Entry {
    let title = match &record.urls.paper {
        Some(url) => Inline::link(url, &record.title),
        None => Inline::text(&record.title),
    };

    let mut venue = vec![Inline::Text(format!("{}.", record.venue_name))];
    if record.is_oral() {
        venue.push(Inline::text(" Oral Presentation."));
    }

    let mut lines = vec![
        Line {
            kind: LineKind::Title,
            content: vec![title],
        },
        Line {
            kind: LineKind::Authors,
            content: render_author_list(record, &options.owner_name, options.author_separator),
        },
        Line {
            kind: LineKind::Venue,
            content: venue,
        },
    ];
    if let Some(award) = &record.award_info {
        lines.push(Line {
            kind: LineKind::Award,
            content: vec![Inline::Highlight(award.clone())],
        });
    }
    lines.extend(acceptance_rate_line(record));
    lines.extend(sources_line(&record.urls));

    Entry { lines }
}
