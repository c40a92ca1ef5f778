//! Format-neutral document tree produced by the presentation builder.

/// Glyph that marks authors sharing first authorship.
pub const EQUAL_CONTRIBUTION_MARKER: char = '\u{2663}';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(Vec<Inline>),
    Link { href: String, label: String },
    /// Equal-contribution glyph.
    Marker,
    /// Highlighted text, used for awards.
    Highlight(String),
}

impl Inline {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn link(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Link {
            href: href.into(),
            label: label.into(),
        }
    }

    /// Visible text with all markup removed.
    pub fn plain_text(&self) -> String {
        match self {
            Self::Text(s) | Self::Highlight(s) => s.clone(),
            Self::Strong(children) => plain_text(children),
            Self::Link { label, .. } => label.clone(),
            Self::Marker => EQUAL_CONTRIBUTION_MARKER.to_string(),
        }
    }
}

pub fn plain_text(inlines: &[Inline]) -> String {
    inlines.iter().map(Inline::plain_text).collect()
}

/// Role of a line inside a paper entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Title,
    Authors,
    Venue,
    Award,
    AcceptanceRate,
    Sources,
}

impl LineKind {
    /// CSS class used by the HTML exporter.
    pub fn class(self) -> &'static str {
        match self {
            Self::Title => "paper-title",
            Self::Authors => "authors",
            Self::Venue => "venue",
            Self::Award => "award",
            Self::AcceptanceRate => "acceptance-rate",
            Self::Sources => "sources",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    pub content: Vec<Inline>,
}

/// Display fragment for one paper.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    pub lines: Vec<Line>,
}

impl Entry {
    pub fn line(&self, kind: LineKind) -> Option<&Line> {
        self.lines.iter().find(|l| l.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    /// Ordered list of paper entries.
    List(Vec<Entry>),
    /// Stand-alone message, e.g. when nothing matches the filters.
    Notice(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn headings(&self) -> impl Iterator<Item = &str> + '_ {
        self.blocks.iter().filter_map(|b| match b {
            Block::Heading { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::List(entries) => Some(entries),
                _ => None,
            })
            .flatten()
    }
}
