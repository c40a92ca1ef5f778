use std::str::FromStr;

/// Output format for a rendered publication list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Html,
    Markdown,
    Text,
    Json,
}

impl ExportFormat {
    pub fn all() -> &'static [ExportFormat] {
        &[
            ExportFormat::Html,
            ExportFormat::Markdown,
            ExportFormat::Text,
            ExportFormat::Json,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::Markdown => "Markdown",
            Self::Text => "Plain Text",
            Self::Json => "JSON",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "md",
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "htm" => Ok(Self::Html),
            "markdown" | "md" => Ok(Self::Markdown),
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown export format: {}", other)),
        }
    }
}

/// What follows the final author name.
///
/// `Comma` separates names with `, ` and leaves the last one bare;
/// `Period` does the same but closes the list with a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthorSeparator {
    Comma,
    #[default]
    Period,
}

impl FromStr for AuthorSeparator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "comma" => Ok(Self::Comma),
            "period" => Ok(Self::Period),
            other => Err(format!("unknown author separator: {}", other)),
        }
    }
}

/// Rendering knobs shared by every format.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Authors whose name contains this are emphasized. Empty emphasizes nobody.
    pub owner_name: String,
    pub author_separator: AuthorSeparator,
    pub page_title: String,
}

pub const DEFAULT_PAGE_TITLE: &str = "Publications";

impl RenderOptions {
    pub fn new(owner_name: impl Into<String>) -> Self {
        Self {
            owner_name: owner_name.into(),
            author_separator: AuthorSeparator::default(),
            page_title: DEFAULT_PAGE_TITLE.to_string(),
        }
    }
}
