use std::io::Write;
use std::path::Path;

use paperlist_core::{DerivedView, PaperRecord};
use serde::Serialize;

use crate::doc::{Block, Document, Entry, Inline, Line, LineKind};
use crate::page::build_document;
use crate::types::{ExportFormat, RenderOptions};

/// Render `view` in `format` and write it to `path`.
pub fn export_results(
    view: &DerivedView<'_>,
    options: &RenderOptions,
    format: ExportFormat,
    path: &Path,
) -> std::io::Result<()> {
    let content = export_view(view, options, format);
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    tracing::info!(path = %path.display(), format = format.label(), "wrote publication list");
    Ok(())
}

/// Render `view` in `format`.
pub fn export_view(view: &DerivedView<'_>, options: &RenderOptions, format: ExportFormat) -> String {
    match format {
        ExportFormat::Json => export_json(view),
        ExportFormat::Html => export_html(&build_document(view, options)),
        ExportFormat::Markdown => export_markdown(&build_document(view, options)),
        ExportFormat::Text => export_text(&build_document(view, options)),
    }
}

/// Serialize an already-built document. `None` for JSON, which is built
/// from the records rather than the document.
pub fn export_document(doc: &Document, format: ExportFormat) -> Option<String> {
    match format {
        ExportFormat::Html => Some(export_html(doc)),
        ExportFormat::Markdown => Some(export_markdown(doc)),
        ExportFormat::Text => Some(export_text(doc)),
        ExportFormat::Json => None,
    }
}

// ── JSON ────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct JsonSection<'a> {
    group: String,
    papers: &'a [&'a PaperRecord],
}

#[derive(Serialize)]
struct JsonView<'a> {
    group_by: &'static str,
    total: usize,
    sections: Vec<JsonSection<'a>>,
}

pub fn export_json(view: &DerivedView<'_>) -> String {
    let doc = JsonView {
        group_by: view.group_by.as_str(),
        total: view.record_count(),
        sections: view
            .sections
            .iter()
            .map(|s| JsonSection {
                group: s.key.label(),
                papers: &s.records,
            })
            .collect(),
    };
    let mut out = serde_json::to_string_pretty(&doc).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to serialize publication list");
        String::from("{}")
    });
    out.push('\n');
    out
}

// ── HTML ────────────────────────────────────────────────────────────

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn write_html_inline(out: &mut String, inline: &Inline) {
    match inline {
        Inline::Text(s) => out.push_str(&html_escape(s)),
        Inline::Strong(children) => {
            out.push_str("<b>");
            for child in children {
                write_html_inline(out, child);
            }
            out.push_str("</b>");
        }
        Inline::Link { href, label } => {
            out.push_str(&format!(
                "<a href=\"{}\" target=\"_blank\">{}</a>",
                html_escape(href),
                html_escape(label)
            ));
        }
        Inline::Marker => out.push_str("<span class=\"marker\">&clubs;</span>"),
        Inline::Highlight(s) => {
            out.push_str(&format!("<span class=\"highlight\">{}</span>", html_escape(s)));
        }
    }
}

fn write_html_line(out: &mut String, line: &Line) {
    let tag = if line.kind == LineKind::Title { "p" } else { "div" };
    out.push_str(&format!("<{} class=\"{}\">", tag, line.kind.class()));
    for inline in &line.content {
        write_html_inline(out, inline);
    }
    out.push_str(&format!("</{}>\n", tag));
}

fn write_html_entry(out: &mut String, entry: &Entry) {
    out.push_str("<li>\n");
    for line in &entry.lines {
        write_html_line(out, line);
    }
    out.push_str("</li>\n");
}

pub fn export_html(doc: &Document) -> String {
    let mut out = String::with_capacity(8192);

    out.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{}</title>
<style>
body {{
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
  max-width: 52rem;
  margin: 0 auto;
  padding: 2rem;
  line-height: 1.5;
  color: #222;
}}
h1 {{ margin-bottom: 1.5rem; }}
h2 {{ margin: 2rem 0 0.8rem; }}
ol li {{ padding-bottom: 1rem; margin-bottom: 1rem; border-bottom: 1px solid #ddd; }}
.paper-title {{ margin-bottom: 0.4em; font-weight: 600; }}
.authors, .acceptance-rate {{ margin-bottom: 0.2em; }}
.venue, .acceptance-rate {{ color: #777; }}
.marker, .highlight {{ color: red; }}
.notice {{ color: #777; font-style: italic; }}
</style>
</head>
<body>
"#,
        html_escape(&doc.title)
    ));

    for block in &doc.blocks {
        match block {
            Block::Heading { level, text } => {
                let level = (*level).clamp(1, 6);
                out.push_str(&format!("<h{0}>{1}</h{0}>\n", level, html_escape(text)));
            }
            Block::List(entries) => {
                out.push_str("<ol>\n");
                for entry in entries {
                    write_html_entry(&mut out, entry);
                }
                out.push_str("</ol>\n");
            }
            Block::Notice(text) => {
                out.push_str(&format!("<p class=\"notice\">{}</p>\n", html_escape(text)));
            }
        }
    }

    out.push_str("</body>\n</html>\n");
    out
}

// ── Markdown ────────────────────────────────────────────────────────

fn md_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '*' | '_' | '[' | ']' | '`' | '|' | '<' | '>' | '&') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Link destination in angle brackets, which allows spaces and parentheses.
fn md_href(href: &str) -> String {
    format!("<{}>", href.replace('<', "%3C").replace('>', "%3E"))
}

fn md_inline(inline: &Inline) -> String {
    match inline {
        Inline::Text(s) => md_escape(s),
        Inline::Strong(children) => {
            let inner: String = children.iter().map(md_inline).collect();
            // Keep separators outside the markers so `**Name, **` never happens.
            let trimmed = inner.trim_end();
            format!("**{}**{}", trimmed, &inner[trimmed.len()..])
        }
        Inline::Link { href, label } => format!("[{}]({})", md_escape(label), md_href(href)),
        Inline::Marker => crate::doc::EQUAL_CONTRIBUTION_MARKER.to_string(),
        Inline::Highlight(s) => format!("*{}*", md_escape(s)),
    }
}

pub fn export_markdown(doc: &Document) -> String {
    let mut out = String::new();
    for block in &doc.blocks {
        match block {
            Block::Heading { level, text } => {
                let hashes = "#".repeat(usize::from((*level).clamp(1, 6)));
                out.push_str(&format!("{} {}\n\n", hashes, md_escape(text)));
            }
            Block::List(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    let lines: Vec<String> = entry
                        .lines
                        .iter()
                        .map(|l| l.content.iter().map(md_inline).collect())
                        .collect();
                    out.push_str(&format!("{}. {}\n", i + 1, lines.join("  \n   ")));
                }
                out.push('\n');
            }
            Block::Notice(text) => out.push_str(&format!("_{}_\n\n", md_escape(text))),
        }
    }
    out
}

// ── Plain text ──────────────────────────────────────────────────────

fn text_inline(inline: &Inline) -> String {
    match inline {
        Inline::Link { href, label } => format!("{} <{}>", label, href),
        Inline::Strong(children) => children.iter().map(text_inline).collect(),
        other => other.plain_text(),
    }
}

pub fn export_text(doc: &Document) -> String {
    let mut out = String::new();
    for block in &doc.blocks {
        match block {
            Block::Heading { level, text } => {
                if !out.is_empty() {
                    out.push('\n');
                }
                let rule = if *level <= 1 { "=" } else { "-" };
                out.push_str(text);
                out.push('\n');
                out.push_str(&rule.repeat(text.chars().count()));
                out.push('\n');
            }
            Block::List(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    let prefix = format!("  {}. ", i + 1);
                    let indent = " ".repeat(prefix.len());
                    for (li, line) in entry.lines.iter().enumerate() {
                        let text: String = line.content.iter().map(text_inline).collect();
                        out.push_str(if li == 0 { &prefix } else { &indent });
                        out.push_str(&text);
                        out.push('\n');
                    }
                }
            }
            Block::Notice(text) => {
                out.push_str(&format!("  {}\n", text));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::NO_RESULTS_NOTICE;
    use paperlist_core::{ChoicePosition, FilterChoice, MaterialLinks, VenueType, ViewAction, ViewController};

    fn controller() -> ViewController {
        let record = PaperRecord {
            title: "Fast <Search> & Friends".to_string(),
            author_names: vec!["Jane Roe".to_string(), "John Doe".to_string()],
            first_authors: vec!["Jane Roe".to_string(), "John Doe".to_string()],
            venue_name: "Conference on Things".to_string(),
            venue_type: VenueType::Conference,
            is_oral_presentation: Some(true),
            award_info: Some("Best Paper".to_string()),
            submission_count: Some(10),
            acceptance_count: Some(3),
            published_year: 2023,
            published_month: 6,
            urls: MaterialLinks {
                paper: Some("https://example.org/p?a=1&b=2".to_string()),
                arxiv: Some("https://arxiv.org/abs/1".to_string()),
                ..Default::default()
            },
        };
        ViewController::new(vec![record], "Jane Roe", ChoicePosition::Last)
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape("<a href=\"x\">&</a>"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_md_escape() {
        assert_eq!(md_escape("a*b_c[d]"), "a\\*b\\_c\\[d\\]");
        assert_eq!(md_escape("<b> & co"), "\\<b\\> \\& co");
    }

    #[test]
    fn test_html_structure() {
        let c = controller();
        let out = export_view(&c.derive(), &RenderOptions::new("Jane Roe"), ExportFormat::Html);
        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("<title>Publications</title>"));
        assert!(out.contains("<h2>Conference</h2>"));
        assert!(out.contains(
            "<a href=\"https://example.org/p?a=1&amp;b=2\" target=\"_blank\">Fast &lt;Search&gt; &amp; Friends</a>"
        ));
        assert!(out.contains("<b>Jane Roe, </b>"));
        assert!(out.contains("<span class=\"marker\">&clubs;</span>"));
        assert!(out.contains("<span class=\"highlight\">Best Paper</span>"));
        assert!(out.contains("<b>30% (=3/10)</b>"));
        assert!(out.contains("Oral Presentation."));
        assert!(out.ends_with("</html>\n"));
    }

    #[test]
    fn test_html_no_results() {
        let mut c = controller();
        c.update(ViewAction::SetChoice(
            FilterChoice::Venue(VenueType::Conference),
            false,
        ));
        let out = export_view(&c.derive(), &RenderOptions::new("Jane Roe"), ExportFormat::Html);
        assert!(out.contains(NO_RESULTS_NOTICE));
        assert!(!out.contains("<h2>"));
        assert!(!out.contains("<ol>"));
    }

    #[test]
    fn test_markdown_structure() {
        let c = controller();
        let out = export_view(
            &c.derive(),
            &RenderOptions::new("Jane Roe"),
            ExportFormat::Markdown,
        );
        assert!(out.starts_with("# Publications\n\n## Conference\n\n1. "));
        assert!(out.contains("\u{2663} **Jane Roe,** "));
        assert!(out.contains("[arXiv](<https://arxiv.org/abs/1>)"));
        assert!(out.contains("*Best Paper*"));
    }

    #[test]
    fn test_markdown_escapes_html_and_link_targets() {
        let mut record = controller().records()[0].clone();
        record.urls.code = Some("https://example.org/a b)".to_string());
        record.urls.poster = Some("https://example.org/<p>".to_string());
        let c = ViewController::new(vec![record], "Jane Roe", ChoicePosition::Last);
        let out = export_view(
            &c.derive(),
            &RenderOptions::new("Jane Roe"),
            ExportFormat::Markdown,
        );
        assert!(out.contains(
            "1. [Fast \\<Search\\> \\& Friends](<https://example.org/p?a=1&b=2>)"
        ));
        assert!(out.contains("([code](<https://example.org/a b)>))"));
        assert!(out.contains("([poster](<https://example.org/%3Cp%3E>))"));
        assert!(!out.contains("<Search>"));
    }

    #[test]
    fn test_export_document_has_no_json() {
        let c = controller();
        let doc = build_document(&c.derive(), &RenderOptions::new("Jane Roe"));
        assert!(export_document(&doc, ExportFormat::Json).is_none());
        let html = export_document(&doc, ExportFormat::Html).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_text_structure() {
        let c = controller();
        let out = export_view(&c.derive(), &RenderOptions::new("Jane Roe"), ExportFormat::Text);
        assert!(out.starts_with("Publications\n============\n"));
        assert!(out.contains("\nConference\n----------\n"));
        assert!(out.contains("  1. Fast <Search> & Friends <https://example.org/p?a=1&b=2>\n"));
        assert!(out.contains("The acceptance rate was about 30% (=3/10)."));
    }

    #[test]
    fn test_json_sections() {
        let c = controller();
        let out = export_view(&c.derive(), &RenderOptions::new("Jane Roe"), ExportFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["group_by"], "venue-type");
        assert_eq!(parsed["total"], 1);
        assert_eq!(parsed["sections"][0]["group"], "Conference");
        assert_eq!(
            parsed["sections"][0]["papers"][0]["venueName"],
            "Conference on Things"
        );
    }

    #[test]
    fn test_export_is_deterministic() {
        let c = controller();
        let options = RenderOptions::new("Jane Roe");
        for &format in ExportFormat::all() {
            assert_eq!(
                export_view(&c.derive(), &options, format),
                export_view(&c.derive(), &options, format)
            );
        }
    }

    #[test]
    fn test_export_results_writes_file() {
        let c = controller();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("papers.md");
        export_results(
            &c.derive(),
            &RenderOptions::new("Jane Roe"),
            ExportFormat::Markdown,
            &path,
        )
        .unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Publications"));
    }
}
