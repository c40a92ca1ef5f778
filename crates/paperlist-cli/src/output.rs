use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;
use paperlist_core::{DerivedView, FilterChoice};
use paperlist_reporting::{ExportFormat, NO_RESULTS_NOTICE};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// One row of the `choices` listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceRow {
    pub choice: FilterChoice,
    pub included: bool,
    pub count: usize,
}

fn counted(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", n, noun)
    }
}

/// Print what was written after exporting to a file.
pub fn print_summary(
    w: &mut dyn Write,
    view: &DerivedView<'_>,
    path: &Path,
    format: ExportFormat,
    color: ColorMode,
) -> std::io::Result<()> {
    let total = view.record_count();
    if total == 0 {
        if color.enabled() {
            writeln!(w, "{}", NO_RESULTS_NOTICE.yellow())?;
        } else {
            writeln!(w, "{}", NO_RESULTS_NOTICE)?;
        }
    } else {
        for section in &view.sections {
            let label = section.key.label();
            if color.enabled() {
                writeln!(w, "  {:<12} {}", label.bold(), section.records.len())?;
            } else {
                writeln!(w, "  {:<12} {}", label, section.records.len())?;
            }
        }
    }

    let line = format!(
        "Wrote {} in {} to {} ({})",
        counted(total, "publication"),
        counted(view.sections.len(), "section"),
        path.display(),
        format.label()
    );
    if color.enabled() {
        writeln!(w, "{}", line.green())?;
    } else {
        writeln!(w, "{}", line)?;
    }
    Ok(())
}

/// Print the filter menu in display order with per-choice record counts.
pub fn print_choices(w: &mut dyn Write, rows: &[ChoiceRow], color: ColorMode) -> std::io::Result<()> {
    for row in rows {
        let mark = if row.included { "[x]" } else { "[ ]" };
        let label = row.choice.label();
        if color.enabled() {
            let mark = if row.included {
                mark.green().to_string()
            } else {
                mark.dimmed().to_string()
            };
            writeln!(w, "{} {:<22} {}", mark, label, row.count.to_string().dimmed())?;
        } else {
            writeln!(w, "{} {:<22} {}", mark, label, row.count)?;
        }
    }
    Ok(())
}
