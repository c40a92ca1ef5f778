use std::path::Path;

use crate::{PaperListError, PaperRecord};

/// Title of the template entry kept at the top of the data file.
pub const PLACEHOLDER_TITLE: &str = "example";

/// Read and parse the publication data file.
pub fn load_records(path: &Path) -> Result<Vec<PaperRecord>, PaperListError> {
    let content = std::fs::read_to_string(path)?;
    let records = parse_records(&content)?;
    tracing::info!(path = %path.display(), count = records.len(), "loaded publication data");
    Ok(records)
}

/// Parse a JSON array of records, dropping the placeholder entry.
///
/// A record with only one of `submissionCount` / `acceptanceCount` is kept;
/// the mismatch is logged and rendering suppresses its acceptance rate.
pub fn parse_records(json: &str) -> Result<Vec<PaperRecord>, PaperListError> {
    let raw: Vec<PaperRecord> = serde_json::from_str(json)?;
    let records: Vec<PaperRecord> = raw
        .into_iter()
        .filter(|r| {
            let keep = r.title != PLACEHOLDER_TITLE;
            if !keep {
                tracing::debug!("skipping placeholder record");
            }
            keep
        })
        .collect();

    for r in &records {
        if r.submission_count.is_some() != r.acceptance_count.is_some() {
            tracing::warn!(
                title = %r.title,
                submissions = ?r.submission_count,
                acceptances = ?r.acceptance_count,
                "submission and acceptance counts must be given together"
            );
        }
        if !r.first_authors.iter().all(|f| r.author_names.contains(f)) {
            tracing::warn!(title = %r.title, "first author missing from author list");
        }
    }
    Ok(records)
}
