use std::collections::HashSet;
use std::io;
use std::path::Path;

use crate::domain::bookmark::{domain_from_email, normalize_url_entry, WorkItem};

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("CSV must contain '{0}' column header")]
    MissingColumn(&'static str),
    #[error("failed to read CSV header: {0}")]
    Csv(#[from] csv::Error),
}

/// How one input cell turns into work items.
pub trait ExtractionPolicy: Send + Sync {
    fn column(&self) -> &'static str;

    /// Returns the items found in `raw`, or the rejected fragments as `Err`.
    fn normalize(&self, raw: &str) -> Vec<Result<WorkItem, String>>;
}

/// `emails` column; each address contributes its domain.
pub struct EmailDomains;

impl ExtractionPolicy for EmailDomains {
    fn column(&self) -> &'static str {
        "emails"
    }

    fn normalize(&self, raw: &str) -> Vec<Result<WorkItem, String>> {
        raw.split([',', ';'])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| domain_from_email(part).ok_or_else(|| part.to_string()))
            .collect()
    }
}

/// `domains` column holding bare domains or absolute URLs.
pub struct DirectEntries;

impl ExtractionPolicy for DirectEntries {
    fn column(&self) -> &'static str {
        "domains"
    }

    fn normalize(&self, raw: &str) -> Vec<Result<WorkItem, String>> {
        let value = raw.trim();
        if value.is_empty() {
            return Vec::new();
        }
        vec![normalize_url_entry(value).ok_or_else(|| value.to_string())]
    }
}

/// Reads `path` and returns the distinct work items in first-seen order.
///
/// A missing file is logged and yields no items; a missing column is fatal.
pub fn extract(
    path: &Path,
    policy: &dyn ExtractionPolicy,
) -> Result<Vec<WorkItem>, ExtractError> {
    let mut reader = match csv::ReaderBuilder::new().flexible(true).from_path(path) {
        Ok(reader) => reader,
        Err(err) if is_not_found(&err) => {
            tracing::error!(path = %path.display(), "CSV file not found");
            return Ok(Vec::new());
        }
        Err(err) => return Err(ExtractError::Csv(err)),
    };

    let column = policy.column();
    let index = reader
        .headers()?
        .iter()
        .position(|h| h.trim().trim_start_matches('\u{feff}') == column)
        .ok_or(ExtractError::MissingColumn(column))?;

    let mut items = Vec::new();
    let mut seen = HashSet::new();

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(error = %err, "skipping malformed CSV row");
                continue;
            }
        };
        let line = record.position().map_or(0, |p| p.line());

        let Some(raw) = record.get(index) else {
            continue;
        };

        for candidate in policy.normalize(raw) {
            match candidate {
                Ok(item) => {
                    if seen.insert(item.clone()) {
                        items.push(item);
                    }
                }
                Err(rejected) => {
                    tracing::warn!(line, value = %rejected, "skipping invalid {column} entry");
                }
            }
        }
    }

    tracing::info!(count = items.len(), column, "extracted work items");
    Ok(items)
}

fn is_not_found(err: &csv::Error) -> bool {
    matches!(err.kind(), csv::ErrorKind::Io(e) if e.kind() == io::ErrorKind::NotFound)
}
