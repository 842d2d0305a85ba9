//! Corpus ingestion — reads `Job Title` / `Skills Required` rows from CSV.
//!
//! Rows with a missing or blank field are rejected, never skipped: a partially
//! loaded corpus would silently shrink the requirement map.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::errors::ModelError;

pub const JOB_TITLE_COLUMN: &str = "Job Title";
pub const SKILLS_COLUMN: &str = "Skills Required";

/// Separator between multiple labels inside a single `Job Title` cell.
const LABEL_SEPARATOR: &str = ", ";

/// One training row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusRow {
    pub job_title: String,
    pub skills_required: String,
}

impl CorpusRow {
    #[cfg(test)]
    pub fn new(job_title: impl Into<String>, skills_required: impl Into<String>) -> Self {
        Self {
            job_title: job_title.into(),
            skills_required: skills_required.into(),
        }
    }

    /// The multi-valued label of this row: the title cell split on `", "`.
    pub fn labels(&self) -> Vec<String> {
        self.job_title
            .split(LABEL_SEPARATOR)
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Loads the corpus from a CSV file on disk.
pub fn load_corpus(path: &Path) -> Result<Vec<CorpusRow>, ModelError> {
    info!("Loading training corpus from {}", path.display());
    let file = File::open(path)?;
    let rows = read_corpus(file)?;
    info!("Loaded {} corpus rows", rows.len());
    Ok(rows)
}

/// Reads corpus rows from any CSV source with a header line.
pub fn read_corpus<R: Read>(source: R) -> Result<Vec<CorpusRow>, ModelError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let title_idx = column_index(&headers, JOB_TITLE_COLUMN)?;
    let skills_idx = column_index(&headers, SKILLS_COLUMN)?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row_number = i + 1;

        let job_title = required_field(&record, title_idx, JOB_TITLE_COLUMN, row_number)?;
        let skills_required = required_field(&record, skills_idx, SKILLS_COLUMN, row_number)?;
        rows.push(CorpusRow {
            job_title,
            skills_required,
        });
    }

    if rows.is_empty() {
        return Err(ModelError::Data("corpus contains no rows".to_string()));
    }
    Ok(rows)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, ModelError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| ModelError::Data(format!("corpus is missing the '{name}' column")))
}

fn required_field(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
    row_number: usize,
) -> Result<String, ModelError> {
    match record.get(idx) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(ModelError::Data(format!(
            "row {row_number}: '{column}' is missing or empty"
        ))),
    }
}
