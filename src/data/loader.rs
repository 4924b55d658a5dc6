use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use log::{info, warn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{RawRow, Submission, SubmissionSet, COLUMNS};
use crate::error::{LoadError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a submissions export from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row plus one row per submission (the usual export)
/// * `.json`    – `[{ "ID": 1, "Decision": "", ... }, ...]`
/// * `.parquet` – one column per export header
///
/// Rows come back in file order and none is ever dropped.
pub fn load_file(path: &Path) -> Result<SubmissionSet> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let set = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    info!(
        "loaded {} submissions across {} subcommittees from {}",
        set.len(),
        set.subcommittees.len(),
        path.display()
    );
    Ok(set)
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Warn once for every expected column that the file does not carry.
fn warn_missing_columns<'a>(present: impl IntoIterator<Item = &'a str>) {
    let present: BTreeSet<&str> = present.into_iter().collect();
    for column in COLUMNS.iter().filter(|c| !present.contains(*c)) {
        warn!("column '{column}' not found; treating every {column} cell as empty");
    }
}

/// Empty cells are stored as `None`.
fn non_empty(cell: &str) -> Option<String> {
    let cell = cell.trim();
    (!cell.is_empty()).then(|| cell.to_string())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the export's column names, every cell
/// trimmed. Rows with a different field count than the header are an error.
fn load_csv(path: &Path) -> Result<SubmissionSet> {
    let bytes = read_bytes(path)?;
    parse_csv(&bytes, path)
}

/// Parse CSV text that is already in memory. `origin` only labels errors.
pub fn parse_csv(bytes: &[u8], origin: &Path) -> Result<SubmissionSet> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(LoadError::MissingHeader {
            path: origin.to_path_buf(),
        });
    }
    warn_missing_columns(headers.iter());

    let mut submissions = Vec::new();
    for result in reader.deserialize::<RawRow>() {
        submissions.push(Submission::from(result?));
    }

    Ok(SubmissionSet::from_submissions(submissions))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "ID": 1, "Decision": "", "ReviewsDone": 0, "E1score": null, ... },
///   ...
/// ]
/// ```
///
/// Values may be strings or numbers; both are coerced like CSV cells.
fn load_json(path: &Path) -> Result<SubmissionSet> {
    let bytes = read_bytes(path)?;
    parse_json(&bytes)
}

/// Parse a JSON records array that is already in memory.
pub fn parse_json(bytes: &[u8]) -> Result<SubmissionSet> {
    let root: JsonValue = serde_json::from_slice(bytes)?;
    let records = root
        .as_array()
        .ok_or_else(|| LoadError::Shape("expected a top-level JSON array".into()))?;

    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut submissions = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::Shape(format!("row {i} is not a JSON object")))?;

        let mut raw = RawRow::default();
        for column in COLUMNS {
            if let (Some(value), Some(cell)) = (obj.get(column), raw.cell_mut(column)) {
                seen.insert(column);
                *cell = json_to_cell(value);
            }
        }
        submissions.push(Submission::from(raw));
    }

    if !records.is_empty() {
        warn_missing_columns(seen);
    }
    Ok(SubmissionSet::from_submissions(submissions))
}

fn json_to_cell(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => non_empty(s),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per export header.
///
/// Column types are free: every non-null cell is rendered through Arrow's
/// display formatter and then coerced like a CSV cell.
fn load_parquet(path: &Path) -> Result<SubmissionSet> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let schema = builder.schema().clone();
    warn_missing_columns(schema.fields().iter().map(|f| f.name().as_str()));
    let positions: Vec<(&str, Option<usize>)> = COLUMNS
        .iter()
        .map(|&column| (column, schema.index_of(column).ok()))
        .collect();

    let reader = builder.build()?;
    let mut submissions = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;

        for row in 0..batch.num_rows() {
            let mut raw = RawRow::default();
            for &(column, idx) in &positions {
                let Some(idx) = idx else { continue };
                let array = batch.column(idx);
                if array.is_null(row) {
                    continue;
                }
                if let Some(cell) = raw.cell_mut(column) {
                    *cell = non_empty(&array_value_to_string(array.as_ref(), row)?);
                }
            }
            submissions.push(Submission::from(raw));
        }
    }

    Ok(SubmissionSet::from_submissions(submissions))
}
