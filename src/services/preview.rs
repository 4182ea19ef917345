//! Reads the first worksheet of a spreadsheet and summarises it.

use calamine::{Data, DataType, Range, Reader, open_workbook_auto};
use chrono::{Duration, NaiveDateTime, Timelike};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("failed to open workbook: {0}")]
    Open(#[from] calamine::Error),

    #[error("workbook contains no worksheets")]
    NoWorksheets,

    #[error("failed to read worksheet '{name}': {source}")]
    Worksheet {
        name: String,
        #[source]
        source: calamine::Error,
    },
}

/// Summary of the first worksheet of an uploaded workbook
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SheetPreview {
    /// Worksheet the summary was taken from (always the first by position)
    pub sheet_name: String,
    /// All worksheet names, in workbook order
    pub sheet_names: Vec<String>,
    /// Data rows, header excluded
    pub num_rows: usize,
    pub num_cols: usize,
    pub columns: Vec<String>,
    /// Leading data rows, rendered as text
    pub rows: Vec<Vec<String>>,
}

/// Opens the workbook at `path` and summarises its first worksheet.
///
/// The format is picked from the file extension, so the path must keep the
/// extension the client uploaded.
pub fn extract_preview(path: &Path, preview_rows: usize) -> Result<SheetPreview, PreviewError> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = sheet_names
        .first()
        .cloned()
        .ok_or(PreviewError::NoWorksheets)?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|source| PreviewError::Worksheet {
            name: sheet_name.clone(),
            source,
        })?;

    tracing::debug!(
        "Loaded first worksheet '{}' of {} with {}x{} cells",
        sheet_name,
        sheet_names.len(),
        range.height(),
        range.width()
    );

    Ok(summarize(sheet_name, sheet_names, &range, preview_rows))
}

/// Builds the summary of an already loaded worksheet. The first row of the
/// range is the header.
///
/// calamine trims the range to the first used column; blank columns before
/// it are put back so that counts and `Unnamed: {i}` labels start at column A.
pub fn summarize(
    sheet_name: String,
    sheet_names: Vec<String>,
    range: &Range<Data>,
    preview_rows: usize,
) -> SheetPreview {
    let leading_cols = range.start().map_or(0, |(_, col)| col as usize);

    let mut rows = range.rows();
    let mut header = vec![Data::Empty; leading_cols];
    header.extend_from_slice(rows.next().unwrap_or(&[]));

    let rows = rows
        .take(preview_rows)
        .map(|row| {
            std::iter::repeat_n(String::new(), leading_cols)
                .chain(row.iter().map(render_cell))
                .collect()
        })
        .collect();

    let num_cols = if range.is_empty() {
        0
    } else {
        leading_cols + range.width()
    };

    SheetPreview {
        sheet_name,
        sheet_names,
        num_rows: range.height().saturating_sub(1),
        num_cols,
        columns: column_names(&header),
        rows,
    }
}

/// Header labels with blanks named by position and duplicates suffixed
/// `.1`, `.2`, ... in order of appearance.
pub fn column_names(header: &[Data]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(header.len());
    let mut counts: HashMap<String, usize> = HashMap::new();

    header
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            let label = render_cell(cell);
            let base = if label.trim().is_empty() {
                format!("Unnamed: {}", index)
            } else {
                label
            };

            let mut candidate = base.clone();
            while seen.contains(&candidate) {
                let n = counts.entry(base.clone()).or_insert(0);
                *n += 1;
                candidate = format!("{}.{}", base, n);
            }
            seen.insert(candidate.clone());
            candidate
        })
        .collect()
}

/// Display text for a single cell, without any coercion beyond what the
/// cell type implies.
pub fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::DateTime(value) if value.is_duration() => value
            .as_duration()
            .map(format_duration)
            .unwrap_or_else(|| cell.to_string()),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(format_datetime)
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    }
}

fn format_datetime(value: NaiveDateTime) -> String {
    if value.num_seconds_from_midnight() == 0 && value.nanosecond() == 0 {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Elapsed time as `[-]H:MM:SS`, hours not wrapped at a day, e.g. `36:00:00`
fn format_duration(value: Duration) -> String {
    let total = (value.num_milliseconds() as f64 / 1000.0).round() as i64;
    let sign = if total < 0 { "-" } else { "" };
    let secs = total.unsigned_abs();
    format!(
        "{}{}:{:02}:{:02}",
        sign,
        secs / 3600,
        secs / 60 % 60,
        secs % 60
    )
}
