//! Word-list loading from Excel and CSV files

use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{QuizError, Result};
use crate::vocabulary::{VocabRow, VocabularyIndex};

/// Header names of the two vocabulary columns. `None` picks the first/second column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub source_column: Option<String>,
    pub target_column: Option<String>,
}

/// Column index mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub source: usize,
    pub target: usize,
}

/// Load a word list and build the vocabulary index from it
pub fn load_index(path: impl AsRef<Path>, config: &DatasetConfig) -> Result<VocabularyIndex> {
    let rows = load_rows(path, config)?;
    Ok(VocabularyIndex::build(rows))
}

/// Load (source, target) rows from a spreadsheet or CSV file
pub fn load_rows(path: impl AsRef<Path>, config: &DatasetConfig) -> Result<Vec<VocabRow>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let rows = match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => parse_sheet(path, config)?,
        "csv" => parse_csv(path, config)?,
        _ => return Err(QuizError::UnsupportedFormat(extension)),
    };
    log::info!("loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Detect column indices from header names
pub fn detect_columns(headers: &[String], config: &DatasetConfig) -> Result<ColumnMapping> {
    let find = |wanted: &Option<String>, fallback: usize| -> Result<usize> {
        match wanted {
            Some(name) => {
                let name = name.trim().to_lowercase();
                headers
                    .iter()
                    .position(|h| h.trim().to_lowercase() == name)
                    .ok_or_else(|| QuizError::MissingColumn(name))
            }
            None if fallback < headers.len() => Ok(fallback),
            None => Err(QuizError::MissingColumn(format!("#{}", fallback + 1))),
        }
    };

    Ok(ColumnMapping {
        source: find(&config.source_column, 0)?,
        target: find(&config.target_column, 1)?,
    })
}

/// First worksheet of any workbook format calamine reads, picked by extension.
fn parse_sheet(path: &Path, config: &DatasetConfig) -> Result<Vec<VocabRow>> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .ok_or(QuizError::NoSheets)?
        .clone();
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let header_row = rows.next().ok_or(QuizError::EmptyFile)?;
    let headers: Vec<String> = header_row.iter().map(get_cell_string).collect();
    let mapping = detect_columns(&headers, config)?;

    let cell = |row: &[Data], i: usize| row.get(i).map(get_cell_string).filter(|s| !s.is_empty());
    Ok(rows
        .map(|row| (cell(row, mapping.source), cell(row, mapping.target)))
        .collect())
}

fn parse_csv(path: &Path, config: &DatasetConfig) -> Result<Vec<VocabRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(QuizError::EmptyFile);
    }
    let mapping = detect_columns(&headers, config)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let cell = |i: usize| record.get(i).map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        rows.push((cell(mapping.source), cell(mapping.target)));
    }
    Ok(rows)
}

/// Helper to extract string from Excel cell
fn get_cell_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
        Data::Empty => String::new(),
    }
}
