//! In-memory CSV tables.
//!
//! A [`Table`] is an ordered header plus ordered rows of string cells. Every row
//! has exactly one cell per header, so column order and row order survive the
//! whole analysis unchanged.

use crate::core::error::{Result, SentimentError};
use csv::ReaderBuilder;
use encoding_rs::{Encoding, UTF_8};
use std::collections::HashSet;

/// Ordered, read-only table of string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, padding short rows with empty cells.
    ///
    /// Duplicate header names and rows wider than the header are rejected.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for header in &headers {
            if !seen.insert(header.as_str()) {
                return Err(SentimentError::InvalidCsv(format!(
                    "duplicate column name `{header}`"
                )));
            }
        }

        let width = headers.len();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(index, mut cells)| {
                if cells.len() > width {
                    return Err(SentimentError::InvalidCsv(format!(
                        "row {} has {} fields but the header has {}",
                        index + 1,
                        cells.len(),
                        width
                    )));
                }
                cells.resize(width, String::new());
                Ok(cells)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { headers, rows })
    }

    /// Parse UTF-8 CSV bytes with a header row. A leading BOM is ignored.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_csv_bytes_with_encoding(bytes, None)
    }

    /// Parse CSV bytes in the declared encoding (a WHATWG label such as
    /// `"windows-1252"`), or UTF-8 when `encoding` is `None`.
    pub fn from_csv_bytes_with_encoding(bytes: &[u8], encoding: Option<&str>) -> Result<Self> {
        let text = decode_text(bytes, encoding)?;
        Self::from_csv_str(&text)
    }

    /// Parse CSV text with a header row.
    pub fn from_csv_str(content: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| SentimentError::InvalidCsv(format!("failed to read header row: {e}")))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                SentimentError::InvalidCsv(format!("failed to parse row {}: {e}", index + 1))
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows (the header is not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(move |cells| cells.get(index).map(String::as_str).unwrap_or(""))
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|cells| Row {
            index,
            headers: &self.headers,
            cells,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.rows.iter().enumerate().map(|(index, cells)| Row {
            index,
            headers: &self.headers,
            cells,
        })
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    index: usize,
    headers: &'a [String],
    cells: &'a [String],
}

impl<'a> Row<'a> {
    /// Zero-based position of the row in its table.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Cell value by column name.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .position(|h| h == column)
            .and_then(|i| self.cells.get(i))
            .map(String::as_str)
    }

    pub fn cells(&self) -> &'a [String] {
        self.cells
    }
}

/// Decode uploaded bytes to text.
fn decode_text(bytes: &[u8], encoding: Option<&str>) -> Result<String> {
    match encoding {
        Some(label) => {
            let encoding = Encoding::for_label(label.trim().as_bytes())
                .ok_or_else(|| SentimentError::UnknownEncoding(label.to_string()))?;
            let (text, used, had_errors) = encoding.decode(bytes);
            if had_errors {
                return Err(SentimentError::InvalidCsv(format!(
                    "input is not valid {}",
                    used.name()
                )));
            }
            Ok(text.into_owned())
        }
        None => {
            let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
            if had_errors {
                return Err(SentimentError::InvalidCsv(
                    "input is not valid UTF-8; declare its encoding".to_string(),
                ));
            }
            Ok(text.into_owned())
        }
    }
}
