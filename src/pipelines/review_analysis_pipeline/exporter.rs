use super::normalizer::SentimentLabel;
use super::pipeline::{AugmentedTable, SentimentCell};
use crate::core::{Result, SentimentError, Table};
use csv::{QuoteStyle, Terminator, WriterBuilder};

pub const SENTIMENT_COLUMN: &str = "sentiment";
pub const CONFIDENCE_COLUMN: &str = "sentiment_confidence";

/// Writes an [`AugmentedTable`] as CSV and reads such CSV back.
///
/// Output is UTF-8 with `\n` line endings, fields quoted only when needed and
/// the confidence printed with a fixed number of decimals, so exporting an
/// imported export reproduces the same bytes.
///
/// Existing `sentiment` and `sentiment_confidence` columns are replaced by the
/// fresh ones, so a re-uploaded export keeps unique column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultExporter {
    precision: usize,
}

impl Default for ResultExporter {
    fn default() -> Self {
        Self { precision: 4 }
    }
}

impl ResultExporter {
    pub fn new(precision: usize) -> Self {
        Self { precision }
    }

    pub fn export(&self, augmented: &AugmentedTable) -> Result<Vec<u8>> {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        let table = augmented.table();
        let headers = table.headers();
        let kept: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !is_result_column(h))
            .map(|(index, _)| index)
            .collect();
        if kept.len() < table.column_count() {
            tracing::debug!("replacing existing sentiment columns in export");
        }

        writer
            .write_record(
                kept.iter()
                    .map(|&i| headers[i].as_str())
                    .chain([SENTIMENT_COLUMN, CONFIDENCE_COLUMN]),
            )
            .map_err(export_failed)?;

        for (row, cell) in table.rows().zip(augmented.cells()) {
            let values = row.cells();
            let confidence = format!("{:.*}", self.precision, cell.confidence);
            writer
                .write_record(
                    kept.iter()
                        .map(|&i| values[i].as_str())
                        .chain([cell.label.as_str(), confidence.as_str()]),
                )
                .map_err(export_failed)?;
        }

        writer
            .into_inner()
            .map_err(|e| SentimentError::ExportFailed(e.to_string()))
    }

    /// Parse CSV produced by [`export`](Self::export).
    pub fn import(&self, bytes: &[u8]) -> Result<AugmentedTable> {
        let table = Table::from_csv_bytes(bytes)?;
        let headers = table.headers();
        let width = headers.len();
        if width < 2
            || headers[width - 2] != SENTIMENT_COLUMN
            || headers[width - 1] != CONFIDENCE_COLUMN
        {
            return Err(SentimentError::InvalidCsv(format!(
                "expected trailing `{SENTIMENT_COLUMN}` and `{CONFIDENCE_COLUMN}` columns, found {headers:?}"
            )));
        }

        let original_headers = headers[..width - 2].to_vec();
        let mut rows = Vec::with_capacity(table.len());
        let mut cells = Vec::with_capacity(table.len());
        for row in table.rows() {
            let values = row.cells();
            let label: SentimentLabel = values[width - 2].parse().map_err(|e| {
                SentimentError::InvalidCsv(format!("row {}: {e}", row.index() + 1))
            })?;
            let confidence: f32 = values[width - 1].parse().map_err(|e| {
                SentimentError::InvalidCsv(format!(
                    "row {}: bad confidence `{}`: {e}",
                    row.index() + 1,
                    values[width - 1]
                ))
            })?;
            rows.push(values[..width - 2].to_vec());
            cells.push(SentimentCell { label, confidence });
        }

        AugmentedTable::new(Table::new(original_headers, rows)?, cells)
    }
}

fn is_result_column(header: &str) -> bool {
    header == SENTIMENT_COLUMN || header == CONFIDENCE_COLUMN
}

fn export_failed(e: csv::Error) -> SentimentError {
    SentimentError::ExportFailed(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn augmented() -> AugmentedTable {
        let table = Table::new(
            vec!["id".into(), "review".into()],
            vec![
                vec!["1".into(), "Great, \"really\" great".into()],
                vec!["2".into(), "line\nbreak".into()],
                vec!["3".into(), "".into()],
            ],
        )
        .unwrap();
        let cells = vec![
            SentimentCell {
                label: SentimentLabel::Positive,
                confidence: 0.91234,
            },
            SentimentCell::failed(),
            SentimentCell {
                label: SentimentLabel::Neutral,
                confidence: 0.0,
            },
        ];
        AugmentedTable::new(table, cells).unwrap()
    }

    #[test]
    fn writes_expected_bytes() {
        let bytes = ResultExporter::default().export(&augmented()).unwrap();
        let expected = "id,review,sentiment,sentiment_confidence\n\
                        1,\"Great, \"\"really\"\" great\",positive,0.9123\n\
                        2,\"line\nbreak\",unknown,0.0000\n\
                        3,,neutral,0.0000\n";
        assert_eq!(String::from_utf8(bytes).unwrap(), expected);
    }

    #[test]
    fn import_then_export_is_byte_identical() {
        let exporter = ResultExporter::default();
        let first = exporter.export(&augmented()).unwrap();
        let second = exporter.export(&exporter.import(&first).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn import_requires_sentiment_columns() {
        let err = ResultExporter::default()
            .import(b"id,review\n1,ok\n")
            .unwrap_err();
        assert!(matches!(err, SentimentError::InvalidCsv(_)));
    }

    #[test]
    fn existing_result_columns_are_replaced() {
        let table = Table::new(
            vec!["sentiment".into(), "review".into(), "sentiment_confidence".into()],
            vec![vec!["happy".into(), "fine".into(), "high".into()]],
        )
        .unwrap();
        let cells = vec![SentimentCell {
            label: SentimentLabel::Positive,
            confidence: 0.7,
        }];
        let exporter = ResultExporter::default();
        let bytes = exporter
            .export(&AugmentedTable::new(table, cells).unwrap())
            .unwrap();
        assert_eq!(
            String::from_utf8(bytes.clone()).unwrap(),
            "review,sentiment,sentiment_confidence\nfine,positive,0.7000\n"
        );
        let again = exporter.export(&exporter.import(&bytes).unwrap()).unwrap();
        assert_eq!(bytes, again);
    }

    #[test]
    fn precision_is_configurable() {
        let bytes = ResultExporter::new(2).export(&augmented()).unwrap();
        assert!(String::from_utf8(bytes).unwrap().contains(",positive,0.91\n"));
    }
}
