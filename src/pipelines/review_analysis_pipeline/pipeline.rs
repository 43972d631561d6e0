use super::detector::{Detection, TextColumnDetector};
use super::exporter::ResultExporter;
use super::normalizer::{LabelNormalizer, SentimentLabel, SentimentResult};
use super::summary::{AnalysisSummary, LabelExample};
use crate::core::{Result, SentimentError, Table};
use crate::pipelines::sentiment_analysis_pipeline::{SentimentAnalysisModel, SentimentAnalysisPipeline};
use crate::pipelines::stats::PipelineStats;
use serde::Serialize;

/// Label and confidence appended to one row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentCell {
    pub label: SentimentLabel,
    pub confidence: f32,
}

impl SentimentCell {
    /// Marker for a row whose classification failed.
    pub fn failed() -> Self {
        Self {
            label: SentimentLabel::Unknown,
            confidence: 0.0,
        }
    }
}

impl From<SentimentResult> for SentimentCell {
    fn from(result: SentimentResult) -> Self {
        Self {
            label: result.label,
            confidence: result.confidence,
        }
    }
}

/// The uploaded table with one sentiment cell per row.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedTable {
    table: Table,
    cells: Vec<SentimentCell>,
}

impl AugmentedTable {
    pub fn new(table: Table, cells: Vec<SentimentCell>) -> Result<Self> {
        if table.len() != cells.len() {
            return Err(SentimentError::InvalidCsv(format!(
                "{} sentiment cells for {} rows",
                cells.len(),
                table.len()
            )));
        }
        Ok(Self { table, cells })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn cells(&self) -> &[SentimentCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Everything produced by [`ReviewAnalysisPipeline::run`].
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    /// The column the review texts were read from.
    pub column: String,
    pub augmented: AugmentedTable,
    pub summary: AnalysisSummary,
    pub stats: PipelineStats,
}

impl AnalysisOutput {
    /// Up to `n` rows with `label`, most confident first, ties in row order.
    pub fn top_examples(&self, label: SentimentLabel, n: usize) -> Vec<LabelExample> {
        let table = self.augmented.table();
        let Some(index) = table.column_index(&self.column) else {
            return Vec::new();
        };

        let mut matches: Vec<LabelExample> = table
            .column(index)
            .zip(self.augmented.cells())
            .enumerate()
            .filter(|(_, (_, cell))| cell.label == label)
            .map(|(row, (text, cell))| LabelExample {
                row,
                text: text.to_string(),
                confidence: cell.confidence,
            })
            .collect();
        // Stable sort keeps row order among equal confidences.
        matches.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        matches.truncate(n);
        matches
    }
}

/// Options for [`ReviewAnalysisPipeline::analyze_csv`].
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Use this column instead of detecting one.
    pub column: Option<String>,
    /// WHATWG encoding label of the upload. UTF-8 when unset.
    pub encoding: Option<String>,
}

/// Result of analyzing an uploaded CSV file.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub column: String,
    pub summary: AnalysisSummary,
    pub stats: PipelineStats,
    /// The augmented table as CSV bytes.
    pub csv: Vec<u8>,
}

/// Detects the review column, classifies every row and summarizes the result.
pub struct ReviewAnalysisPipeline<M: SentimentAnalysisModel> {
    pub(crate) classifier: SentimentAnalysisPipeline<M>,
    pub(crate) detector: TextColumnDetector,
    pub(crate) normalizer: LabelNormalizer,
    pub(crate) exporter: ResultExporter,
}

impl<M: SentimentAnalysisModel> ReviewAnalysisPipeline<M> {
    pub fn classifier(&self) -> &SentimentAnalysisPipeline<M> {
        &self.classifier
    }

    pub fn detector(&self) -> &TextColumnDetector {
        &self.detector
    }

    pub fn exporter(&self) -> &ResultExporter {
        &self.exporter
    }

    /// Analyze `table`, reading review text from `column` or from the detected
    /// text column.
    ///
    /// A row whose classification fails is kept in place as `unknown` and
    /// counted in [`AnalysisSummary::failed`]. A model that cannot be loaded
    /// aborts the whole run with [`SentimentError::ModelUnavailable`].
    pub fn run(&self, table: &Table, column: Option<&str>) -> Result<AnalysisOutput> {
        if table.is_empty() || table.column_count() == 0 {
            return Err(SentimentError::EmptyTable {
                rows: table.len(),
                columns: table.column_count(),
            });
        }

        let stats = PipelineStats::start();
        let column = self.resolve_column(table, column)?;
        let index = table
            .column_index(&column)
            .ok_or_else(|| SentimentError::UnknownColumn {
                column: column.clone(),
                headers: table.headers().to_vec(),
            })?;

        let texts: Vec<&str> = table.column(index).collect();
        let predictions = self.classifier.classify_many(&texts)?;

        let mut summary = AnalysisSummary::default();
        let mut cells = Vec::with_capacity(texts.len());
        for (row, (text, prediction)) in texts.iter().zip(predictions).enumerate() {
            let cell = match prediction {
                Ok(raw) => {
                    let result = self.normalizer.normalize(text, &raw);
                    summary.record(row, text, Some(&result));
                    SentimentCell::from(result)
                }
                Err(e) if !e.is_row_level() => return Err(e),
                Err(e) => {
                    tracing::warn!(row, error = %e, "row classification failed");
                    summary.record(row, text, None);
                    SentimentCell::failed()
                }
            };
            cells.push(cell);
        }

        let stats = stats.finish(texts.len());
        tracing::info!(
            column = %column,
            rows = summary.total,
            positive = summary.positive,
            neutral = summary.neutral,
            negative = summary.negative,
            failed = summary.failed,
            neutral_threshold = self.normalizer.neutral_threshold(),
            elapsed_ms = stats.total_time.as_millis() as u64,
            "review analysis finished"
        );

        Ok(AnalysisOutput {
            column,
            augmented: AugmentedTable::new(table.clone(), cells)?,
            summary,
            stats,
        })
    }

    /// Parse an upload, analyze it and export the augmented CSV.
    pub fn analyze_csv(&self, bytes: &[u8], options: &AnalyzeOptions) -> Result<AnalysisReport> {
        let table = Table::from_csv_bytes_with_encoding(bytes, options.encoding.as_deref())?;
        let output = self.run(&table, options.column.as_deref())?;
        let csv = self.exporter.export(&output.augmented)?;

        Ok(AnalysisReport {
            column: output.column,
            summary: output.summary,
            stats: output.stats,
            csv,
        })
    }

    fn resolve_column(&self, table: &Table, column: Option<&str>) -> Result<String> {
        if let Some(column) = column {
            if table.column_index(column).is_none() {
                return Err(SentimentError::UnknownColumn {
                    column: column.to_string(),
                    headers: table.headers().to_vec(),
                });
            }
            return Ok(column.to_string());
        }

        match self.detector.detect(table) {
            Detection::Found(name) => Ok(name),
            Detection::NotFound => Err(SentimentError::NoTextColumnFound {
                headers: table.headers().to_vec(),
            }),
        }
    }
}
