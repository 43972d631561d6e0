//! Review analysis over uploaded CSV tables.
//!
//! Given a [`Table`](crate::core::Table), the pipeline finds the column that
//! holds review text, classifies every row with a
//! [`SentimentAnalysisPipeline`](crate::pipelines::sentiment_analysis_pipeline::SentimentAnalysisPipeline),
//! maps each prediction onto `positive` / `neutral` / `negative` and appends
//! `sentiment` and `sentiment_confidence` columns.
//!
//! ## Main Types
//!
//! - [`ReviewAnalysisPipeline`] - detection, classification and summary
//! - [`ReviewAnalysisPipelineBuilder`] - classifier and tunables
//! - [`TextColumnDetector`] - picks the review text column
//! - [`LabelNormalizer`] - maps model labels to [`SentimentLabel`]
//! - [`ResultExporter`] - CSV output of an [`AugmentedTable`]
//!
//! ## Usage Example
//!
//! ```rust
//! use review_sentiment::pipelines::review_analysis_pipeline::*;
//!
//! # fn main() -> review_sentiment::Result<()> {
//! let pipeline = ReviewAnalysisPipelineBuilder::lexicon().build();
//!
//! let csv = b"id,review\n1,Great product!\n2,\"Terrible, broke in a day\"\n";
//! let report = pipeline.analyze_csv(csv, &AnalyzeOptions::default())?;
//!
//! assert_eq!(report.column, "review");
//! assert_eq!(report.summary.positive, 1);
//! assert_eq!(report.summary.negative, 1);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod detector;
pub mod exporter;
pub mod normalizer;
pub mod pipeline;
pub mod summary;

pub use builder::ReviewAnalysisPipelineBuilder;
pub use detector::{ColumnMatcher, Detection, TextColumnDetector};
pub use exporter::{ResultExporter, CONFIDENCE_COLUMN, SENTIMENT_COLUMN};
pub use normalizer::{LabelNormalizer, SentimentLabel, SentimentResult};
pub use pipeline::{
    AnalysisOutput, AnalysisReport, AnalyzeOptions, AugmentedTable, ReviewAnalysisPipeline,
    SentimentCell,
};
pub use summary::{AnalysisSummary, LabelExample};

pub use crate::pipelines::stats::PipelineStats;
pub use crate::pipelines::utils::DeviceSelectable;
