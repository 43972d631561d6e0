//! Sentiment classification of single texts.
//!
//! This module wraps a pre-trained classifier behind [`SentimentAnalysisModel`]
//! and returns its output in the model's own label vocabulary
//! ([`RawPrediction`]). Mapping onto `positive` / `neutral` / `negative` is the
//! job of the review analysis pipeline's normalizer.
//!
//! ## Main Types
//!
//! - [`SentimentAnalysisPipeline`] - lazily loaded, shareable classifier
//! - [`SentimentAnalysisPipelineBuilder`] - model, device and input limits
//! - [`SentimentAnalysisModel`] - trait for classifier backends
//! - [`RawPrediction`] - native classifier output
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use review_sentiment::pipelines::sentiment_analysis_pipeline::*;
//!
//! # fn main() -> review_sentiment::Result<()> {
//! let pipeline = SentimentAnalysisPipelineBuilder::modernbert(ModernBertSize::Base).build();
//!
//! // The model is downloaded and loaded here, once per process.
//! let raw = pipeline.classify("I love this product!")?;
//! println!("{raw:?}");
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod model;
pub mod pipeline;

pub use builder::{SentimentAnalysisPipelineBuilder, DEFAULT_BATCH_SIZE, DEFAULT_MAX_CHARS};
pub use model::{BinaryLabel, RawPrediction, SentimentAnalysisModel};
pub use pipeline::SentimentAnalysisPipeline;

pub use crate::models::{LexiconModel, LexiconOptions, ModernBertSize, SentimentModernBertModel};
pub use crate::pipelines::utils::DeviceSelectable;
