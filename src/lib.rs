pub mod admin;
pub mod core;
mod loaders;
pub mod models;
pub mod pipelines;
pub mod service;

// Re-export core types
pub use crate::core::{AnalysisConfig, Result, Row, SentimentError, Table};

// Re-export model types for easier access
pub use models::{LexiconModel, LexiconOptions, ModernBertSize, SentimentModernBertModel};

pub use pipelines::review_analysis_pipeline::{
    AnalysisReport, AnalysisSummary, AnalyzeOptions, ReviewAnalysisPipeline,
    ReviewAnalysisPipelineBuilder, SentimentLabel,
};
pub use service::{AnalysisService, UploadRequest};
