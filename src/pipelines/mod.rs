pub mod review_analysis_pipeline;
pub mod sentiment_analysis_pipeline;
pub mod stats;
pub mod utils;
