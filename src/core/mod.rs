pub mod cache;
pub mod config;
pub mod error;
pub mod table;

pub use cache::{global_cache, ModelCache, ModelOptions};
pub use config::{AnalysisConfig, DEFAULT_TEXT_CANDIDATES};
pub use error::{Result, SentimentError};
pub use table::{Row, Table};
