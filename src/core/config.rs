use crate::core::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Header substrings that usually mark the review text column, highest priority first.
pub const DEFAULT_TEXT_CANDIDATES: &[&str] = &[
    "review",
    "text",
    "comment",
    "content",
    "feedback",
    "description",
    "message",
    "body",
];

/// Tunables for column detection, label normalization and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Header substrings tried in order when looking for the text column.
    pub text_candidates: Vec<String>,
    /// Average cell length (characters) a column must exceed to count as free text.
    pub min_average_len: f32,
    /// Binary scores below this value are reported as `neutral`.
    pub neutral_threshold: f32,
    /// Decimal places written for `sentiment_confidence`.
    pub confidence_precision: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            text_candidates: DEFAULT_TEXT_CANDIDATES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            min_average_len: 15.0,
            neutral_threshold: 0.6,
            confidence_precision: 4,
        }
    }
}

impl AnalysisConfig {
    /// Read a config from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = AnalysisConfig::from_json_str(r#"{ "neutral_threshold": 0.7 }"#).unwrap();
        assert_eq!(config.neutral_threshold, 0.7);
        assert_eq!(config.confidence_precision, 4);
        assert_eq!(config.text_candidates[0], "review");
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.json");
        std::fs::write(&path, r#"{ "text_candidates": ["opinion"], "min_average_len": 30 }"#)
            .unwrap();

        let config = AnalysisConfig::from_json_file(&path).unwrap();
        assert_eq!(config.text_candidates, vec!["opinion".to_string()]);
        assert_eq!(config.min_average_len, 30.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(AnalysisConfig::from_json_str("{ nope").is_err());
    }
}
