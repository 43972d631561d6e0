use thiserror::Error;

/// Errors returned by the review analysis API.
///
/// Run-level variants abort an analysis. [`SentimentError::ClassificationFailed`]
/// is the only row-level variant: the pipeline records it against the row and
/// keeps going.
#[derive(Debug, Error)]
pub enum SentimentError {
    /// The uploaded table has no rows or no columns.
    #[error("the uploaded table is empty ({rows} rows, {columns} columns)")]
    EmptyTable { rows: usize, columns: usize },

    /// Neither the candidate names nor the content heuristics found a text column.
    #[error("could not find a review text column among {headers:?}; please choose one explicitly")]
    NoTextColumnFound { headers: Vec<String> },

    /// The caller asked for a column the table does not have.
    #[error("column `{column}` does not exist; available columns: {headers:?}")]
    UnknownColumn {
        column: String,
        headers: Vec<String>,
    },

    /// The sentiment model could not be loaded. Nothing was classified.
    #[error("sentiment model unavailable: {0}")]
    ModelUnavailable(String),

    /// Inference failed for a single row.
    #[error("classification failed: {0}")]
    ClassificationFailed(String),

    /// The augmented table could not be serialized.
    #[error("export failed: {0}")]
    ExportFailed(String),

    /// The input bytes are not a well-formed CSV table.
    #[error("invalid CSV input: {0}")]
    InvalidCsv(String),

    /// The declared text encoding is not known.
    #[error("unknown text encoding `{0}`")]
    UnknownEncoding(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SentimentError {
    /// `true` for errors that only affect one row of a run.
    pub fn is_row_level(&self) -> bool {
        matches!(self, SentimentError::ClassificationFailed(_))
    }
}

pub type Result<T> = std::result::Result<T, SentimentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_classification_failures_are_row_level() {
        assert!(SentimentError::ClassificationFailed("bad".into()).is_row_level());
        assert!(!SentimentError::ModelUnavailable("gone".into()).is_row_level());
        assert!(!SentimentError::EmptyTable { rows: 0, columns: 1 }.is_row_level());
    }

    #[test]
    fn no_text_column_lists_headers() {
        let err = SentimentError::NoTextColumnFound {
            headers: vec!["id".into(), "score".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("\"id\""));
        assert!(msg.contains("\"score\""));
    }
}
