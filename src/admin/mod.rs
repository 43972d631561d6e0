//! Visit logging and upload storage for the admin view.
//!
//! Both write under one data directory, taken from `ADMIN_DATA_DIR` when set
//! and the system temp directory otherwise.

pub mod uploads;
pub mod visitor_log;

pub use uploads::{sanitize_name, StoredUpload, UploadStore, UPLOADS_DIR};
pub use visitor_log::{VisitorEntry, VisitorLog, PLACEHOLDER, VISITOR_LOG_FILE};

use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "ADMIN_DATA_DIR";

/// `$ADMIN_DATA_DIR`, or the system temp directory.
pub fn data_dir() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
}
