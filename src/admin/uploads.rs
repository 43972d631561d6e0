use crate::core::Result;
use chrono::Utc;
use std::path::{Path, PathBuf};

pub const UPLOADS_DIR: &str = "sentiment_uploads";

/// A file kept by [`UploadStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    pub name: String,
    pub path: PathBuf,
}

/// Keeps a copy of every uploaded file under `<data_dir>/sentiment_uploads/`.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: data_dir.as_ref().join(UPLOADS_DIR),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store `bytes` as `<sanitized name>_<unix seconds>` and return the stored name.
    pub fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredUpload> {
        let secs = u64::try_from(Utc::now().timestamp()).unwrap_or(0);
        self.save_at(original_name, bytes, secs)
    }

    pub fn save_at(&self, original_name: &str, bytes: &[u8], unix_secs: u64) -> Result<StoredUpload> {
        std::fs::create_dir_all(&self.dir)?;
        let name = format!("{}_{unix_secs}", sanitize_name(original_name));
        let path = self.dir.join(&name);
        std::fs::write(&path, bytes)?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "upload stored");
        Ok(StoredUpload { name, path })
    }

    /// Stored uploads, newest first.
    pub fn list(&self) -> Result<Vec<StoredUpload>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut uploads = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            uploads.push(StoredUpload {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path(),
            });
        }
        uploads.sort_by(|a, b| {
            stored_secs(&b.name)
                .cmp(&stored_secs(&a.name))
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(uploads)
    }
}

/// Replace everything except alphanumerics and `._-` with `_`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn stored_secs(name: &str) -> u64 {
    name.rsplit_once('_')
        .and_then(|(_, secs)| secs.parse().ok())
        .unwrap_or(0)
}
