//! Hugging Face Hub loaders for classifier assets.
//!
//! - [`HfLoader`] - fetches one file from a model repository (cached by hf-hub)
//! - [`TokenizerLoader`] - loads `tokenizer.json`
//! - [`ClassifierFilesLoader`] - resolves `config.json` plus the weight file
//!
//! Every download retries briefly when hf-hub reports a lock acquisition
//! failure, which happens when two processes fetch the same file.

use hf_hub::api::sync::ApiBuilder;
use std::path::PathBuf;
use std::time::Duration;
use tokenizers::Tokenizer;

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone)]
pub struct HfLoader {
    pub repo: String,
    pub filename: String,
}

impl HfLoader {
    pub fn new(repo: &str, filename: &str) -> Self {
        Self {
            repo: repo.into(),
            filename: filename.into(),
        }
    }

    pub fn load(&self) -> anyhow::Result<PathBuf> {
        let hf_api = ApiBuilder::new().with_progress(false).build()?;
        let hf_api = hf_api.model(self.repo.clone());

        let mut attempt = 0;
        loop {
            match hf_api.get(self.filename.as_str()) {
                Ok(path) => return Ok(path),
                Err(e) => {
                    let retryable = e.to_string().contains("Lock acquisition failed");
                    if retryable && attempt + 1 < MAX_RETRIES {
                        let wait_time = Duration::from_millis(100 * (1 << attempt));
                        tracing::debug!(
                            repo = %self.repo,
                            file = %self.filename,
                            ?wait_time,
                            "hub lock busy, retrying"
                        );
                        std::thread::sleep(wait_time);
                        attempt += 1;
                        continue;
                    }
                    return Err(anyhow::anyhow!(
                        "failed to fetch `{}` from `{}`: {e}",
                        self.filename,
                        self.repo
                    ));
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct TokenizerLoader {
    pub tokenizer_file_loader: HfLoader,
}

impl TokenizerLoader {
    pub fn new(repo: &str, filename: &str) -> Self {
        Self {
            tokenizer_file_loader: HfLoader::new(repo, filename),
        }
    }

    pub fn load(&self) -> anyhow::Result<Tokenizer> {
        let tokenizer_file_path = self.tokenizer_file_loader.load()?;

        tokenizers::Tokenizer::from_file(tokenizer_file_path).map_err(anyhow::Error::msg)
    }
}

/// Local paths of a sequence classifier's config and weights.
#[derive(Debug, Clone)]
pub struct ClassifierFiles {
    pub config: PathBuf,
    pub weights: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ClassifierFilesLoader {
    pub repo: String,
}

impl ClassifierFilesLoader {
    pub fn new(repo: &str) -> Self {
        Self { repo: repo.into() }
    }

    /// Prefers `model.safetensors`, falling back to `pytorch_model.bin`.
    pub fn load(&self) -> anyhow::Result<ClassifierFiles> {
        let config = HfLoader::new(&self.repo, "config.json").load()?;
        let weights = HfLoader::new(&self.repo, "model.safetensors")
            .load()
            .or_else(|_| HfLoader::new(&self.repo, "pytorch_model.bin").load())
            .map_err(|e| {
                anyhow::anyhow!(
                    "model weights not found in `{}`; expected `model.safetensors` or `pytorch_model.bin`: {e}",
                    self.repo
                )
            })?;

        Ok(ClassifierFiles { config, weights })
    }
}
