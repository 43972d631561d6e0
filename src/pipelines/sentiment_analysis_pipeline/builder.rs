use super::model::SentimentAnalysisModel;
use super::pipeline::SentimentAnalysisPipeline;
use crate::models::{LexiconModel, LexiconOptions, ModernBertSize, SentimentModernBertModel};
use crate::pipelines::utils::{DeviceRequest, DeviceSelectable};
use once_cell::sync::OnceCell;

/// Longest text, in characters, handed to the model.
pub const DEFAULT_MAX_CHARS: usize = 2048;

/// Texts per model call in batch classification.
pub const DEFAULT_BATCH_SIZE: usize = 16;

pub struct SentimentAnalysisPipelineBuilder<M: SentimentAnalysisModel> {
    options: M::Options,
    device_request: DeviceRequest,
    max_chars: usize,
    batch_size: usize,
}

impl<M: SentimentAnalysisModel> SentimentAnalysisPipelineBuilder<M> {
    pub fn new(options: M::Options) -> Self {
        Self {
            options,
            device_request: DeviceRequest::Default,
            max_chars: DEFAULT_MAX_CHARS,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Truncate longer texts to this many characters before inference.
    pub fn max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Build the pipeline. The model itself loads lazily on first use.
    pub fn build(self) -> SentimentAnalysisPipeline<M> {
        SentimentAnalysisPipeline {
            options: self.options,
            device_request: self.device_request,
            max_chars: self.max_chars,
            batch_size: self.batch_size,
            model: OnceCell::new(),
        }
    }
}

impl<M: SentimentAnalysisModel> DeviceSelectable for SentimentAnalysisPipelineBuilder<M> {
    fn device_request_mut(&mut self) -> &mut DeviceRequest {
        &mut self.device_request
    }
}

impl SentimentAnalysisPipelineBuilder<SentimentModernBertModel> {
    pub fn modernbert(size: ModernBertSize) -> Self {
        Self::new(size)
    }
}

impl SentimentAnalysisPipelineBuilder<LexiconModel> {
    /// Rule-based review lexicon. Needs no downloads and always runs on CPU.
    pub fn lexicon() -> Self {
        Self::new(LexiconOptions::default()).cpu()
    }
}
