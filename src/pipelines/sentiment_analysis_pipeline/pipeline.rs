use super::model::{RawPrediction, SentimentAnalysisModel};
use crate::core::{global_cache, Result, SentimentError};
use crate::pipelines::utils::{build_cache_key, DeviceRequest};
use once_cell::sync::OnceCell;
use rayon::prelude::*;
use std::sync::Arc;

/// Scores review texts with a pre-trained sentiment model.
///
/// Building the pipeline is cheap. The model is loaded on the first call to
/// [`classify`](Self::classify) or [`classify_many`](Self::classify_many)
/// (or an explicit [`load`](Self::load)) through the process-wide model
/// cache, so every pipeline built with the same options and device shares one
/// model, and concurrent first calls trigger a single load.
pub struct SentimentAnalysisPipeline<M: SentimentAnalysisModel> {
    pub(crate) options: M::Options,
    pub(crate) device_request: DeviceRequest,
    pub(crate) max_chars: usize,
    pub(crate) batch_size: usize,
    pub(crate) model: OnceCell<Arc<M>>,
}

impl<M: SentimentAnalysisModel> SentimentAnalysisPipeline<M> {
    /// Load the model now instead of on first use.
    pub fn load(&self) -> Result<()> {
        self.model().map(|_| ())
    }

    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    /// The shared model handle, loading it if needed.
    pub fn model(&self) -> Result<Arc<M>> {
        self.model
            .get_or_try_init(|| {
                let device = self
                    .device_request
                    .clone()
                    .resolve()
                    .map_err(|e| SentimentError::ModelUnavailable(format!("device: {e}")))?;
                let key = build_cache_key(&self.options, &device);

                global_cache().get_or_create(&key, || {
                    tracing::info!(model = %key, "loading sentiment model");
                    M::new(self.options.clone(), device.clone()).map_err(|e| {
                        tracing::warn!(model = %key, error = %e, "sentiment model failed to load");
                        SentimentError::ModelUnavailable(format!("{e:#}"))
                    })
                })
            })
            .cloned()
    }

    /// Classify one text.
    ///
    /// Blank text yields [`RawPrediction::Blank`] without touching the model.
    pub fn classify(&self, text: &str) -> Result<RawPrediction> {
        if text.trim().is_empty() {
            return Ok(RawPrediction::Blank);
        }
        let model = self.model()?;
        model
            .predict(truncate_chars(text, self.max_chars))
            .map_err(|e| SentimentError::ClassificationFailed(format!("{e:#}")))
    }

    /// Classify many texts, one result per input in input order.
    ///
    /// The outer error is reserved for [`SentimentError::ModelUnavailable`];
    /// a failure on one text is reported in that text's slot only.
    pub fn classify_many(&self, texts: &[&str]) -> Result<Vec<Result<RawPrediction>>> {
        let pending: Vec<(usize, &str)> = texts
            .iter()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(i, text)| (i, truncate_chars(text, self.max_chars)))
            .collect();

        let mut results: Vec<Result<RawPrediction>> =
            texts.iter().map(|_| Ok(RawPrediction::Blank)).collect();
        if pending.is_empty() {
            return Ok(results);
        }

        let model = self.model()?;
        let scored: Vec<(usize, Result<RawPrediction>)> = pending
            .par_chunks(self.batch_size.max(1))
            .flat_map_iter(|chunk| {
                let inputs: Vec<&str> = chunk.iter().map(|(_, text)| *text).collect();
                let outputs = model.predict_batch(&inputs);
                chunk
                    .iter()
                    .map(|(i, _)| *i)
                    .zip(pad_outputs(outputs, chunk.len()))
                    .collect::<Vec<_>>()
            })
            .collect();

        for (index, result) in scored {
            results[index] = result;
        }
        Ok(results)
    }

    pub fn device(&self) -> Result<candle_core::Device> {
        Ok(self.model()?.device().clone())
    }
}

/// Map model errors to row failures and guard against short batch outputs.
fn pad_outputs(
    outputs: Vec<anyhow::Result<RawPrediction>>,
    expected: usize,
) -> impl Iterator<Item = Result<RawPrediction>> {
    let produced = outputs.len();
    outputs
        .into_iter()
        .map(|r| r.map_err(|e| SentimentError::ClassificationFailed(format!("{e:#}"))))
        .chain((produced..expected).map(|_| {
            Err(SentimentError::ClassificationFailed(
                "model returned no prediction for this text".to_string(),
            ))
        }))
        .take(expected)
}

/// Cut `text` to at most `max_chars` characters on a char boundary.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
