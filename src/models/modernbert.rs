//! ModernBERT sentiment classifier.
//!
//! Uses `candle_transformers::models::modernbert` for the network and the Hub
//! loaders for `config.json`, weights and `tokenizer.json`.

use crate::core::ModelOptions;
use crate::loaders::{ClassifierFilesLoader, TokenizerLoader};
use crate::pipelines::sentiment_analysis_pipeline::model::{RawPrediction, SentimentAnalysisModel};
use anyhow::{Error as E, Result as AnyhowResult};
use candle_core::{DType, Device, Tensor};
use candle_nn::{ops::softmax, VarBuilder};
use candle_transformers::models::modernbert::{
    Config, ModernBertForSequenceClassification as CandleModernBertForSequenceClassification,
};
use serde::Deserialize;
use std::collections::HashMap;
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

/// Longest token sequence fed to the encoder.
const MAX_TOKENS: usize = 512;

/// Available ModernBERT sentiment model sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModernBertSize {
    Base,
    Large,
}

impl ModernBertSize {
    pub fn repo_id(&self) -> &'static str {
        match self {
            ModernBertSize::Base => "clapAI/modernBERT-base-multilingual-sentiment",
            ModernBertSize::Large => "clapAI/modernBERT-large-multilingual-sentiment",
        }
    }
}

impl std::fmt::Display for ModernBertSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ModernBertSize::Base => "modernbert-sentiment-base",
            ModernBertSize::Large => "modernbert-sentiment-large",
        };
        write!(f, "{name}")
    }
}

impl ModelOptions for ModernBertSize {
    fn cache_key(&self) -> String {
        self.to_string()
    }
}

#[derive(Deserialize)]
struct ClassifierConfigJson {
    #[serde(default)]
    id2label: HashMap<String, String>,
}

/// Sentiment analysis model using ModernBERT.
pub struct SentimentModernBertModel {
    model: CandleModernBertForSequenceClassification,
    tokenizer: Tokenizer,
    device: Device,
    labels: Vec<String>,
    span: tracing::Span,
}

impl SentimentModernBertModel {
    pub fn new(size: ModernBertSize, device: Device) -> AnyhowResult<Self> {
        let repo_id = size.repo_id();
        let files = ClassifierFilesLoader::new(repo_id).load()?;

        let config_content = std::fs::read_to_string(&files.config).map_err(|e| {
            E::msg(format!(
                "Failed to read config file {:?}: {e}",
                files.config
            ))
        })?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| E::msg(format!("Failed to parse model config: {e}")))?;
        let class_cfg: ClassifierConfigJson = serde_json::from_str(&config_content)
            .map_err(|e| E::msg(format!("Failed to parse classifier config: {e}")))?;
        let labels = ordered_labels(&class_cfg.id2label)?;

        let vb = if files
            .weights
            .extension()
            .is_some_and(|ext| ext == "safetensors")
        {
            unsafe { VarBuilder::from_mmaped_safetensors(&[&files.weights], DType::F32, &device)? }
        } else {
            VarBuilder::from_pth(&files.weights, DType::F32, &device)?
        };
        let model = CandleModernBertForSequenceClassification::load(vb, &config)?;

        let tokenizer = Self::get_tokenizer(size)?;
        let span = tracing::span!(tracing::Level::TRACE, "sentiment-forward");

        tracing::debug!(repo = repo_id, labels = ?labels, "modernbert sentiment model ready");

        Ok(Self {
            model,
            tokenizer,
            device,
            labels,
            span,
        })
    }

    /// Tokenizer for `size`, padding batches to their longest member.
    pub fn get_tokenizer(size: ModernBertSize) -> AnyhowResult<Tokenizer> {
        let mut tokenizer = TokenizerLoader::new(size.repo_id(), "tokenizer.json").load()?;

        let pad_id = tokenizer
            .get_padding()
            .map(|p| p.pad_id)
            .or_else(|| tokenizer.token_to_id("[PAD]"))
            .unwrap_or(0);
        let pad_token = tokenizer
            .id_to_token(pad_id)
            .unwrap_or_else(|| "[PAD]".to_string());
        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            pad_id,
            pad_token,
            ..Default::default()
        }));
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_TOKENS,
                ..Default::default()
            }))
            .map_err(E::msg)?;

        Ok(tokenizer)
    }

    fn forward_batch(&self, texts: &[&str]) -> AnyhowResult<Vec<Vec<f32>>> {
        let _enter = self.span.enter();

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| E::msg(format!("Tokenization error: {e}")))?;
        let batch = encodings.len();
        let seq_len = encodings.first().map_or(0, |e| e.get_ids().len());

        let mut ids = Vec::with_capacity(batch * seq_len);
        let mut mask = Vec::with_capacity(batch * seq_len);
        for encoding in &encodings {
            ids.extend_from_slice(encoding.get_ids());
            mask.extend_from_slice(encoding.get_attention_mask());
        }

        let input_ids = Tensor::from_vec(ids, (batch, seq_len), &self.device)?;
        let attention_mask = Tensor::from_vec(mask, (batch, seq_len), &self.device)?;

        let output = self.model.forward(&input_ids, &attention_mask)?;
        let rows = output.to_dtype(DType::F32)?.to_vec2::<f32>()?;

        rows.into_iter().map(|row| to_probabilities(&row)).collect()
    }

    fn to_prediction(&self, probabilities: Vec<f32>) -> AnyhowResult<RawPrediction> {
        if probabilities.len() != self.labels.len() {
            anyhow::bail!(
                "model produced {} scores for {} labels",
                probabilities.len(),
                self.labels.len()
            );
        }
        let scores = self.labels.iter().cloned().zip(probabilities).collect();
        RawPrediction::from_distribution(scores)
            .ok_or_else(|| E::msg("model produced an empty distribution"))
    }
}

impl SentimentAnalysisModel for SentimentModernBertModel {
    type Options = ModernBertSize;

    fn new(options: Self::Options, device: Device) -> AnyhowResult<Self> {
        SentimentModernBertModel::new(options, device)
    }

    fn predict(&self, text: &str) -> AnyhowResult<RawPrediction> {
        let mut rows = self.forward_batch(&[text])?;
        let row = rows
            .pop()
            .ok_or_else(|| E::msg("model returned no output"))?;
        self.to_prediction(row)
    }

    /// One padded forward pass; if it fails, each text is retried alone so a
    /// single bad input only fails its own row.
    fn predict_batch(&self, texts: &[&str]) -> Vec<AnyhowResult<RawPrediction>> {
        match self.forward_batch(texts) {
            Ok(rows) if rows.len() == texts.len() => rows
                .into_iter()
                .map(|row| self.to_prediction(row))
                .collect(),
            Ok(_) | Err(_) => texts.iter().map(|text| self.predict(text)).collect(),
        }
    }

    fn device(&self) -> &Device {
        &self.device
    }
}

/// Labels ordered by class id (`"0"`, `"1"`, ...).
fn ordered_labels(id2label: &HashMap<String, String>) -> AnyhowResult<Vec<String>> {
    if id2label.is_empty() {
        anyhow::bail!("model config has no id2label mapping");
    }
    (0..id2label.len())
        .map(|id| {
            id2label
                .get(&id.to_string())
                .cloned()
                .ok_or_else(|| E::msg(format!("id2label is missing class id {id}")))
        })
        .collect()
}

/// Accepts either logits or an already normalized distribution.
fn to_probabilities(row: &[f32]) -> AnyhowResult<Vec<f32>> {
    let sum: f32 = row.iter().sum();
    let normalized = row.iter().all(|p| (0.0..=1.0).contains(p)) && (sum - 1.0).abs() < 1e-3;
    if normalized {
        return Ok(row.to_vec());
    }
    let logits = Tensor::new(row, &Device::Cpu)?;
    Ok(softmax(&logits, 0)?.to_vec1::<f32>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_class_ids() {
        let id2label: HashMap<String, String> = [
            ("2".to_string(), "positive".to_string()),
            ("0".to_string(), "negative".to_string()),
            ("1".to_string(), "neutral".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            ordered_labels(&id2label).unwrap(),
            vec!["negative", "neutral", "positive"]
        );
    }

    #[test]
    fn gaps_in_class_ids_are_rejected() {
        let id2label: HashMap<String, String> =
            [("0".to_string(), "a".to_string()), ("2".to_string(), "b".to_string())]
                .into_iter()
                .collect();
        assert!(ordered_labels(&id2label).is_err());
    }

    #[test]
    fn logits_are_softmaxed() {
        let probs = to_probabilities(&[2.0, 0.0, -1.0]).unwrap();
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs[0] > probs[1] && probs[1] > probs[2]);
    }

    #[test]
    fn distributions_pass_through() {
        assert_eq!(to_probabilities(&[0.2, 0.8]).unwrap(), vec![0.2, 0.8]);
    }

    #[test]
    #[ignore = "downloads ModernBERT weights from the Hugging Face Hub"]
    fn classifies_with_downloaded_weights() {
        let model = SentimentModernBertModel::new(ModernBertSize::Base, Device::Cpu).unwrap();
        let raw = model.predict("I love this product!").unwrap();
        assert!(matches!(raw, RawPrediction::MultiClass { .. }));
    }
}
