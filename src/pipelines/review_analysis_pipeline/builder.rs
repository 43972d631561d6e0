use super::detector::TextColumnDetector;
use super::exporter::ResultExporter;
use super::normalizer::LabelNormalizer;
use super::pipeline::ReviewAnalysisPipeline;
use crate::core::AnalysisConfig;
use crate::models::{LexiconModel, ModernBertSize, SentimentModernBertModel};
use crate::pipelines::sentiment_analysis_pipeline::{
    SentimentAnalysisModel, SentimentAnalysisPipelineBuilder,
};
use crate::pipelines::utils::{DeviceRequest, DeviceSelectable};

pub struct ReviewAnalysisPipelineBuilder<M: SentimentAnalysisModel> {
    classifier: SentimentAnalysisPipelineBuilder<M>,
    config: AnalysisConfig,
}

impl<M: SentimentAnalysisModel> ReviewAnalysisPipelineBuilder<M> {
    pub fn new(classifier: SentimentAnalysisPipelineBuilder<M>) -> Self {
        Self {
            classifier,
            config: AnalysisConfig::default(),
        }
    }

    /// Replace all tunables at once, e.g. with a config read from JSON.
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    pub fn text_candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.text_candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    pub fn min_average_len(mut self, min_average_len: f32) -> Self {
        self.config.min_average_len = min_average_len;
        self
    }

    pub fn neutral_threshold(mut self, threshold: f32) -> Self {
        self.config.neutral_threshold = threshold;
        self
    }

    pub fn confidence_precision(mut self, precision: usize) -> Self {
        self.config.confidence_precision = precision;
        self
    }

    pub fn max_chars(mut self, max_chars: usize) -> Self {
        self.classifier = self.classifier.max_chars(max_chars);
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.classifier = self.classifier.batch_size(batch_size);
        self
    }

    /// Build the pipeline. The model still loads lazily on the first run.
    pub fn build(self) -> ReviewAnalysisPipeline<M> {
        let config = self.config;
        ReviewAnalysisPipeline {
            classifier: self.classifier.build(),
            detector: TextColumnDetector::from_config(&config),
            normalizer: LabelNormalizer::new(config.neutral_threshold)
                .with_precision(config.confidence_precision),
            exporter: ResultExporter::new(config.confidence_precision),
        }
    }
}

impl<M: SentimentAnalysisModel> DeviceSelectable for ReviewAnalysisPipelineBuilder<M> {
    fn device_request_mut(&mut self) -> &mut DeviceRequest {
        self.classifier.device_request_mut()
    }
}

impl ReviewAnalysisPipelineBuilder<SentimentModernBertModel> {
    pub fn modernbert(size: ModernBertSize) -> Self {
        Self::new(SentimentAnalysisPipelineBuilder::modernbert(size))
    }
}

impl ReviewAnalysisPipelineBuilder<LexiconModel> {
    pub fn lexicon() -> Self {
        Self::new(SentimentAnalysisPipelineBuilder::lexicon())
    }
}
