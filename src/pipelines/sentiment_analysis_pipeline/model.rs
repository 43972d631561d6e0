use crate::core::ModelOptions;

/// Native label of a two-class classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryLabel {
    Positive,
    Negative,
}

impl BinaryLabel {
    pub fn opposite(self) -> Self {
        match self {
            BinaryLabel::Positive => BinaryLabel::Negative,
            BinaryLabel::Negative => BinaryLabel::Positive,
        }
    }
}

/// A classifier's output in its own label vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPrediction {
    /// Two-class output: the winning label and its probability.
    Binary { label: BinaryLabel, score: f32 },
    /// Three or more classes: the arg-max label, its probability and the
    /// full distribution in the model's label order.
    MultiClass {
        label: String,
        score: f32,
        scores: Vec<(String, f32)>,
    },
    /// The input was blank and the model was not invoked.
    Blank,
}

impl RawPrediction {
    /// Build a multi-class prediction from a probability distribution.
    ///
    /// Returns `None` for an empty distribution. Ties go to the first label.
    pub fn from_distribution(scores: Vec<(String, f32)>) -> Option<Self> {
        let (label, score) = scores.iter().fold(None, |best: Option<(&String, f32)>, (l, s)| {
            match best {
                Some((_, best_score)) if *s <= best_score => best,
                _ => Some((l, *s)),
            }
        })?;
        let label = label.clone();
        Some(RawPrediction::MultiClass {
            label,
            score,
            scores,
        })
    }
}

/// A pre-trained sentiment classifier.
///
/// Implementations are loaded once per process through the model cache and
/// then shared between threads, so inference takes `&self`.
pub trait SentimentAnalysisModel: Send + Sync + 'static {
    type Options: std::fmt::Debug + Clone + ModelOptions + Send + Sync;

    fn new(options: Self::Options, device: candle_core::Device) -> anyhow::Result<Self>
    where
        Self: Sized;

    fn predict(&self, text: &str) -> anyhow::Result<RawPrediction>;

    /// Classify several texts. One entry per input, in input order.
    fn predict_batch(&self, texts: &[&str]) -> Vec<anyhow::Result<RawPrediction>> {
        texts.iter().map(|text| self.predict(text)).collect()
    }

    fn device(&self) -> &candle_core::Device;
}
