use crate::pipelines::sentiment_analysis_pipeline::{BinaryLabel, RawPrediction};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentiment class written to the `sentiment` column.
///
/// `Unknown` marks rows whose classification failed. Normalization never
/// produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
    Unknown,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(SentimentLabel::Positive),
            "neutral" => Ok(SentimentLabel::Neutral),
            "negative" => Ok(SentimentLabel::Negative),
            "unknown" => Ok(SentimentLabel::Unknown),
            other => Err(format!("unknown sentiment label `{other}`")),
        }
    }
}

/// A normalized classification: one of three labels and a confidence in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub confidence: f32,
}

impl SentimentResult {
    pub fn neutral_blank() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            confidence: 0.0,
        }
    }
}

const POSITIVE_LABELS: &[&str] = &[
    "positive",
    "pos",
    "very positive",
    "very_positive",
    "4 stars",
    "5 stars",
    "label_2",
];
const NEUTRAL_LABELS: &[&str] = &["neutral", "neu", "mixed", "3 stars", "label_1"];
const NEGATIVE_LABELS: &[&str] = &[
    "negative",
    "neg",
    "very negative",
    "very_negative",
    "1 star",
    "2 stars",
    "label_0",
];

/// Maps classifier output onto `positive` / `neutral` / `negative`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelNormalizer {
    neutral_threshold: f32,
    precision: usize,
}

impl Default for LabelNormalizer {
    fn default() -> Self {
        Self::new(0.6)
    }
}

impl LabelNormalizer {
    /// Binary scores below `neutral_threshold` become `neutral`.
    pub fn new(neutral_threshold: f32) -> Self {
        Self {
            neutral_threshold: clamp_unit(neutral_threshold),
            precision: 4,
        }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn neutral_threshold(&self) -> f32 {
        self.neutral_threshold
    }

    pub fn normalize(&self, text: &str, raw: &RawPrediction) -> SentimentResult {
        if text.trim().is_empty() {
            return SentimentResult::neutral_blank();
        }

        let (label, confidence) = match raw {
            RawPrediction::Blank => return SentimentResult::neutral_blank(),
            RawPrediction::Binary { label, score } => self.binary(*label, clamp_unit(*score)),
            RawPrediction::MultiClass { label, score, .. } => {
                (map_label(label), clamp_unit(*score))
            }
        };

        SentimentResult {
            label,
            confidence: round_to(confidence, self.precision),
        }
    }

    /// A score below 0.5 is read as the opposite label at `1 - score`. Inside
    /// the neutral band the confidence grows from 0.5 just under the threshold
    /// to 1.0 at a score of 0.5.
    fn binary(&self, label: BinaryLabel, score: f32) -> (SentimentLabel, f32) {
        let (label, score) = if score < 0.5 {
            (label.opposite(), 1.0 - score)
        } else {
            (label, score)
        };
        if score >= self.neutral_threshold {
            let label = match label {
                BinaryLabel::Positive => SentimentLabel::Positive,
                BinaryLabel::Negative => SentimentLabel::Negative,
            };
            return (label, score);
        }
        let width = (self.neutral_threshold - 0.5).max(f32::EPSILON);
        let depth = ((self.neutral_threshold - score) / width).clamp(0.0, 1.0);
        (SentimentLabel::Neutral, 0.5 + 0.5 * depth)
    }
}

fn map_label(label: &str) -> SentimentLabel {
    let label = label.trim().to_lowercase();
    if POSITIVE_LABELS.contains(&label.as_str()) {
        SentimentLabel::Positive
    } else if NEGATIVE_LABELS.contains(&label.as_str()) {
        SentimentLabel::Negative
    } else {
        if !NEUTRAL_LABELS.contains(&label.as_str()) {
            tracing::debug!(label = %label, "unmapped model label treated as neutral");
        }
        SentimentLabel::Neutral
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

pub(crate) fn round_to(value: f32, precision: usize) -> f32 {
    let factor = 10f64.powi(precision.min(9) as i32);
    ((value as f64 * factor).round() / factor) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(label: BinaryLabel, score: f32) -> RawPrediction {
        RawPrediction::Binary { label, score }
    }

    fn multi(label: &str, score: f32) -> RawPrediction {
        RawPrediction::MultiClass {
            label: label.to_string(),
            score,
            scores: vec![(label.to_string(), score)],
        }
    }

    #[test]
    fn blank_text_is_neutral_with_zero_confidence() {
        let n = LabelNormalizer::default();
        for text in ["", "   ", "\n\t"] {
            assert_eq!(
                n.normalize(text, &binary(BinaryLabel::Positive, 0.99)),
                SentimentResult::neutral_blank()
            );
        }
        assert_eq!(
            n.normalize("ignored", &RawPrediction::Blank),
            SentimentResult::neutral_blank()
        );
    }

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(LabelNormalizer::new(1.5).neutral_threshold(), 1.0);
        let n = LabelNormalizer::new(0.6);
        let at = n.normalize("ok", &binary(BinaryLabel::Positive, 0.6));
        assert_eq!(at.label, SentimentLabel::Positive);
        assert_eq!(at.confidence, 0.6);

        let below = n.normalize("ok", &binary(BinaryLabel::Positive, 0.5999));
        assert_eq!(below.label, SentimentLabel::Neutral);
        assert!((below.confidence - 0.5005).abs() < 1e-4);
    }

    #[test]
    fn coin_flip_is_confidently_neutral() {
        let r = LabelNormalizer::new(0.6).normalize("meh", &binary(BinaryLabel::Negative, 0.5));
        assert_eq!(r.label, SentimentLabel::Neutral);
        assert_eq!(r.confidence, 1.0);
    }

    #[test]
    fn low_scores_flip_to_the_other_label() {
        let n = LabelNormalizer::new(0.6);
        let r = n.normalize("meh", &binary(BinaryLabel::Positive, 0.05));
        assert_eq!(r.label, SentimentLabel::Negative);
        assert_eq!(r.confidence, 0.95);

        let r = n.normalize("meh", &binary(BinaryLabel::Negative, 0.45));
        assert_eq!(r.label, SentimentLabel::Neutral);
        assert!((r.confidence - 0.75).abs() < 1e-4);
    }

    #[test]
    fn negative_binary_keeps_label() {
        let r = LabelNormalizer::default().normalize("bad", &binary(BinaryLabel::Negative, 0.91234));
        assert_eq!(r.label, SentimentLabel::Negative);
        assert_eq!(r.confidence, 0.9123);
    }

    #[test]
    fn scores_are_clamped() {
        let n = LabelNormalizer::default();
        assert_eq!(n.normalize("x", &multi("positive", 1.7)).confidence, 1.0);
        assert_eq!(n.normalize("x", &multi("positive", f32::NAN)).confidence, 0.0);
    }

    #[test]
    fn multi_class_vocabularies_map() {
        let n = LabelNormalizer::default();
        assert_eq!(n.normalize("x", &multi("5 stars", 0.8)).label, SentimentLabel::Positive);
        assert_eq!(n.normalize("x", &multi("LABEL_0", 0.8)).label, SentimentLabel::Negative);
        assert_eq!(n.normalize("x", &multi("Mixed", 0.8)).label, SentimentLabel::Neutral);
        assert_eq!(n.normalize("x", &multi("Very Negative", 0.8)).label, SentimentLabel::Negative);
    }

    #[test]
    fn unmapped_labels_are_neutral() {
        let r = LabelNormalizer::default().normalize("x", &multi("sarcastic", 0.77));
        assert_eq!(r.label, SentimentLabel::Neutral);
        assert_eq!(r.confidence, 0.77);
    }

    #[test]
    fn labels_parse_back() {
        for label in [
            SentimentLabel::Positive,
            SentimentLabel::Neutral,
            SentimentLabel::Negative,
            SentimentLabel::Unknown,
        ] {
            assert_eq!(label.as_str().parse::<SentimentLabel>().unwrap(), label);
        }
        assert!("Positive".parse::<SentimentLabel>().is_err());
    }
}
