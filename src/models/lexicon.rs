//! Rule-based review lexicon.
//!
//! Scores a text by summing word polarities, flipping the sign after a
//! negation and scaling after an intensifier. The compound score is squashed
//! into a two-class prediction. No downloads, deterministic, CPU only.

use crate::core::ModelOptions;
use crate::pipelines::sentiment_analysis_pipeline::model::{
    BinaryLabel, RawPrediction, SentimentAnalysisModel,
};
use candle_core::Device;
use std::collections::HashMap;

const POSITIVE_WORDS: &[(&str, f32)] = &[
    ("amazing", 0.9),
    ("awesome", 0.9),
    ("excellent", 0.9),
    ("fantastic", 0.9),
    ("love", 0.8),
    ("loved", 0.8),
    ("perfect", 0.8),
    ("great", 0.7),
    ("wonderful", 0.8),
    ("best", 0.7),
    ("recommend", 0.6),
    ("recommended", 0.6),
    ("happy", 0.6),
    ("pleased", 0.6),
    ("good", 0.5),
    ("nice", 0.5),
    ("comfortable", 0.5),
    ("reliable", 0.5),
    ("sturdy", 0.5),
    ("fast", 0.4),
    ("easy", 0.4),
    ("works", 0.3),
    ("fine", 0.2),
];

const NEGATIVE_WORDS: &[(&str, f32)] = &[
    ("terrible", -0.9),
    ("awful", -0.9),
    ("horrible", -0.9),
    ("worst", -0.9),
    ("hate", -0.8),
    ("useless", -0.8),
    ("scam", -0.9),
    ("broke", -0.7),
    ("broken", -0.7),
    ("refund", -0.5),
    ("disappointed", -0.7),
    ("disappointing", -0.7),
    ("poor", -0.6),
    ("bad", -0.6),
    ("cheap", -0.4),
    ("defective", -0.7),
    ("waste", -0.7),
    ("return", -0.3),
    ("returned", -0.4),
    ("slow", -0.4),
    ("late", -0.4),
    ("flimsy", -0.5),
    ("problem", -0.5),
    ("fail", -0.6),
    ("failed", -0.6),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nothing", "cannot", "cant", "can't", "don't", "dont",
    "doesn't", "doesnt", "didn't", "didnt", "won't", "wont", "isn't", "isnt", "wasn't", "wasnt",
    "aren't", "arent", "hardly", "barely",
];

const INTENSIFIERS: &[(&str, f32)] = &[
    ("very", 1.5),
    ("really", 1.4),
    ("extremely", 2.0),
    ("absolutely", 1.8),
    ("totally", 1.5),
    ("so", 1.3),
    ("super", 1.5),
    ("slightly", 0.5),
    ("somewhat", 0.7),
    ("kinda", 0.7),
];

/// Squashing constant for the compound score. Smaller values saturate sooner.
const ALPHA: f32 = 0.25;

/// Extra or overriding word polarities for the lexicon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LexiconOptions {
    pub extra_words: Vec<(String, f32)>,
}

impl ModelOptions for LexiconOptions {
    fn cache_key(&self) -> String {
        if self.extra_words.is_empty() {
            return "review-lexicon".to_string();
        }
        let words: Vec<String> = self
            .extra_words
            .iter()
            .map(|(w, s)| format!("{w}={s}"))
            .collect();
        format!("review-lexicon[{}]", words.join(","))
    }
}

pub struct LexiconModel {
    words: HashMap<String, f32>,
    intensifiers: HashMap<&'static str, f32>,
    device: Device,
}

impl LexiconModel {
    pub fn new(options: LexiconOptions) -> Self {
        let mut words: HashMap<String, f32> = POSITIVE_WORDS
            .iter()
            .chain(NEGATIVE_WORDS)
            .map(|(w, s)| (w.to_string(), *s))
            .collect();
        for (word, score) in options.extra_words {
            words.insert(word.to_lowercase(), score.clamp(-1.0, 1.0));
        }

        Self {
            words,
            intensifiers: INTENSIFIERS.iter().copied().collect(),
            device: Device::Cpu,
        }
    }

    /// Compound polarity in `[-1, 1]`.
    pub fn compound(&self, text: &str) -> f32 {
        let mut total = 0.0f32;
        let mut negate_next = false;
        let mut intensity = 1.0f32;

        for token in text.split_whitespace() {
            let word = token
                .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase();
            if word.is_empty() {
                continue;
            }

            if NEGATIONS.contains(&word.as_str()) {
                negate_next = true;
                continue;
            }
            if let Some(multiplier) = self.intensifiers.get(word.as_str()) {
                intensity = *multiplier;
                continue;
            }
            if let Some(score) = self.words.get(&word) {
                let mut score = *score * intensity;
                if negate_next {
                    score = -score;
                }
                total += score;
                negate_next = false;
                intensity = 1.0;
            }

            if token.ends_with(['.', '!', '?', ',', ';']) {
                negate_next = false;
                intensity = 1.0;
            }
        }

        if total == 0.0 {
            return 0.0;
        }
        (total / (total * total + ALPHA).sqrt()).clamp(-1.0, 1.0)
    }
}

impl SentimentAnalysisModel for LexiconModel {
    type Options = LexiconOptions;

    fn new(options: Self::Options, _device: Device) -> anyhow::Result<Self> {
        Ok(LexiconModel::new(options))
    }

    /// Positive compound → `Positive`, otherwise `Negative`, with score
    /// `0.5 + |compound| / 2` so a text with no polar words scores 0.5.
    fn predict(&self, text: &str) -> anyhow::Result<RawPrediction> {
        let compound = self.compound(text);
        let label = if compound > 0.0 {
            BinaryLabel::Positive
        } else {
            BinaryLabel::Negative
        };
        Ok(RawPrediction::Binary {
            label,
            score: 0.5 + compound.abs() / 2.0,
        })
    }

    fn device(&self) -> &Device {
        &self.device
    }
}
