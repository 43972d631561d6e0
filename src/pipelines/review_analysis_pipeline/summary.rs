use super::normalizer::{SentimentLabel, SentimentResult};
use serde::Serialize;

/// The most confident row seen for a label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelExample {
    /// Zero-based row index in the uploaded table.
    pub row: usize,
    pub text: String,
    pub confidence: f32,
}

/// Per-label counts and one representative example per label.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    /// Rows whose classification failed (exported as `unknown`).
    pub failed: usize,
    pub total: usize,
    pub positive_example: Option<LabelExample>,
    pub neutral_example: Option<LabelExample>,
    pub negative_example: Option<LabelExample>,
}

impl AnalysisSummary {
    /// Count for `label`. `Unknown` reports the failed rows.
    pub fn count(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Unknown => self.failed,
        }
    }

    pub fn example(&self, label: SentimentLabel) -> Option<&LabelExample> {
        match label {
            SentimentLabel::Positive => self.positive_example.as_ref(),
            SentimentLabel::Neutral => self.neutral_example.as_ref(),
            SentimentLabel::Negative => self.negative_example.as_ref(),
            SentimentLabel::Unknown => None,
        }
    }

    /// Share of classified rows (failed rows excluded) with `label`, in `[0, 1]`.
    pub fn share(&self, label: SentimentLabel) -> f32 {
        let classified = self.total - self.failed;
        if classified == 0 || label == SentimentLabel::Unknown {
            return 0.0;
        }
        self.count(label) as f32 / classified as f32
    }

    /// Fold one row into the summary. Rows must arrive in table order so that
    /// ties keep the earliest row.
    pub(crate) fn record(&mut self, row: usize, text: &str, outcome: Option<&SentimentResult>) {
        self.total += 1;
        let Some(result) = outcome else {
            self.failed += 1;
            return;
        };

        let (count, example) = match result.label {
            SentimentLabel::Positive => (&mut self.positive, &mut self.positive_example),
            SentimentLabel::Neutral => (&mut self.neutral, &mut self.neutral_example),
            SentimentLabel::Negative => (&mut self.negative, &mut self.negative_example),
            SentimentLabel::Unknown => {
                self.failed += 1;
                return;
            }
        };
        *count += 1;

        let better = example
            .as_ref()
            .map_or(true, |best| result.confidence > best.confidence);
        if better {
            *example = Some(LabelExample {
                row,
                text: text.to_string(),
                confidence: result.confidence,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(label: SentimentLabel, confidence: f32) -> SentimentResult {
        SentimentResult { label, confidence }
    }

    #[test]
    fn counts_add_up() {
        let mut s = AnalysisSummary::default();
        s.record(0, "a", Some(&result(SentimentLabel::Positive, 0.9)));
        s.record(1, "b", None);
        s.record(2, "c", Some(&result(SentimentLabel::Negative, 0.7)));
        s.record(3, "", Some(&result(SentimentLabel::Neutral, 0.0)));

        assert_eq!(s.total, 4);
        assert_eq!(s.positive + s.neutral + s.negative + s.failed, s.total);
        assert_eq!(s.count(SentimentLabel::Unknown), 1);
        assert!((s.share(SentimentLabel::Positive) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn ties_keep_earliest_row() {
        let mut s = AnalysisSummary::default();
        s.record(0, "first", Some(&result(SentimentLabel::Positive, 0.8)));
        s.record(1, "second", Some(&result(SentimentLabel::Positive, 0.8)));
        s.record(2, "third", Some(&result(SentimentLabel::Positive, 0.7)));
        assert_eq!(s.example(SentimentLabel::Positive).unwrap().row, 0);

        s.record(3, "fourth", Some(&result(SentimentLabel::Positive, 0.95)));
        assert_eq!(s.example(SentimentLabel::Positive).unwrap().text, "fourth");
    }

    #[test]
    fn failed_rows_are_never_examples() {
        let mut s = AnalysisSummary::default();
        s.record(0, "broken", None);
        assert!(s.example(SentimentLabel::Positive).is_none());
        assert!(s.example(SentimentLabel::Unknown).is_none());
        assert_eq!(s.share(SentimentLabel::Positive), 0.0);
    }
}
