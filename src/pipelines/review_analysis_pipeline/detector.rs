use crate::core::{AnalysisConfig, Table};

/// One rule for picking the review text column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnMatcher {
    /// A header containing this substring, case-insensitively.
    Candidate(String),
    /// The first column whose non-empty cells are not all numeric and are on
    /// average longer than `min_average_len` characters.
    Textual { min_average_len: f32 },
    /// The only column of a one-column table.
    SoleColumn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    Found(String),
    NotFound,
}

impl Detection {
    pub fn column(&self) -> Option<&str> {
        match self {
            Detection::Found(name) => Some(name.as_str()),
            Detection::NotFound => None,
        }
    }
}

/// Picks the column most likely to hold free-text reviews.
///
/// Matchers run in order and the first hit wins. With the default matchers a
/// header containing `review` beats one containing `comment`, wherever the two
/// sit in the table.
#[derive(Debug, Clone, PartialEq)]
pub struct TextColumnDetector {
    matchers: Vec<ColumnMatcher>,
}

impl Default for TextColumnDetector {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl TextColumnDetector {
    pub fn new(matchers: Vec<ColumnMatcher>) -> Self {
        Self { matchers }
    }

    /// Candidate matchers from `config.text_candidates`, then the content
    /// heuristic, then the one-column rule.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        let mut matchers: Vec<ColumnMatcher> = config
            .text_candidates
            .iter()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .map(ColumnMatcher::Candidate)
            .collect();
        matchers.push(ColumnMatcher::Textual {
            min_average_len: config.min_average_len,
        });
        matchers.push(ColumnMatcher::SoleColumn);
        Self { matchers }
    }

    pub fn detect(&self, table: &Table) -> Detection {
        let headers = table.headers();
        for matcher in &self.matchers {
            let hit = match matcher {
                ColumnMatcher::Candidate(candidate) => match_candidate(headers, candidate),
                ColumnMatcher::Textual { min_average_len } => (0..headers.len())
                    .find(|&index| is_free_text(table.column(index), *min_average_len)),
                ColumnMatcher::SoleColumn => (headers.len() == 1).then_some(0),
            };
            if let Some(index) = hit {
                tracing::debug!(column = %headers[index], matcher = ?matcher, "text column detected");
                return Detection::Found(headers[index].clone());
            }
        }
        Detection::NotFound
    }

    /// Header-only detection: runs the candidate matchers alone.
    pub fn detect_in_headers(&self, headers: &[String]) -> Detection {
        self.matchers
            .iter()
            .filter_map(|matcher| match matcher {
                ColumnMatcher::Candidate(candidate) => match_candidate(headers, candidate),
                _ => None,
            })
            .next()
            .map_or(Detection::NotFound, |index| {
                Detection::Found(headers[index].clone())
            })
    }
}

fn match_candidate(headers: &[String], candidate: &str) -> Option<usize> {
    let candidate = candidate.to_lowercase();
    headers
        .iter()
        .position(|h| h.trim().to_lowercase().contains(&candidate))
}

fn is_free_text<'a>(cells: impl Iterator<Item = &'a str>, min_average_len: f32) -> bool {
    let mut count = 0usize;
    let mut total_chars = 0usize;
    let mut all_numeric = true;

    for cell in cells {
        let cell = cell.trim();
        if cell.is_empty() {
            continue;
        }
        count += 1;
        total_chars += cell.chars().count();
        if all_numeric && cell.parse::<f64>().is_err() {
            all_numeric = false;
        }
    }

    count > 0 && !all_numeric && (total_chars as f32 / count as f32) > min_average_len
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    fn detector(candidates: &[&str]) -> TextColumnDetector {
        TextColumnDetector::from_config(&AnalysisConfig {
            text_candidates: candidates.iter().map(|c| c.to_string()).collect(),
            ..AnalysisConfig::default()
        })
    }

    #[test]
    fn higher_priority_candidate_wins_regardless_of_position() {
        let t = table(&["id", "comment", "review"], &[&["1", "ok", "fine"]]);
        let found = detector(&["review", "comment", "text"]).detect(&t);
        assert_eq!(found, Detection::Found("review".to_string()));
    }

    #[test]
    fn candidates_match_substrings_case_insensitively() {
        let t = table(&["ID", " Customer Review "], &[&["1", "ok"]]);
        assert_eq!(
            TextColumnDetector::default().detect(&t).column(),
            Some(" Customer Review ")
        );
    }

    #[test]
    fn falls_back_to_long_text_column() {
        let t = table(
            &["id", "notes"],
            &[
                &["1", "The delivery was quick and the box was intact"],
                &["2", "Would order again from this seller"],
            ],
        );
        assert_eq!(
            TextColumnDetector::default().detect(&t),
            Detection::Found("notes".to_string())
        );
    }

    #[test]
    fn numeric_columns_are_not_text() {
        let t = table(
            &["order", "amount"],
            &[&["1", "12345678901234567890.5"], &["2", "98765432109876543210.25"]],
        );
        assert_eq!(TextColumnDetector::default().detect(&t), Detection::NotFound);
    }

    #[test]
    fn short_cells_do_not_count_as_text() {
        let t = table(&["id", "tag"], &[&["1", "blue"], &["2", "red"]]);
        assert_eq!(TextColumnDetector::default().detect(&t), Detection::NotFound);
    }

    #[test]
    fn single_column_is_used() {
        let t = table(&["x"], &[&["a"]]);
        assert_eq!(TextColumnDetector::default().detect(&t).column(), Some("x"));
    }

    #[test]
    fn header_only_detection_ignores_content() {
        let headers = vec!["id".to_string(), "notes".to_string()];
        assert_eq!(
            TextColumnDetector::default().detect_in_headers(&headers),
            Detection::NotFound
        );
        let headers = vec!["id".to_string(), "feedback_text".to_string()];
        assert_eq!(
            TextColumnDetector::default().detect_in_headers(&headers),
            Detection::Found("feedback_text".to_string())
        );
    }
}
