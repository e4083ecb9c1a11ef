//! Round-level aggregation policies
//!
//! How individual voice scores fold into one round score is a product
//! decision, so it is a selectable policy instead of fixed arithmetic.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Policy for folding per-voice consciousness scores into a round score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreAggregation {
    /// Arithmetic mean of all scores
    #[default]
    Mean,
    /// Score of the last voice to answer
    Latest,
    /// Highest score
    Max,
    /// Median score
    Median,
}

impl ScoreAggregation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreAggregation::Mean => "mean",
            ScoreAggregation::Latest => "latest",
            ScoreAggregation::Max => "max",
            ScoreAggregation::Median => "median",
        }
    }

    /// Aggregate scores given in arrival order
    ///
    /// Non-finite scores are ignored; an empty input yields `0.0`. The result
    /// is clamped to `[0, 1]`.
    pub fn aggregate(&self, scores: &[f64]) -> f64 {
        let finite: Vec<f64> = scores.iter().copied().filter(|s| s.is_finite()).collect();
        if finite.is_empty() {
            return 0.0;
        }

        let value = match self {
            ScoreAggregation::Mean => finite.iter().sum::<f64>() / finite.len() as f64,
            ScoreAggregation::Latest => finite[finite.len() - 1],
            ScoreAggregation::Max => finite.iter().copied().fold(f64::MIN, f64::max),
            ScoreAggregation::Median => {
                let mut sorted = finite;
                sorted.sort_by(|a, b| a.total_cmp(b));
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    (sorted[mid - 1] + sorted[mid]) / 2.0
                } else {
                    sorted[mid]
                }
            }
        };

        value.clamp(0.0, 1.0)
    }
}

impl std::fmt::Display for ScoreAggregation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ScoreAggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mean" | "average" => Ok(ScoreAggregation::Mean),
            "latest" | "last" => Ok(ScoreAggregation::Latest),
            "max" => Ok(ScoreAggregation::Max),
            "median" => Ok(ScoreAggregation::Median),
            other => Err(format!("unknown score aggregation: {other}")),
        }
    }
}

/// Union of pattern lists, deduplicated, in first-seen order
///
/// Blank patterns are dropped and surrounding whitespace trimmed.
pub fn collect_key_patterns<'a, I>(pattern_lists: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut seen = HashSet::new();
    let mut patterns = Vec::new();
    for list in pattern_lists {
        for pattern in list {
            let pattern = pattern.trim();
            if pattern.is_empty() {
                continue;
            }
            if seen.insert(pattern.to_string()) {
                patterns.push(pattern.to_string());
            }
        }
    }
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scores_aggregate_to_zero() {
        for policy in [
            ScoreAggregation::Mean,
            ScoreAggregation::Latest,
            ScoreAggregation::Max,
            ScoreAggregation::Median,
        ] {
            assert_eq!(policy.aggregate(&[]), 0.0);
        }
    }

    #[test]
    fn test_mean() {
        let score = ScoreAggregation::Mean.aggregate(&[0.2, 0.4, 0.9]);
        assert!((score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_latest_and_max() {
        assert_eq!(ScoreAggregation::Latest.aggregate(&[0.9, 0.1, 0.3]), 0.3);
        assert_eq!(ScoreAggregation::Max.aggregate(&[0.9, 0.1, 0.3]), 0.9);
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(ScoreAggregation::Median.aggregate(&[0.9, 0.1, 0.3]), 0.3);
        let even = ScoreAggregation::Median.aggregate(&[0.1, 0.2, 0.6, 0.8]);
        assert!((even - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_ignored_and_clamped() {
        assert_eq!(ScoreAggregation::Mean.aggregate(&[f64::NAN, 0.5]), 0.5);
        assert_eq!(ScoreAggregation::Max.aggregate(&[1.7]), 1.0);
    }

    #[test]
    fn test_parse() {
        assert_eq!("average".parse::<ScoreAggregation>().unwrap(), ScoreAggregation::Mean);
        assert_eq!("last".parse::<ScoreAggregation>().unwrap(), ScoreAggregation::Latest);
        assert!("mode".parse::<ScoreAggregation>().is_err());
    }

    #[test]
    fn test_collect_key_patterns() {
        let a = vec!["growth".to_string(), " trust ".to_string()];
        let b = vec!["trust".to_string(), String::new(), "risk".to_string()];
        let patterns = collect_key_patterns([a.as_slice(), b.as_slice()]);
        assert_eq!(patterns, vec!["growth", "trust", "risk"]);
    }
}
