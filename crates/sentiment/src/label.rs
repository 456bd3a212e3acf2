//! Sentiment labels and the numeric score mapping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Score given to neutral text and to every failure path.
pub const NEUTRAL_SCORE: f64 = 5.0;

const MIN_SCORE: f64 = 1.0;
const MAX_SCORE: f64 = 10.0;

/// One of the three sentiment categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// All labels, in reporting order.
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    /// Polarity used by trend and stability rollups: +1, 0 or -1.
    pub fn polarity(self) -> f64 {
        match self {
            SentimentLabel::Positive => 1.0,
            SentimentLabel::Negative => -1.0,
            SentimentLabel::Neutral => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
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

    /// Accepts English and Spanish words and the short `POS`/`NEG`/`NEU` tags.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();

        match normalized.as_str() {
            "positive" | "positivo" | "positiva" | "pos" => Ok(SentimentLabel::Positive),
            "negative" | "negativo" | "negativa" | "neg" => Ok(SentimentLabel::Negative),
            "neutral" | "neutro" | "neutra" | "neu" => Ok(SentimentLabel::Neutral),
            _ => Err(format!("unknown sentiment label: {}", s)),
        }
    }
}

/// A label with its confidence, as reported by a classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: SentimentLabel,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

/// Per-label probability estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelScores {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl LabelScores {
    /// Heuristic distribution: 0.6 for the chosen label, 0.2 for the others.
    pub fn heuristic(label: SentimentLabel) -> Self {
        let pick = |l: SentimentLabel| if l == label { 0.6 } else { 0.2 };
        Self {
            positive: pick(SentimentLabel::Positive),
            negative: pick(SentimentLabel::Negative),
            neutral: pick(SentimentLabel::Neutral),
        }
    }

    /// Distribution for a classifier answer: the remainder is split evenly.
    pub fn from_classification(classification: Classification) -> Self {
        let rest = (1.0 - classification.confidence) / 2.0;
        let pick = |l: SentimentLabel| {
            if l == classification.label {
                classification.confidence
            } else {
                rest
            }
        };
        Self {
            positive: pick(SentimentLabel::Positive),
            negative: pick(SentimentLabel::Negative),
            neutral: pick(SentimentLabel::Neutral),
        }
    }

    /// Distribution used for empty text.
    pub fn uniform() -> Self {
        Self {
            positive: 0.33,
            negative: 0.33,
            neutral: 0.34,
        }
    }
}

/// Which path produced a [`SentimentAnalysis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    /// The external classifier answered.
    Classifier,
    /// The keyword heuristic was used.
    Keywords,
    /// The text was empty after trimming.
    EmptyText,
}

/// Full result of scoring one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub label: SentimentLabel,
    pub confidence: f64,
    /// Numeric score in `[1, 10]`.
    pub score: f64,
    pub scores: LabelScores,
    pub analysis_type: AnalysisType,
}

impl SentimentAnalysis {
    pub(crate) fn new(
        classification: Classification,
        scores: LabelScores,
        analysis_type: AnalysisType,
    ) -> Self {
        Self {
            label: classification.label,
            confidence: classification.confidence,
            score: score_for(classification.label, classification.confidence),
            scores,
            analysis_type,
        }
    }

    pub(crate) fn empty() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            confidence: 0.5,
            score: NEUTRAL_SCORE,
            scores: LabelScores::uniform(),
            analysis_type: AnalysisType::EmptyText,
        }
    }
}

/// Map a label and confidence to the `[1, 10]` score.
///
/// Positive maps to `5 + 5c`, negative to `5 - 4c`, neutral to `5.0`.
/// Non-finite input yields [`NEUTRAL_SCORE`].
pub fn score_for(label: SentimentLabel, confidence: f64) -> f64 {
    if !confidence.is_finite() {
        return NEUTRAL_SCORE;
    }
    let c = confidence.clamp(0.0, 1.0);

    let score = match label {
        SentimentLabel::Positive => 5.0 + 5.0 * c,
        SentimentLabel::Negative => 5.0 - 4.0 * c,
        SentimentLabel::Neutral => NEUTRAL_SCORE,
    };

    score.clamp(MIN_SCORE, MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_mapping() {
        assert_eq!(score_for(SentimentLabel::Positive, 1.0), 10.0);
        assert_eq!(score_for(SentimentLabel::Positive, 0.0), 5.0);
        assert_eq!(score_for(SentimentLabel::Negative, 1.0), 1.0);
        assert!((score_for(SentimentLabel::Negative, 0.5) - 3.0).abs() < 1e-9);
        assert_eq!(score_for(SentimentLabel::Neutral, 0.99), 5.0);
    }

    #[test]
    fn test_score_mapping_out_of_range() {
        assert_eq!(score_for(SentimentLabel::Positive, 7.0), 10.0);
        assert_eq!(score_for(SentimentLabel::Negative, -3.0), 5.0);
        assert_eq!(score_for(SentimentLabel::Positive, f64::NAN), NEUTRAL_SCORE);
        assert_eq!(score_for(SentimentLabel::Negative, f64::INFINITY), NEUTRAL_SCORE);
    }

    #[test]
    fn test_label_parsing() {
        assert_eq!("positivo".parse(), Ok(SentimentLabel::Positive));
        assert_eq!(" Negativo.\n".parse(), Ok(SentimentLabel::Negative));
        assert_eq!("NEU".parse(), Ok(SentimentLabel::Neutral));
        assert_eq!("neutro".parse(), Ok(SentimentLabel::Neutral));
        assert!("maybe".parse::<SentimentLabel>().is_err());
    }

    #[test]
    fn test_label_display_roundtrip() {
        for label in SentimentLabel::ALL {
            assert_eq!(label.to_string().parse(), Ok(label));
        }
    }

    #[test]
    fn test_classification_scores_sum_to_one() {
        let scores = LabelScores::from_classification(Classification {
            label: SentimentLabel::Positive,
            confidence: 0.8,
        });
        let sum = scores.positive + scores.negative + scores.neutral;
        assert!((sum - 1.0).abs() < 1e-9);
        assert!((scores.negative - 0.1).abs() < 1e-9);
    }
}
