//! Keyword heuristic used when no classifier answers.
//!
//! Counts how many entries of a fixed vocabulary occur in the lowercased text
//! (substring match, so stems like `encant` cover `encanta` and `encantado`).

use crate::label::{AnalysisType, Classification, LabelScores, SentimentAnalysis, SentimentLabel};

/// Positive vocabulary.
pub const POSITIVE_WORDS: &[&str] = &[
    "bueno", "buena", "excelente", "genial", "perfecto", "gracias", "bien", "fantástico",
    "fantastico", "increíble", "increible", "maravilloso", "estupendo", "feliz", "contento",
    "contenta", "satisfech", "encant", "amor", "gusta", "great", "love", "thanks",
];

/// Negative vocabulary.
pub const NEGATIVE_WORDS: &[&str] = &[
    "malo", "mala", "terrible", "horrible", "pésimo", "pesimo", "odio", "detesto", "molest",
    "enojad", "furios", "triste", "decepcion", "frustrad", "problema", "error", "fallo",
    "disgusto", "desastre", "awful", "hate",
];

const BASE_CONFIDENCE: f64 = 0.6;
const CONFIDENCE_STEP: f64 = 0.1;
const MAX_CONFIDENCE: f64 = 0.9;

fn count_matches(text: &str, vocabulary: &[&str]) -> usize {
    vocabulary.iter().filter(|word| text.contains(*word)).count()
}

/// Classify a text by vocabulary counts.
///
/// The larger count wins with confidence `min(0.6 + 0.1 * count, 0.9)`.
/// Ties (including no matches) are neutral with confidence 0.5.
pub fn classify(text: &str) -> Classification {
    let lowered = text.to_lowercase();
    let positive = count_matches(&lowered, POSITIVE_WORDS);
    let negative = count_matches(&lowered, NEGATIVE_WORDS);

    let (label, count) = match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => (SentimentLabel::Positive, positive),
        std::cmp::Ordering::Less => (SentimentLabel::Negative, negative),
        std::cmp::Ordering::Equal => {
            return Classification {
                label: SentimentLabel::Neutral,
                confidence: 0.5,
            }
        }
    };

    Classification {
        label,
        confidence: (BASE_CONFIDENCE + CONFIDENCE_STEP * count as f64).min(MAX_CONFIDENCE),
    }
}

/// Run the heuristic and build a full analysis.
pub fn analyze(text: &str) -> SentimentAnalysis {
    let classification = classify(text);
    SentimentAnalysis::new(
        classification,
        LabelScores::heuristic(classification.label),
        AnalysisType::Keywords,
    )
}
