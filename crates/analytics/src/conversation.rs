//! Per-conversation analysis.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sentiment::SentimentLabel;

use crate::event::SentimentEvent;
use crate::metrics::mean;

const PREVIEW_CHARS: usize = 50;
const MOMENT_MESSAGE_CHARS: usize = 100;
const MAX_KEY_MOMENTS: usize = 10;
const HIGH_CONFIDENCE: f64 = 0.9;
const OVERALL_THRESHOLD: f64 = 0.1;

/// Sentiment of one turn within a conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvolutionPoint {
    /// 1-based position in the conversation.
    pub message_index: usize,
    pub timestamp: DateTime<Utc>,
    pub sentiment: SentimentLabel,
    pub confidence: f64,
    pub message_preview: String,
}

/// A notable turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KeyMoment {
    /// A turn classified with confidence above 0.9.
    HighConfidence {
        timestamp: DateTime<Utc>,
        message: String,
        sentiment: SentimentLabel,
        confidence: f64,
    },
    /// A positive turn right after a negative one, or the reverse.
    SentimentShift {
        timestamp: DateTime<Utc>,
        message: String,
        from_sentiment: SentimentLabel,
        to_sentiment: SentimentLabel,
    },
}

/// Full analysis of one conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationAnalytics {
    pub conversation_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_duration_minutes: f64,
    pub message_count: usize,
    pub sentiment_evolution: Vec<EvolutionPoint>,
    pub overall_sentiment: SentimentLabel,
    /// 1.0 means the label never changed.
    pub sentiment_stability: f64,
    /// In `[0, 1]`.
    pub engagement_score: f64,
    pub key_moments: Vec<KeyMoment>,
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        format!("{}...", truncate_chars(text, PREVIEW_CHARS))
    } else {
        text.to_string()
    }
}

fn overall_sentiment(events: &[&SentimentEvent]) -> SentimentLabel {
    let weighted = mean(events.iter().map(|e| e.label.polarity() * e.confidence));

    if weighted > OVERALL_THRESHOLD {
        SentimentLabel::Positive
    } else if weighted < -OVERALL_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// `1 - variance / 2` over label polarities, using the sample variance.
fn stability(events: &[&SentimentEvent]) -> f64 {
    if events.len() < 2 {
        return 1.0;
    }

    let polarities: Vec<f64> = events.iter().map(|e| e.label.polarity()).collect();
    let avg = mean(polarities.iter().copied());
    let variance = polarities.iter().map(|p| (p - avg).powi(2)).sum::<f64>()
        / (polarities.len() - 1) as f64;

    if variance == 0.0 {
        return 1.0;
    }

    (1.0 - variance / 2.0).clamp(0.0, 1.0)
}

/// Mean of message rate (2/min saturates), mean confidence and label variety.
fn engagement(events: &[&SentimentEvent], duration_minutes: f64) -> f64 {
    if events.is_empty() || duration_minutes <= 0.0 {
        return 0.0;
    }

    let per_minute = events.len() as f64 / duration_minutes.max(1.0);
    let frequency_score = (per_minute / 2.0).min(1.0);
    let confidence_score = mean(events.iter().map(|e| e.confidence));

    let mut labels: Vec<SentimentLabel> = events.iter().map(|e| e.label).collect();
    labels.sort_by_key(|l| l.as_str());
    labels.dedup();
    let variety_score = labels.len() as f64 / 3.0;

    ((frequency_score + confidence_score + variety_score) / 3.0).min(1.0)
}

fn is_flip(from: SentimentLabel, to: SentimentLabel) -> bool {
    matches!(
        (from, to),
        (SentimentLabel::Positive, SentimentLabel::Negative)
            | (SentimentLabel::Negative, SentimentLabel::Positive)
    )
}

fn key_moments(events: &[&SentimentEvent]) -> Vec<KeyMoment> {
    let mut moments = Vec::new();

    for (i, event) in events.iter().enumerate() {
        if event.confidence > HIGH_CONFIDENCE {
            moments.push(KeyMoment::HighConfidence {
                timestamp: event.timestamp,
                message: truncate_chars(&event.message, MOMENT_MESSAGE_CHARS),
                sentiment: event.label,
                confidence: event.confidence,
            });
        }

        if i > 0 {
            let previous = events[i - 1].label;
            if is_flip(previous, event.label) {
                moments.push(KeyMoment::SentimentShift {
                    timestamp: event.timestamp,
                    message: truncate_chars(&event.message, MOMENT_MESSAGE_CHARS),
                    from_sentiment: previous,
                    to_sentiment: event.label,
                });
            }
        }
    }

    moments.truncate(MAX_KEY_MOMENTS);
    moments
}

/// Analyze the events of `conversation_id`; `now` stamps an empty result.
pub(crate) fn analyze(
    events: &[SentimentEvent],
    conversation_id: &str,
    now: DateTime<Utc>,
) -> ConversationAnalytics {
    let mut turns: Vec<&SentimentEvent> = events
        .iter()
        .filter(|e| e.conversation_id == conversation_id)
        .collect();
    turns.sort_by_key(|e| e.timestamp);

    let (Some(first), Some(last)) = (turns.first(), turns.last()) else {
        return ConversationAnalytics {
            conversation_id: conversation_id.to_string(),
            start_time: now,
            end_time: now,
            total_duration_minutes: 0.0,
            message_count: 0,
            sentiment_evolution: Vec::new(),
            overall_sentiment: SentimentLabel::Neutral,
            sentiment_stability: 1.0,
            engagement_score: 0.0,
            key_moments: Vec::new(),
        };
    };

    let start_time = first.timestamp;
    let end_time = last.timestamp;
    let duration = (end_time - start_time).num_milliseconds() as f64 / 60_000.0;

    let sentiment_evolution = turns
        .iter()
        .enumerate()
        .map(|(i, e)| EvolutionPoint {
            message_index: i + 1,
            timestamp: e.timestamp,
            sentiment: e.label,
            confidence: e.confidence,
            message_preview: preview(&e.message),
        })
        .collect();

    ConversationAnalytics {
        conversation_id: conversation_id.to_string(),
        start_time,
        end_time,
        total_duration_minutes: duration,
        message_count: turns.len(),
        sentiment_evolution,
        overall_sentiment: overall_sentiment(&turns),
        sentiment_stability: stability(&turns),
        engagement_score: engagement(&turns, duration),
        key_moments: key_moments(&turns),
    }
}
