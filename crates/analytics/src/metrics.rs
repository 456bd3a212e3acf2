//! Windowed sentiment metrics.

use chrono::{DateTime, Duration, Timelike, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use sentiment::SentimentLabel;

use crate::event::SentimentEvent;

/// Largest accepted window, so `now - window` cannot overflow.
const MAX_WINDOW_HOURS: i64 = 24 * 365 * 100;

/// Mean-polarity difference that counts as a change in trend.
const TREND_THRESHOLD: f64 = 0.2;

/// Direction of sentiment across a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

/// Counts of confidences per band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfidenceDistribution {
    /// Confidence below 0.6.
    pub low: usize,
    /// Confidence in `[0.6, 0.8)`.
    pub medium: usize,
    /// Confidence of 0.8 and above.
    pub high: usize,
}

/// One hour-of-day slot of the temporal pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyBucket {
    /// Hour of day (UTC), 0-23.
    pub hour: u32,
    pub message_count: usize,
    pub dominant_sentiment: SentimentLabel,
}

/// Aggregates over the events of one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentMetrics {
    pub total_messages: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
    pub average_confidence: f64,
    pub sentiment_trend: Trend,
    pub dominant_sentiment: SentimentLabel,
    pub confidence_distribution: ConfidenceDistribution,
    /// Always 24 slots, independent of calendar date.
    pub temporal_pattern: Vec<HourlyBucket>,
}

/// Start of a window of `hours_back` hours ending at `now`.
pub(crate) fn window_start(now: DateTime<Utc>, hours_back: i64) -> DateTime<Utc> {
    now - Duration::hours(hours_back.clamp(0, MAX_WINDOW_HOURS))
}

/// Events with `start <= timestamp <= now`, optionally of one conversation.
pub(crate) fn filter_window<'a>(
    events: &'a [SentimentEvent],
    now: DateTime<Utc>,
    hours_back: i64,
    conversation_id: Option<&str>,
) -> Vec<&'a SentimentEvent> {
    let start = window_start(now, hours_back);
    events
        .iter()
        .filter(|e| e.timestamp >= start && e.timestamp <= now)
        .filter(|e| conversation_id.map_or(true, |id| e.conversation_id == id))
        .collect()
}

/// Most frequent label; ties go to the label seen first. Empty input is neutral.
pub fn dominant_label(labels: impl IntoIterator<Item = SentimentLabel>) -> SentimentLabel {
    let mut counts: IndexMap<SentimentLabel, usize> = IndexMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut best: Option<(SentimentLabel, usize)> = None;
    for (label, count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((label, count)),
        }
    }

    best.map(|(label, _)| label).unwrap_or(SentimentLabel::Neutral)
}

pub(crate) fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn trend(events: &[&SentimentEvent]) -> Trend {
    if events.len() < 2 {
        return Trend::Stable;
    }

    let mid = events.len() / 2;
    let (first, second) = events.split_at(mid);
    let diff = mean(second.iter().map(|e| e.label.polarity()))
        - mean(first.iter().map(|e| e.label.polarity()));

    if diff > TREND_THRESHOLD {
        Trend::Improving
    } else if diff < -TREND_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

fn confidence_distribution(events: &[&SentimentEvent]) -> ConfidenceDistribution {
    let mut distribution = ConfidenceDistribution::default();
    for event in events {
        if event.confidence < 0.6 {
            distribution.low += 1;
        } else if event.confidence < 0.8 {
            distribution.medium += 1;
        } else {
            distribution.high += 1;
        }
    }
    distribution
}

fn temporal_pattern(events: &[&SentimentEvent]) -> Vec<HourlyBucket> {
    let mut hours: Vec<Vec<SentimentLabel>> = vec![Vec::new(); 24];
    for event in events {
        hours[event.timestamp.hour() as usize].push(event.label);
    }

    hours
        .into_iter()
        .enumerate()
        .map(|(hour, labels)| HourlyBucket {
            hour: hour as u32,
            message_count: labels.len(),
            dominant_sentiment: dominant_label(labels),
        })
        .collect()
}

/// Compute metrics over `events` for the window ending at `now`.
pub(crate) fn compute(
    events: &[SentimentEvent],
    now: DateTime<Utc>,
    hours_back: i64,
    conversation_id: Option<&str>,
) -> SentimentMetrics {
    let relevant = filter_window(events, now, hours_back, conversation_id);
    let count_of = |label: SentimentLabel| relevant.iter().filter(|e| e.label == label).count();

    SentimentMetrics {
        total_messages: relevant.len(),
        positive_count: count_of(SentimentLabel::Positive),
        negative_count: count_of(SentimentLabel::Negative),
        neutral_count: count_of(SentimentLabel::Neutral),
        average_confidence: mean(relevant.iter().map(|e| e.confidence)),
        sentiment_trend: trend(&relevant),
        dominant_sentiment: dominant_label(relevant.iter().map(|e| e.label)),
        confidence_distribution: confidence_distribution(&relevant),
        temporal_pattern: temporal_pattern(&relevant),
    }
}
