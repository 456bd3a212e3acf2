//! Dashboard rollups.

use std::collections::HashSet;

use chrono::{DateTime, Timelike, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use sentiment::SentimentLabel;

use crate::event::SentimentEvent;
use crate::metrics::{self, dominant_label, filter_window, mean, SentimentMetrics};

const DAY_HOURS: i64 = 24;
const WEEK_HOURS: i64 = 168;
const KEYWORD_SAMPLE: usize = 100;
const KEYWORDS_PER_LABEL: usize = 10;
const MIN_KEYWORD_CHARS: usize = 4;
const STOPWORDS: &[&str] = &["para", "este", "esta", "como", "pero", "solo", "muy"];

/// A conversation with activity in the last 24 hours.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveConversation {
    pub conversation_id: String,
    pub message_count: usize,
    pub last_activity: DateTime<Utc>,
    pub dominant_sentiment: SentimentLabel,
    /// User of the first event seen for the conversation.
    pub user_id: String,
}

/// Per-label counts for one hour of day over the last 24 hours.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyTrend {
    pub hour: u32,
    pub message_count: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
    pub average_confidence: f64,
}

/// Most frequent words per label across recent messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SentimentKeywords {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub neutral: Vec<String>,
}

/// Everything the analytics dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    pub metrics_24h: SentimentMetrics,
    pub metrics_week: SentimentMetrics,
    pub active_conversations: Vec<ActiveConversation>,
    pub hourly_trends: Vec<HourlyTrend>,
    pub sentiment_keywords: SentimentKeywords,
    /// Distinct conversations in the whole log.
    pub total_conversations: usize,
    pub last_updated: DateTime<Utc>,
}

pub(crate) fn active_conversations(
    events: &[SentimentEvent],
    now: DateTime<Utc>,
) -> Vec<ActiveConversation> {
    let mut grouped: IndexMap<&str, Vec<&SentimentEvent>> = IndexMap::new();
    for event in filter_window(events, now, DAY_HOURS, None) {
        grouped
            .entry(event.conversation_id.as_str())
            .or_default()
            .push(event);
    }

    let mut active: Vec<ActiveConversation> = grouped
        .into_iter()
        .filter_map(|(conversation_id, entries)| {
            let first = entries.first()?;
            let last_activity = entries.iter().map(|e| e.timestamp).max()?;
            Some(ActiveConversation {
                conversation_id: conversation_id.to_string(),
                message_count: entries.len(),
                last_activity,
                dominant_sentiment: dominant_label(entries.iter().map(|e| e.label)),
                user_id: first.user_id.clone(),
            })
        })
        .collect();

    active.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
    active
}

pub(crate) fn hourly_trends(events: &[SentimentEvent], now: DateTime<Utc>) -> Vec<HourlyTrend> {
    let mut hours: Vec<Vec<&SentimentEvent>> = vec![Vec::new(); 24];
    for event in filter_window(events, now, DAY_HOURS, None) {
        hours[event.timestamp.hour() as usize].push(event);
    }

    hours
        .into_iter()
        .enumerate()
        .map(|(hour, entries)| {
            let count_of =
                |label: SentimentLabel| entries.iter().filter(|e| e.label == label).count();
            HourlyTrend {
                hour: hour as u32,
                message_count: entries.len(),
                positive_count: count_of(SentimentLabel::Positive),
                negative_count: count_of(SentimentLabel::Negative),
                neutral_count: count_of(SentimentLabel::Neutral),
                average_confidence: mean(entries.iter().map(|e| e.confidence)),
            }
        })
        .collect()
}

fn top_words(counts: IndexMap<String, usize>) -> Vec<String> {
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    // Stable sort keeps first-seen order among equal counts.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(KEYWORDS_PER_LABEL)
        .map(|(word, _)| word)
        .collect()
}

pub(crate) fn sentiment_keywords(events: &[SentimentEvent]) -> SentimentKeywords {
    let mut per_label: IndexMap<SentimentLabel, IndexMap<String, usize>> = IndexMap::new();

    let recent = &events[events.len().saturating_sub(KEYWORD_SAMPLE)..];
    for event in recent {
        let counts = per_label.entry(event.label).or_default();
        for word in event.message.to_lowercase().split_whitespace() {
            if word.chars().count() < MIN_KEYWORD_CHARS || STOPWORDS.contains(&word) {
                continue;
            }
            *counts.entry(word.to_string()).or_insert(0) += 1;
        }
    }

    let mut keywords = SentimentKeywords::default();
    for (label, counts) in per_label {
        let words = top_words(counts);
        match label {
            SentimentLabel::Positive => keywords.positive = words,
            SentimentLabel::Negative => keywords.negative = words,
            SentimentLabel::Neutral => keywords.neutral = words,
        }
    }
    keywords
}

pub(crate) fn build(events: &[SentimentEvent], now: DateTime<Utc>) -> DashboardData {
    let total_conversations = events
        .iter()
        .map(|e| e.conversation_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    DashboardData {
        metrics_24h: metrics::compute(events, now, DAY_HOURS, None),
        metrics_week: metrics::compute(events, now, WEEK_HOURS, None),
        active_conversations: active_conversations(events, now),
        hourly_trends: hourly_trends(events, now),
        sentiment_keywords: sentiment_keywords(events),
        total_conversations,
        last_updated: now,
    }
}
