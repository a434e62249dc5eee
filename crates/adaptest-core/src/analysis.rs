//! Per-topic performance analysis of a response history.
//!
//! The weak topics it reports are meant to be fed back into item selection.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::bank::ItemBank;
use crate::model::ItemResponse;

/// Accuracy (percent) below which a topic is weak.
pub const WEAK_THRESHOLD: u32 = 50;
/// Accuracy (percent) at or above which a topic is strong.
pub const STRONG_THRESHOLD: u32 = 80;

/// Accuracy of a learner on one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicPerformance {
    pub topic: String,
    pub total: u32,
    pub correct: u32,
    /// Rounded integer percentage.
    pub accuracy: u32,
}

/// Topic breakdown of a response history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicReport {
    pub topic_performance: Vec<TopicPerformance>,
    pub weak_topics: Vec<String>,
    pub strong_topics: Vec<String>,
}

/// Group `responses` by item topic. Unknown item ids are skipped; topics
/// appear in the order they were first answered.
pub fn analyze_topics(responses: &[ItemResponse], bank: &ItemBank) -> TopicReport {
    let mut order: Vec<&str> = Vec::new();
    let mut tallies: HashMap<&str, (u32, u32)> = HashMap::new();

    for response in responses {
        let Some(item) = bank.get(&response.id) else {
            continue;
        };
        let entry = tallies.entry(item.topic.as_str()).or_insert_with(|| {
            order.push(item.topic.as_str());
            (0, 0)
        });
        entry.0 += 1;
        if response.correct {
            entry.1 += 1;
        }
    }

    let mut report = TopicReport::default();
    for topic in order {
        let (total, correct) = tallies[topic];
        let accuracy = (correct as f64 / total as f64 * 100.0).round() as u32;

        if accuracy < WEAK_THRESHOLD {
            report.weak_topics.push(topic.to_string());
        } else if accuracy >= STRONG_THRESHOLD {
            report.strong_topics.push(topic.to_string());
        }
        report.topic_performance.push(TopicPerformance {
            topic: topic.to_string(),
            total,
            correct,
            accuracy,
        });
    }
    report
}
