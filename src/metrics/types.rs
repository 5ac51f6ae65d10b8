// Metrics data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::records::Category;

/// Outcome tag for an answered question
pub const OUTCOME_ANSWERED: &str = "answered";

/// One line of the per-question metrics log.
///
/// Stores a hash of the question, never its text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionMetric {
    pub timestamp: DateTime<Utc>,
    pub question_hash: String,
    pub categories: Vec<Category>,
    pub outcome: String,
    pub response_time_ms: u64,
}

impl QuestionMetric {
    pub fn new(
        question_hash: String,
        categories: Vec<Category>,
        outcome: impl Into<String>,
        response_time_ms: u64,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            question_hash,
            categories,
            outcome: outcome.into(),
            response_time_ms,
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct MetricsSummary {
    pub total: usize,
    pub answered: usize,
    pub no_relevant_records: usize,
    pub classification_errors: usize,
    pub completion_errors: usize,
    pub avg_response_time_ms: u64,
    /// Categories by how often they were used, most frequent first
    pub top_categories: Vec<(Category, usize)>,
}
