// Metrics module
// Per-question outcome logging to daily JSONL files

mod logger;
mod types;

pub use logger::{summarize, MetricsLogger};
pub use types::{MetricsSummary, QuestionMetric, OUTCOME_ANSWERED};
