// Per-question metric log
//
// One JSONL file per UTC day under the configured directory. Questions are
// stored as digests only.

use anyhow::{Context, Result};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use super::types::{MetricsSummary, QuestionMetric, OUTCOME_ANSWERED};
use crate::records::Category;

pub struct MetricsLogger {
    metrics_dir: PathBuf,
}

impl MetricsLogger {
    pub fn new(metrics_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&metrics_dir).with_context(|| {
            format!(
                "Failed to create metrics directory: {}",
                metrics_dir.display()
            )
        })?;

        Ok(Self { metrics_dir })
    }

    /// Append one line to the file for the current UTC day
    pub fn log(&self, metric: &QuestionMetric) -> Result<()> {
        let log_file = self.day_file(&today());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .with_context(|| format!("Failed to open metrics log: {}", log_file.display()))?;

        let json = serde_json::to_string(metric).context("Failed to serialize metric")?;

        writeln!(file, "{}", json).context("Failed to write metric to log")?;

        Ok(())
    }

    /// Hex SHA-256 digest recorded in place of the question text
    pub fn hash_question(question: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(question.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Metrics recorded on `date` (`YYYY-MM-DD`); empty if none were logged
    pub fn read_metrics(&self, date: &str) -> Result<Vec<QuestionMetric>> {
        let log_file = self.day_file(date);

        if !log_file.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&log_file)
            .with_context(|| format!("Failed to read metrics log: {}", log_file.display()))?;

        let metrics: Vec<QuestionMetric> = contents
            .lines()
            .filter(|line| !line.is_empty())
            .map(serde_json::from_str)
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to parse metrics")?;

        Ok(metrics)
    }

    pub fn today_summary(&self) -> Result<MetricsSummary> {
        Ok(summarize(&self.read_metrics(&today())?))
    }

    fn day_file(&self, date: &str) -> PathBuf {
        self.metrics_dir.join(format!("{}.jsonl", date))
    }
}

fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

pub fn summarize(metrics: &[QuestionMetric]) -> MetricsSummary {
    let total = metrics.len();
    let count = |outcome: &str| metrics.iter().filter(|m| m.outcome == outcome).count();

    let avg_response_time_ms = if total > 0 {
        metrics.iter().map(|m| m.response_time_ms).sum::<u64>() / total as u64
    } else {
        0
    };

    let mut category_counts: BTreeMap<Category, usize> = BTreeMap::new();
    for category in metrics.iter().flat_map(|m| m.categories.iter()) {
        *category_counts.entry(*category).or_insert(0) += 1;
    }
    let mut top_categories: Vec<(Category, usize)> = category_counts.into_iter().collect();
    top_categories.sort_by(|a, b| b.1.cmp(&a.1));

    MetricsSummary {
        total,
        answered: count(OUTCOME_ANSWERED),
        no_relevant_records: count("no_relevant_records"),
        classification_errors: count("classification_error"),
        completion_errors: count("completion_error"),
        avg_response_time_ms,
        top_categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_question() {
        let hash1 = MetricsLogger::hash_question("Hello");
        let hash2 = MetricsLogger::hash_question("Hello");
        let hash3 = MetricsLogger::hash_question("World");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
        assert_eq!(hash1.len(), 64);
        assert!(hash1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_log_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path().join("metrics")).unwrap();

        let question = "What were my last blood test results?";
        let metric = QuestionMetric::new(
            MetricsLogger::hash_question(question),
            vec![Category::LabRecord],
            OUTCOME_ANSWERED,
            120,
        );
        logger.log(&metric).unwrap();
        logger
            .log(&QuestionMetric::new(
                MetricsLogger::hash_question("?"),
                vec![],
                "no_relevant_records",
                40,
            ))
            .unwrap();

        let today = today();
        let metrics = logger.read_metrics(&today).unwrap();
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0], metric);

        let day_file = logger.day_file(&today);
        assert_eq!(day_file, dir.path().join("metrics").join(format!("{}.jsonl", today)));
        let raw = fs::read_to_string(day_file).unwrap();
        assert!(!raw.contains(question));
        assert!(raw.contains("\"lab_record\""));

        let summary = logger.today_summary().unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.answered, 1);
        assert_eq!(summary.no_relevant_records, 1);
        assert_eq!(summary.avg_response_time_ms, 80);
        assert_eq!(summary.top_categories, vec![(Category::LabRecord, 1)]);
    }

    #[test]
    fn test_missing_day_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path().to_path_buf()).unwrap();
        assert!(logger.read_metrics("1999-01-01").unwrap().is_empty());
        assert_eq!(summarize(&[]), MetricsSummary::default());
    }
}
