// Assistant error kinds
//
// Every failure is contained to the question that caused it. A
// `MissingRecordSource` is not an error of the question at all: the
// aggregator records it and moves on.

use std::fmt;

/// Shown when classifier output could not be parsed
pub const CLASSIFICATION_FAILED_MESSAGE: &str =
    "An error occurred while identifying the relevant contexts.";

/// Sentinel answer when no record could be loaded
pub const NO_RELEVANT_RECORDS_MESSAGE: &str = "No relevant information was found in the records.";

/// Why a classified label produced no context
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Label is not one of the known categories
    UnknownCategory,
    /// Category has no file in the record store
    NotConfigured,
    /// File is missing or could not be read
    Unreadable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnknownCategory => f.write_str("unknown category"),
            SkipReason::NotConfigured => f.write_str("no record file configured"),
            SkipReason::Unreadable(cause) => write!(f, "record file unreadable: {}", cause),
        }
    }
}

/// A classified label that was skipped during aggregation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("record source '{label}' skipped: {reason}")]
pub struct MissingRecordSource {
    pub label: String,
    pub reason: SkipReason,
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("could not parse classifier output {raw:?}: {reason}")]
    ClassificationParse { raw: String, reason: String },

    #[error("no relevant records found")]
    NoRelevantRecords,

    #[error("completion request failed: {0:#}")]
    Completion(#[source] anyhow::Error),
}

impl AssistantError {
    /// Short tag for logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            AssistantError::ClassificationParse { .. } => "classification_error",
            AssistantError::NoRelevantRecords => "no_relevant_records",
            AssistantError::Completion(_) => "completion_error",
        }
    }

    /// Text printed to the user in place of an answer
    pub fn user_message(&self) -> String {
        match self {
            AssistantError::ClassificationParse { .. } => CLASSIFICATION_FAILED_MESSAGE.to_string(),
            AssistantError::NoRelevantRecords => NO_RELEVANT_RECORDS_MESSAGE.to_string(),
            AssistantError::Completion(e) => {
                format!("The assistant could not complete the request: {:#}", e)
            }
        }
    }
}
