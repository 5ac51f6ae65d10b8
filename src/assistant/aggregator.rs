// Record aggregator
//
// Resolves classified labels to record files and collects their text.
// Missing or unreadable sources are skipped, never fatal.

use async_trait::async_trait;
use std::io;
use std::path::Path;
use std::sync::Arc;

use super::error::{MissingRecordSource, SkipReason};
use crate::records::{Category, RecordStore};

/// Reads the text of a record file
#[async_trait]
pub trait RecordReader: Send + Sync {
    async fn read(&self, path: &Path) -> io::Result<String>;
}

/// Reads record files from the local filesystem
pub struct FsRecordReader;

#[async_trait]
impl RecordReader for FsRecordReader {
    async fn read(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextEntry {
    pub category: Category,
    pub text: String,
}

/// Record texts collected for one question, in classification order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedContext {
    entries: Vec<ContextEntry>,
}

impl AggregatedContext {
    pub fn new(entries: Vec<ContextEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ContextEntry] {
        &self.entries
    }

    pub fn categories(&self) -> Vec<Category> {
        self.entries.iter().map(|e| e.category).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labeled blocks joined by a blank line
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("Context: {}\n{}", e.category, e.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Aggregation {
    Found {
        context: AggregatedContext,
        skipped: Vec<MissingRecordSource>,
    },
    /// Nothing could be loaded; the responder must not be called
    NoRelevantRecords { skipped: Vec<MissingRecordSource> },
}

impl Aggregation {
    pub fn skipped(&self) -> &[MissingRecordSource] {
        match self {
            Aggregation::Found { skipped, .. } | Aggregation::NoRelevantRecords { skipped } => {
                skipped
            }
        }
    }
}

pub struct RecordAggregator {
    store: RecordStore,
    reader: Arc<dyn RecordReader>,
}

impl RecordAggregator {
    pub fn new(store: RecordStore) -> Self {
        Self::with_reader(store, Arc::new(FsRecordReader))
    }

    pub fn with_reader(store: RecordStore, reader: Arc<dyn RecordReader>) -> Self {
        Self { store, reader }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Load the record text for each label, in order.
    ///
    /// A label appearing twice is read once, at its first position.
    pub async fn aggregate<S: AsRef<str>>(&self, labels: &[S]) -> Aggregation {
        let mut entries: Vec<ContextEntry> = Vec::new();
        let mut skipped = Vec::new();
        let mut seen: Vec<Category> = Vec::new();

        for label in labels {
            let label = label.as_ref();

            let category = match label.parse::<Category>() {
                Ok(category) => category,
                Err(_) => {
                    skipped.push(skip(label, SkipReason::UnknownCategory));
                    continue;
                }
            };

            if seen.contains(&category) {
                tracing::debug!("Ignoring repeated context '{}'", category);
                continue;
            }
            seen.push(category);

            let Some(path) = self.store.path(category) else {
                skipped.push(skip(label, SkipReason::NotConfigured));
                continue;
            };

            tracing::info!("Reading record file: {}", path.display());
            match self.reader.read(path).await {
                Ok(text) => entries.push(ContextEntry { category, text }),
                Err(e) => {
                    skipped.push(skip(
                        label,
                        SkipReason::Unreadable(format!("{}: {}", path.display(), e)),
                    ));
                }
            }
        }

        if entries.is_empty() {
            tracing::warn!("No relevant information was found in the records");
            return Aggregation::NoRelevantRecords { skipped };
        }

        Aggregation::Found {
            context: AggregatedContext::new(entries),
            skipped,
        }
    }
}

fn skip(label: &str, reason: SkipReason) -> MissingRecordSource {
    let missing = MissingRecordSource {
        label: label.trim().to_string(),
        reason,
    };
    tracing::warn!("{}", missing);
    missing
}
