// Orchestrator
//
// Runs classify -> aggregate -> respond for a single question. Holds no
// state between questions.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use super::aggregator::{Aggregation, RecordAggregator};
use super::classifier::ContextClassifier;
use super::error::AssistantError;
use super::responder::Responder;
use crate::providers::LlmProvider;
use crate::records::{Category, RecordStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Classifying,
    Aggregating,
    Responding,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Classifying => "classifying",
            Stage::Aggregating => "aggregating",
            Stage::Responding => "responding",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model answer plus the record categories it was based on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub categories: Vec<Category>,
}

pub struct Orchestrator {
    classifier: ContextClassifier,
    aggregator: RecordAggregator,
    responder: Responder,
}

impl Orchestrator {
    pub fn new(
        classifier_provider: Arc<dyn LlmProvider>,
        responder_provider: Arc<dyn LlmProvider>,
        store: RecordStore,
    ) -> Self {
        Self::from_parts(
            ContextClassifier::new(classifier_provider),
            RecordAggregator::new(store),
            Responder::new(responder_provider),
        )
    }

    /// Same provider for classification and answering
    pub fn with_shared_provider(provider: Arc<dyn LlmProvider>, store: RecordStore) -> Self {
        Self::new(provider.clone(), provider, store)
    }

    pub fn from_parts(
        classifier: ContextClassifier,
        aggregator: RecordAggregator,
        responder: Responder,
    ) -> Self {
        Self {
            classifier,
            aggregator,
            responder,
        }
    }

    pub fn store(&self) -> &RecordStore {
        self.aggregator.store()
    }

    /// Answer one question
    pub async fn answer(&self, question: &str) -> Result<Answer, AssistantError> {
        let started = Instant::now();
        tracing::info!("Processing the user's question");

        let result = self.run_stages(question).await;
        let elapsed_ms = started.elapsed().as_millis();

        match &result {
            Ok(answer) => tracing::info!(
                categories = ?answer.categories,
                "Answer ready ({}ms)",
                elapsed_ms
            ),
            Err(e) => tracing::error!(
                outcome = e.as_str(),
                "Question failed ({}ms): {}",
                elapsed_ms,
                e
            ),
        }

        result
    }

    async fn run_stages(&self, question: &str) -> Result<Answer, AssistantError> {
        enter(Stage::Classifying);
        let labels = self.classifier.classify(question).await?;

        enter(Stage::Aggregating);
        let aggregation = self.aggregator.aggregate(&labels).await;
        if !aggregation.skipped().is_empty() {
            tracing::debug!("{} classified context(s) skipped", aggregation.skipped().len());
        }
        let context = match aggregation {
            Aggregation::Found { context, .. } => context,
            Aggregation::NoRelevantRecords { .. } => {
                return Err(AssistantError::NoRelevantRecords);
            }
        };

        enter(Stage::Responding);
        let text = self.responder.respond(&context, question).await?;

        enter(Stage::Done);
        Ok(Answer {
            text,
            categories: context.categories(),
        })
    }
}

fn enter(stage: Stage) {
    tracing::debug!(stage = stage.as_str(), "Entering stage {}", stage);
}
