// Responder
//
// Merges the aggregated records with the question into the answer prompt.
// The model's reply is returned verbatim.

use std::sync::Arc;

use super::aggregator::AggregatedContext;
use super::error::AssistantError;
use crate::providers::LlmProvider;

pub struct Responder {
    provider: Arc<dyn LlmProvider>,
}

impl Responder {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub fn build_prompt(context: &AggregatedContext, question: &str) -> String {
        format!(
            "You are a virtual assistant that provides detailed information based on \
             different sources of patient data.\n\
             Below are the relevant patient records:\n\n\
             {}\n\n\
             Answer the user's question based on the combined records above.\n\
             User question: \"{}\"",
            context.render(),
            question
        )
    }

    pub async fn respond(
        &self,
        context: &AggregatedContext,
        question: &str,
    ) -> Result<String, AssistantError> {
        tracing::info!(
            "Requesting answer using {} record(s) from {}",
            context.len(),
            self.provider.name()
        );
        self.provider
            .complete(&Self::build_prompt(context, question))
            .await
            .map_err(AssistantError::Completion)
    }
}
