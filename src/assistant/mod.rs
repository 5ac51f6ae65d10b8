// Assistant module
// Question -> relevant records -> answer pipeline

mod aggregator;
mod classifier;
mod error;
mod orchestrator;
mod responder;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregator::{
    AggregatedContext, Aggregation, ContextEntry, FsRecordReader, RecordAggregator, RecordReader,
};
pub use classifier::{parse_labels, ContextClassifier};
pub use error::{
    AssistantError, MissingRecordSource, SkipReason, CLASSIFICATION_FAILED_MESSAGE,
    NO_RELEVANT_RECORDS_MESSAGE,
};
pub use orchestrator::{Answer, Orchestrator, Stage};
pub use responder::Responder;
