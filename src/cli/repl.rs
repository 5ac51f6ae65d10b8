// Interactive question loop
//
// One question is processed to completion before the next line is read.
// A failing question prints its error and the loop continues.

use anyhow::Result;
use crossterm::style::Stylize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, IsTerminal};
use std::time::Instant;

use crate::assistant::{Answer, AssistantError, Orchestrator};
use crate::metrics::{MetricsLogger, QuestionMetric, OUTCOME_ANSWERED};

pub const PROMPT: &str = "Enter your question (or 'exit' to quit): ";

const RESPONSE_HEADER: &str = "[INFO] Assistant response:";

/// A line read from the user
///
/// Only the literal word `exit`, in any case, ends the loop. Every other
/// line, blank ones included, is a question.
#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    Exit,
    Question(&'a str),
}

impl<'a> Input<'a> {
    pub fn parse(line: &'a str) -> Self {
        if line.eq_ignore_ascii_case("exit") {
            Input::Exit
        } else {
            Input::Question(line.trim())
        }
    }
}

pub struct Repl {
    orchestrator: Orchestrator,
    metrics_logger: Option<MetricsLogger>,
    is_interactive: bool,
}

impl Repl {
    pub fn new(orchestrator: Orchestrator, metrics_logger: Option<MetricsLogger>) -> Self {
        Self {
            orchestrator,
            metrics_logger,
            is_interactive: io::stdout().is_terminal(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new()?;

        if self.is_interactive {
            println!(
                "Healthdesk v{} - {} record source(s) configured",
                env!("CARGO_PKG_VERSION"),
                self.orchestrator.store().len()
            );
        }

        loop {
            let line = match editor.readline(PROMPT) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            };

            match Input::parse(&line) {
                Input::Exit => break,
                Input::Question(question) => {
                    if self.is_interactive && !question.is_empty() {
                        let _ = editor.add_history_entry(question);
                    }
                    let response = self.respond(question).await;
                    self.print_response(&response);
                }
            }
        }

        tracing::info!("Shutting down");
        self.print_summary();
        Ok(())
    }

    /// Answer `question`, returning the text to show the user
    pub async fn respond(&self, question: &str) -> String {
        let started = Instant::now();
        let result = self.orchestrator.answer(question).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        self.log_metric(question, &result, elapsed_ms);

        match result {
            Ok(answer) => answer.text,
            Err(e) => e.user_message(),
        }
    }

    fn log_metric(
        &self,
        question: &str,
        result: &Result<Answer, AssistantError>,
        elapsed_ms: u64,
    ) {
        let Some(logger) = &self.metrics_logger else {
            return;
        };

        let (categories, outcome) = match result {
            Ok(answer) => (answer.categories.clone(), OUTCOME_ANSWERED),
            Err(e) => (Vec::new(), e.as_str()),
        };
        let metric = QuestionMetric::new(
            MetricsLogger::hash_question(question),
            categories,
            outcome,
            elapsed_ms,
        );

        if let Err(e) = logger.log(&metric) {
            tracing::warn!("Failed to write metric: {:#}", e);
        }
    }

    fn print_response(&self, response: &str) {
        println!();
        if self.is_interactive {
            println!("{}", RESPONSE_HEADER.dark_grey());
        } else {
            println!("{}", RESPONSE_HEADER);
        }
        println!("{}", response);
    }

    fn print_summary(&self) {
        let Some(logger) = &self.metrics_logger else {
            return;
        };
        match logger.today_summary() {
            Ok(summary) if self.is_interactive && summary.total > 0 => {
                let line = format!(
                    "Today: {} question(s) | answered: {} | no records: {} | errors: {} | \
                     avg: {}ms",
                    summary.total,
                    summary.answered,
                    summary.no_relevant_records,
                    summary.classification_errors + summary.completion_errors,
                    summary.avg_response_time_ms
                );
                println!("{}", line.dark_grey());
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Failed to read metrics summary: {:#}", e),
        }
    }
}
