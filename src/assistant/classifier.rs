// Context classifier
//
// Asks the model which record categories a question needs and parses the
// reply with a strict list grammar. Model output is data, never code.

use std::fmt::Write as _;
use std::iter::Peekable;
use std::str::Chars;
use std::sync::Arc;

use super::error::AssistantError;
use crate::providers::LlmProvider;
use crate::records::Category;

pub struct ContextClassifier {
    provider: Arc<dyn LlmProvider>,
}

impl ContextClassifier {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Build the classification prompt listing every category
    pub fn build_prompt(question: &str) -> String {
        let mut prompt = String::from(
            "You are an assistant that identifies which patient records are relevant \
             to a medical question.\nThe available contexts are:\n",
        );
        for category in Category::ALL {
            let _ = writeln!(prompt, "- '{}': {}.", category, category.description());
        }
        let _ = write!(
            prompt,
            "\nThe user's question is:\n\"{}\"\n\n\
             Reply with ONLY a JSON array of the relevant context names, for example \
             [\"medical_record\"] or [\"image_record\", \"lab_record\"]. \
             Reply with [] if none of them is relevant. Do not add any other text.",
            question
        );
        prompt
    }

    /// One completion call; returns the model's raw reply
    pub async fn classify_raw(&self, question: &str) -> Result<String, AssistantError> {
        tracing::info!("Identifying relevant contexts for the question");
        let raw = self
            .provider
            .complete(&Self::build_prompt(question))
            .await
            .map_err(AssistantError::Completion)?;
        tracing::info!("Contexts identified: {}", raw.trim());
        Ok(raw)
    }

    /// Classify `question` into raw category labels, in the model's order
    pub async fn classify(&self, question: &str) -> Result<Vec<String>, AssistantError> {
        let raw = self.classify_raw(question).await?;
        parse_labels(&raw)
    }
}

/// Parse classifier output into labels.
///
/// Accepts a JSON array of strings, or a bracketed list of single- or
/// double-quoted strings (`['image_record', 'lab_record']`), optionally
/// wrapped in a Markdown code fence. Anything else is a parse error.
pub fn parse_labels(raw: &str) -> Result<Vec<String>, AssistantError> {
    let body = strip_code_fence(raw);

    if let Ok(labels) = serde_json::from_str::<Vec<String>>(body) {
        return Ok(labels);
    }

    parse_list_literal(body).map_err(|reason| AssistantError::ClassificationParse {
        raw: raw.to_string(),
        reason,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an info string such as ```json
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

fn parse_list_literal(body: &str) -> Result<Vec<String>, String> {
    let mut chars = body.chars().peekable();
    let mut labels = Vec::new();

    skip_whitespace(&mut chars);
    if chars.next() != Some('[') {
        return Err("expected '[' at start of list".to_string());
    }

    loop {
        skip_whitespace(&mut chars);
        match chars.next() {
            Some(']') => break,
            Some(quote @ ('\'' | '"')) => {
                labels.push(parse_quoted(&mut chars, quote)?);
                skip_whitespace(&mut chars);
                match chars.next() {
                    Some(',') => continue,
                    Some(']') => break,
                    Some(c) => return Err(format!("unexpected character '{}' after item", c)),
                    None => return Err("unterminated list".to_string()),
                }
            }
            Some(c) => return Err(format!("unexpected character '{}' in list", c)),
            None => return Err("unterminated list".to_string()),
        }
    }

    skip_whitespace(&mut chars);
    if chars.peek().is_some() {
        return Err("unexpected text after list".to_string());
    }

    Ok(labels)
}

fn parse_quoted(chars: &mut Peekable<Chars<'_>>, quote: char) -> Result<String, String> {
    let mut label = String::new();
    loop {
        match chars.next() {
            Some(c) if c == quote => return Ok(label),
            Some('\\') => return Err("escape sequences are not supported".to_string()),
            Some('\n') | None => return Err("unterminated string".to_string()),
            Some(c) => label.push(c),
        }
    }
}
