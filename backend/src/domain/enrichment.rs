//! Generative enrichment of vocabulary words.
//!
//! The service prompts a [`CompletionSource`] for a strict JSON object and
//! decodes it defensively: absent, mistyped or unparsable fields degrade to
//! blanks rather than failing the caller. Transport and credential failures
//! still surface as `service_unavailable`.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::ports::{CompletionRequest, CompletionSource, CompletionSourceError};
use super::upstream::completion_failure;
use super::{Enrichment, Error, LIST_FIELD_LEN, Word};

const INSTRUCTION: &str = "You are a vocabulary assistant for English learners. \
Reply with a single JSON object and nothing else.";

const EXAMPLE_SHAPE: &str = r#"{
  "pronunciation": "/ɪɡˈzæmpəl/",
  "definition": "a thing characteristic of its kind or illustrating a general rule",
  "synonyms": ["specimen", "instance", "sample"],
  "examples": [
    "This is a good example of modern architecture.",
    "Can you give me an example?",
    "She set an example for the others."
  ]
}"#;

/// Build the prompt sent for `word`.
pub fn enrichment_request(word: &Word) -> CompletionRequest {
    CompletionRequest {
        subject: word.to_string(),
        instruction: INSTRUCTION.to_owned(),
        prompt: format!(
            "For the English word \"{word}\", return its IPA pronunciation, a one-sentence \
             definition, exactly {LIST_FIELD_LEN} synonyms and exactly {LIST_FIELD_LEN} example \
             sentences. Use exactly these keys and this shape:\n{EXAMPLE_SHAPE}"
        ),
    }
}

/// Decode a completion reply into an [`Enrichment`].
///
/// Code fences are stripped before parsing. Non-object replies decode to a
/// blank enrichment. Lists keep at most three non-blank string items; a list
/// field that arrives as a single string is split like a stored cell.
///
/// # Examples
/// ```
/// use vocab_backend::domain::decode_enrichment;
///
/// let enrichment =
///     decode_enrichment(r#"{"definition": "able to recover", "synonyms": ["tough", 7]}"#);
/// assert_eq!(enrichment.definition, "able to recover");
/// assert_eq!(enrichment.synonyms, vec!["tough"]);
/// assert!(enrichment.pronunciation.is_empty());
/// ```
pub fn decode_enrichment(reply: &str) -> Enrichment {
    let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(strip_fences(reply)) else {
        return Enrichment::default();
    };
    let text = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .map(|value| value.trim().to_owned())
            .unwrap_or_default()
    };
    let list = |key: &str| -> Vec<String> {
        let items = match fields.get(key) {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(Value::as_str)
                .map(|value| value.trim().to_owned())
                .collect(),
            Some(Value::String(cell)) => super::decode_list(cell),
            _ => Vec::new(),
        };
        items
            .into_iter()
            .filter(|item| !item.is_empty())
            .take(LIST_FIELD_LEN)
            .collect()
    };
    Enrichment {
        pronunciation: text("pronunciation"),
        definition: text("definition"),
        synonyms: list("synonyms"),
        examples: list("examples"),
    }
}

fn strip_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    // Drop an info string such as `json` on the opening fence line.
    match inner.split_once('\n') {
        Some((first, rest)) if !first.trim_start().starts_with('{') => rest.trim(),
        _ => inner.trim(),
    }
}

/// Produces enrichment for words via a completion source.
#[derive(Clone)]
pub struct EnrichmentService {
    source: Arc<dyn CompletionSource>,
}

impl EnrichmentService {
    /// Create a service over `source`.
    pub fn new(source: Arc<dyn CompletionSource>) -> Self {
        Self { source }
    }

    /// Enrich `word`.
    ///
    /// # Errors
    /// `service_unavailable` when the completion service cannot be reached or
    /// refuses the call. Undecodable replies are absorbed as blank fields.
    pub async fn enrich(&self, word: &Word) -> Result<Enrichment, Error> {
        let request = enrichment_request(word);
        let enrichment = match self.source.complete(&request).await {
            Ok(reply) => decode_enrichment(&reply),
            Err(err @ CompletionSourceError::Decode { .. }) => {
                warn!(
                    word = %word,
                    error = %err,
                    "completion reply unreadable; storing blank enrichment"
                );
                Enrichment::default()
            }
            Err(err) => return Err(completion_failure(err)),
        };
        let flags = enrichment.completeness();
        if flags.is_complete() {
            debug!(word = %word, "enrichment complete");
        } else {
            warn!(word = %word, completeness = ?flags, "enrichment degraded to blank fields");
        }
        Ok(enrichment)
    }
}

#[cfg(test)]
#[path = "enrichment_tests.rs"]
mod tests;
