//! Driven port for a generative text-completion service.
//!
//! The domain owns the prompt and the decoding of the reply; adapters only
//! move text across the wire.

use async_trait::async_trait;

use super::define_port_error;

/// Prompt sent to the completion service for one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Word the prompt is about, for logging and fixtures.
    pub subject: String,
    /// System instruction constraining the reply format.
    pub instruction: String,
    /// User prompt.
    pub prompt: String,
}

define_port_error! {
    /// Errors surfaced while calling the completion service.
    pub enum CompletionSourceError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "completion transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } =>
            "completion timeout: {message}",
        /// Credentials were missing or rejected.
        Unauthorized { message: String } =>
            "completion service rejected credentials: {message}",
        /// The service rate-limited the request.
        RateLimited { message: String } =>
            "completion service rate limited request: {message}",
        /// The service refused the request as malformed.
        InvalidRequest { message: String } =>
            "completion request invalid: {message}",
        /// The reply envelope could not be decoded.
        Decode { message: String } =>
            "completion response decode failed: {message}",
    }
}

/// Port over a text-completion service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionSource: Send + Sync {
    /// Return the raw text of the first completion choice.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use vocab_backend::domain::ports::{
    ///     CompletionRequest, CompletionSource, FixtureCompletionSource,
    /// };
    ///
    /// let reply = FixtureCompletionSource
    ///     .complete(&CompletionRequest {
    ///         subject: "resilient".to_owned(),
    ///         instruction: String::new(),
    ///         prompt: String::new(),
    ///     })
    ///     .await?;
    /// assert!(reply.contains("resilient"));
    /// # Ok::<(), vocab_backend::domain::ports::CompletionSourceError>(())
    /// ```
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionSourceError>;
}

/// Fixture source answering every prompt with a deterministic, complete
/// enrichment derived from the subject word.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureCompletionSource;

#[async_trait]
impl CompletionSource for FixtureCompletionSource {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionSourceError> {
        let word = request.subject.as_str();
        let reply = serde_json::json!({
            "pronunciation": format!("/{word}/"),
            "definition": format!("Fixture definition of {word}."),
            "synonyms": [
                format!("{word}-like"),
                format!("{word}ish"),
                format!("quasi-{word}"),
            ],
            "examples": [
                format!("The word {word} appears here."),
                format!("Another sentence uses {word}."),
                format!("A third {word} example."),
            ],
        });
        Ok(reply.to_string())
    }
}
