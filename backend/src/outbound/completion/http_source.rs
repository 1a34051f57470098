//! Reqwest-backed chat-completions source.
//!
//! Sends the domain prompt with a JSON-object response format and returns the
//! first choice's text. Decoding that text is the domain's job.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{ChatMessageDto, ChatRequestDto, ChatResponseDto, ResponseFormatDto};
use crate::domain::ports::{CompletionRequest, CompletionSource, CompletionSourceError};
use crate::outbound::http_support::status_message;

const TEMPERATURE: f32 = 0.2;

/// Completion source posting to `{base}/chat/completions`.
pub struct ChatCompletionSource {
    client: Client,
    endpoint: Url,
    model: String,
    api_key: Zeroizing<String>,
}

impl ChatCompletionSource {
    /// Build a source with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// endpoint cannot be derived from `base_url`.
    pub fn new(
        base_url: &Url,
        model: impl Into<String>,
        api_key: Zeroizing<String>,
        timeout: Duration,
    ) -> Result<Self, ChatCompletionBuildError> {
        let endpoint = base_url.join("chat/completions")?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            model: model.into(),
            api_key,
        })
    }

    fn body<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequestDto<'a> {
        ChatRequestDto {
            model: &self.model,
            messages: [
                ChatMessageDto {
                    role: "system",
                    content: &request.instruction,
                },
                ChatMessageDto {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            response_format: ResponseFormatDto { kind: "json_object" },
            temperature: TEMPERATURE,
        }
    }
}

/// Failures while constructing a [`ChatCompletionSource`].
#[derive(Debug, thiserror::Error)]
pub enum ChatCompletionBuildError {
    /// The endpoint could not be joined onto the base URL.
    #[error("invalid completion base URL: {0}")]
    Url(#[from] url::ParseError),
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[async_trait]
impl CompletionSource for ChatCompletionSource {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionSourceError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.as_str())
            .json(&self.body(request))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        debug!(subject = %request.subject, bytes = body.len(), "completion received");
        parse_content(body.as_ref())
    }
}

fn parse_content(body: &[u8]) -> Result<String, CompletionSourceError> {
    let decoded: ChatResponseDto = serde_json::from_slice(body).map_err(|error| {
        CompletionSourceError::decode(format!("invalid completion payload: {error}"))
    })?;
    decoded
        .into_first_content()
        .ok_or_else(|| CompletionSourceError::decode("completion payload has no content"))
}

fn map_transport_error(error: reqwest::Error) -> CompletionSourceError {
    if error.is_timeout() {
        CompletionSourceError::timeout(error.to_string())
    } else {
        CompletionSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> CompletionSourceError {
    let message = status_message(status, body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            CompletionSourceError::unauthorized(message)
        }
        StatusCode::TOO_MANY_REQUESTS => CompletionSourceError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            CompletionSourceError::timeout(message)
        }
        _ if status.is_client_error() => CompletionSourceError::invalid_request(message),
        _ => CompletionSourceError::transport(message),
    }
}
