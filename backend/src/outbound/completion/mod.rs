//! Completion service adapters.
//!
//! A thin HTTP implementation of the `CompletionSource` port for
//! chat-completions style APIs.

mod dto;
mod http_source;

pub use http_source::{ChatCompletionBuildError, ChatCompletionSource};
