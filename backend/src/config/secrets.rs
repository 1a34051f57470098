//! Upstream credentials read from the environment.
//!
//! Secrets are held in [`Zeroizing`] buffers and only read for the backends
//! that need them, so a local run with the in-memory store and fixture
//! completions needs no credentials at all.

use mockable::Env;
use zeroize::Zeroizing;

use super::{CompletionBackend, ConfigError, StoreBackend};

/// Bearer token for the spreadsheet REST API.
pub const SHEETS_TOKEN_ENV: &str = "SHEETS_ACCESS_TOKEN";
/// API key for the chat-completions endpoint.
pub const COMPLETION_KEY_ENV: &str = "OPENAI_API_KEY";

/// Credentials for the selected upstream backends.
#[derive(Default)]
pub struct Secrets {
    /// Present when the `sheets` store is selected.
    pub sheets_access_token: Option<Zeroizing<String>>,
    /// Present when the `openai` completion backend is selected.
    pub completion_api_key: Option<Zeroizing<String>>,
}

fn required_secret<E: Env>(env: &E, name: &'static str) -> Result<Zeroizing<String>, ConfigError> {
    let value = env.string(name).map(Zeroizing::new);
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnv { name }),
    }
}

/// Read the credentials required by the chosen backends.
///
/// # Examples
///
/// ```rust
/// use mockable::MockEnv;
/// use vocab_backend::config::{CompletionBackend, StoreBackend, secrets_from_env};
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "OPENAI_API_KEY" => Some("sk-test".to_owned()),
///     _ => None,
/// });
///
/// let secrets = secrets_from_env(&env, StoreBackend::Memory, CompletionBackend::OpenAi)
///     .expect("key present");
/// assert!(secrets.sheets_access_token.is_none());
/// assert!(secrets.completion_api_key.is_some());
/// ```
pub fn secrets_from_env<E: Env>(
    env: &E,
    store: StoreBackend,
    completion: CompletionBackend,
) -> Result<Secrets, ConfigError> {
    let sheets_access_token = match store {
        StoreBackend::Sheets => Some(required_secret(env, SHEETS_TOKEN_ENV)?),
        StoreBackend::Memory => None,
    };
    let completion_api_key = match completion {
        CompletionBackend::OpenAi => Some(required_secret(env, COMPLETION_KEY_ENV)?),
        CompletionBackend::Fixture => None,
    };
    Ok(Secrets {
        sheets_access_token,
        completion_api_key,
    })
}
