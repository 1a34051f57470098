//! Startup configuration.
//!
//! [`AppSettings`] carries the non-secret knobs loaded through OrthoConfig
//! (CLI flags, `VOCAB_*` environment variables, config file). Credentials are
//! read separately by [`secrets`] so they never appear in settings dumps.

mod error;
pub mod secrets;
mod settings;

pub use error::ConfigError;
pub use secrets::{Secrets, secrets_from_env};
pub use settings::{AppSettings, CompletionBackend, StoreBackend};
