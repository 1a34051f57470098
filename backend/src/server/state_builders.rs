//! Builders turning settings and secrets into wired services.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use vocab_backend::config::{
    AppSettings, CompletionBackend, ConfigError, Secrets, StoreBackend,
};
use vocab_backend::domain::ports::{
    CompletionSource, FixtureCompletionSource, SheetRangeClient,
};
use vocab_backend::domain::{EnrichmentService, IdentityService, WordRecordService};
use vocab_backend::inbound::http::state::{HttpState, HttpStatePorts};
use vocab_backend::outbound::completion::{ChatCompletionBuildError, ChatCompletionSource};
use vocab_backend::outbound::sheets::{InMemorySheetStore, SheetsHttpClient};

/// Failures while wiring adapters at startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build spreadsheet client: {0}")]
    SheetsClient(#[source] reqwest::Error),
    #[error("failed to build completion client: {0}")]
    CompletionClient(#[from] ChatCompletionBuildError),
}

fn build_store(
    settings: &AppSettings,
    secrets: &mut Secrets,
) -> Result<Arc<dyn SheetRangeClient>, StartupError> {
    match settings.store()? {
        StoreBackend::Memory => {
            info!("using in-memory table store");
            Ok(Arc::new(InMemorySheetStore::new()))
        }
        StoreBackend::Sheets => {
            let token = secrets
                .sheets_access_token
                .take()
                .ok_or(ConfigError::MissingEnv {
                    name: vocab_backend::config::secrets::SHEETS_TOKEN_ENV,
                })?;
            let client = SheetsHttpClient::new(
                settings.sheets_base_url()?,
                token,
                settings.request_timeout(),
            )
            .map_err(StartupError::SheetsClient)?;
            info!("using spreadsheet REST store");
            Ok(Arc::new(client))
        }
    }
}

fn build_completion(
    settings: &AppSettings,
    secrets: &mut Secrets,
) -> Result<Arc<dyn CompletionSource>, StartupError> {
    match settings.completion()? {
        CompletionBackend::Fixture => {
            info!("using fixture completion source");
            Ok(Arc::new(FixtureCompletionSource))
        }
        CompletionBackend::OpenAi => {
            let api_key = secrets
                .completion_api_key
                .take()
                .ok_or(ConfigError::MissingEnv {
                    name: vocab_backend::config::secrets::COMPLETION_KEY_ENV,
                })?;
            let source = ChatCompletionSource::new(
                &settings.completion_base_url()?,
                settings.completion_model(),
                api_key,
                settings.request_timeout(),
            )?;
            info!(model = settings.completion_model(), "using chat completion source");
            Ok(Arc::new(source))
        }
    }
}

/// Build the handler state. The store and completion handles are created once
/// here and shared by every service.
pub fn build_http_state(
    settings: &AppSettings,
    mut secrets: Secrets,
) -> Result<HttpState, StartupError> {
    let sheets = build_store(settings, &mut secrets)?;
    let completion = build_completion(settings, &mut secrets)?;

    let identity = Arc::new(IdentityService::new(
        Arc::clone(&sheets),
        settings.users_table()?,
    ));
    let words = Arc::new(WordRecordService::new(
        sheets,
        settings.words_table()?,
        EnrichmentService::new(completion),
    ));

    Ok(HttpState::new(HttpStatePorts {
        identity: identity.clone(),
        nicknames: identity,
        words: words.clone(),
        words_query: words,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use ortho_config::OrthoConfig;

    #[rstest]
    fn local_settings_build_without_secrets() {
        let _guard = lock_env([
            ("VOCAB_STORE", None::<String>),
            ("VOCAB_COMPLETION", None::<String>),
        ]);
        let settings = AppSettings::load_from_iter([OsString::from("vocab-backend")])
            .expect("config should load");
        assert!(build_http_state(&settings, Secrets::default()).is_ok());
    }

    #[rstest]
    fn sheets_store_without_token_fails() {
        let _guard = lock_env([
            ("VOCAB_STORE", Some("sheets".to_owned())),
            ("VOCAB_WORDS_SPREADSHEET_ID", Some("words-doc".to_owned())),
            ("VOCAB_USERS_SPREADSHEET_ID", Some("users-doc".to_owned())),
            ("VOCAB_COMPLETION", None::<String>),
        ]);
        let settings = AppSettings::load_from_iter([OsString::from("vocab-backend")])
            .expect("config should load");
        let err = build_http_state(&settings, Secrets::default())
            .err()
            .expect("token required");
        assert!(matches!(
            err,
            StartupError::Config(ConfigError::MissingEnv { .. })
        ));
    }
}
