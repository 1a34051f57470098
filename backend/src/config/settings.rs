//! Service settings loaded via OrthoConfig.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::ports::SheetTable;

use super::ConfigError;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SHEET_NAME: &str = "シート1";
const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/";
const DEFAULT_COMPLETION_BASE_URL: &str = "https://api.openai.com/v1/";
const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where word and user rows are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// The remote spreadsheet REST API.
    Sheets,
    /// An in-process table store; contents are lost on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sheets" => Ok(Self::Sheets),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::InvalidSetting {
                name: "store",
                value: raw.to_owned(),
                expected: "sheets|memory",
            }),
        }
    }
}

/// Which completion service enriches new words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionBackend {
    /// A chat-completions HTTP endpoint.
    OpenAi,
    /// Deterministic canned replies, for local runs.
    Fixture,
}

impl FromStr for CompletionBackend {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "fixture" => Ok(Self::Fixture),
            _ => Err(ConfigError::InvalidSetting {
                name: "completion",
                value: raw.to_owned(),
                expected: "openai|fixture",
            }),
        }
    }
}

/// Configuration values controlling the HTTP listener and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "VOCAB")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Storage backend: `sheets` or `memory`.
    pub store: Option<String>,
    /// Spreadsheet holding the word table.
    pub words_spreadsheet_id: Option<String>,
    /// Tab name of the word table.
    pub words_sheet_name: Option<String>,
    /// Numeric tab id of the word table, used for structural deletes.
    pub words_sheet_gid: Option<u32>,
    /// Spreadsheet holding the user table.
    pub users_spreadsheet_id: Option<String>,
    /// Tab name of the user table.
    pub users_sheet_name: Option<String>,
    /// Numeric tab id of the user table.
    pub users_sheet_gid: Option<u32>,
    /// Base URL of the spreadsheet REST API.
    pub sheets_base_url: Option<String>,
    /// Completion backend: `openai` or `fixture`.
    pub completion: Option<String>,
    /// Base URL of the chat-completions API.
    pub completion_base_url: Option<String>,
    /// Model name sent with every completion request.
    pub completion_model: Option<String>,
    /// Per-call timeout for upstream requests, in seconds.
    pub request_timeout_secs: Option<u64>,
}

fn parse_url(name: &'static str, raw: Option<&str>, fallback: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.unwrap_or(fallback)).map_err(|source| ConfigError::InvalidUrl { name, source })
}

fn required<'a>(
    value: Option<&'a str>,
    name: &'static str,
    backend: &'static str,
) -> Result<&'a str, ConfigError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingSetting { name, backend })
}

impl AppSettings {
    /// Return the listen address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.trim()
            .parse()
            .map_err(|_| ConfigError::InvalidSetting {
                name: "bind_addr",
                value: raw.to_owned(),
                expected: "host:port",
            })
    }

    /// Return the storage backend, defaulting to the in-memory store.
    pub fn store(&self) -> Result<StoreBackend, ConfigError> {
        self.store
            .as_deref()
            .map_or(Ok(StoreBackend::Memory), |raw| raw.parse())
    }

    /// Return the completion backend, defaulting to the fixture source.
    pub fn completion(&self) -> Result<CompletionBackend, ConfigError> {
        self.completion
            .as_deref()
            .map_or(Ok(CompletionBackend::Fixture), |raw| raw.parse())
    }

    /// Address the word table.
    ///
    /// The spreadsheet id is only required by the `sheets` backend; the
    /// in-memory store accepts any id.
    pub fn words_table(&self) -> Result<SheetTable, ConfigError> {
        self.table(
            self.words_spreadsheet_id.as_deref(),
            "words_spreadsheet_id",
            self.words_sheet_name.as_deref(),
            self.words_sheet_gid,
            "words",
        )
    }

    /// Address the user table.
    pub fn users_table(&self) -> Result<SheetTable, ConfigError> {
        self.table(
            self.users_spreadsheet_id.as_deref(),
            "users_spreadsheet_id",
            self.users_sheet_name.as_deref(),
            self.users_sheet_gid,
            "users",
        )
    }

    fn table(
        &self,
        spreadsheet_id: Option<&str>,
        id_name: &'static str,
        sheet_name: Option<&str>,
        gid: Option<u32>,
        fallback_id: &str,
    ) -> Result<SheetTable, ConfigError> {
        let spreadsheet_id = match self.store()? {
            StoreBackend::Sheets => required(spreadsheet_id, id_name, "sheets")?,
            StoreBackend::Memory => spreadsheet_id.unwrap_or(fallback_id),
        };
        Ok(SheetTable::new(
            spreadsheet_id,
            sheet_name.unwrap_or(DEFAULT_SHEET_NAME),
            gid.unwrap_or(0),
        ))
    }

    /// Return the spreadsheet API base URL.
    pub fn sheets_base_url(&self) -> Result<Url, ConfigError> {
        parse_url(
            "sheets_base_url",
            self.sheets_base_url.as_deref(),
            DEFAULT_SHEETS_BASE_URL,
        )
    }

    /// Return the chat-completions API base URL.
    pub fn completion_base_url(&self) -> Result<Url, ConfigError> {
        parse_url(
            "completion_base_url",
            self.completion_base_url.as_deref(),
            DEFAULT_COMPLETION_BASE_URL,
        )
    }

    /// Return the configured model name.
    pub fn completion_model(&self) -> &str {
        self.completion_model
            .as_deref()
            .unwrap_or(DEFAULT_COMPLETION_MODEL)
    }

    /// Return the upstream request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}
