//! Errors raised while validating startup configuration.

/// Errors raised while validating startup configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is missing or blank.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A required setting is absent for the selected backend.
    #[error("missing required setting {name} for the {backend} backend")]
    MissingSetting {
        name: &'static str,
        backend: &'static str,
    },
    /// A setting is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidSetting {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// A base URL failed to parse.
    #[error("invalid URL for {name}: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
}
