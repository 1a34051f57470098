//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureIdentityCommand, FixtureNicknameCommand, FixtureWordRecordsCommand,
    FixtureWordRecordsQuery, IdentityCommand, NicknameCommand, WordRecordsCommand,
    WordRecordsQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub identity: Arc<dyn IdentityCommand>,
    pub nicknames: Arc<dyn NicknameCommand>,
    pub words: Arc<dyn WordRecordsCommand>,
    pub words_query: Arc<dyn WordRecordsQuery>,
}

impl Default for HttpStatePorts {
    fn default() -> Self {
        Self {
            identity: Arc::new(FixtureIdentityCommand),
            nicknames: Arc::new(FixtureNicknameCommand),
            words: Arc::new(FixtureWordRecordsCommand),
            words_query: Arc::new(FixtureWordRecordsQuery),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<dyn IdentityCommand>,
    pub nicknames: Arc<dyn NicknameCommand>,
    pub words: Arc<dyn WordRecordsCommand>,
    pub words_query: Arc<dyn WordRecordsQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from explicit port implementations.
    ///
    /// # Examples
    /// ```
    /// use vocab_backend::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts::default());
    /// let _identity = state.identity.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            identity,
            nicknames,
            words,
            words_query,
        } = ports;
        Self {
            identity,
            nicknames,
            words,
            words_query,
        }
    }
}
