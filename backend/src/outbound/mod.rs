//! Outbound adapters implementing domain ports for external services.
//!
//! - **sheets**: the remote spreadsheet REST API and an in-process store
//! - **completion**: a chat-completions endpoint
//!
//! Adapters are thin translators between domain types and wire formats. They
//! contain no business logic.

pub mod completion;
mod http_support;
pub mod sheets;
