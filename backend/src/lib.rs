//! Vocabulary record store and enrichment service.
//!
//! Hexagonal layout: [`domain`] holds the model, ports and services;
//! [`inbound`] exposes them over HTTP; [`outbound`] implements the driven
//! ports against the spreadsheet API and a chat-completions endpoint.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
