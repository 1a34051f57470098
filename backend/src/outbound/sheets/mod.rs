//! Tabular store adapters.
//!
//! [`SheetsHttpClient`] talks to the remote spreadsheet REST API;
//! [`InMemorySheetStore`] keeps tables in process for local runs and tests.

mod dto;
mod http_client;
mod memory;

pub use http_client::SheetsHttpClient;
pub use memory::InMemorySheetStore;
