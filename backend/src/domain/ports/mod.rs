//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`SheetRangeClient`], [`CompletionSource`]) describe the
//! remote services the domain depends on. Driving ports describe what inbound
//! adapters may ask of the domain. Every port except [`SheetRangeClient`] ships
//! a `Fixture*` implementation; the in-memory table store stands in for that
//! one. Under test each port also gets a `mockall` mock.

mod macros;
pub(crate) use macros::define_port_error;

mod completion_source;
mod identity;
mod sheet_range_client;
mod word_records;

#[cfg(test)]
pub use completion_source::MockCompletionSource;
pub use completion_source::{
    CompletionRequest, CompletionSource, CompletionSourceError, FixtureCompletionSource,
};
#[cfg(test)]
pub use identity::{MockIdentityCommand, MockNicknameCommand};
pub use identity::{
    FIXTURE_USER_ID, FixtureIdentityCommand, FixtureNicknameCommand, IdentityCommand,
    NicknameCommand, NicknameEntry,
};
#[cfg(test)]
pub use sheet_range_client::MockSheetRangeClient;
pub use sheet_range_client::{
    ColumnSpan, SheetClientError, SheetRange, SheetRangeClient, SheetTable, column_letters,
};
#[cfg(test)]
pub use word_records::{MockWordRecordsCommand, MockWordRecordsQuery};
pub use word_records::{
    BackfillReport, DeleteRecordRequest, FixtureWordRecordsCommand, FixtureWordRecordsQuery,
    WordRecordsCommand, WordRecordsQuery,
};
