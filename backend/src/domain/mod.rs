//! Domain primitives, services and ports.
//!
//! Purpose: define the strongly typed vocabulary model and the services that
//! keep it consistent on top of a store without transactions or indexes.
//! Inbound adapters talk to the driving ports in [`ports`]; outbound adapters
//! implement the driven ports.
//!
//! Public surface:
//! - Error (alias to `error::Error`): error envelope returned to callers.
//! - Email, UserId, Nickname: user identity primitives.
//! - Word, WordRecord, RecordKey, Enrichment, FieldCompleteness: records.
//! - IdentityService, EnrichmentService, WordRecordService: port
//!   implementations over the tabular store.

pub mod enrichment;
pub mod error;
pub mod identity_service;
pub mod ports;
pub mod trace_id;
mod upstream;
pub mod user;
mod user_table;
pub mod word;
pub mod word_records_service;
mod word_table;

pub use self::enrichment::{EnrichmentService, decode_enrichment, enrichment_request};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity_service::IdentityService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EMAIL_MAX, Email, NICKNAME_MAX, Nickname, USER_ID_LEN, USER_ID_MAX, UserId,
    UserValidationError,
};
pub use self::word::{
    Enrichment, FieldCompleteness, LIST_FIELD_LEN, RecordKey, WORD_MAX, Word, WordRecord,
    WordValidationError, decode_list, encode_list, numbered_text,
};
pub use self::word_records_service::WordRecordService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use vocab_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("word not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
