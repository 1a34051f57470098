//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{
    Email, Error, Nickname, RecordKey, UserId, UserValidationError, Word, WordValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    Empty,
    TooLong,
    Malformed,
    InvalidCharacters,
    InvalidUuid,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::Empty => "empty",
            ErrorCode::TooLong => "too_long",
            ErrorCode::Malformed => "malformed",
            ErrorCode::InvalidCharacters => "invalid_characters",
            ErrorCode::InvalidUuid => "invalid_uuid",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) const EMAIL: FieldName = FieldName::new("email");
pub(crate) const EMAILS: FieldName = FieldName::new("emails");
pub(crate) const USER_ID: FieldName = FieldName::new("userId");
pub(crate) const WORD: FieldName = FieldName::new("word");
pub(crate) const NICKNAME: FieldName = FieldName::new("nickname");
pub(crate) const KEY: FieldName = FieldName::new("key");

fn field_error(field: FieldName, message: impl Into<String>, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        format!("missing required field: {name}"),
        ErrorCode::MissingField,
    )
}

fn require(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

fn user_code(err: &UserValidationError) -> ErrorCode {
    match err {
        UserValidationError::EmptyEmail
        | UserValidationError::EmptyUserId
        | UserValidationError::EmptyNickname => ErrorCode::Empty,
        UserValidationError::EmailTooLong { .. }
        | UserValidationError::UserIdTooLong { .. }
        | UserValidationError::NicknameTooLong { .. } => ErrorCode::TooLong,
        UserValidationError::MalformedEmail => ErrorCode::Malformed,
        UserValidationError::UserIdInvalidCharacters => ErrorCode::InvalidCharacters,
    }
}

fn user_error(field: FieldName, err: UserValidationError) -> Error {
    field_error(field, err.to_string(), user_code(&err))
}

fn word_error(err: WordValidationError) -> Error {
    let code = match err {
        WordValidationError::Empty => ErrorCode::Empty,
        WordValidationError::TooLong { .. } => ErrorCode::TooLong,
    };
    field_error(WORD, err.to_string(), code)
}

pub(crate) fn parse_email(value: Option<String>, field: FieldName) -> Result<Email, Error> {
    Email::new(require(value, field)?).map_err(|err| user_error(field, err))
}

pub(crate) fn parse_user_id(value: Option<String>) -> Result<UserId, Error> {
    UserId::new(require(value, USER_ID)?).map_err(|err| user_error(USER_ID, err))
}

pub(crate) fn parse_word(value: Option<String>) -> Result<Word, Error> {
    Word::new(require(value, WORD)?).map_err(word_error)
}

pub(crate) fn parse_nickname(value: Option<String>) -> Result<Nickname, Error> {
    Nickname::new(require(value, NICKNAME)?).map_err(|err| user_error(NICKNAME, err))
}

pub(crate) fn parse_record_key(value: Option<String>) -> Result<RecordKey, Error> {
    let raw = require(value, KEY)?;
    RecordKey::parse(raw.trim()).map_err(|_| {
        field_error(KEY, "key must be a valid UUID", ErrorCode::InvalidUuid)
    })
}

/// Validate every email in a batch, reporting the index of the first failure.
pub(crate) fn parse_email_list(values: Option<Vec<String>>) -> Result<Vec<Email>, Error> {
    let values = values.ok_or_else(|| missing_field_error(EMAILS))?;
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            Email::new(value).map_err(|err| {
                Error::invalid_request(err.to_string()).with_details(json!({
                    "field": EMAILS.as_str(),
                    "index": index,
                    "code": user_code(&err).as_str(),
                }))
            })
        })
        .collect()
}
