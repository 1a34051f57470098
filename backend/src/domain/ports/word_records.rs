//! Driving ports for per-user word records.

use async_trait::async_trait;

use crate::domain::{Error, RecordKey, UserId, Word, WordRecord};

/// Request to delete one record by surrogate key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRecordRequest {
    /// Owner of the record.
    pub user_id: UserId,
    /// Surrogate key of the record.
    pub key: RecordKey,
    /// Version the caller last observed.
    ///
    /// - `None` deletes whatever version is stored.
    /// - `Some(n)` deletes only when the stored version is still `n`.
    pub expected_version: Option<u64>,
}

/// Outcome of one backfill pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillReport {
    /// Rows whose enrichment was repaired and written back.
    pub updated: usize,
    /// Rows skipped because they changed or vanished while being enriched.
    pub conflicts: usize,
}

/// Driving port for word record mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WordRecordsCommand: Send + Sync {
    /// Enrich `word` and store it as a new record for `user_id`.
    async fn add_word(&self, user_id: &UserId, word: &Word) -> Result<WordRecord, Error>;

    /// Delete the first record of `user_id` whose word equals `word`.
    ///
    /// # Errors
    /// `not_found` when no such record exists.
    async fn delete_word(&self, user_id: &UserId, word: &Word) -> Result<(), Error>;

    /// Delete one record by surrogate key with an optional version check.
    ///
    /// # Errors
    /// `not_found` when the key is unknown for the user, `conflict` when the
    /// stored version differs from the expected one.
    async fn delete_record(&self, request: DeleteRecordRequest) -> Result<(), Error>;

    /// Re-enrich every incomplete record of `user_id`.
    ///
    /// A second pass immediately after a successful one reports zero updates.
    async fn fill_missing_content(&self, user_id: &UserId) -> Result<BackfillReport, Error>;
}

/// Driving port for word record reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WordRecordsQuery: Send + Sync {
    /// Return every record of `user_id` in storage order.
    async fn get_words(&self, user_id: &UserId) -> Result<Vec<WordRecord>, Error>;
}

/// Fixture command port that stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureWordRecordsCommand;

#[async_trait]
impl WordRecordsCommand for FixtureWordRecordsCommand {
    async fn add_word(&self, user_id: &UserId, word: &Word) -> Result<WordRecord, Error> {
        Ok(WordRecord::new(user_id.clone(), word, Default::default()))
    }

    async fn delete_word(&self, _user_id: &UserId, _word: &Word) -> Result<(), Error> {
        Err(Error::not_found("word not found"))
    }

    async fn delete_record(&self, _request: DeleteRecordRequest) -> Result<(), Error> {
        Err(Error::not_found("record not found"))
    }

    async fn fill_missing_content(&self, _user_id: &UserId) -> Result<BackfillReport, Error> {
        Ok(BackfillReport::default())
    }
}

/// Fixture query port returning no records.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureWordRecordsQuery;

#[async_trait]
impl WordRecordsQuery for FixtureWordRecordsQuery {
    async fn get_words(&self, _user_id: &UserId) -> Result<Vec<WordRecord>, Error> {
        Ok(Vec::new())
    }
}
