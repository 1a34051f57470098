//! Word record service: CRUD and backfill over the word table.
//!
//! Row positions are only trusted inside the word-table lock, and only when
//! they come from a read taken under that same lock. Records are relocated by
//! surrogate key (or, for keyless legacy rows, by the first unclaimed
//! `(user id, word)` match) and their version stamp is compared before any
//! structural delete or in-place update. Enrichment calls run outside the lock.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::enrichment::EnrichmentService;
use crate::domain::ports::{
    BackfillReport, DeleteRecordRequest, SheetRange, SheetRangeClient, SheetTable,
    WordRecordsCommand, WordRecordsQuery,
};
use crate::domain::upstream::store_failure;
use crate::domain::word_table::{StoredWord, WORD_COLUMNS, rows_for_user, to_cells};
use crate::domain::{Enrichment, Error, RecordKey, UserId, Word, WordRecord};

/// Implements [`WordRecordsCommand`] and [`WordRecordsQuery`].
pub struct WordRecordService {
    sheets: Arc<dyn SheetRangeClient>,
    table: SheetTable,
    enrichment: EnrichmentService,
    lock: Mutex<()>,
}

/// A backfill candidate as first observed, with its fresh enrichment.
struct Repair {
    observed: WordRecord,
    fresh: Enrichment,
}

impl WordRecordService {
    /// Create a service over the word `table`.
    pub fn new(
        sheets: Arc<dyn SheetRangeClient>,
        table: SheetTable,
        enrichment: EnrichmentService,
    ) -> Self {
        Self {
            sheets,
            table,
            enrichment,
            lock: Mutex::new(()),
        }
    }

    fn whole_table(&self) -> SheetRange {
        SheetRange::columns(&self.table, WORD_COLUMNS)
    }

    async fn snapshot(&self, user_id: &UserId) -> Result<Vec<StoredWord>, Error> {
        let rows = self
            .sheets
            .read(&self.whole_table())
            .await
            .map_err(store_failure)?;
        debug!(rows = rows.len(), user_id = %user_id, "read word table");
        Ok(rows_for_user(&rows, user_id))
    }

    async fn delete_at(&self, index: usize) -> Result<(), Error> {
        self.sheets
            .delete_row(&self.table, index)
            .await
            .map_err(store_failure)
    }

    async fn enrich_candidates(&self, candidates: Vec<WordRecord>) -> Result<Vec<Repair>, Error> {
        let mut repairs = Vec::with_capacity(candidates.len());
        for observed in candidates {
            let Ok(word) = Word::new(observed.word.as_str()) else {
                warn!(user_id = %observed.user_id, "skipping record with unusable word");
                continue;
            };
            let fresh = self.enrichment.enrich(&word).await?;
            repairs.push(Repair { observed, fresh });
        }
        Ok(repairs)
    }

    /// Apply repairs against a fresh locked read. Returns the report.
    async fn apply_repairs(
        &self,
        user_id: &UserId,
        repairs: Vec<Repair>,
    ) -> Result<BackfillReport, Error> {
        let _guard = self.lock.lock().await;
        let current = self.snapshot(user_id).await?;
        let mut claimed = BTreeSet::new();
        let mut report = BackfillReport::default();

        for Repair { observed, fresh } in repairs {
            let Some(stored) = relocate(&current, &observed, &claimed) else {
                warn!(user_id = %user_id, word = %observed.word, "record vanished during backfill");
                report.conflicts += 1;
                continue;
            };
            claimed.insert(stored.index);
            if stored.record.version != observed.version {
                warn!(
                    user_id = %user_id,
                    word = %observed.word,
                    observed = observed.version,
                    stored = stored.record.version,
                    "record changed during backfill"
                );
                report.conflicts += 1;
                continue;
            }

            let record = &stored.record;
            let merged = record.enrichment.clone().fill_blanks_from(fresh.clone());
            let changed = merged != record.enrichment;
            if !changed && record.key.is_some() {
                continue;
            }
            let Some(version) = record.version.checked_add(1) else {
                warn!(
                    user_id = %user_id,
                    word = %record.word,
                    stored = record.version,
                    "record version cannot advance"
                );
                report.conflicts += 1;
                continue;
            };
            let repaired = WordRecord {
                key: Some(record.key.unwrap_or_else(RecordKey::generate)),
                user_id: record.user_id.clone(),
                word: record.word.clone(),
                completeness: record.completeness.union(fresh.completeness()),
                enrichment: merged,
                version,
            };
            self.sheets
                .update(
                    &SheetRange::row(&self.table, WORD_COLUMNS, stored.index),
                    to_cells(&repaired),
                )
                .await
                .map_err(store_failure)?;
            if changed {
                report.updated += 1;
            }
        }
        Ok(report)
    }
}

/// Find the current position of `observed` in a locked snapshot.
fn relocate<'a>(
    current: &'a [StoredWord],
    observed: &WordRecord,
    claimed: &BTreeSet<usize>,
) -> Option<&'a StoredWord> {
    current.iter().find(|stored| {
        !claimed.contains(&stored.index)
            && match observed.key {
                Some(key) => stored.record.key == Some(key),
                None => stored.record.key.is_none() && stored.record.word == observed.word,
            }
    })
}

#[async_trait]
impl WordRecordsQuery for WordRecordService {
    async fn get_words(&self, user_id: &UserId) -> Result<Vec<WordRecord>, Error> {
        let records = self
            .snapshot(user_id)
            .await?
            .into_iter()
            .map(|stored| stored.record)
            .collect();
        Ok(records)
    }
}

#[async_trait]
impl WordRecordsCommand for WordRecordService {
    async fn add_word(&self, user_id: &UserId, word: &Word) -> Result<WordRecord, Error> {
        let enrichment = self.enrichment.enrich(word).await?;
        let record = WordRecord::new(user_id.clone(), word, enrichment);

        let _guard = self.lock.lock().await;
        self.sheets
            .append(&self.whole_table(), to_cells(&record))
            .await
            .map_err(store_failure)?;
        info!(
            user_id = %user_id,
            word = %word,
            key = ?record.key,
            complete = record.is_complete(),
            "added word"
        );
        Ok(record)
    }

    async fn delete_word(&self, user_id: &UserId, word: &Word) -> Result<(), Error> {
        let _guard = self.lock.lock().await;
        let current = self.snapshot(user_id).await?;
        let target = current
            .iter()
            .find(|stored| stored.record.word == word.as_ref())
            .ok_or_else(|| Error::not_found("word not found"))?;
        self.delete_at(target.index).await?;
        info!(user_id = %user_id, word = %word, row = target.index, "deleted word");
        Ok(())
    }

    async fn delete_record(&self, request: DeleteRecordRequest) -> Result<(), Error> {
        let DeleteRecordRequest {
            user_id,
            key,
            expected_version,
        } = request;
        let _guard = self.lock.lock().await;
        let current = self.snapshot(&user_id).await?;
        let target = current
            .iter()
            .find(|stored| stored.record.key == Some(key))
            .ok_or_else(|| Error::not_found("record not found"))?;

        if let Some(expected) =
            expected_version.filter(|expected| *expected != target.record.version)
        {
            warn!(
                user_id = %user_id,
                key = %key,
                expected,
                stored = target.record.version,
                "delete rejected on version mismatch"
            );
            return Err(Error::conflict("record changed since it was read").with_details(json!({
                "key": key,
                "expectedVersion": expected,
                "actualVersion": target.record.version,
            })));
        }

        self.delete_at(target.index).await?;
        info!(user_id = %user_id, key = %key, row = target.index, "deleted record");
        Ok(())
    }

    async fn fill_missing_content(&self, user_id: &UserId) -> Result<BackfillReport, Error> {
        let candidates: Vec<WordRecord> = self
            .snapshot(user_id)
            .await?
            .into_iter()
            .map(|stored| stored.record)
            .filter(|record| !record.is_complete())
            .collect();
        if candidates.is_empty() {
            debug!(user_id = %user_id, "no incomplete records");
            return Ok(BackfillReport::default());
        }

        let repairs = self.enrich_candidates(candidates).await?;
        let report = self.apply_repairs(user_id, repairs).await?;
        info!(
            user_id = %user_id,
            updated = report.updated,
            conflicts = report.conflicts,
            "backfill finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "word_records_service_tests.rs"]
mod tests;
