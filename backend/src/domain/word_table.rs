//! Row layout of the word table.
//!
//! | Column | Content |
//! |---|---|
//! | A | key |
//! | B | user id |
//! | C | word |
//! | D | pronunciation |
//! | E | definition |
//! | F | synonyms |
//! | G | examples |
//! | H | version |
//! | I | completeness |
//!
//! Rows written before keys existed have a blank column A and stop after
//! column C or G. Missing cells read as empty strings.

use super::ports::ColumnSpan;
use super::{
    Enrichment, FieldCompleteness, RecordKey, UserId, WordRecord, decode_list, encode_list,
};

/// Columns A through I.
pub(crate) const WORD_COLUMNS: ColumnSpan = ColumnSpan::new(0, 8);

const KEY: usize = 0;
const USER_ID: usize = 1;
const WORD: usize = 2;
const PRONUNCIATION: usize = 3;
const DEFINITION: usize = 4;
const SYNONYMS: usize = 5;
const EXAMPLES: usize = 6;
const VERSION: usize = 7;
const COMPLETENESS: usize = 8;

/// A parsed row together with its position in the snapshot it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoredWord {
    pub index: usize,
    pub record: WordRecord,
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map_or("", |value| value.trim())
}

/// Parse one row. Rows with a blank user id are skipped.
pub(crate) fn parse_row(row: &[String]) -> Option<WordRecord> {
    let user_id = UserId::from_storage(cell(row, USER_ID))?;
    let enrichment = Enrichment {
        pronunciation: cell(row, PRONUNCIATION).to_owned(),
        definition: cell(row, DEFINITION).to_owned(),
        synonyms: decode_list(cell(row, SYNONYMS)),
        examples: decode_list(cell(row, EXAMPLES)),
    };
    let completeness = serde_json::from_str::<FieldCompleteness>(cell(row, COMPLETENESS))
        .unwrap_or_else(|_| enrichment.completeness());
    Some(WordRecord {
        key: RecordKey::parse(cell(row, KEY)).ok(),
        user_id,
        word: cell(row, WORD).to_owned(),
        enrichment,
        completeness,
        version: cell(row, VERSION).parse().unwrap_or(0),
    })
}

/// Serialise a record into a full-width row.
pub(crate) fn to_cells(record: &WordRecord) -> Vec<String> {
    vec![
        record.key.map(|key| key.to_string()).unwrap_or_default(),
        record.user_id.to_string(),
        record.word.clone(),
        record.enrichment.pronunciation.clone(),
        record.enrichment.definition.clone(),
        encode_list(&record.enrichment.synonyms),
        encode_list(&record.enrichment.examples),
        record.version.to_string(),
        serde_json::to_string(&record.completeness).unwrap_or_default(),
    ]
}

/// Records of `user_id` in snapshot order, with their row indices.
pub(crate) fn rows_for_user(rows: &[Vec<String>], user_id: &UserId) -> Vec<StoredWord> {
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| parse_row(row).map(|record| StoredWord { index, record }))
        .filter(|stored| stored.record.user_id == *user_id)
        .collect()
}
