//! In-process tabular store.
//!
//! Mirrors the remote store's observable behaviour closely enough to run the
//! service without credentials and to drive tests: reads drop trailing blank
//! cells, appends land after the last row, deletes shift later rows up, and
//! updates past the end grow the sheet.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{SheetClientError, SheetRange, SheetRangeClient, SheetTable};

type TableKey = (String, String);

fn table_key(table: &SheetTable) -> TableKey {
    (table.spreadsheet_id.clone(), table.sheet_name.clone())
}

#[derive(Default)]
struct State {
    tables: HashMap<TableKey, Vec<Vec<String>>>,
    failures: VecDeque<SheetClientError>,
}

/// Thread-safe in-memory implementation of [`SheetRangeClient`].
///
/// # Examples
/// ```
/// use vocab_backend::domain::ports::SheetTable;
/// use vocab_backend::outbound::sheets::InMemorySheetStore;
///
/// let store = InMemorySheetStore::new();
/// let table = SheetTable::new("doc", "Words", 0);
/// store.seed(&table, vec![vec!["".into(), "U1".into(), "resilient".into()]]);
/// assert_eq!(store.snapshot(&table).len(), 1);
/// ```
#[derive(Default)]
pub struct InMemorySheetStore {
    state: Mutex<State>,
}

impl InMemorySheetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the rows of `table`.
    pub fn seed(&self, table: &SheetTable, rows: Vec<Vec<String>>) {
        self.state().tables.insert(table_key(table), rows);
    }

    /// Raw rows of `table` as stored, without trailing-cell trimming.
    pub fn snapshot(&self, table: &SheetTable) -> Vec<Vec<String>> {
        self.state()
            .tables
            .get(&table_key(table))
            .cloned()
            .unwrap_or_default()
    }

    /// Make the next call fail with `error`. Queued failures are consumed in
    /// order, one per call.
    pub fn fail_next(&self, error: SheetClientError) {
        self.state().failures.push_back(error);
    }

    fn take_failure(state: &mut State) -> Result<(), SheetClientError> {
        state.failures.pop_front().map_or(Ok(()), Err)
    }
}

fn trim_trailing_blanks(mut cells: Vec<String>) -> Vec<String> {
    while cells.last().is_some_and(String::is_empty) {
        cells.pop();
    }
    cells
}

fn place(cells: &mut Vec<String>, first: usize, values: Vec<String>) {
    let end = first + values.len();
    if cells.len() < end {
        cells.resize(end, String::new());
    }
    for (offset, value) in values.into_iter().enumerate() {
        cells[first + offset] = value;
    }
}

fn check_width(range: &SheetRange, row: &[String]) -> Result<(), SheetClientError> {
    if row.len() > range.column_span().width() {
        return Err(SheetClientError::invalid_range(format!(
            "{} holds {} columns, got {}",
            range.a1(),
            range.column_span().width(),
            row.len()
        )));
    }
    Ok(())
}

#[async_trait]
impl SheetRangeClient for InMemorySheetStore {
    async fn read(&self, range: &SheetRange) -> Result<Vec<Vec<String>>, SheetClientError> {
        let mut state = self.state();
        Self::take_failure(&mut state)?;
        let span = range.column_span();
        let first = usize::from(span.first());
        let rows = state
            .tables
            .get(&table_key(range.table()))
            .map(Vec::as_slice)
            .unwrap_or_default();
        let selected: Vec<&Vec<String>> = match range.row_index() {
            Some(index) => rows.get(index).into_iter().collect(),
            None => rows.iter().collect(),
        };
        let mut values: Vec<Vec<String>> = selected
            .into_iter()
            .map(|row| {
                let cells = row.iter().skip(first).take(span.width()).cloned().collect();
                trim_trailing_blanks(cells)
            })
            .collect();
        while values.last().is_some_and(Vec::is_empty) {
            values.pop();
        }
        Ok(values)
    }

    async fn append(&self, range: &SheetRange, row: Vec<String>) -> Result<(), SheetClientError> {
        check_width(range, &row)?;
        let mut state = self.state();
        Self::take_failure(&mut state)?;
        let mut cells = Vec::new();
        place(&mut cells, usize::from(range.column_span().first()), row);
        state
            .tables
            .entry(table_key(range.table()))
            .or_default()
            .push(cells);
        Ok(())
    }

    async fn update(&self, range: &SheetRange, row: Vec<String>) -> Result<(), SheetClientError> {
        let index = range
            .row_index()
            .ok_or_else(|| SheetClientError::invalid_range(range.a1()))?;
        check_width(range, &row)?;
        let mut state = self.state();
        Self::take_failure(&mut state)?;
        let rows = state.tables.entry(table_key(range.table())).or_default();
        if rows.len() <= index {
            rows.resize_with(index + 1, Vec::new);
        }
        place(&mut rows[index], usize::from(range.column_span().first()), row);
        Ok(())
    }

    async fn delete_row(
        &self,
        table: &SheetTable,
        row_index: usize,
    ) -> Result<(), SheetClientError> {
        let mut state = self.state();
        Self::take_failure(&mut state)?;
        let rows = state.tables.entry(table_key(table)).or_default();
        if row_index >= rows.len() {
            return Err(SheetClientError::row_out_of_bounds(row_index));
        }
        rows.remove(row_index);
        Ok(())
    }
}
