//! Driven port for a remote, range-addressed tabular store.
//!
//! The store offers four primitives and nothing else: no transactions, no
//! indexes, no schema. Rows come back as ordered cells and may be shorter
//! than the requested column span. `delete_row` is structural, so every row
//! index observed before it, by any caller, is invalid afterwards.

use async_trait::async_trait;

use super::define_port_error;

/// One sheet (tab) inside a spreadsheet document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetTable {
    /// Identifier of the spreadsheet document.
    pub spreadsheet_id: String,
    /// Tab name used in A1 ranges.
    pub sheet_name: String,
    /// Numeric tab id used by structural deletes.
    pub sheet_id: u32,
}

impl SheetTable {
    /// Describe a sheet tab.
    pub fn new(
        spreadsheet_id: impl Into<String>,
        sheet_name: impl Into<String>,
        sheet_id: u32,
    ) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: sheet_name.into(),
            sheet_id,
        }
    }

    /// Sheet name quoted for A1 notation when it contains anything other than
    /// letters, digits or underscores.
    pub fn quoted_name(&self) -> String {
        let plain = !self.sheet_name.is_empty()
            && self
                .sheet_name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_');
        if plain {
            self.sheet_name.clone()
        } else {
            format!("'{}'", self.sheet_name.replace('\'', "''"))
        }
    }
}

/// Inclusive, zero-based column span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnSpan {
    first: u16,
    last: u16,
}

impl ColumnSpan {
    /// Build a span from zero-based column indices. The bounds are reordered
    /// when given backwards.
    pub const fn new(first: u16, last: u16) -> Self {
        if first <= last {
            Self { first, last }
        } else {
            Self {
                first: last,
                last: first,
            }
        }
    }

    /// First column index.
    pub const fn first(&self) -> u16 {
        self.first
    }

    /// Last column index.
    pub const fn last(&self) -> u16 {
        self.last
    }

    /// Number of columns covered.
    pub const fn width(&self) -> usize {
        (self.last - self.first) as usize + 1
    }
}

/// Convert a zero-based column index into A1 letters (`0 -> A`, `26 -> AA`).
pub fn column_letters(index: u16) -> String {
    let mut remaining = u32::from(index) + 1;
    let mut letters = Vec::new();
    while remaining > 0 {
        let offset = (remaining - 1) % 26;
        letters.push(char::from(b'A' + offset as u8));
        remaining = (remaining - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// A column span over a whole sheet, or over a single row of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetRange {
    table: SheetTable,
    columns: ColumnSpan,
    row: Option<usize>,
}

impl SheetRange {
    /// Full-height range over `columns`.
    pub fn columns(table: &SheetTable, columns: ColumnSpan) -> Self {
        Self {
            table: table.clone(),
            columns,
            row: None,
        }
    }

    /// Single-row range over `columns` at zero-based `row_index`.
    pub fn row(table: &SheetTable, columns: ColumnSpan, row_index: usize) -> Self {
        Self {
            table: table.clone(),
            columns,
            row: Some(row_index),
        }
    }

    /// Sheet addressed by this range.
    pub fn table(&self) -> &SheetTable {
        &self.table
    }

    /// Columns covered by this range.
    pub fn column_span(&self) -> ColumnSpan {
        self.columns
    }

    /// Zero-based row, when the range targets a single row.
    pub fn row_index(&self) -> Option<usize> {
        self.row
    }

    /// Render in A1 notation.
    ///
    /// # Examples
    /// ```
    /// use vocab_backend::domain::ports::{ColumnSpan, SheetRange, SheetTable};
    ///
    /// let table = SheetTable::new("doc", "Words", 0);
    /// let span = ColumnSpan::new(0, 8);
    /// assert_eq!(SheetRange::columns(&table, span).a1(), "Words!A:I");
    /// assert_eq!(SheetRange::row(&table, span, 4).a1(), "Words!A5:I5");
    /// ```
    pub fn a1(&self) -> String {
        let first = column_letters(self.columns.first);
        let last = column_letters(self.columns.last);
        let sheet = self.table.quoted_name();
        match self.row {
            Some(index) => {
                let row = index + 1;
                format!("{sheet}!{first}{row}:{last}{row}")
            }
            None => format!("{sheet}!{first}:{last}"),
        }
    }
}

define_port_error! {
    /// Errors raised by tabular store adapters.
    pub enum SheetClientError {
        /// Network transport failed before a response arrived.
        Transport { message: String } => "sheet store transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } => "sheet store timed out: {message}",
        /// Credentials were missing, expired, or lacked permission.
        Unauthorized { message: String } => "sheet store rejected credentials: {message}",
        /// The store throttled the call.
        RateLimited { message: String } => "sheet store rate limited request: {message}",
        /// The store refused the request for another client-side reason.
        Rejected { message: String } => "sheet store rejected request: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "sheet store response decode failed: {message}",
        /// The range could not be expressed or was refused as malformed.
        InvalidRange { range: String } => "invalid sheet range: {range}",
        /// A structural delete targeted a row past the end of the sheet.
        RowOutOfBounds { index: usize } => "row {index} is out of bounds",
    }
}

impl SheetClientError {
    /// True for failures of the remote service itself, as opposed to a
    /// request this service built incorrectly.
    pub fn is_upstream_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. }
                | Self::Timeout { .. }
                | Self::Unauthorized { .. }
                | Self::RateLimited { .. }
                | Self::Rejected { .. }
                | Self::Decode { .. }
        )
    }
}

/// Port over a range-addressed tabular store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SheetRangeClient: Send + Sync {
    /// Return every row in `range`, in order. Trailing empty cells may be
    /// omitted, so rows can be shorter than the span.
    async fn read(&self, range: &SheetRange) -> Result<Vec<Vec<String>>, SheetClientError>;

    /// Append one row after the last populated row of `range`.
    async fn append(&self, range: &SheetRange, row: Vec<String>) -> Result<(), SheetClientError>;

    /// Overwrite the cells of a single-row `range` in place.
    async fn update(&self, range: &SheetRange, row: Vec<String>) -> Result<(), SheetClientError>;

    /// Remove the row at zero-based `row_index`, shifting later rows up.
    async fn delete_row(
        &self,
        table: &SheetTable,
        row_index: usize,
    ) -> Result<(), SheetClientError>;
}
