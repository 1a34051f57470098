//! Row layout of the user table: A = email, B = reserved, C = user id,
//! D = nickname.

use super::ports::ColumnSpan;

/// Columns A through D.
pub(crate) const USER_COLUMNS: ColumnSpan = ColumnSpan::new(0, 3);

/// One user row, padded to full width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct UserRow {
    pub email: String,
    pub reserved: String,
    pub user_id: String,
    pub nickname: String,
}

impl UserRow {
    pub(crate) fn parse(row: &[String]) -> Self {
        let cell = |index: usize| row.get(index).map_or("", |value| value.trim()).to_owned();
        Self {
            email: cell(0),
            reserved: cell(1),
            user_id: cell(2),
            nickname: cell(3),
        }
    }

    pub(crate) fn into_cells(self) -> Vec<String> {
        vec![self.email, self.reserved, self.user_id, self.nickname]
    }
}

/// Parse a snapshot, keeping row indices.
pub(crate) fn parse_rows(rows: &[Vec<String>]) -> Vec<(usize, UserRow)> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| (index, UserRow::parse(row)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_rows_pad_with_blanks() {
        let row = UserRow::parse(&["a@example.com".to_owned()]);
        assert_eq!(row.email, "a@example.com");
        assert!(row.user_id.is_empty() && row.nickname.is_empty());
        assert_eq!(row.into_cells().len(), USER_COLUMNS.width());
    }
}
