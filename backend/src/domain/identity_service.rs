//! Identity and nickname services over the user table.
//!
//! Every scan-then-mutate sequence runs while holding the user-table lock, so
//! within one process two requests for the same unseen email observe each
//! other and receive the same identifier. Separate processes sharing one
//! remote sheet are not coordinated.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::ports::{
    IdentityCommand, NicknameCommand, NicknameEntry, SheetRange, SheetRangeClient, SheetTable,
};
use crate::domain::upstream::store_failure;
use crate::domain::user_table::{USER_COLUMNS, UserRow, parse_rows};
use crate::domain::{Email, Error, Nickname, UserId};

/// Implements [`IdentityCommand`] and [`NicknameCommand`].
pub struct IdentityService {
    sheets: Arc<dyn SheetRangeClient>,
    table: SheetTable,
    lock: Mutex<()>,
}

impl IdentityService {
    /// Create a service over the user `table`.
    pub fn new(sheets: Arc<dyn SheetRangeClient>, table: SheetTable) -> Self {
        Self {
            sheets,
            table,
            lock: Mutex::new(()),
        }
    }

    async fn snapshot(&self) -> Result<Vec<(usize, UserRow)>, Error> {
        let rows = self
            .sheets
            .read(&SheetRange::columns(&self.table, USER_COLUMNS))
            .await
            .map_err(store_failure)?;
        debug!(rows = rows.len(), "read user table");
        Ok(parse_rows(&rows))
    }

    async fn write_row(&self, index: usize, row: UserRow) -> Result<(), Error> {
        self.sheets
            .update(
                &SheetRange::row(&self.table, USER_COLUMNS, index),
                row.into_cells(),
            )
            .await
            .map_err(store_failure)
    }
}

fn find_by_user<'a>(
    rows: &'a [(usize, UserRow)],
    user_id: &UserId,
) -> Option<&'a (usize, UserRow)> {
    rows.iter().find(|(_, row)| row.user_id == user_id.as_ref())
}

#[async_trait]
impl IdentityCommand for IdentityService {
    async fn get_or_create_user(&self, email: &Email) -> Result<UserId, Error> {
        let _guard = self.lock.lock().await;
        let rows = self.snapshot().await?;
        let existing = rows.iter().find(|(_, row)| row.email == email.as_ref());

        match existing {
            Some((index, row)) => {
                if let Some(user_id) = UserId::from_storage(&row.user_id) {
                    return Ok(user_id);
                }
                let user_id = UserId::generate();
                let repaired = UserRow {
                    user_id: user_id.to_string(),
                    ..row.clone()
                };
                self.write_row(*index, repaired).await?;
                info!(user_id = %user_id, row = index, "assigned user id to existing email row");
                Ok(user_id)
            }
            None => {
                let user_id = UserId::generate();
                let row = UserRow {
                    email: email.to_string(),
                    user_id: user_id.to_string(),
                    ..UserRow::default()
                };
                self.sheets
                    .append(&SheetRange::columns(&self.table, USER_COLUMNS), row.into_cells())
                    .await
                    .map_err(store_failure)?;
                info!(user_id = %user_id, "created user");
                Ok(user_id)
            }
        }
    }
}

#[async_trait]
impl NicknameCommand for IdentityService {
    async fn check_nickname(&self, user_id: &UserId) -> Result<Nickname, Error> {
        let rows = self.snapshot().await?;
        let (_, row) =
            find_by_user(&rows, user_id).ok_or_else(|| Error::not_found("user not found"))?;
        Nickname::from_storage(&row.nickname).ok_or_else(|| Error::not_found("nickname not set"))
    }

    async fn update_nickname(&self, user_id: &UserId, nickname: &Nickname) -> Result<(), Error> {
        let _guard = self.lock.lock().await;
        let rows = self.snapshot().await?;
        let (index, row) =
            find_by_user(&rows, user_id).ok_or_else(|| Error::not_found("user not found"))?;
        let updated = UserRow {
            nickname: nickname.to_string(),
            ..row.clone()
        };
        self.write_row(*index, updated).await?;
        info!(user_id = %user_id, "updated nickname");
        Ok(())
    }

    async fn nicknames_for(&self, emails: &[Email]) -> Result<Vec<NicknameEntry>, Error> {
        let rows = self.snapshot().await?;
        let mut by_email: BTreeMap<&str, &UserRow> = BTreeMap::new();
        for (_, row) in &rows {
            by_email.entry(row.email.as_str()).or_insert(row);
        }

        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut entries = Vec::new();
        for email in emails {
            let email: &str = email.as_ref();
            if !seen.insert(email) {
                continue;
            }
            let Some(row) = by_email.get(email) else {
                continue;
            };
            let Some(nickname) = Nickname::from_storage(&row.nickname) else {
                continue;
            };
            if let Some(user_id) = UserId::from_storage(&row.user_id) {
                entries.push(NicknameEntry { nickname, user_id });
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
#[path = "identity_service_tests.rs"]
mod tests;
