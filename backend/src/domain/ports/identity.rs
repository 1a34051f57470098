//! Driving ports for user identity and nickname operations.
//!
//! HTTP handlers call these ports; the domain services implement them over
//! the user table.

use async_trait::async_trait;

use crate::domain::{Email, Error, Nickname, UserId};

/// One nickname directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NicknameEntry {
    /// Nickname chosen by the user.
    pub nickname: Nickname,
    /// Identifier of the user owning the nickname.
    pub user_id: UserId,
}

/// Driving port mapping external identities to user identifiers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityCommand: Send + Sync {
    /// Return the identifier bound to `email`, minting one on first sight.
    ///
    /// Sequential calls with the same email always return the same id.
    async fn get_or_create_user(&self, email: &Email) -> Result<UserId, Error>;
}

/// Driving port for nickname lookup and maintenance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NicknameCommand: Send + Sync {
    /// Return the nickname of `user_id`.
    ///
    /// # Errors
    /// `not_found` when the user is unknown or has no nickname.
    async fn check_nickname(&self, user_id: &UserId) -> Result<Nickname, Error>;

    /// Replace the nickname of `user_id`.
    ///
    /// # Errors
    /// `not_found` when the user is unknown.
    async fn update_nickname(&self, user_id: &UserId, nickname: &Nickname) -> Result<(), Error>;

    /// Resolve the nickname and identifier for each known email that has a
    /// nickname. Unknown emails and users without nicknames are skipped.
    async fn nicknames_for(&self, emails: &[Email]) -> Result<Vec<NicknameEntry>, Error>;
}

/// Fixture identity port returning a constant identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureIdentityCommand;

/// Identifier returned by [`FixtureIdentityCommand`].
pub const FIXTURE_USER_ID: &str = "fixture1";

#[async_trait]
impl IdentityCommand for FixtureIdentityCommand {
    async fn get_or_create_user(&self, _email: &Email) -> Result<UserId, Error> {
        UserId::new(FIXTURE_USER_ID).map_err(|err| Error::internal(err.to_string()))
    }
}

/// Fixture nickname port that knows no users.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureNicknameCommand;

#[async_trait]
impl NicknameCommand for FixtureNicknameCommand {
    async fn check_nickname(&self, _user_id: &UserId) -> Result<Nickname, Error> {
        Err(Error::not_found("user not found"))
    }

    async fn update_nickname(&self, _user_id: &UserId, _nickname: &Nickname) -> Result<(), Error> {
        Err(Error::not_found("user not found"))
    }

    async fn nicknames_for(&self, _emails: &[Email]) -> Result<Vec<NicknameEntry>, Error> {
        Ok(Vec::new())
    }
}
