//! User identity primitives.
//!
//! A user is known externally by an email address and internally by an opaque
//! [`UserId`] token minted on first sight. Nicknames are optional display
//! labels stored next to the identity.

use std::fmt;

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};

/// Length of freshly generated user identifiers.
pub const USER_ID_LEN: usize = 8;
/// Maximum accepted length for identifiers read from callers or storage.
pub const USER_ID_MAX: usize = 64;
/// Maximum nickname length in characters.
pub const NICKNAME_MAX: usize = 32;
/// Maximum email length in characters.
pub const EMAIL_MAX: usize = 254;

/// Validation errors for user primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must contain a single '@' between a local part and a domain")]
    MalformedEmail,
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
    #[error("user id must not be empty")]
    EmptyUserId,
    #[error("user id must be at most {max} characters")]
    UserIdTooLong { max: usize },
    #[error("user id must not contain whitespace or control characters")]
    UserIdInvalidCharacters,
    #[error("nickname must not be empty")]
    EmptyNickname,
    #[error("nickname must be at most {max} characters")]
    NicknameTooLong { max: usize },
}

/// External identity of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`]. Surrounding whitespace is removed.
    ///
    /// # Examples
    /// ```
    /// use vocab_backend::domain::Email;
    ///
    /// let email = Email::new(" learner@example.com ").expect("valid email");
    /// assert_eq!(email.as_ref(), "learner@example.com");
    /// assert!(Email::new("no-at-sign").is_err());
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        let mut parts = trimmed.split('@');
        let well_formed = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty()
        );
        if !well_formed || trimmed.chars().any(char::is_whitespace) {
            return Err(UserValidationError::MalformedEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque user identifier.
///
/// New identifiers are random alphanumeric tokens of [`USER_ID_LEN`]
/// characters and never change once minted. Identifiers minted by earlier
/// deployments use other alphabets, so callers may supply any short token
/// without whitespace or control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyUserId);
        }
        if raw.chars().count() > USER_ID_MAX {
            return Err(UserValidationError::UserIdTooLong { max: USER_ID_MAX });
        }
        if raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(UserValidationError::UserIdInvalidCharacters);
        }
        Ok(Self(raw.to_owned()))
    }

    /// Accept an identifier read back from the user or word table. Only
    /// blankness is checked so that rows written by older deployments load.
    pub(crate) fn from_storage(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    /// Mint a fresh random identifier.
    ///
    /// # Examples
    /// ```
    /// use vocab_backend::domain::{USER_ID_LEN, UserId};
    ///
    /// let id = UserId::generate();
    /// assert_eq!(id.as_ref().len(), USER_ID_LEN);
    /// ```
    pub fn generate() -> Self {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(USER_ID_LEN)
            .map(char::from)
            .collect();
        Self(token)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Display label chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nickname(String);

impl Nickname {
    /// Validate and construct a [`Nickname`]. Surrounding whitespace is removed.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyNickname);
        }
        if trimmed.chars().count() > NICKNAME_MAX {
            return Err(UserValidationError::NicknameTooLong { max: NICKNAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Accept a nickname read back from storage. Only blankness is checked so
    /// that labels written under older limits still load.
    pub(crate) fn from_storage(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Nickname {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Nickname> for String {
    fn from(value: Nickname) -> Self {
        value.0
    }
}

impl TryFrom<String> for Nickname {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("   ", UserValidationError::EmptyEmail)]
    #[case("plain", UserValidationError::MalformedEmail)]
    #[case("@example.com", UserValidationError::MalformedEmail)]
    #[case("someone@", UserValidationError::MalformedEmail)]
    #[case("a@b@c", UserValidationError::MalformedEmail)]
    #[case("two words@example.com", UserValidationError::MalformedEmail)]
    fn email_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(Email::new(raw), Err(expected));
    }

    #[rstest]
    fn email_keeps_case_and_trims() {
        let email = Email::new("  Learner@Example.com\n").expect("valid email");
        assert_eq!(email.as_ref(), "Learner@Example.com");
    }

    #[rstest]
    fn generated_ids_are_alphanumeric_and_fixed_length() {
        let id = UserId::generate();
        assert_eq!(id.as_ref().len(), USER_ID_LEN);
        assert!(id.as_ref().chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(UserId::new(id.as_ref()).is_ok(), "generated ids must revalidate");
    }

    #[rstest]
    fn generated_ids_differ() {
        assert_ne!(UserId::generate(), UserId::generate());
    }

    #[rstest]
    #[case("", UserValidationError::EmptyUserId)]
    #[case("abc def", UserValidationError::UserIdInvalidCharacters)]
    #[case("id\u{7}bell", UserValidationError::UserIdInvalidCharacters)]
    fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw), Err(expected));
    }

    #[rstest]
    #[case("abc.def")]
    #[case("legacy:42")]
    #[case("a1B2c3D4e5")]
    fn user_id_accepts_legacy_tokens(#[case] raw: &str) {
        assert_eq!(UserId::new(raw).expect("legacy id").as_ref(), raw);
    }

    #[rstest]
    #[case(" abc.def ", Some("abc.def"))]
    #[case("   ", None)]
    fn stored_user_ids_only_reject_blanks(#[case] raw: &str, #[case] expected: Option<&str>) {
        let long = "x".repeat(USER_ID_MAX + 10);
        assert_eq!(
            UserId::from_storage(raw).map(String::from),
            expected.map(str::to_owned)
        );
        assert!(UserId::from_storage(&long).is_some());
    }

    #[rstest]
    fn user_id_rejects_overlong_tokens() {
        let raw = "a".repeat(USER_ID_MAX + 1);
        assert_eq!(
            UserId::new(raw),
            Err(UserValidationError::UserIdTooLong { max: USER_ID_MAX })
        );
    }

    #[rstest]
    fn nickname_is_trimmed_and_bounded() {
        assert_eq!(
            Nickname::new(" Kenji ").expect("valid nickname").as_ref(),
            "Kenji"
        );
        assert_eq!(
            Nickname::new("x".repeat(NICKNAME_MAX + 1)),
            Err(UserValidationError::NicknameTooLong { max: NICKNAME_MAX })
        );
    }

    #[rstest]
    fn serde_round_trips_through_validation() {
        let id: UserId = serde_json::from_str("\"U1\"").expect("valid id");
        assert_eq!(id.as_ref(), "U1");
        assert!(serde_json::from_str::<UserId>("\"\"").is_err());
    }
}
