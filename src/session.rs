use serde::{Deserialize, Serialize};
use std::time::Duration as StdDuration;
use time::OffsetDateTime;

/// The authenticated user, as reported by the identity provider. Read-only to this application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Provider-assigned, stable user id.
    pub uid: String,

    pub display_name: String,

    pub email: String,

    /// When the account was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    /// Name to greet the user with. Falls back to the email for accounts created through
    /// a provider that did not share a display name.
    pub fn greeting_name(&self) -> &str {
        match self.display_name.trim().is_empty() {
            true => &self.email,
            false => &self.display_name,
        }
    }

    /// The account creation date in long form, e.g. "March 7, 2024".
    pub fn member_since(&self) -> String {
        let date = self.created_at.date();
        format!("{} {}, {}", date.month(), date.day(), date.year())
    }
}

/// Provider credentials belonging to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    pub id_token: String,

    pub refresh_token: String,

    /// Point in time at which `id_token` stops being accepted.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl TokenData {
    pub fn new(id_token: String, refresh_token: String, expires_in: StdDuration) -> Self {
        Self {
            id_token,
            refresh_token,
            expires_at: OffsetDateTime::now_utc() + expires_in,
        }
    }

    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }

    /// True when less than `margin` of lifetime is left at `now`.
    pub fn nearly_expired_at(&self, now: OffsetDateTime, margin: StdDuration) -> bool {
        now + margin >= self.expires_at
    }
}

/// An authenticated session: who is signed in and the credentials proving it.
/// Created by the identity provider, destroyed on sign-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: TokenData,
}

impl Session {
    pub fn needs_refresh(&self, margin: StdDuration) -> bool {
        self.token
            .nearly_expired_at(OffsetDateTime::now_utc(), margin)
    }
}
