use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Single-use token bound to a user, e.g. for email validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ValidationToken {
    pub validation_token: String,
    pub created_at: DateTime<Utc>,
    /// Lifetime in seconds, counted from `created_at`
    pub expires_in: i64,
}

impl ValidationToken {
    pub fn new(validation_token: impl Into<String>, expires_in: i64) -> Self {
        Self {
            validation_token: validation_token.into(),
            created_at: Utc::now(),
            expires_in,
        }
    }

    /// Creates a token with a random value
    pub fn generate(expires_in: i64) -> Self {
        Self::new(uuid::Uuid::new_v4().simple().to_string(), expires_in)
    }

    /// `None` when the lifetime reaches past the representable time range
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Duration::try_seconds(self.expires_in)
            .and_then(|lifetime| self.created_at.checked_add_signed(lifetime))
    }

    /// Expiry is left to the caller; the store never sweeps tokens.
    /// A lifetime beyond the representable time range never expires.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expires_at| now >= expires_at)
    }
}
