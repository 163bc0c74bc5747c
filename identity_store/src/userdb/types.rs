use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::attributes::{Attributes, ExtraAttributes};

/// Core user account fields
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    /// Unique user identifier, stored lower-cased
    pub user_id: String,
    /// Display name
    pub name: String,
    /// Unique email address, stored lower-cased
    pub email: String,
    /// Opaque credential material
    #[serde(skip_serializing, default)]
    pub password: String,
    /// When the email address was validated
    pub validated_at: Option<DateTime<Utc>>,
    /// Whether the user has administrator privileges
    pub admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            name: name.into(),
            email: email.into(),
            password: password.into(),
            validated_at: None,
            admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_validated(&self) -> bool {
        self.validated_at.is_some()
    }
}

/// A user-like value the store can persist and populate.
///
/// Implementors that also carry extra attributes expose them through
/// [`UserEntity::attributes`] and [`UserEntity::attributes_mut`]; the
/// defaults report that the value has none.
pub trait UserEntity: Send + Sync {
    fn user(&self) -> &User;
    fn user_mut(&mut self) -> &mut User;

    fn attributes(&self) -> Option<&dyn ExtraAttributes> {
        None
    }

    fn attributes_mut(&mut self) -> Option<&mut dyn ExtraAttributes> {
        None
    }
}

impl UserEntity for User {
    fn user(&self) -> &User {
        self
    }

    fn user_mut(&mut self) -> &mut User {
        self
    }
}

/// A user together with its extra attributes
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserWithAttributes {
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub attributes: Attributes,
}

impl UserWithAttributes {
    pub fn new(user: User, attributes: Attributes) -> Self {
        Self { user, attributes }
    }
}

impl ExtraAttributes for UserWithAttributes {
    fn extra_attributes(&self) -> Attributes {
        self.attributes.clone()
    }

    fn set_extra_attributes(&mut self, attributes: Attributes) {
        self.attributes = attributes;
    }
}

impl UserEntity for UserWithAttributes {
    fn user(&self) -> &User {
        &self.user
    }

    fn user_mut(&mut self) -> &mut User {
        &mut self.user
    }

    fn attributes(&self) -> Option<&dyn ExtraAttributes> {
        Some(self)
    }

    fn attributes_mut(&mut self) -> Option<&mut dyn ExtraAttributes> {
        Some(self)
    }
}

/// Column a user lookup is keyed on; values are lower-cased by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UserSearchField {
    Id(String),
    Email(String),
}

impl fmt::Display for UserSearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserSearchField::Id(id) => write!(f, "Id: {id}"),
            UserSearchField::Email(email) => write!(f, "Email: {email}"),
        }
    }
}
