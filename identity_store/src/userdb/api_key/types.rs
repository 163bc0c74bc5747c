use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::userdb::errors::UserError;

/// Permission granted to an API key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Right {
    UserInfo,
    UserSettingsBasic,
    UserSettingsApiKeys,
    UserDelete,
    UserAuthorizedClients,
    UserApplicationsList,
    UserApplicationsCreate,
    UserGatewaysList,
    UserGatewaysCreate,
    UserClientsList,
    UserClientsCreate,
    UserOrganizationsList,
    UserOrganizationsCreate,
}

impl Right {
    pub const ALL: [Right; 13] = [
        Right::UserInfo,
        Right::UserSettingsBasic,
        Right::UserSettingsApiKeys,
        Right::UserDelete,
        Right::UserAuthorizedClients,
        Right::UserApplicationsList,
        Right::UserApplicationsCreate,
        Right::UserGatewaysList,
        Right::UserGatewaysCreate,
        Right::UserClientsList,
        Right::UserClientsCreate,
        Right::UserOrganizationsList,
        Right::UserOrganizationsCreate,
    ];

    /// Storage and wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Right::UserInfo => "RIGHT_USER_INFO",
            Right::UserSettingsBasic => "RIGHT_USER_SETTINGS_BASIC",
            Right::UserSettingsApiKeys => "RIGHT_USER_SETTINGS_API_KEYS",
            Right::UserDelete => "RIGHT_USER_DELETE",
            Right::UserAuthorizedClients => "RIGHT_USER_AUTHORIZED_CLIENTS",
            Right::UserApplicationsList => "RIGHT_USER_APPLICATIONS_LIST",
            Right::UserApplicationsCreate => "RIGHT_USER_APPLICATIONS_CREATE",
            Right::UserGatewaysList => "RIGHT_USER_GATEWAYS_LIST",
            Right::UserGatewaysCreate => "RIGHT_USER_GATEWAYS_CREATE",
            Right::UserClientsList => "RIGHT_USER_CLIENTS_LIST",
            Right::UserClientsCreate => "RIGHT_USER_CLIENTS_CREATE",
            Right::UserOrganizationsList => "RIGHT_USER_ORGANIZATIONS_LIST",
            Right::UserOrganizationsCreate => "RIGHT_USER_ORGANIZATIONS_CREATE",
        }
    }
}

impl fmt::Display for Right {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Right {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Right::ALL
            .into_iter()
            .find(|right| right.as_str() == s)
            .ok_or_else(|| UserError::InvalidData(format!("Unknown right: {s}")))
    }
}

impl TryFrom<String> for Right {
    type Error = UserError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Right> for String {
    fn from(right: Right) -> Self {
        right.as_str().to_string()
    }
}

/// An API key owned by a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ApiKey {
    /// Opaque unique key
    pub key: String,
    /// Display name, unique per user
    pub name: String,
    #[sqlx(skip)]
    #[serde(default)]
    pub rights: Vec<Right>,
}

impl ApiKey {
    pub fn new(key: impl Into<String>, name: impl Into<String>, rights: Vec<Right>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            rights,
        }
    }

    /// Creates a key with a freshly generated random identifier
    pub fn generate(name: impl Into<String>, rights: Vec<Right>) -> Self {
        Self::new(uuid::Uuid::new_v4().simple().to_string(), name, rights)
    }
}
