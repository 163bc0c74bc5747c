use std::sync::Arc;

use chrono::Utc;
use sqlx::{PgConnection, SqliteConnection};

use crate::attributes::AttributeStore;
use crate::storage::{DataStore, data_store_from_env};
use crate::userdb::USER_ENTITY_KIND;
use crate::userdb::api_key::*;
use crate::userdb::validation_token::*;
use crate::userdb::{
    ApiKey, ValidationToken,
    errors::UserError,
    types::{UserEntity, UserSearchField},
};

use super::postgres::*;
use super::sqlite::*;

/// Transactional store for users and everything they own: extra attributes,
/// validation tokens and API keys.
///
/// Every operation issuing more than one statement runs them in a single
/// transaction; a failing step rolls the whole operation back.
#[derive(Clone)]
pub struct UserStore {
    store: Arc<dyn DataStore>,
    attributes: AttributeStore,
}

fn unsupported_store() -> UserError {
    UserError::Storage("Unsupported database type".to_string())
}

impl UserStore {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            attributes: AttributeStore::new(USER_ENTITY_KIND),
        }
    }

    /// Builds a store on the data store configured through the environment
    pub fn from_env() -> Result<Self, UserError> {
        Ok(Self::new(data_store_from_env()?))
    }

    /// Creates missing tables and checks the existing ones
    pub async fn init(&self) -> Result<(), UserError> {
        match (self.store.as_sqlite(), self.store.as_postgres()) {
            (Some(pool), _) => {
                create_tables_sqlite(pool).await?;
                validate_user_tables_sqlite(pool).await?;
                AttributeStore::init_sqlite(pool).await?;
            }
            (_, Some(pool)) => {
                create_tables_postgres(pool).await?;
                validate_user_tables_postgres(pool).await?;
                AttributeStore::init_postgres(pool).await?;
            }
            _ => return Err(unsupported_store()),
        }

        tracing::info!("User store initialized");
        Ok(())
    }

    /// Creates a user together with the extra attributes it carries
    #[tracing::instrument(skip(self, user), fields(user_id = %user.user().user_id), err)]
    pub async fn create<U: UserEntity>(&self, user: &U) -> Result<(), UserError> {
        let now = Utc::now();
        let user_id = user.user().user_id.to_lowercase();

        if let Some(pool) = self.store.as_sqlite() {
            let mut tx = pool.begin().await?;
            create_user_sqlite(&mut tx, user.user(), now).await?;
            self.store_attributes_sqlite(&mut tx, &user_id, user, None)
                .await?;
            tx.commit().await?;
        } else if let Some(pool) = self.store.as_postgres() {
            let mut tx = pool.begin().await?;
            create_user_postgres(&mut tx, user.user(), now).await?;
            self.store_attributes_postgres(&mut tx, &user_id, user, None)
                .await?;
            tx.commit().await?;
        } else {
            return Err(unsupported_store());
        }

        tracing::info!("User created");
        Ok(())
    }

    /// Looks a user up by its case-insensitive ID, populating a value built by `factory`
    #[tracing::instrument(skip(self, factory), err(level = "info"))]
    pub async fn get_by_id<U, F>(&self, user_id: &str, factory: F) -> Result<U, UserError>
    where
        U: UserEntity,
        F: FnOnce() -> U,
    {
        let field = UserSearchField::Id(user_id.to_lowercase());

        self.get_by(&field, factory())
            .await?
            .ok_or_else(|| UserError::UserNotFound {
                user_id: user_id.to_string(),
            })
    }

    /// Looks a user up by its case-insensitive email, populating a value built by `factory`
    #[tracing::instrument(skip(self, factory), err(level = "info"))]
    pub async fn get_by_email<U, F>(&self, email: &str, factory: F) -> Result<U, UserError>
    where
        U: UserEntity,
        F: FnOnce() -> U,
    {
        let field = UserSearchField::Email(email.to_lowercase());

        self.get_by(&field, factory())
            .await?
            .ok_or_else(|| UserError::UserEmailNotFound {
                email: email.to_string(),
            })
    }

    async fn get_by<U: UserEntity>(
        &self,
        field: &UserSearchField,
        mut result: U,
    ) -> Result<Option<U>, UserError> {
        let found = if let Some(pool) = self.store.as_sqlite() {
            let mut tx = pool.begin().await?;
            let found = match get_user_by_field_sqlite(&mut tx, field).await? {
                Some(user) => {
                    let user_id = user.user_id.clone();
                    *result.user_mut() = user;
                    self.load_attributes_sqlite(&mut tx, &user_id, &mut result)
                        .await?;
                    true
                }
                None => false,
            };
            tx.commit().await?;
            found
        } else if let Some(pool) = self.store.as_postgres() {
            let mut tx = pool.begin().await?;
            let found = match get_user_by_field_postgres(&mut tx, field).await? {
                Some(user) => {
                    let user_id = user.user_id.clone();
                    *result.user_mut() = user;
                    self.load_attributes_postgres(&mut tx, &user_id, &mut result)
                        .await?;
                    true
                }
                None => false,
            };
            tx.commit().await?;
            found
        } else {
            return Err(unsupported_store());
        };

        tracing::debug!(%field, found, "User lookup completed");
        Ok(found.then_some(result))
    }

    /// Overwrites the mutable fields of a user and reconciles its extra attributes
    #[tracing::instrument(skip(self, user), fields(user_id = %user.user().user_id), err)]
    pub async fn update<U: UserEntity>(&self, user: &U) -> Result<(), UserError> {
        let now = Utc::now();
        let user_id = user.user().user_id.to_lowercase();

        if let Some(pool) = self.store.as_sqlite() {
            let mut tx = pool.begin().await?;
            update_user_sqlite(&mut tx, user.user(), now).await?;
            self.store_attributes_sqlite(&mut tx, &user_id, user, None)
                .await?;
            tx.commit().await?;
        } else if let Some(pool) = self.store.as_postgres() {
            let mut tx = pool.begin().await?;
            update_user_postgres(&mut tx, user.user(), now).await?;
            self.store_attributes_postgres(&mut tx, &user_id, user, None)
                .await?;
            tx.commit().await?;
        } else {
            return Err(unsupported_store());
        }

        tracing::info!("User updated");
        Ok(())
    }

    #[tracing::instrument(skip(self, token), err)]
    pub async fn save_validation_token(
        &self,
        user_id: &str,
        token: &ValidationToken,
    ) -> Result<(), UserError> {
        let user_id = user_id.to_lowercase();

        if let Some(pool) = self.store.as_sqlite() {
            let mut conn = pool.acquire().await?;
            save_validation_token_sqlite(&mut conn, &user_id, token).await
        } else if let Some(pool) = self.store.as_postgres() {
            let mut conn = pool.acquire().await?;
            save_validation_token_postgres(&mut conn, &user_id, token).await
        } else {
            Err(unsupported_store())
        }
    }

    #[tracing::instrument(skip(self, token), err(level = "info"))]
    pub async fn get_validation_token(
        &self,
        user_id: &str,
        token: &str,
    ) -> Result<ValidationToken, UserError> {
        let user_id = user_id.to_lowercase();

        if let Some(pool) = self.store.as_sqlite() {
            let mut conn = pool.acquire().await?;
            get_validation_token_sqlite(&mut conn, &user_id, token).await
        } else if let Some(pool) = self.store.as_postgres() {
            let mut conn = pool.acquire().await?;
            get_validation_token_postgres(&mut conn, &user_id, token).await
        } else {
            Err(unsupported_store())
        }
    }

    #[tracing::instrument(skip(self, token), err(level = "info"))]
    pub async fn delete_validation_token(
        &self,
        user_id: &str,
        token: &str,
    ) -> Result<(), UserError> {
        let user_id = user_id.to_lowercase();

        if let Some(pool) = self.store.as_sqlite() {
            let mut conn = pool.acquire().await?;
            delete_validation_token_sqlite(&mut conn, &user_id, token).await
        } else if let Some(pool) = self.store.as_postgres() {
            let mut conn = pool.acquire().await?;
            delete_validation_token_postgres(&mut conn, &user_id, token).await
        } else {
            Err(unsupported_store())
        }
    }

    /// Saves an API key and its rights
    #[tracing::instrument(skip(self, key), fields(key_name = %key.name), err)]
    pub async fn save_api_key(&self, user_id: &str, key: &ApiKey) -> Result<(), UserError> {
        let user_id = user_id.to_lowercase();

        if let Some(pool) = self.store.as_sqlite() {
            let mut tx = pool.begin().await?;
            save_api_key_sqlite(&mut tx, &user_id, key).await?;
            save_api_key_rights_sqlite(&mut tx, &key.key, &key.rights).await?;
            tx.commit().await?;
        } else if let Some(pool) = self.store.as_postgres() {
            let mut tx = pool.begin().await?;
            save_api_key_postgres(&mut tx, &user_id, key).await?;
            save_api_key_rights_postgres(&mut tx, &key.key, &key.rights).await?;
            tx.commit().await?;
        } else {
            return Err(unsupported_store());
        }

        tracing::info!(rights = key.rights.len(), "API key saved");
        Ok(())
    }

    /// Gets an API key of a user by name, rights included
    #[tracing::instrument(skip(self), err(level = "info"))]
    pub async fn get_api_key(&self, user_id: &str, key_name: &str) -> Result<ApiKey, UserError> {
        let user_id = user_id.to_lowercase();

        if let Some(pool) = self.store.as_sqlite() {
            let mut tx = pool.begin().await?;
            let mut key = get_api_key_sqlite(&mut tx, &user_id, key_name).await?;
            key.rights = get_api_key_rights_sqlite(&mut tx, &key.key).await?;
            tx.commit().await?;
            Ok(key)
        } else if let Some(pool) = self.store.as_postgres() {
            let mut tx = pool.begin().await?;
            let mut key = get_api_key_postgres(&mut tx, &user_id, key_name).await?;
            key.rights = get_api_key_rights_postgres(&mut tx, &key.key).await?;
            tx.commit().await?;
            Ok(key)
        } else {
            Err(unsupported_store())
        }
    }

    /// Lists the API keys of a user ordered by name, rights included
    #[tracing::instrument(skip(self), err(level = "info"))]
    pub async fn list_api_keys(&self, user_id: &str) -> Result<Vec<ApiKey>, UserError> {
        let user_id = user_id.to_lowercase();

        let keys = if let Some(pool) = self.store.as_sqlite() {
            let mut tx = pool.begin().await?;
            let mut keys = list_api_keys_sqlite(&mut tx, &user_id).await?;
            for key in keys.iter_mut() {
                key.rights = get_api_key_rights_sqlite(&mut tx, &key.key).await?;
            }
            tx.commit().await?;
            keys
        } else if let Some(pool) = self.store.as_postgres() {
            let mut tx = pool.begin().await?;
            let mut keys = list_api_keys_postgres(&mut tx, &user_id).await?;
            for key in keys.iter_mut() {
                key.rights = get_api_key_rights_postgres(&mut tx, &key.key).await?;
            }
            tx.commit().await?;
            keys
        } else {
            return Err(unsupported_store());
        };

        tracing::debug!(count = keys.len(), "API keys listed");
        Ok(keys)
    }

    /// Replaces the rights of the API key named `key.name`
    #[tracing::instrument(skip(self, key), fields(key_name = %key.name), err)]
    pub async fn update_api_key(&self, user_id: &str, key: &ApiKey) -> Result<(), UserError> {
        let user_id = user_id.to_lowercase();

        if let Some(pool) = self.store.as_sqlite() {
            let mut tx = pool.begin().await?;
            let stored = get_api_key_sqlite(&mut tx, &user_id, &key.name).await?;
            delete_api_key_rights_sqlite(&mut tx, &stored.key).await?;
            save_api_key_rights_sqlite(&mut tx, &stored.key, &key.rights).await?;
            tx.commit().await?;
        } else if let Some(pool) = self.store.as_postgres() {
            let mut tx = pool.begin().await?;
            let stored = get_api_key_postgres(&mut tx, &user_id, &key.name).await?;
            delete_api_key_rights_postgres(&mut tx, &stored.key).await?;
            save_api_key_rights_postgres(&mut tx, &stored.key, &key.rights).await?;
            tx.commit().await?;
        } else {
            return Err(unsupported_store());
        }

        tracing::info!(rights = key.rights.len(), "API key rights replaced");
        Ok(())
    }

    /// Deletes an API key of a user by name, rights included
    #[tracing::instrument(skip(self), err)]
    pub async fn delete_api_key(&self, user_id: &str, key_name: &str) -> Result<(), UserError> {
        let user_id = user_id.to_lowercase();

        if let Some(pool) = self.store.as_sqlite() {
            let mut tx = pool.begin().await?;
            let stored = get_api_key_sqlite(&mut tx, &user_id, key_name).await?;
            delete_api_key_rights_sqlite(&mut tx, &stored.key).await?;
            delete_api_key_sqlite(&mut tx, &user_id, key_name).await?;
            tx.commit().await?;
        } else if let Some(pool) = self.store.as_postgres() {
            let mut tx = pool.begin().await?;
            let stored = get_api_key_postgres(&mut tx, &user_id, key_name).await?;
            delete_api_key_rights_postgres(&mut tx, &stored.key).await?;
            delete_api_key_postgres(&mut tx, &user_id, key_name).await?;
            tx.commit().await?;
        } else {
            return Err(unsupported_store());
        }

        tracing::info!("API key deleted");
        Ok(())
    }

    /// Loads the stored extra attributes into `user` when it carries them
    #[tracing::instrument(skip(self, user), err(level = "info"))]
    pub async fn load_attributes<U: UserEntity>(
        &self,
        user_id: &str,
        user: &mut U,
    ) -> Result<(), UserError> {
        let user_id = user_id.to_lowercase();

        if let Some(pool) = self.store.as_sqlite() {
            let mut conn = pool.acquire().await?;
            self.load_attributes_sqlite(&mut conn, &user_id, user).await
        } else if let Some(pool) = self.store.as_postgres() {
            let mut conn = pool.acquire().await?;
            self.load_attributes_postgres(&mut conn, &user_id, user)
                .await
        } else {
            Err(unsupported_store())
        }
    }

    /// Reconciles the stored extra attributes with those of `user` and
    /// writes the stored result into `result` when given
    #[tracing::instrument(skip(self, user, result), err)]
    pub async fn store_attributes<U: UserEntity>(
        &self,
        user_id: &str,
        user: &U,
        result: Option<&mut dyn UserEntity>,
    ) -> Result<(), UserError> {
        let user_id = user_id.to_lowercase();

        if let Some(pool) = self.store.as_sqlite() {
            let mut tx = pool.begin().await?;
            self.store_attributes_sqlite(&mut tx, &user_id, user, result)
                .await?;
            tx.commit().await?;
        } else if let Some(pool) = self.store.as_postgres() {
            let mut tx = pool.begin().await?;
            self.store_attributes_postgres(&mut tx, &user_id, user, result)
                .await?;
            tx.commit().await?;
        } else {
            return Err(unsupported_store());
        }

        Ok(())
    }

    async fn load_attributes_sqlite(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
        user: &mut dyn UserEntity,
    ) -> Result<(), UserError> {
        if let Some(target) = user.attributes_mut() {
            self.attributes.load_sqlite(conn, user_id, target).await?;
        }
        Ok(())
    }

    async fn store_attributes_sqlite(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
        user: &dyn UserEntity,
        result: Option<&mut dyn UserEntity>,
    ) -> Result<(), UserError> {
        let Some(source) = user.attributes() else {
            return Ok(());
        };
        let target = result.and_then(|result| result.attributes_mut());
        self.attributes
            .store_sqlite(conn, user_id, source, target)
            .await?;
        Ok(())
    }

    async fn load_attributes_postgres(
        &self,
        conn: &mut PgConnection,
        user_id: &str,
        user: &mut dyn UserEntity,
    ) -> Result<(), UserError> {
        if let Some(target) = user.attributes_mut() {
            self.attributes.load_postgres(conn, user_id, target).await?;
        }
        Ok(())
    }

    async fn store_attributes_postgres(
        &self,
        conn: &mut PgConnection,
        user_id: &str,
        user: &dyn UserEntity,
        result: Option<&mut dyn UserEntity>,
    ) -> Result<(), UserError> {
        let Some(source) = user.attributes() else {
            return Ok(());
        };
        let target = result.and_then(|result| result.attributes_mut());
        self.attributes
            .store_postgres(conn, user_id, source, target)
            .await?;
        Ok(())
    }
}
