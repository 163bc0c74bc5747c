use sqlx::{PgConnection, Pool, Postgres, Sqlite, SqliteConnection};

use crate::storage::StorageError;

use super::postgres::*;
use super::sqlite::*;
use super::types::{ExtraAttributes, Reconciliation};

/// Persists the extra attributes of one entity kind.
///
/// The store holds no connection of its own: every call runs on the
/// connection or transaction handed in by the caller.
#[derive(Clone, Debug)]
pub(crate) struct AttributeStore {
    entity_kind: String,
}

impl AttributeStore {
    pub(crate) fn new(entity_kind: impl Into<String>) -> Self {
        Self {
            entity_kind: entity_kind.into(),
        }
    }

    pub(crate) fn entity_kind(&self) -> &str {
        &self.entity_kind
    }

    pub(crate) async fn init_sqlite(pool: &Pool<Sqlite>) -> Result<(), StorageError> {
        create_tables_sqlite(pool).await?;
        validate_tables_sqlite(pool).await
    }

    pub(crate) async fn init_postgres(pool: &Pool<Postgres>) -> Result<(), StorageError> {
        create_tables_postgres(pool).await?;
        validate_tables_postgres(pool).await
    }

    /// Replaces the mapping held by `target` with the stored one.
    pub(crate) async fn load_sqlite(
        &self,
        conn: &mut SqliteConnection,
        entity_id: &str,
        target: &mut dyn ExtraAttributes,
    ) -> Result<(), StorageError> {
        let attributes = load_attributes_sqlite(conn, &self.entity_kind, entity_id).await?;
        target.set_extra_attributes(attributes);
        Ok(())
    }

    /// Makes storage hold exactly the mapping of `source`, then writes the
    /// stored mapping back into `result` when given.
    #[tracing::instrument(skip(self, conn, source, result), fields(entity_kind = %self.entity_kind()))]
    pub(crate) async fn store_sqlite(
        &self,
        conn: &mut SqliteConnection,
        entity_id: &str,
        source: &dyn ExtraAttributes,
        result: Option<&mut dyn ExtraAttributes>,
    ) -> Result<(), StorageError> {
        let kind = self.entity_kind.as_str();
        let desired = source.extra_attributes();
        let current = load_attributes_sqlite(conn, kind, entity_id).await?;
        let plan = Reconciliation::plan(&current, &desired);

        tracing::debug!(
            insert = plan.insert.len(),
            update = plan.update.len(),
            delete = plan.delete.len(),
            "Reconciling attributes"
        );

        for (name, value) in &plan.insert {
            insert_attribute_sqlite(conn, kind, entity_id, name, value).await?;
        }
        for (name, value) in &plan.update {
            update_attribute_sqlite(conn, kind, entity_id, name, value).await?;
        }
        for name in &plan.delete {
            delete_attribute_sqlite(conn, kind, entity_id, name).await?;
        }

        if let Some(result) = result {
            let stored = if plan.is_empty() {
                current.clone()
            } else {
                load_attributes_sqlite(conn, kind, entity_id).await?
            };
            result.set_extra_attributes(stored);
        }

        Ok(())
    }

    /// Replaces the mapping held by `target` with the stored one.
    pub(crate) async fn load_postgres(
        &self,
        conn: &mut PgConnection,
        entity_id: &str,
        target: &mut dyn ExtraAttributes,
    ) -> Result<(), StorageError> {
        let attributes = load_attributes_postgres(conn, &self.entity_kind, entity_id).await?;
        target.set_extra_attributes(attributes);
        Ok(())
    }

    /// Makes storage hold exactly the mapping of `source`, then writes the
    /// stored mapping back into `result` when given.
    #[tracing::instrument(skip(self, conn, source, result), fields(entity_kind = %self.entity_kind()))]
    pub(crate) async fn store_postgres(
        &self,
        conn: &mut PgConnection,
        entity_id: &str,
        source: &dyn ExtraAttributes,
        result: Option<&mut dyn ExtraAttributes>,
    ) -> Result<(), StorageError> {
        let kind = self.entity_kind.as_str();
        let desired = source.extra_attributes();
        let current = load_attributes_postgres(conn, kind, entity_id).await?;
        let plan = Reconciliation::plan(&current, &desired);

        tracing::debug!(
            insert = plan.insert.len(),
            update = plan.update.len(),
            delete = plan.delete.len(),
            "Reconciling attributes"
        );

        for (name, value) in &plan.insert {
            insert_attribute_postgres(conn, kind, entity_id, name, value).await?;
        }
        for (name, value) in &plan.update {
            update_attribute_postgres(conn, kind, entity_id, name, value).await?;
        }
        for name in &plan.delete {
            delete_attribute_postgres(conn, kind, entity_id, name).await?;
        }

        if let Some(result) = result {
            let stored = if plan.is_empty() {
                current.clone()
            } else {
                load_attributes_postgres(conn, kind, entity_id).await?
            };
            result.set_extra_attributes(stored);
        }

        Ok(())
    }
}
