//! Postgres-backed credential store (`admin_users` table).
//!
//! The `email` column holds the normalised identifier and carries a UNIQUE
//! constraint, so uniqueness holds even under concurrent inserts. A unique
//! violation (`23505`) maps to [`StoreError::Conflict`]; everything else maps
//! to [`StoreError::Backend`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use careers_auth::{CredentialRecord, CredentialStore, Identifier, Role, StoreError};
use careers_core::AdminUserId;

use crate::db::is_unique_violation;

const COLUMNS: &str = "id, email, password_hash, name, role, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresCredentialStore {
    pool: Arc<PgPool>,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    if is_unique_violation(&err) {
        return StoreError::Conflict(format!("identifier already exists ({operation})"));
    }
    StoreError::Backend(format!("sqlx error in {operation}: {err}"))
}

fn record_from_row(row: &PgRow) -> Result<CredentialRecord, StoreError> {
    let decode = |e: sqlx::Error| StoreError::Backend(format!("row decode: {e}"));

    let id: uuid::Uuid = row.try_get("id").map_err(decode)?;
    let email: String = row.try_get("email").map_err(decode)?;
    let role: String = row.try_get("role").map_err(decode)?;

    Ok(CredentialRecord {
        id: AdminUserId::from_uuid(id),
        identifier: Identifier::parse(&email)
            .map_err(|e| StoreError::Backend(format!("stored identifier: {e}")))?,
        secret_hash: row.try_get("password_hash").map_err(decode)?,
        role: Role::new(role),
        display_name: row.try_get("name").map_err(decode)?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(decode)?,
        updated_at: row.try_get::<Option<DateTime<Utc>>, _>("updated_at").map_err(decode)?,
    })
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    #[instrument(skip_all, fields(identifier = %identifier), err)]
    async fn find_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<CredentialRecord>, StoreError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM admin_users WHERE email = $1"))
            .bind(identifier.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_identifier", e))?;
        row.as_ref().map(record_from_row).transpose()
    }

    #[instrument(skip_all, fields(id = %id), err)]
    async fn find_by_id(&self, id: AdminUserId) -> Result<Option<CredentialRecord>, StoreError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM admin_users WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;
        row.as_ref().map(record_from_row).transpose()
    }

    #[instrument(skip_all, err)]
    async fn list(&self) -> Result<Vec<CredentialRecord>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM admin_users ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list", e))?;
        rows.iter().map(record_from_row).collect()
    }

    #[instrument(skip_all, fields(id = %record.id), err)]
    async fn insert(&self, record: CredentialRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO admin_users (id, email, password_hash, name, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.identifier.as_str())
        .bind(&record.secret_hash)
        .bind(&record.display_name)
        .bind(record.role.as_str())
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;
        Ok(())
    }

    #[instrument(skip_all, fields(id = %record.id), err)]
    async fn update(&self, record: &CredentialRecord) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE admin_users
            SET email = $2, password_hash = $3, name = $4, role = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.identifier.as_str())
        .bind(&record.secret_hash)
        .bind(&record.display_name)
        .bind(record.role.as_str())
        .bind(record.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip_all, fields(id = %id), err)]
    async fn delete(&self, id: AdminUserId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM admin_users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
