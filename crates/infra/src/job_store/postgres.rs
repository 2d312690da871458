//! Postgres-backed job store (`job_postings` table).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use careers_core::JobId;
use careers_jobs::{JobPosting, JobStatus, JobStore, JobStoreError};

const COLUMNS: &str = "id, title, department, type, location, experience, salary, description, \
                       responsibilities, requirements, deadline, status, is_visible, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresJobStore {
    pool: Arc<PgPool>,
}

impl PostgresJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> JobStoreError {
    JobStoreError::Storage(format!("sqlx error in {operation}: {err}"))
}

fn posting_from_row(row: &PgRow) -> Result<JobPosting, JobStoreError> {
    let decode = |e: sqlx::Error| JobStoreError::Storage(format!("row decode: {e}"));

    let id: uuid::Uuid = row.try_get("id").map_err(decode)?;
    let status: String = row.try_get("status").map_err(decode)?;

    Ok(JobPosting {
        id: JobId::from_uuid(id),
        title: row.try_get("title").map_err(decode)?,
        department: row.try_get("department").map_err(decode)?,
        employment_type: row.try_get("type").map_err(decode)?,
        location: row.try_get("location").map_err(decode)?,
        experience: row.try_get("experience").map_err(decode)?,
        salary: row.try_get("salary").map_err(decode)?,
        description: row.try_get("description").map_err(decode)?,
        responsibilities: row.try_get("responsibilities").map_err(decode)?,
        requirements: row.try_get("requirements").map_err(decode)?,
        deadline: row.try_get::<Option<NaiveDate>, _>("deadline").map_err(decode)?,
        status: status
            .parse::<JobStatus>()
            .map_err(|e| JobStoreError::Storage(format!("stored status: {e}")))?,
        is_visible: row.try_get("is_visible").map_err(decode)?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(decode)?,
        updated_at: row.try_get::<Option<DateTime<Utc>>, _>("updated_at").map_err(decode)?,
    })
}

#[async_trait]
impl JobStore for PostgresJobStore {
    #[instrument(skip_all, fields(id = %id), err)]
    async fn get(&self, id: JobId) -> Result<Option<JobPosting>, JobStoreError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM job_postings WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?;
        row.as_ref().map(posting_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list(&self, public_only: bool) -> Result<Vec<JobPosting>, JobStoreError> {
        let filter = if public_only {
            "WHERE is_visible AND status = 'Active'"
        } else {
            ""
        };
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM job_postings {filter} ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list", e))?;
        rows.iter().map(posting_from_row).collect()
    }

    #[instrument(skip_all, fields(id = %posting.id), err)]
    async fn insert(&self, posting: JobPosting) -> Result<(), JobStoreError> {
        sqlx::query(&format!(
            "INSERT INTO job_postings ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)"
        ))
        .bind(posting.id.as_uuid())
        .bind(&posting.title)
        .bind(&posting.department)
        .bind(&posting.employment_type)
        .bind(&posting.location)
        .bind(&posting.experience)
        .bind(&posting.salary)
        .bind(&posting.description)
        .bind(&posting.responsibilities)
        .bind(&posting.requirements)
        .bind(posting.deadline)
        .bind(posting.status.as_str())
        .bind(posting.is_visible)
        .bind(posting.created_at)
        .bind(posting.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;
        Ok(())
    }

    #[instrument(skip_all, fields(id = %posting.id), err)]
    async fn update(&self, posting: &JobPosting) -> Result<(), JobStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE job_postings SET
                title = $2, department = $3, type = $4, location = $5, experience = $6,
                salary = $7, description = $8, responsibilities = $9, requirements = $10,
                deadline = $11, status = $12, is_visible = $13, updated_at = $14
            WHERE id = $1
            "#,
        )
        .bind(posting.id.as_uuid())
        .bind(&posting.title)
        .bind(&posting.department)
        .bind(&posting.employment_type)
        .bind(&posting.location)
        .bind(&posting.experience)
        .bind(&posting.salary)
        .bind(&posting.description)
        .bind(&posting.responsibilities)
        .bind(&posting.requirements)
        .bind(posting.deadline)
        .bind(posting.status.as_str())
        .bind(posting.is_visible)
        .bind(posting.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        if result.rows_affected() == 0 {
            return Err(JobStoreError::NotFound(posting.id));
        }
        Ok(())
    }

    #[instrument(skip_all, fields(id = %id), err)]
    async fn delete(&self, id: JobId) -> Result<(), JobStoreError> {
        let result = sqlx::query("DELETE FROM job_postings WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        if result.rows_affected() == 0 {
            return Err(JobStoreError::NotFound(id));
        }
        Ok(())
    }
}
