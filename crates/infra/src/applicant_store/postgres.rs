//! Postgres-backed applicant store (`applicants` table).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use careers_core::{ApplicantId, JobId};
use careers_jobs::{Applicant, ApplicantFilter, ApplicantStatus, ApplicantStore, ApplicantStoreError};

const COLUMNS: &str = "id, job_id, name, email, phone, resume_url, cover_letter, status, notes, \
                       applied_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresApplicantStore {
    pool: Arc<PgPool>,
}

impl PostgresApplicantStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> ApplicantStoreError {
    ApplicantStoreError::Storage(format!("sqlx error in {operation}: {err}"))
}

fn applicant_from_row(row: &PgRow) -> Result<Applicant, ApplicantStoreError> {
    let decode = |e: sqlx::Error| ApplicantStoreError::Storage(format!("row decode: {e}"));

    let id: uuid::Uuid = row.try_get("id").map_err(decode)?;
    let job_id: Option<uuid::Uuid> = row.try_get("job_id").map_err(decode)?;
    let status: String = row.try_get("status").map_err(decode)?;

    Ok(Applicant {
        id: ApplicantId::from_uuid(id),
        job_id: job_id.map(JobId::from_uuid),
        name: row.try_get("name").map_err(decode)?,
        email: row.try_get("email").map_err(decode)?,
        phone: row.try_get("phone").map_err(decode)?,
        resume_url: row.try_get("resume_url").map_err(decode)?,
        cover_letter: row.try_get("cover_letter").map_err(decode)?,
        status: status
            .parse::<ApplicantStatus>()
            .map_err(|e| ApplicantStoreError::Storage(format!("stored status: {e}")))?,
        notes: row.try_get("notes").map_err(decode)?,
        applied_at: row.try_get::<DateTime<Utc>, _>("applied_at").map_err(decode)?,
        updated_at: row.try_get::<Option<DateTime<Utc>>, _>("updated_at").map_err(decode)?,
    })
}

#[async_trait]
impl ApplicantStore for PostgresApplicantStore {
    #[instrument(skip_all, fields(id = %id), err)]
    async fn get(&self, id: ApplicantId) -> Result<Option<Applicant>, ApplicantStoreError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM applicants WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?;
        row.as_ref().map(applicant_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list(&self, filter: ApplicantFilter) -> Result<Vec<Applicant>, ApplicantStoreError> {
        const ORDER: &str = "ORDER BY applied_at DESC, id DESC";
        let filter_sql = match filter {
            ApplicantFilter::All => "",
            ApplicantFilter::Job(_) => "WHERE job_id = $1",
            ApplicantFilter::General => "WHERE job_id IS NULL",
        };
        let query = format!("SELECT {COLUMNS} FROM applicants {filter_sql} {ORDER}");
        let mut q = sqlx::query(&query);
        if let ApplicantFilter::Job(job_id) = filter {
            q = q.bind(*job_id.as_uuid());
        }
        let rows = q
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", e))?;
        rows.iter().map(applicant_from_row).collect()
    }

    #[instrument(skip_all, fields(id = %applicant.id), err)]
    async fn insert(&self, applicant: Applicant) -> Result<(), ApplicantStoreError> {
        sqlx::query(&format!(
            "INSERT INTO applicants ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"
        ))
        .bind(applicant.id.as_uuid())
        .bind(applicant.job_id.map(uuid::Uuid::from))
        .bind(&applicant.name)
        .bind(&applicant.email)
        .bind(&applicant.phone)
        .bind(&applicant.resume_url)
        .bind(&applicant.cover_letter)
        .bind(applicant.status.as_str())
        .bind(&applicant.notes)
        .bind(applicant.applied_at)
        .bind(applicant.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;
        Ok(())
    }

    #[instrument(skip_all, fields(id = %applicant.id), err)]
    async fn update(&self, applicant: &Applicant) -> Result<(), ApplicantStoreError> {
        let result = sqlx::query(
            "UPDATE applicants SET status = $2, notes = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(applicant.id.as_uuid())
        .bind(applicant.status.as_str())
        .bind(&applicant.notes)
        .bind(applicant.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        if result.rows_affected() == 0 {
            return Err(ApplicantStoreError::NotFound(applicant.id));
        }
        Ok(())
    }
}
