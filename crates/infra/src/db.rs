//! Connection pool and schema bootstrap.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Tables backing the Postgres stores. Every statement is idempotent.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS admin_users (
        id            UUID PRIMARY KEY,
        email         TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        name          TEXT NOT NULL,
        role          TEXT NOT NULL,
        created_at    TIMESTAMPTZ NOT NULL,
        updated_at    TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS job_postings (
        id               UUID PRIMARY KEY,
        title            TEXT NOT NULL,
        department       TEXT NOT NULL DEFAULT '',
        type             TEXT NOT NULL DEFAULT '',
        location         TEXT NOT NULL DEFAULT '',
        experience       TEXT NOT NULL DEFAULT '',
        salary           TEXT NOT NULL DEFAULT '',
        description      TEXT NOT NULL DEFAULT '',
        responsibilities TEXT NOT NULL DEFAULT '',
        requirements     TEXT NOT NULL DEFAULT '',
        deadline         DATE,
        status           TEXT NOT NULL DEFAULT 'Active',
        is_visible       BOOLEAN NOT NULL DEFAULT FALSE,
        created_at       TIMESTAMPTZ NOT NULL,
        updated_at       TIMESTAMPTZ
    )
    "#,
    "CREATE INDEX IF NOT EXISTS job_postings_created_at_idx ON job_postings (created_at DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS applicants (
        id           UUID PRIMARY KEY,
        job_id       UUID,
        name         TEXT NOT NULL,
        email        TEXT NOT NULL,
        phone        TEXT NOT NULL DEFAULT '',
        resume_url   TEXT NOT NULL DEFAULT '',
        cover_letter TEXT NOT NULL DEFAULT '',
        status       TEXT NOT NULL DEFAULT 'Applied',
        notes        TEXT NOT NULL DEFAULT '',
        applied_at   TIMESTAMPTZ NOT NULL,
        updated_at   TIMESTAMPTZ
    )
    "#,
    "CREATE INDEX IF NOT EXISTS applicants_job_applied_idx ON applicants (job_id, applied_at DESC)",
];

/// Open a pool against `database_url`.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Create missing tables and indexes.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!("database schema ready");
    Ok(())
}

/// Postgres unique-violation SQLSTATE.
pub(crate) const UNIQUE_VIOLATION: &str = "23505";

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}
