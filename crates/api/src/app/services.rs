//! Service wiring: stores, authenticator, admin-user service and gate.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;

use careers_auth::{AdminUserService, AuthorizationGate, CredentialAuthenticator, CredentialStore};
use careers_infra::{
    InMemoryApplicantStore, InMemoryCredentialStore, InMemoryJobStore, PostgresApplicantStore,
    PostgresCredentialStore, PostgresJobStore, db,
};
use careers_jobs::{ApplicantStore, JobStore};

use crate::config::AppConfig;

const MAX_DB_CONNECTIONS: u32 = 10;

/// Everything request handlers need, shared behind an `Arc`.
pub struct AppServices {
    pub config: Arc<AppConfig>,
    pub gate: Arc<AuthorizationGate>,
    pub authenticator: CredentialAuthenticator,
    pub admin_users: AdminUserService,
    pub jobs: Arc<dyn JobStore>,
    pub applicants: Arc<dyn ApplicantStore>,
}

impl AppServices {
    pub fn new(
        config: AppConfig,
        credentials: Arc<dyn CredentialStore>,
        jobs: Arc<dyn JobStore>,
        applicants: Arc<dyn ApplicantStore>,
    ) -> Self {
        let gate = Arc::new(AuthorizationGate::new(config.signing_key.clone()));
        let authenticator =
            CredentialAuthenticator::new(credentials.clone(), config.signing_key.clone())
                .with_ttl(config.token_ttl)
                .with_bcrypt_cost(config.bcrypt_cost);
        let admin_users = AdminUserService::new(
            credentials,
            config.roles.clone(),
            config.default_role.clone(),
        )
        .with_bcrypt_cost(config.bcrypt_cost);

        Self {
            config: Arc::new(config),
            gate,
            authenticator,
            admin_users,
            jobs,
            applicants,
        }
    }

    /// In-memory stores (tests, local dev without `DATABASE_URL`).
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(
            config,
            InMemoryCredentialStore::arc(),
            InMemoryJobStore::arc(),
            InMemoryApplicantStore::arc(),
        )
    }

    /// Postgres stores when `DATABASE_URL` is set, in-memory otherwise.
    pub async fn connect(config: AppConfig) -> anyhow::Result<Self> {
        let Some(url) = config.database_url.clone() else {
            tracing::warn!("DATABASE_URL not set; using in-memory stores");
            return Ok(Self::in_memory(config));
        };

        let pool = db::connect(&url, MAX_DB_CONNECTIONS)
            .await
            .context("failed to connect to postgres")?;
        db::ensure_schema(&pool)
            .await
            .context("failed to create database schema")?;

        Ok(Self::new(
            config,
            Arc::new(PostgresCredentialStore::new(pool.clone())),
            Arc::new(PostgresJobStore::new(pool.clone())),
            Arc::new(PostgresApplicantStore::new(pool)),
        ))
    }

    /// Seed the configured first admin if it does not exist yet.
    pub async fn bootstrap_admin(&self) -> anyhow::Result<()> {
        let Some(admin) = &self.config.bootstrap_admin else {
            return Ok(());
        };
        let created = self
            .admin_users
            .ensure_bootstrap_admin(&admin.email, &admin.password, Utc::now())
            .await
            .context("failed to seed bootstrap admin")?;
        if created {
            tracing::info!(email = %admin.email, "bootstrap admin created");
        }
        Ok(())
    }
}
