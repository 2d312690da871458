//! Admin-user management: create, list, re-key, re-role and delete accounts.
//!
//! Callers are expected to have passed the `Admin` role gate already.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use careers_core::{AdminUserId, DomainError};

use crate::credentials::{CredentialRecord, CredentialStore, Identifier, StoreError, UserSummary};
use crate::password::{self, PasswordError};
use crate::{Role, RoleSet};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdminError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("storage failure: {0}")]
    Backend(String),
}

impl From<StoreError> for AdminError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => AdminError::Domain(DomainError::not_found()),
            StoreError::Conflict(msg) => AdminError::Domain(DomainError::conflict(msg)),
            StoreError::Backend(msg) => AdminError::Backend(msg),
        }
    }
}

impl From<PasswordError> for AdminError {
    fn from(value: PasswordError) -> Self {
        match value {
            PasswordError::Hashing(msg) => AdminError::Backend(msg),
            other => AdminError::Domain(DomainError::validation(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewAdminUser {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AdminUserPatch {
    pub password: Option<String>,
    pub role: Option<String>,
}

pub struct AdminUserService {
    store: Arc<dyn CredentialStore>,
    roles: RoleSet,
    default_role: Role,
    bcrypt_cost: u32,
}

impl AdminUserService {
    pub fn new(store: Arc<dyn CredentialStore>, roles: RoleSet, default_role: Role) -> Self {
        Self {
            store,
            roles,
            default_role,
            bcrypt_cost: password::DEFAULT_COST,
        }
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub async fn list(&self) -> Result<Vec<UserSummary>, AdminError> {
        let records = self.store.list().await?;
        Ok(records.iter().map(CredentialRecord::summary).collect())
    }

    pub async fn get(&self, id: AdminUserId) -> Result<UserSummary, AdminError> {
        self.store
            .find_by_id(id)
            .await?
            .map(|r| r.summary())
            .ok_or_else(|| DomainError::not_found().into())
    }

    pub async fn create(
        &self,
        request: NewAdminUser,
        now: DateTime<Utc>,
    ) -> Result<UserSummary, AdminError> {
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(DomainError::validation("email and password are required").into());
        }
        let identifier = Identifier::parse(&request.email)?;
        password::validate_password(&request.password)?;

        let role = match request.role.as_deref() {
            Some(name) => self.resolve_role(name)?,
            None => self.default_role.clone(),
        };
        let display_name = request
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| identifier.local_part().to_string());

        let record = CredentialRecord {
            id: AdminUserId::new(),
            identifier,
            secret_hash: password::hash_password(&request.password, self.bcrypt_cost).await?,
            role,
            display_name,
            created_at: now,
            updated_at: None,
        };
        let summary = record.summary();
        self.store.insert(record).await?;

        tracing::info!(user_id = %summary.id, role = %summary.role, "admin user created");
        Ok(summary)
    }

    pub async fn update(
        &self,
        id: AdminUserId,
        patch: AdminUserPatch,
        now: DateTime<Utc>,
    ) -> Result<UserSummary, AdminError> {
        let new_password = patch.password.filter(|p| !p.is_empty());
        let new_role = patch.role.filter(|r| !r.trim().is_empty());
        if new_password.is_none() && new_role.is_none() {
            return Err(DomainError::validation("password or role required").into());
        }

        let mut record = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(DomainError::not_found)?;

        if let Some(role) = new_role {
            record.role = self.resolve_role(&role)?;
        }
        if let Some(password) = new_password {
            password::validate_password(&password)?;
            record.secret_hash = password::hash_password(&password, self.bcrypt_cost).await?;
        }
        record.updated_at = Some(now);

        self.store.update(&record).await?;
        tracing::info!(user_id = %id, role = %record.role, "admin user updated");
        Ok(record.summary())
    }

    pub async fn delete(&self, id: AdminUserId) -> Result<(), AdminError> {
        self.store.delete(id).await?;
        tracing::info!(user_id = %id, "admin user deleted");
        Ok(())
    }

    /// Create `email` as an `Admin` unless an account with that identifier exists.
    ///
    /// Returns `true` when an account was created.
    pub async fn ensure_bootstrap_admin(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AdminError> {
        let identifier = Identifier::parse(email)?;
        if self.store.find_by_identifier(&identifier).await?.is_some() {
            return Ok(false);
        }
        self.create(
            NewAdminUser {
                email: email.to_string(),
                password: password.to_string(),
                name: None,
                role: Some(Role::ADMIN.as_str().to_string()),
            },
            now,
        )
        .await?;
        Ok(true)
    }

    fn resolve_role(&self, name: &str) -> Result<Role, AdminError> {
        self.roles
            .parse(name.trim())
            .ok_or_else(|| DomainError::validation(format!("unknown role '{name}'")).into())
    }
}
