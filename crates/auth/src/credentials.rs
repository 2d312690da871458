//! Credential records and the storage seam the authenticator reads through.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use careers_core::{AdminUserId, DomainError, Entity};

use crate::Role;

/// A login identifier (email address), trimmed and lowercased.
///
/// Lookups and uniqueness are always on the normalised form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(DomainError::validation("identifier must not be empty"));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part before `@`, used as a fallback display name.
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or(&self.0)
    }
}

impl core::fmt::Display for Identifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored admin/recruiter account.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub id: AdminUserId,
    pub identifier: Identifier,
    pub secret_hash: String,
    pub role: Role,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CredentialRecord {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.identifier.as_str().to_string(),
            name: self.display_name.clone(),
            role: self.role.clone(),
            created_at: self.created_at,
        }
    }
}

impl core::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("id", &self.id)
            .field("identifier", &self.identifier)
            .field("secret_hash", &"<redacted>")
            .field("role", &self.role)
            .field("display_name", &self.display_name)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

impl Entity for CredentialRecord {
    type Id = AdminUserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Public view of an account (never includes the hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: AdminUserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Keyed CRUD over credential records.
///
/// Implementations must keep `identifier` unique.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<CredentialRecord>, StoreError>;

    async fn find_by_id(&self, id: AdminUserId) -> Result<Option<CredentialRecord>, StoreError>;

    /// All records, newest first.
    async fn list(&self) -> Result<Vec<CredentialRecord>, StoreError>;

    /// Fails with [`StoreError::Conflict`] if the identifier is taken.
    async fn insert(&self, record: CredentialRecord) -> Result<(), StoreError>;

    /// Fails with [`StoreError::NotFound`] if no record has `record.id`.
    async fn update(&self, record: &CredentialRecord) -> Result<(), StoreError>;

    /// Fails with [`StoreError::NotFound`] if no record has `id`.
    async fn delete(&self, id: AdminUserId) -> Result<(), StoreError>;
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Minimal in-process store for unit tests in this crate.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct VecStore {
        records: Mutex<HashMap<AdminUserId, CredentialRecord>>,
    }

    #[async_trait]
    impl CredentialStore for VecStore {
        async fn find_by_identifier(
            &self,
            identifier: &Identifier,
        ) -> Result<Option<CredentialRecord>, StoreError> {
            let records = self.records.lock().unwrap();
            Ok(records.values().find(|r| &r.identifier == identifier).cloned())
        }

        async fn find_by_id(&self, id: AdminUserId) -> Result<Option<CredentialRecord>, StoreError> {
            Ok(self.records.lock().unwrap().get(&id).cloned())
        }

        async fn list(&self) -> Result<Vec<CredentialRecord>, StoreError> {
            let mut all: Vec<_> = self.records.lock().unwrap().values().cloned().collect();
            careers_core::entity::sort_newest_first(&mut all);
            Ok(all)
        }

        async fn insert(&self, record: CredentialRecord) -> Result<(), StoreError> {
            let mut records = self.records.lock().unwrap();
            if records.values().any(|r| r.identifier == record.identifier) {
                return Err(StoreError::Conflict(record.identifier.to_string()));
            }
            records.insert(record.id, record);
            Ok(())
        }

        async fn update(&self, record: &CredentialRecord) -> Result<(), StoreError> {
            let mut records = self.records.lock().unwrap();
            match records.get_mut(&record.id) {
                Some(existing) => {
                    *existing = record.clone();
                    Ok(())
                }
                None => Err(StoreError::NotFound),
            }
        }

        async fn delete(&self, id: AdminUserId) -> Result<(), StoreError> {
            match self.records.lock().unwrap().remove(&id) {
                Some(_) => Ok(()),
                None => Err(StoreError::NotFound),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_is_trimmed_and_lowercased() {
        let id = Identifier::parse("  Admin@X.com ").unwrap();
        assert_eq!(id.as_str(), "admin@x.com");
        assert_eq!(id, Identifier::parse("ADMIN@x.COM").unwrap());
    }

    #[test]
    fn blank_identifier_is_rejected() {
        assert!(Identifier::parse("   ").is_err());
    }

    #[test]
    fn local_part_falls_back_to_whole_identifier() {
        assert_eq!(Identifier::parse("jane@x.com").unwrap().local_part(), "jane");
        assert_eq!(Identifier::parse("jane").unwrap().local_part(), "jane");
    }

    #[test]
    fn debug_hides_secret_hash() {
        let record = CredentialRecord {
            id: AdminUserId::new(),
            identifier: Identifier::parse("a@b.c").unwrap(),
            secret_hash: "$2b$04$secretsecretsecret".into(),
            role: Role::ADMIN,
            display_name: "A".into(),
            created_at: Utc::now(),
            updated_at: None,
        };
        let rendered = format!("{record:?}");
        assert!(!rendered.contains("secretsecret"));
        assert!(rendered.contains("<redacted>"));
    }
}
