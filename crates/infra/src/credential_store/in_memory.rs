use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use careers_auth::{CredentialRecord, CredentialStore, Identifier, StoreError};
use careers_core::AdminUserId;
use careers_core::entity::sort_newest_first;

/// In-memory credential store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<HashMap<AdminUserId, CredentialRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("credential store lock poisoned".to_string())
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<CredentialRecord>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.values().find(|r| &r.identifier == identifier).cloned())
    }

    async fn find_by_id(&self, id: AdminUserId) -> Result<Option<CredentialRecord>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<CredentialRecord>, StoreError> {
        let mut all: Vec<_> = {
            let records = self.records.read().map_err(|_| poisoned())?;
            records.values().cloned().collect()
        };
        sort_newest_first(&mut all);
        Ok(all)
    }

    async fn insert(&self, record: CredentialRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        if records.values().any(|r| r.identifier == record.identifier) {
            return Err(StoreError::Conflict(format!(
                "identifier '{}' already exists",
                record.identifier
            )));
        }
        records.insert(record.id, record);
        Ok(())
    }

    async fn update(&self, record: &CredentialRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        if records
            .values()
            .any(|r| r.id != record.id && r.identifier == record.identifier)
        {
            return Err(StoreError::Conflict(format!(
                "identifier '{}' already exists",
                record.identifier
            )));
        }
        match records.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete(&self, id: AdminUserId) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        records.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use careers_auth::Role;
    use chrono::{Duration, Utc};

    fn record(email: &str) -> CredentialRecord {
        CredentialRecord {
            id: AdminUserId::new(),
            identifier: Identifier::parse(email).unwrap(),
            secret_hash: "$2b$04$hash".into(),
            role: Role::RECRUITER,
            display_name: email.into(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn lookup_by_normalised_identifier() {
        let store = InMemoryCredentialStore::new();
        let r = record("a@x.com");
        store.insert(r.clone()).await.unwrap();

        let found = store
            .find_by_identifier(&Identifier::parse(" A@X.COM ").unwrap())
            .await
            .unwrap();
        assert_eq!(found.map(|f| f.id), Some(r.id));
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_identifier() {
        let store = InMemoryCredentialStore::new();
        store.insert(record("a@x.com")).await.unwrap();
        assert!(matches!(
            store.insert(record("a@x.com")).await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn update_and_delete_missing_record_is_not_found() {
        let store = InMemoryCredentialStore::new();
        let r = record("a@x.com");
        assert_eq!(store.update(&r).await, Err(StoreError::NotFound));
        assert_eq!(store.delete(r.id).await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn update_replaces_record() {
        let store = InMemoryCredentialStore::new();
        let mut r = record("a@x.com");
        store.insert(r.clone()).await.unwrap();

        r.role = Role::ADMIN;
        store.update(&r).await.unwrap();
        assert_eq!(store.find_by_id(r.id).await.unwrap().unwrap().role, Role::ADMIN);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = InMemoryCredentialStore::new();
        let old = record("old@x.com");
        let mut new = record("new@x.com");
        new.created_at = old.created_at + Duration::minutes(1);
        store.insert(old.clone()).await.unwrap();
        store.insert(new.clone()).await.unwrap();

        let ids: Vec<_> = store.list().await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![new.id, old.id]);
    }
}
