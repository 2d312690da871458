use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use careers_core::JobId;
use careers_core::entity::sort_newest_first;
use careers_jobs::{JobPosting, JobStore, JobStoreError};

/// In-memory job store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<JobId, JobPosting>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

fn poisoned() -> JobStoreError {
    JobStoreError::Storage("job store lock poisoned".to_string())
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn get(&self, id: JobId) -> Result<Option<JobPosting>, JobStoreError> {
        let jobs = self.jobs.read().map_err(|_| poisoned())?;
        Ok(jobs.get(&id).cloned())
    }

    async fn list(&self, public_only: bool) -> Result<Vec<JobPosting>, JobStoreError> {
        let mut out: Vec<_> = {
            let jobs = self.jobs.read().map_err(|_| poisoned())?;
            jobs.values()
                .filter(|j| !public_only || j.is_public())
                .cloned()
                .collect()
        };
        sort_newest_first(&mut out);
        Ok(out)
    }

    async fn insert(&self, posting: JobPosting) -> Result<(), JobStoreError> {
        let mut jobs = self.jobs.write().map_err(|_| poisoned())?;
        jobs.insert(posting.id, posting);
        Ok(())
    }

    async fn update(&self, posting: &JobPosting) -> Result<(), JobStoreError> {
        let mut jobs = self.jobs.write().map_err(|_| poisoned())?;
        match jobs.get_mut(&posting.id) {
            Some(existing) => {
                *existing = posting.clone();
                Ok(())
            }
            None => Err(JobStoreError::NotFound(posting.id)),
        }
    }

    async fn delete(&self, id: JobId) -> Result<(), JobStoreError> {
        let mut jobs = self.jobs.write().map_err(|_| poisoned())?;
        jobs.remove(&id).map(|_| ()).ok_or(JobStoreError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use careers_jobs::{JobStatus, NewJobPosting};
    use chrono::{Duration, Utc};

    fn posting(title: &str, visible: bool, status: JobStatus) -> JobPosting {
        NewJobPosting {
            title: title.into(),
            is_visible: visible,
            status: Some(status),
            ..Default::default()
        }
        .into_posting(JobId::new(), Utc::now())
        .unwrap()
    }

    #[tokio::test]
    async fn public_listing_filters_hidden_and_inactive() {
        let store = InMemoryJobStore::new();
        let shown = posting("shown", true, JobStatus::Active);
        store.insert(shown.clone()).await.unwrap();
        store.insert(posting("hidden", false, JobStatus::Active)).await.unwrap();
        store.insert(posting("closed", true, JobStatus::Closed)).await.unwrap();

        let public = store.list(true).await.unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].id, shown.id);
        assert_eq!(store.list(false).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn listing_is_newest_first() {
        let store = InMemoryJobStore::new();
        let old = posting("old", true, JobStatus::Active);
        let mut new = posting("new", true, JobStatus::Active);
        new.created_at = old.created_at + Duration::hours(1);
        store.insert(old.clone()).await.unwrap();
        store.insert(new.clone()).await.unwrap();

        let titles: Vec<_> = store.list(true).await.unwrap().into_iter().map(|j| j.title).collect();
        assert_eq!(titles, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn missing_posting_is_not_found() {
        let store = InMemoryJobStore::new();
        let p = posting("x", true, JobStatus::Active);
        assert_eq!(store.update(&p).await, Err(JobStoreError::NotFound(p.id)));
        assert_eq!(store.delete(p.id).await, Err(JobStoreError::NotFound(p.id)));
        assert_eq!(store.get(p.id).await, Ok(None));
    }
}
