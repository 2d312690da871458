use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use careers_core::ApplicantId;
use careers_core::entity::sort_newest_first;
use careers_jobs::{Applicant, ApplicantFilter, ApplicantStore, ApplicantStoreError};

/// In-memory applicant store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryApplicantStore {
    applicants: RwLock<HashMap<ApplicantId, Applicant>>,
}

impl InMemoryApplicantStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

fn poisoned() -> ApplicantStoreError {
    ApplicantStoreError::Storage("applicant store lock poisoned".to_string())
}

#[async_trait]
impl ApplicantStore for InMemoryApplicantStore {
    async fn get(&self, id: ApplicantId) -> Result<Option<Applicant>, ApplicantStoreError> {
        let applicants = self.applicants.read().map_err(|_| poisoned())?;
        Ok(applicants.get(&id).cloned())
    }

    async fn list(&self, filter: ApplicantFilter) -> Result<Vec<Applicant>, ApplicantStoreError> {
        let mut out: Vec<_> = {
            let applicants = self.applicants.read().map_err(|_| poisoned())?;
            applicants.values().filter(|a| filter.matches(a)).cloned().collect()
        };
        sort_newest_first(&mut out);
        Ok(out)
    }

    async fn insert(&self, applicant: Applicant) -> Result<(), ApplicantStoreError> {
        let mut applicants = self.applicants.write().map_err(|_| poisoned())?;
        applicants.insert(applicant.id, applicant);
        Ok(())
    }

    async fn update(&self, applicant: &Applicant) -> Result<(), ApplicantStoreError> {
        let mut applicants = self.applicants.write().map_err(|_| poisoned())?;
        match applicants.get_mut(&applicant.id) {
            Some(existing) => {
                *existing = applicant.clone();
                Ok(())
            }
            None => Err(ApplicantStoreError::NotFound(applicant.id)),
        }
    }
}
