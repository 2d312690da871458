use async_trait::async_trait;

use careers_core::{ApplicantId, JobId};

use crate::{Applicant, JobPosting};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobStoreError {
    #[error("job posting not found: {0}")]
    NotFound(JobId),
    #[error("storage error: {0}")]
    Storage(String),
}

/// Job posting storage.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn get(&self, id: JobId) -> Result<Option<JobPosting>, JobStoreError>;

    /// Newest first. With `public_only`, only visible `Active` postings.
    async fn list(&self, public_only: bool) -> Result<Vec<JobPosting>, JobStoreError>;

    async fn insert(&self, posting: JobPosting) -> Result<(), JobStoreError>;

    async fn update(&self, posting: &JobPosting) -> Result<(), JobStoreError>;

    async fn delete(&self, id: JobId) -> Result<(), JobStoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplicantStoreError {
    #[error("applicant not found: {0}")]
    NotFound(ApplicantId),
    #[error("storage error: {0}")]
    Storage(String),
}

/// Which applications a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplicantFilter {
    #[default]
    All,
    /// Applications to one posting.
    Job(JobId),
    /// Resume drops not tied to any posting.
    General,
}

impl ApplicantFilter {
    pub fn matches(&self, applicant: &Applicant) -> bool {
        match self {
            ApplicantFilter::All => true,
            ApplicantFilter::Job(id) => applicant.job_id == Some(*id),
            ApplicantFilter::General => applicant.job_id.is_none(),
        }
    }
}

/// Application storage.
#[async_trait]
pub trait ApplicantStore: Send + Sync {
    async fn get(&self, id: ApplicantId) -> Result<Option<Applicant>, ApplicantStoreError>;

    /// Most recently applied first.
    async fn list(&self, filter: ApplicantFilter) -> Result<Vec<Applicant>, ApplicantStoreError>;

    async fn insert(&self, applicant: Applicant) -> Result<(), ApplicantStoreError>;

    async fn update(&self, applicant: &Applicant) -> Result<(), ApplicantStoreError>;
}
