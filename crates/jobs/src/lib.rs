//! `careers-jobs`: job postings shown on the careers page and the
//! applications submitted against them.

pub mod applicant;
pub mod posting;
pub mod store;

pub use applicant::{Applicant, ApplicantPatch, ApplicantStatus, NewApplicant};
pub use posting::{JobPosting, JobPostingPatch, JobStatus, NewJobPosting};
pub use store::{ApplicantFilter, ApplicantStore, ApplicantStoreError, JobStore, JobStoreError};
