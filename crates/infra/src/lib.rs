//! Infrastructure layer: storage adapters for credentials, job postings and
//! applicants.

pub mod applicant_store;
pub mod credential_store;
pub mod db;
pub mod job_store;

pub use applicant_store::{InMemoryApplicantStore, PostgresApplicantStore};
pub use credential_store::{InMemoryCredentialStore, PostgresCredentialStore};
pub use job_store::{InMemoryJobStore, PostgresJobStore};
