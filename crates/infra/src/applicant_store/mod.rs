//! [`ApplicantStore`](careers_jobs::ApplicantStore) implementations.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryApplicantStore;
pub use postgres::PostgresApplicantStore;
