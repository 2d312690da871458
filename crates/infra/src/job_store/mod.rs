//! [`JobStore`](careers_jobs::JobStore) implementations.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryJobStore;
pub use postgres::PostgresJobStore;
