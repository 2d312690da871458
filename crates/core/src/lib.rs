//! `careers-core`: shared domain building blocks.
//!
//! Identifiers and the domain error model used by the auth, jobs and infra
//! crates. No infrastructure concerns live here.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AdminUserId, ApplicantId, JobId};
