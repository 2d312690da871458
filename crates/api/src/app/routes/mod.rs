pub mod admin_users;
pub mod applicants;
pub mod auth;
pub mod jobs;
pub mod system;
