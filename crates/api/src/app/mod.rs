//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and service construction
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        gate: services.gate.clone(),
    };

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::auth::router(auth_state.clone()))
        .merge(routes::admin_users::router(auth_state.clone()))
        .merge(routes::jobs::router(auth_state.clone()))
        .merge(routes::applicants::router(auth_state))
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
