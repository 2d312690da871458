use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use careers_auth::{AdminError, GateError, LoginError};
use careers_core::DomainError;
use careers_jobs::{ApplicantStoreError, JobStoreError};

/// Fixed body for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid email or password";

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// 500 with a generic body; the detail only goes to the log.
pub fn internal_error(context: &'static str, detail: impl core::fmt::Display) -> axum::response::Response {
    tracing::error!(context, error = %detail, "request failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal server error")
}

pub fn gate_error_to_response(err: GateError) -> axum::response::Response {
    match err {
        GateError::Unauthorized => json_error(StatusCode::UNAUTHORIZED, "unauthorized", "unauthorized"),
        GateError::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", "forbidden"),
    }
}

pub fn login_error_to_response(err: LoginError) -> axum::response::Response {
    match err {
        LoginError::MissingCredentials => json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "email and password are required",
        ),
        LoginError::InvalidCredentials => json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            INVALID_CREDENTIALS_MESSAGE,
        ),
        LoginError::Store(e) => internal_error("login", e),
        LoginError::Internal(msg) => internal_error("login", msg),
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn admin_error_to_response(err: AdminError) -> axum::response::Response {
    match err {
        AdminError::Domain(e) => domain_error_to_response(e),
        AdminError::Backend(msg) => internal_error("admin_users", msg),
    }
}

pub fn job_store_error_to_response(err: JobStoreError) -> axum::response::Response {
    match err {
        JobStoreError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", "job not found"),
        JobStoreError::Storage(msg) => internal_error("jobs", msg),
    }
}

pub fn applicant_store_error_to_response(err: ApplicantStoreError) -> axum::response::Response {
    match err {
        ApplicantStoreError::NotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "not_found", "applicant not found")
        }
        ApplicantStoreError::Storage(msg) => internal_error("applicants", msg),
    }
}
