//! Job postings. Reads are public; hidden listings and writes need a token.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;

use careers_core::JobId;
use careers_jobs::{JobPostingPatch, JobStoreError, NewJobPosting};

use crate::app::{dto, errors, services::AppServices};
use crate::middleware::{self, AuthState};

pub fn router(auth_state: AuthState) -> Router {
    let public = Router::new()
        .route("/jobs", get(list_jobs))
        .route("/jobs/:id", get(get_job));

    let protected = Router::new()
        .route("/jobs", axum::routing::post(create_job))
        .route("/jobs/:id", axum::routing::put(update_job).delete(delete_job))
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    public.merge(protected)
}

fn parse_id(id: &str) -> Result<JobId, axum::response::Response> {
    id.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid job id"))
}

pub async fn list_jobs(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::JobsQuery>,
    headers: HeaderMap,
) -> axum::response::Response {
    if query.include_hidden {
        let header = middleware::authorization_header(&headers);
        if let Err(e) = services.gate.authorize_request(header, Utc::now()) {
            return errors::gate_error_to_response(e);
        }
    }

    match services.jobs.list(!query.include_hidden).await {
        Ok(jobs) => Json(jobs).into_response(),
        Err(e) => errors::job_store_error_to_response(e),
    }
}

/// Hidden or inactive postings read as 404 unless the caller presents a valid token.
pub async fn get_job(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let posting = match services.jobs.get(id).await {
        Ok(Some(p)) => p,
        Ok(None) => return errors::job_store_error_to_response(JobStoreError::NotFound(id)),
        Err(e) => return errors::job_store_error_to_response(e),
    };

    if !posting.is_public() {
        let header = middleware::authorization_header(&headers);
        if services.gate.authorize_request(header, Utc::now()).is_err() {
            return errors::job_store_error_to_response(JobStoreError::NotFound(id));
        }
    }

    Json(posting).into_response()
}

pub async fn create_job(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewJobPosting>,
) -> axum::response::Response {
    let posting = match body.into_posting(JobId::new(), Utc::now()) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.jobs.insert(posting.clone()).await {
        return errors::job_store_error_to_response(e);
    }
    tracing::info!(job_id = %posting.id, "job posting created");

    (StatusCode::CREATED, Json(posting)).into_response()
}

pub async fn update_job(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(patch): Json<JobPostingPatch>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut posting = match services.jobs.get(id).await {
        Ok(Some(p)) => p,
        Ok(None) => return errors::job_store_error_to_response(JobStoreError::NotFound(id)),
        Err(e) => return errors::job_store_error_to_response(e),
    };

    if let Err(e) = posting.apply(patch, Utc::now()) {
        return errors::domain_error_to_response(e);
    }
    if let Err(e) = services.jobs.update(&posting).await {
        return errors::job_store_error_to_response(e);
    }

    Json(posting).into_response()
}

pub async fn delete_job(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.jobs.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::job_store_error_to_response(e),
    }
}
