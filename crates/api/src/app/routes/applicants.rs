//! Job applications. Anyone may apply; reviewing needs a token.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::Utc;

use careers_core::{ApplicantId, DomainError, JobId};
use careers_jobs::{ApplicantFilter, ApplicantPatch, ApplicantStoreError, NewApplicant};

use crate::app::{dto, errors, services::AppServices};
use crate::middleware::{self, AuthState};

pub fn router(auth_state: AuthState) -> Router {
    let public = Router::new().route("/applicants", post(submit_application));

    let protected = Router::new()
        .route("/applicants", get(list_applicants))
        .route("/applicants/:id", put(update_applicant))
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    public.merge(protected)
}

fn parse_id(id: &str) -> Result<ApplicantId, axum::response::Response> {
    id.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid applicant id"))
}

fn filter_from_query(query: &dto::ApplicantsQuery) -> Result<ApplicantFilter, axum::response::Response> {
    if query.wants_general() {
        return Ok(ApplicantFilter::General);
    }
    match query.job_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw
            .parse::<JobId>()
            .map(ApplicantFilter::Job)
            .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid job id")),
        None => Ok(ApplicantFilter::All),
    }
}

/// Public application form. A `job_id` must name an existing posting.
pub async fn submit_application(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewApplicant>,
) -> axum::response::Response {
    let applicant = match body.into_applicant(ApplicantId::new(), Utc::now()) {
        Ok(a) => a,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Some(job_id) = applicant.job_id {
        match services.jobs.get(job_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return errors::domain_error_to_response(DomainError::validation(
                    "job_id does not match a job posting",
                ));
            }
            Err(e) => return errors::job_store_error_to_response(e),
        }
    }

    if let Err(e) = services.applicants.insert(applicant.clone()).await {
        return errors::applicant_store_error_to_response(e);
    }
    tracing::info!(
        applicant_id = %applicant.id,
        general = applicant.is_general(),
        "application received"
    );

    (StatusCode::CREATED, Json(applicant)).into_response()
}

pub async fn list_applicants(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ApplicantsQuery>,
) -> axum::response::Response {
    let filter = match filter_from_query(&query) {
        Ok(f) => f,
        Err(resp) => return resp,
    };

    let applicants = match services.applicants.list(filter).await {
        Ok(v) => v,
        Err(e) => return errors::applicant_store_error_to_response(e),
    };
    let titles: HashMap<JobId, String> = match services.jobs.list(false).await {
        Ok(jobs) => jobs.into_iter().map(|j| (j.id, j.title)).collect(),
        Err(e) => return errors::job_store_error_to_response(e),
    };

    let views: Vec<dto::ApplicantView> = applicants
        .into_iter()
        .map(|applicant| dto::ApplicantView {
            job_title: applicant.job_id.and_then(|id| titles.get(&id).cloned()),
            applicant,
        })
        .collect();
    Json(views).into_response()
}

pub async fn update_applicant(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(patch): Json<ApplicantPatch>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut applicant = match services.applicants.get(id).await {
        Ok(Some(a)) => a,
        Ok(None) => {
            return errors::applicant_store_error_to_response(ApplicantStoreError::NotFound(id));
        }
        Err(e) => return errors::applicant_store_error_to_response(e),
    };

    if let Err(e) = applicant.apply(patch, Utc::now()) {
        return errors::domain_error_to_response(e);
    }
    if let Err(e) = services.applicants.update(&applicant).await {
        return errors::applicant_store_error_to_response(e);
    }
    tracing::info!(applicant_id = %applicant.id, status = %applicant.status, "applicant updated");

    Json(applicant).into_response()
}
