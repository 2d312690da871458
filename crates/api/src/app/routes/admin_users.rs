//! Admin-user management. Every route requires the `Admin` role.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;

use careers_core::AdminUserId;

use crate::app::{dto, errors, services::AppServices};
use crate::middleware::{self, AuthState};

pub fn router(auth_state: AuthState) -> Router {
    Router::new()
        .route("/admin-users", get(list_admin_users).post(create_admin_user))
        .route(
            "/admin-users/:id",
            get(get_admin_user).put(update_admin_user).delete(delete_admin_user),
        )
        .route_layer(axum::middleware::from_fn(middleware::require_admin))
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ))
}

fn parse_id(id: &str) -> Result<AdminUserId, axum::response::Response> {
    id.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid admin user id"))
}

pub async fn list_admin_users(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.admin_users.list().await {
        Ok(users) => Json(users).into_response(),
        Err(e) => errors::admin_error_to_response(e),
    }
}

pub async fn create_admin_user(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateAdminUserRequest>,
) -> axum::response::Response {
    match services.admin_users.create(body.into(), Utc::now()).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(e) => errors::admin_error_to_response(e),
    }
}

pub async fn get_admin_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.admin_users.get(id).await {
        Ok(user) => Json(user).into_response(),
        Err(e) => errors::admin_error_to_response(e),
    }
}

pub async fn update_admin_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateAdminUserRequest>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.admin_users.update(id, body.into(), Utc::now()).await {
        Ok(user) => Json(user).into_response(),
        Err(e) => errors::admin_error_to_response(e),
    }
}

pub async fn delete_admin_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.admin_users.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::admin_error_to_response(e),
    }
}
