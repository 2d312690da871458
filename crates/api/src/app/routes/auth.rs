use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use crate::app::{dto, errors, services::AppServices};
use crate::context::PrincipalContext;
use crate::middleware::{self, AuthState};

pub fn router(auth_state: AuthState) -> Router {
    let protected = Router::new()
        .route("/auth/me", get(me))
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/auth/login", post(login))
        .merge(protected)
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    match services
        .authenticator
        .authenticate(&body.email, &body.password, Utc::now())
        .await
    {
        Ok(issued) => Json(dto::LoginResponse {
            token: issued.token,
            user: issued.user,
        })
        .into_response(),
        Err(e) => errors::login_error_to_response(e),
    }
}

pub async fn me(Extension(principal): Extension<PrincipalContext>) -> impl IntoResponse {
    let principal = principal.principal();
    Json(dto::MeResponse {
        subject: principal.subject().to_string(),
        email: principal.email().map(str::to_string),
        role: principal.role().map(|r| r.as_str().to_string()),
        expires_at: principal.expires_at(),
    })
}
