use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use careers_auth::{AuthorizationGate, GateError, Role, require_role};

use crate::app::errors;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub gate: Arc<AuthorizationGate>,
}

/// Authenticate the bearer token and attach a [`PrincipalContext`].
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let principal = state
        .gate
        .authorize_request(authorization_header(req.headers()), Utc::now())
        .map_err(errors::gate_error_to_response)?;

    req.extensions_mut().insert(PrincipalContext::new(principal));

    Ok(next.run(req).await)
}

/// Only `Admin` principals pass. Must run after [`auth_middleware`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, Response> {
    let principal = req
        .extensions()
        .get::<PrincipalContext>()
        .ok_or_else(|| errors::gate_error_to_response(GateError::Unauthorized))?;

    require_role(principal.principal(), &Role::ADMIN).map_err(errors::gate_error_to_response)?;

    Ok(next.run(req).await)
}

/// Raw `Authorization` value; a non-UTF-8 header counts as absent.
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}
