use serde_json::{Map, Value};

use crate::{Role, TokenClaims};

/// An authenticated identity derived from a verified, unexpired token.
///
/// Lives only for the duration of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    claims: TokenClaims,
    raw: Map<String, Value>,
}

impl Principal {
    pub(crate) fn new(claims: TokenClaims, raw: Map<String, Value>) -> Self {
        Self { claims, raw }
    }

    pub fn subject(&self) -> &str {
        &self.claims.sub
    }

    pub fn role(&self) -> Option<&Role> {
        self.claims.role.as_ref()
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.role() == Some(role)
    }

    pub fn email(&self) -> Option<&str> {
        self.claims.email.as_deref()
    }

    pub fn expires_at(&self) -> Option<i64> {
        self.claims.exp
    }

    pub fn claims(&self) -> &TokenClaims {
        &self.claims
    }

    pub fn raw_claims(&self) -> &Map<String, Value> {
        &self.raw
    }
}
