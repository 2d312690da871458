//! Claim set model and temporal/structural validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{Principal, Role};

/// Typed claim set carried in a token.
///
/// Wire names follow the usual JWT registered claims (`sub`, `iat`, `exp`,
/// seconds since the Unix epoch) plus `email` and `role`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the credential record id.
    pub sub: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Issued-at, Unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiry, Unix seconds. Absent means the token never expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Claims for a fresh login: `exp = iat + ttl`.
    pub fn for_subject(
        sub: impl Into<String>,
        email: Option<String>,
        role: Role,
        issued_at: DateTime<Utc>,
        ttl: chrono::Duration,
    ) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub: sub.into(),
            email,
            role: Some(role),
            iat: Some(iat),
            exp: Some(iat + ttl.num_seconds()),
        }
    }

    /// JSON object form, as written into the claims segment.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("sub".into(), Value::from(self.sub.clone()));
        if let Some(email) = &self.email {
            map.insert("email".into(), Value::from(email.clone()));
        }
        if let Some(role) = &self.role {
            map.insert("role".into(), Value::from(role.as_str()));
        }
        if let Some(iat) = self.iat {
            map.insert("iat".into(), Value::from(iat));
        }
        if let Some(exp) = self.exp {
            map.insert("exp".into(), Value::from(exp));
        }
        map
    }

    /// Read the known claims out of a decoded object.
    ///
    /// `sub` must be a non-empty string or an integer; the optional claims
    /// must have the right JSON type when present. Unknown keys are ignored.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ClaimError> {
        let sub = match map.get("sub") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(Value::Number(n)) if n.is_i64() || n.is_u64() => n.to_string(),
            _ => return Err(ClaimError::Invalid),
        };

        let email = match map.get("email") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err(ClaimError::Invalid),
        };

        let role = match map.get("role") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(Role::new(s.clone())),
            Some(_) => return Err(ClaimError::Invalid),
        };

        Ok(Self {
            sub,
            email,
            role,
            iat: timestamp(map, "iat")?,
            exp: timestamp(map, "exp")?,
        })
    }
}

fn timestamp(map: &Map<String, Value>, key: &str) -> Result<Option<i64>, ClaimError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.floor() as i64))
            .map(Some)
            .ok_or(ClaimError::Invalid),
        Some(_) => Err(ClaimError::Invalid),
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ClaimError {
    #[error("token has expired")]
    Expired,

    #[error("token claims are invalid")]
    Invalid,
}

/// Validate decoded claims at `now`.
///
/// The expiry bound is inclusive: a token whose `exp` equals `now` is still
/// accepted; it is rejected once `now > exp`.
pub fn validate(claims: &Map<String, Value>, now: DateTime<Utc>) -> Result<Principal, ClaimError> {
    let typed = TokenClaims::from_map(claims)?;

    if let Some(exp) = typed.exp {
        if now.timestamp() > exp {
            return Err(ClaimError::Expired);
        }
    }

    Ok(Principal::new(typed, claims.clone()))
}
