//! Compact token encoding: `base64url(header) . base64url(claims) . base64url(hmac)`.
//!
//! Segments use the URL-safe base64 alphabet without padding. Header and
//! claims are JSON objects; `serde_json`'s default map is ordered by key, so
//! the byte encoding of a given claim set is deterministic.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::claims::TokenClaims;
use crate::signature::{self, SigningKey};

/// Algorithm tag written into every header.
pub const ALGORITHM: &str = "HS256";

/// Type tag written into every header.
pub const TOKEN_TYPE: &str = "JWT";

const SEPARATOR: char = '.';

/// Fixed token header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    pub alg: String,
    pub typ: String,
}

impl TokenHeader {
    pub fn hs256() -> Self {
        Self {
            alg: ALGORITHM.to_string(),
            typ: TOKEN_TYPE.to_string(),
        }
    }

    fn to_value(&self) -> Value {
        serde_json::json!({ "alg": self.alg, "typ": self.typ })
    }
}

/// Structural decode failure. Carries no detail.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("malformed token")]
pub struct MalformedToken;

/// A token split back into its parts. The signature has NOT been checked yet.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    pub header: TokenHeader,
    pub claims: Map<String, Value>,
    /// `segment1 + "." + segment2`, exactly as received.
    pub signing_input: String,
    pub signature: Vec<u8>,
}

/// Issue a signed token for typed claims.
pub fn issue(claims: &TokenClaims, key: &SigningKey) -> String {
    issue_raw(&claims.to_map(), key)
}

/// Issue a signed token for an arbitrary claim object.
pub fn issue_raw(claims: &Map<String, Value>, key: &SigningKey) -> String {
    let header = encode_segment(&TokenHeader::hs256().to_value());
    let payload = encode_segment(&Value::Object(claims.clone()));
    let signing_input = format!("{header}{SEPARATOR}{payload}");
    let tag = signature::sign(&signing_input, key);
    format!("{signing_input}{SEPARATOR}{}", URL_SAFE_NO_PAD.encode(tag))
}

/// Split and decode a token.
///
/// Anything other than exactly three non-empty segments, invalid base64url,
/// a header that is not `{alg, typ}`, or claims that are not a JSON object is
/// [`MalformedToken`].
pub fn decode(token: &str) -> Result<DecodedToken, MalformedToken> {
    let mut parts = token.split(SEPARATOR);
    let (Some(h), Some(p), Some(s), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(MalformedToken);
    };
    if h.is_empty() || p.is_empty() || s.is_empty() {
        return Err(MalformedToken);
    }

    let header: TokenHeader = serde_json::from_slice(&decode_segment(h)?).map_err(|_| MalformedToken)?;
    let claims = match serde_json::from_slice::<Value>(&decode_segment(p)?) {
        Ok(Value::Object(map)) => map,
        _ => return Err(MalformedToken),
    };
    let signature = decode_segment(s)?;

    Ok(DecodedToken {
        header,
        claims,
        signing_input: format!("{h}{SEPARATOR}{p}"),
        signature,
    })
}

fn encode_segment(value: &Value) -> String {
    URL_SAFE_NO_PAD.encode(value.to_string())
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, MalformedToken> {
    URL_SAFE_NO_PAD.decode(segment).map_err(|_| MalformedToken)
}
