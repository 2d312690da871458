//! The single enforcement point for protected operations.
//!
//! Per request: `NoToken -> TokenPresent -> Decoded -> SignatureOK ->
//! Authenticated -> Authorized`. Any failed step rejects immediately. All
//! token-level failures collapse to [`GateError::Unauthorized`]; only an
//! authenticated principal with the wrong role sees [`GateError::Forbidden`].

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::claims::{self, ClaimError};
use crate::codec::{self, ALGORITHM};
use crate::signature::{self, SigningKey};
use crate::{Principal, Role};

const SCHEME: &str = "Bearer";

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
    /// Missing, malformed, forged or expired token.
    #[error("unauthorized")]
    Unauthorized,

    /// Valid token, insufficient role.
    #[error("forbidden")]
    Forbidden,
}

/// Why a token was turned away. Logged at debug level, never returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    NoToken,
    Malformed,
    UnsupportedAlgorithm,
    BadSignature,
    Expired,
    InvalidClaims,
}

impl From<ClaimError> for Rejection {
    fn from(value: ClaimError) -> Self {
        match value {
            ClaimError::Expired => Rejection::Expired,
            ClaimError::Invalid => Rejection::InvalidClaims,
        }
    }
}

/// Stateless verifier holding the process-wide signing key.
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    key: SigningKey,
}

impl AuthorizationGate {
    pub fn new(key: SigningKey) -> Self {
        Self { key }
    }

    /// Authenticate a request from its raw `Authorization` header value.
    pub fn authorize_request(
        &self,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Principal, GateError> {
        self.check(authorization, now).map_err(|reason| {
            tracing::debug!(?reason, "request rejected");
            GateError::Unauthorized
        })
    }

    /// [`Self::authorize_request`] followed by [`require_role`].
    pub fn authorize_role(
        &self,
        authorization: Option<&str>,
        required: &Role,
        now: DateTime<Utc>,
    ) -> Result<Principal, GateError> {
        let principal = self.authorize_request(authorization, now)?;
        require_role(&principal, required)?;
        Ok(principal)
    }

    fn check(&self, authorization: Option<&str>, now: DateTime<Utc>) -> Result<Principal, Rejection> {
        let token = authorization.and_then(extract_bearer).ok_or(Rejection::NoToken)?;
        let decoded = codec::decode(token).map_err(|_| Rejection::Malformed)?;

        if decoded.header.alg != ALGORITHM {
            return Err(Rejection::UnsupportedAlgorithm);
        }
        if !signature::verify(&decoded.signing_input, &decoded.signature, &self.key) {
            return Err(Rejection::BadSignature);
        }

        Ok(claims::validate(&decoded.claims, now)?)
    }
}

/// Reject an authenticated principal whose role is not `required`.
pub fn require_role(principal: &Principal, required: &Role) -> Result<(), GateError> {
    if principal.has_role(required) {
        Ok(())
    } else {
        tracing::debug!(subject = principal.subject(), required = %required, "role check failed");
        Err(GateError::Forbidden)
    }
}

/// Pull the token out of a `Bearer <token>` header value.
///
/// Equivalent to the first match of `Bearer\s(\S+)`: the scheme keyword is
/// case-sensitive and exactly one whitespace character must separate it from
/// the token.
pub fn extract_bearer(header: &str) -> Option<&str> {
    for (start, _) in header.match_indices(SCHEME) {
        let rest = &header[start + SCHEME.len()..];
        let mut chars = rest.chars();
        match chars.next() {
            Some(c) if is_space(c) => {}
            _ => continue,
        }
        let candidate = chars.as_str();
        let end = candidate.find(is_space).unwrap_or(candidate.len());
        if end > 0 {
            return Some(&candidate[..end]);
        }
    }
    None
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::TokenClaims;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    const SECRET: &str = "gate-test-secret";

    fn key() -> SigningKey {
        SigningKey::new(SECRET).unwrap()
    }

    fn gate() -> AuthorizationGate {
        AuthorizationGate::new(key())
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn admin_token() -> String {
        let claims = TokenClaims::for_subject("user-1", None, Role::ADMIN, now(), Duration::days(7));
        codec::issue(&claims, &key())
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    #[test]
    fn extract_bearer_matches_contract() {
        assert_eq!(extract_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer("Bearer\tabc"), Some("abc"));
        assert_eq!(extract_bearer("Bearer abc trailing"), Some("abc"));
        assert_eq!(extract_bearer("Token x, Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer("bearer abc"), None);
        assert_eq!(extract_bearer("BEARER abc"), None);
        assert_eq!(extract_bearer("Bearer  abc"), None);
        assert_eq!(extract_bearer("Bearer "), None);
        assert_eq!(extract_bearer("Bearerabc"), None);
        assert_eq!(extract_bearer(""), None);
    }

    #[test]
    fn valid_token_yields_principal() {
        let principal = gate()
            .authorize_request(Some(&bearer(&admin_token())), now())
            .unwrap();
        assert_eq!(principal.subject(), "user-1");
        assert_eq!(principal.role(), Some(&Role::ADMIN));
    }

    #[test]
    fn missing_header_is_unauthorized() {
        assert_eq!(gate().authorize_request(None, now()), Err(GateError::Unauthorized));
        assert_eq!(gate().authorize_request(Some(""), now()), Err(GateError::Unauthorized));
        assert_eq!(
            gate().authorize_request(Some("Basic dXNlcjpwYXNz"), now()),
            Err(GateError::Unauthorized)
        );
    }

    #[test]
    fn malformed_tokens_are_unauthorized() {
        for token in ["abc", "abc.def", "a.b.c.d", "...", "!!.??.**"] {
            assert_eq!(
                gate().authorize_request(Some(&bearer(token)), now()),
                Err(GateError::Unauthorized),
                "{token}"
            );
        }
    }

    #[test]
    fn wrong_key_is_unauthorized() {
        let other = AuthorizationGate::new(SigningKey::new("another-secret").unwrap());
        assert_eq!(
            other.authorize_request(Some(&bearer(&admin_token())), now()),
            Err(GateError::Unauthorized)
        );
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let later = now() + Duration::days(7) + Duration::seconds(1);
        assert_eq!(
            gate().authorize_request(Some(&bearer(&admin_token())), later),
            Err(GateError::Unauthorized)
        );

        let at_expiry = now() + Duration::days(7);
        assert!(gate().authorize_request(Some(&bearer(&admin_token())), at_expiry).is_ok());
    }

    #[test]
    fn token_without_subject_is_unauthorized() {
        let mut claims = serde_json::Map::new();
        claims.insert("role".into(), "Admin".into());
        let token = codec::issue_raw(&claims, &key());
        assert_eq!(
            gate().authorize_request(Some(&bearer(&token)), now()),
            Err(GateError::Unauthorized)
        );
    }

    #[test]
    fn non_hs256_header_is_unauthorized() {
        use base64::Engine;
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;

        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"1","role":"Admin"}"#);
        let signing_input = format!("{header}.{payload}");
        let sig = URL_SAFE_NO_PAD.encode(signature::sign(&signing_input, &key()));
        let token = format!("{signing_input}.{sig}");

        assert_eq!(
            gate().authorize_request(Some(&bearer(&token)), now()),
            Err(GateError::Unauthorized)
        );
    }

    #[test]
    fn role_gate_distinguishes_forbidden_from_unauthorized() {
        let claims = TokenClaims::for_subject("user-2", None, Role::RECRUITER, now(), Duration::days(7));
        let recruiter = codec::issue(&claims, &key());

        assert_eq!(
            gate().authorize_role(Some(&bearer(&recruiter)), &Role::ADMIN, now()),
            Err(GateError::Forbidden)
        );
        assert!(
            gate()
                .authorize_role(Some(&bearer(&admin_token())), &Role::ADMIN, now())
                .is_ok()
        );
        assert_eq!(
            gate().authorize_role(None, &Role::ADMIN, now()),
            Err(GateError::Unauthorized)
        );
    }

    #[test]
    fn token_without_role_is_forbidden_for_role_gate() {
        let mut claims = serde_json::Map::new();
        claims.insert("sub".into(), "x".into());
        let token = codec::issue_raw(&claims, &key());
        assert_eq!(
            gate().authorize_role(Some(&bearer(&token)), &Role::ADMIN, now()),
            Err(GateError::Forbidden)
        );
    }

    #[test]
    fn every_single_character_substitution_is_rejected() {
        let token = admin_token();
        let gate = gate();
        for (i, c) in token.char_indices() {
            if c == '.' {
                continue;
            }
            let replacement = if c == 'A' { 'B' } else { 'A' };
            let mut tampered = token.clone();
            tampered.replace_range(i..i + 1, &replacement.to_string());
            assert_eq!(
                gate.authorize_request(Some(&bearer(&tampered)), now()),
                Err(GateError::Unauthorized),
                "position {i}"
            );
        }
    }

    #[test]
    fn accepts_tokens_minted_by_jsonwebtoken() {
        use jsonwebtoken::{Algorithm, EncodingKey, Header};

        let claims = TokenClaims::for_subject("ext-1", None, Role::RECRUITER, now(), Duration::hours(1));
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let principal = gate().authorize_request(Some(&bearer(&token)), now()).unwrap();
        assert_eq!(principal.subject(), "ext-1");
        assert_eq!(principal.role(), Some(&Role::RECRUITER));
    }

    #[test]
    fn issued_tokens_verify_with_jsonwebtoken() {
        use jsonwebtoken::{Algorithm, DecodingKey, Validation};

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<TokenClaims>(
            &admin_token(),
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &validation,
        )
        .unwrap();
        assert_eq!(data.claims.sub, "user-1");
    }

    fn arb_claims() -> impl Strategy<Value = (TokenClaims, i64)> {
        (
            "[A-Za-z0-9@._-]{1,24}",
            prop::option::of("[a-z]{1,8}@[a-z]{1,8}\\.com"),
            prop::sample::select(vec![Role::ADMIN, Role::RECRUITER]),
            0i64..4_000_000_000,
            0i64..10_000_000,
        )
            .prop_flat_map(|(sub, email, role, iat, ttl)| {
                let claims = TokenClaims {
                    sub,
                    email,
                    role: Some(role),
                    iat: Some(iat),
                    exp: Some(iat + ttl),
                };
                (Just(claims), iat..=iat + ttl)
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Any issued claim set comes back unchanged while `now <= exp`.
        #[test]
        fn round_trip_within_validity_window((claims, now_secs) in arb_claims()) {
            let token = codec::issue(&claims, &key());
            let now = Utc.timestamp_opt(now_secs, 0).unwrap();
            let principal = gate().authorize_request(Some(&bearer(&token)), now).unwrap();
            prop_assert_eq!(principal.claims(), &claims);
        }

        /// Arbitrary header values never panic and never authenticate.
        #[test]
        fn arbitrary_headers_are_rejected(header in ".{0,120}") {
            prop_assert_eq!(
                gate().authorize_request(Some(&header), now()),
                Err(GateError::Unauthorized)
            );
        }
    }
}
