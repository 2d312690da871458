//! Login: turn an (identifier, secret) pair into a signed token.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::claims::TokenClaims;
use crate::codec;
use crate::credentials::{CredentialStore, Identifier, StoreError, UserSummary};
use crate::password;
use crate::signature::SigningKey;

/// Token lifetime in seconds used when none is configured (7 days).
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

const DUMMY_PASSWORD: &str = "careers-auth-timing-equaliser";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error("email and password are required")]
    MissingCredentials,

    /// Unknown identifier and wrong secret both end up here.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("credential store unavailable: {0}")]
    Store(StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
    pub user: UserSummary,
}

pub struct CredentialAuthenticator {
    store: Arc<dyn CredentialStore>,
    key: SigningKey,
    ttl: Duration,
    bcrypt_cost: u32,
    dummy_hash: OnceCell<Option<String>>,
}

impl CredentialAuthenticator {
    pub fn new(store: Arc<dyn CredentialStore>, key: SigningKey) -> Self {
        Self {
            store,
            key,
            ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
            bcrypt_cost: password::DEFAULT_COST,
            dummy_hash: OnceCell::new(),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Cost used for the decoy hash compared when the identifier is unknown.
    /// Should match the cost stored hashes were produced with.
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Verify credentials and issue a token valid until `now + ttl`.
    pub async fn authenticate(
        &self,
        identifier: &str,
        secret: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, LoginError> {
        let identifier = Identifier::parse(identifier).map_err(|_| LoginError::MissingCredentials)?;
        if secret.is_empty() {
            return Err(LoginError::MissingCredentials);
        }

        let record = self
            .store
            .find_by_identifier(&identifier)
            .await
            .map_err(LoginError::Store)?;

        let Some(record) = record else {
            self.burn_decoy_comparison(secret).await;
            tracing::info!("login rejected");
            return Err(LoginError::InvalidCredentials);
        };

        let matches = password::verify_password(secret, &record.secret_hash)
            .await
            .map_err(|e| LoginError::Internal(e.to_string()))?;
        if !matches {
            tracing::info!("login rejected");
            return Err(LoginError::InvalidCredentials);
        }

        let claims = TokenClaims::for_subject(
            record.id.to_string(),
            Some(record.identifier.as_str().to_string()),
            record.role.clone(),
            now,
            self.ttl,
        );
        let token = codec::issue(&claims, &self.key);

        tracing::info!(subject = %record.id, role = %record.role, "login succeeded");

        Ok(IssuedToken {
            token,
            claims,
            user: record.summary(),
        })
    }

    /// Spend roughly one bcrypt comparison so unknown identifiers are not
    /// distinguishable from wrong passwords by response time.
    async fn burn_decoy_comparison(&self, secret: &str) {
        let cost = self.bcrypt_cost;
        let decoy = self
            .dummy_hash
            .get_or_init(|| async move { password::hash_password(DUMMY_PASSWORD, cost).await.ok() })
            .await;
        if let Some(hash) = decoy {
            let _ = password::verify_password(secret, hash).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::CredentialRecord;
    use crate::credentials::test_support::VecStore;
    use crate::{Role, codec, signature};
    use careers_core::AdminUserId;
    use chrono::TimeZone;

    fn key() -> SigningKey {
        SigningKey::new("authenticator-test-secret").unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    async fn setup() -> (CredentialAuthenticator, AdminUserId) {
        let store = Arc::new(VecStore::default());
        let id = AdminUserId::new();
        store
            .insert(CredentialRecord {
                id,
                identifier: Identifier::parse("admin@x.com").unwrap(),
                secret_hash: password::hash_password("correct", 4).await.unwrap(),
                role: Role::ADMIN,
                display_name: "Admin".into(),
                created_at: now(),
                updated_at: None,
            })
            .await
            .unwrap();
        let authn = CredentialAuthenticator::new(store, key()).with_bcrypt_cost(4);
        (authn, id)
    }

    #[tokio::test]
    async fn login_issues_three_segment_token_with_seven_day_expiry() {
        let (authn, id) = setup().await;

        let issued = authn.authenticate("admin@x.com", "correct", now()).await.unwrap();
        assert_eq!(issued.token.split('.').count(), 3);

        let decoded = codec::decode(&issued.token).unwrap();
        assert!(signature::verify(&decoded.signing_input, &decoded.signature, &key()));

        let claims = TokenClaims::from_map(&decoded.claims).unwrap();
        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.role, Some(Role::ADMIN));
        assert_eq!(claims.iat, Some(now().timestamp()));
        assert_eq!(claims.exp, Some(now().timestamp() + 604_800));
        assert_eq!(issued.user.email, "admin@x.com");
    }

    #[tokio::test]
    async fn identifier_is_normalised_before_lookup() {
        let (authn, _) = setup().await;
        assert!(authn.authenticate("  ADMIN@X.com ", "correct", now()).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_identifier_and_wrong_secret_are_indistinguishable() {
        let (authn, _) = setup().await;

        let unknown = authn.authenticate("nobody@x.com", "correct", now()).await.unwrap_err();
        let wrong = authn.authenticate("admin@x.com", "incorrect", now()).await.unwrap_err();

        assert_eq!(unknown, LoginError::InvalidCredentials);
        assert_eq!(unknown, wrong);
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn blank_fields_are_missing_credentials() {
        let (authn, _) = setup().await;
        assert_eq!(
            authn.authenticate("", "correct", now()).await.unwrap_err(),
            LoginError::MissingCredentials
        );
        assert_eq!(
            authn.authenticate("admin@x.com", "", now()).await.unwrap_err(),
            LoginError::MissingCredentials
        );
    }

    #[tokio::test]
    async fn custom_ttl_is_applied() {
        let (authn, _) = setup().await;
        let authn = authn.with_ttl(Duration::hours(1));
        let issued = authn.authenticate("admin@x.com", "correct", now()).await.unwrap();
        assert_eq!(issued.claims.exp, Some(now().timestamp() + 3_600));
    }
}
