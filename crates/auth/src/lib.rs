//! `careers-auth`: stateless bearer-token authentication for the admin API.
//!
//! No HTTP or storage code lives here: credential records are reached through
//! the [`CredentialStore`] trait and the gate consumes the raw `Authorization`
//! header value.
//!
//! Flow: [`CredentialAuthenticator`] (login) issues a token through
//! [`codec::issue`]; every protected request goes through
//! [`AuthorizationGate`], which decodes, verifies the HMAC and validates the
//! claims before yielding a [`Principal`].

pub mod admin;
pub mod authenticator;
pub mod claims;
pub mod codec;
pub mod credentials;
pub mod gate;
pub mod password;
pub mod principal;
pub mod roles;
pub mod signature;

pub use admin::{AdminError, AdminUserPatch, AdminUserService, NewAdminUser};
pub use authenticator::{CredentialAuthenticator, IssuedToken, LoginError};
pub use claims::{ClaimError, TokenClaims, validate};
pub use codec::{DecodedToken, MalformedToken, TokenHeader};
pub use credentials::{CredentialRecord, CredentialStore, Identifier, StoreError, UserSummary};
pub use gate::{AuthorizationGate, GateError, extract_bearer, require_role};
pub use password::PasswordError;
pub use principal::Principal;
pub use roles::{Role, RoleSet};
pub use signature::{SigningKey, SigningKeyError};
