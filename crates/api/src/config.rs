//! Process configuration, read once from the environment at startup.

use chrono::Duration;
use thiserror::Error;

use careers_auth::authenticator::DEFAULT_TOKEN_TTL_SECS;
use careers_auth::password;
use careers_auth::{Role, RoleSet, SigningKey};
use careers_observability::LogFormat;

/// Shortest secret accepted when `JWT_SECRET` is set explicitly.
pub const MIN_SECRET_BYTES: usize = 16;

/// Longest accepted token lifetime (ten years).
pub const MAX_TOKEN_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

const DEV_SECRET: &str = "careers-insecure-dev-secret";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be at least {MIN_SECRET_BYTES} bytes")]
    WeakSecret,

    #[error("JWT_TTL_SECONDS must be between 1 and {MAX_TOKEN_TTL_SECS}, got '{0}'")]
    InvalidTtl(String),

    #[error("ADMIN_ROLES must name at least one role")]
    EmptyRoles,

    #[error("ADMIN_ROLES must include 'Admin'")]
    MissingAdminRole,

    #[error("DEFAULT_ROLE '{0}' is not one of ADMIN_ROLES")]
    UnknownDefaultRole(String),

    #[error("BCRYPT_COST must be between 4 and 31, got '{0}'")]
    InvalidBcryptCost(String),

    #[error("LOG_FORMAT: {0}")]
    InvalidLogFormat(String),

    #[error("BOOTSTRAP_ADMIN_EMAIL and BOOTSTRAP_ADMIN_PASSWORD must be set together")]
    IncompleteBootstrapAdmin,
}

/// First `Admin` account, seeded when absent from the store.
#[derive(Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub signing_key: SigningKey,
    /// Set when `JWT_SECRET` was absent and the dev default is in use.
    pub insecure_dev_secret: bool,
    pub token_ttl: Duration,
    pub roles: RoleSet,
    pub default_role: Role,
    pub bcrypt_cost: u32,
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub bootstrap_admin: Option<BootstrapAdmin>,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let (secret, insecure_dev_secret) = match var("JWT_SECRET") {
            Some(secret) if secret.len() < MIN_SECRET_BYTES => return Err(ConfigError::WeakSecret),
            Some(secret) => (secret, false),
            None => (DEV_SECRET.to_string(), true),
        };
        let signing_key = SigningKey::new(secret.into_bytes()).map_err(|_| ConfigError::WeakSecret)?;

        let token_ttl = match var("JWT_TTL_SECONDS") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(secs) if (1..=MAX_TOKEN_TTL_SECS).contains(&secs) => Duration::seconds(secs),
                _ => return Err(ConfigError::InvalidTtl(raw)),
            },
            None => Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
        };

        let roles = match var("ADMIN_ROLES") {
            Some(raw) => RoleSet::new(raw.split(',').map(|r| r.trim().to_string())),
            None => RoleSet::default(),
        };
        if roles.is_empty() {
            return Err(ConfigError::EmptyRoles);
        }
        // Admin-user management is gated on this role.
        if !roles.contains(&Role::ADMIN) {
            return Err(ConfigError::MissingAdminRole);
        }

        let default_role = match var("DEFAULT_ROLE") {
            Some(raw) => roles
                .parse(raw.trim())
                .ok_or(ConfigError::UnknownDefaultRole(raw))?,
            None if roles.contains(&Role::RECRUITER) => Role::RECRUITER,
            None => roles.iter().next().cloned().ok_or(ConfigError::EmptyRoles)?,
        };

        let bcrypt_cost = match var("BCRYPT_COST") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(cost) if (4..=31).contains(&cost) => cost,
                _ => return Err(ConfigError::InvalidBcryptCost(raw)),
            },
            None => password::DEFAULT_COST,
        };

        let bootstrap_admin = match (var("BOOTSTRAP_ADMIN_EMAIL"), var("BOOTSTRAP_ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(BootstrapAdmin { email, password }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteBootstrapAdmin),
        };

        let log_format = match var("LOG_FORMAT") {
            Some(raw) => raw.parse().map_err(ConfigError::InvalidLogFormat)?,
            None => LogFormat::default(),
        };

        Ok(Self {
            signing_key,
            insecure_dev_secret,
            token_ttl,
            roles,
            default_role,
            bcrypt_cost,
            database_url: var("DATABASE_URL"),
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            bootstrap_admin,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = load(&[]).unwrap();
        assert!(cfg.insecure_dev_secret);
        assert_eq!(cfg.token_ttl, Duration::days(7));
        assert_eq!(cfg.default_role, Role::RECRUITER);
        assert!(cfg.roles.contains(&Role::ADMIN));
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080");
        assert_eq!(cfg.database_url, None);
        assert_eq!(cfg.bootstrap_admin, None);
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn short_explicit_secret_is_rejected() {
        assert_eq!(load(&[("JWT_SECRET", "short")]).unwrap_err(), ConfigError::WeakSecret);
        let cfg = load(&[("JWT_SECRET", "a-long-enough-secret")]).unwrap();
        assert!(!cfg.insecure_dev_secret);
    }

    #[test]
    fn ttl_must_be_positive_integer() {
        for bad in ["0", "-5", "seven days", "9223372036854775807", "315360001"] {
            assert!(matches!(
                load(&[("JWT_TTL_SECONDS", bad)]),
                Err(ConfigError::InvalidTtl(_))
            ));
        }
        let cfg = load(&[("JWT_TTL_SECONDS", "3600")]).unwrap();
        assert_eq!(cfg.token_ttl, Duration::hours(1));
        let cfg = load(&[("JWT_TTL_SECONDS", MAX_TOKEN_TTL_SECS.to_string().as_str())]).unwrap();
        assert_eq!(cfg.token_ttl, Duration::days(3650));
    }

    #[test]
    fn role_list_and_default_role_must_agree() {
        assert_eq!(load(&[("ADMIN_ROLES", " , ")]).unwrap_err(), ConfigError::EmptyRoles);
        assert_eq!(
            load(&[("ADMIN_ROLES", "Admin,Editor"), ("DEFAULT_ROLE", "Recruiter")]).unwrap_err(),
            ConfigError::UnknownDefaultRole("Recruiter".into())
        );

        let cfg = load(&[("ADMIN_ROLES", "Admin, Editor")]).unwrap();
        assert_eq!(cfg.default_role, Role::ADMIN);
        assert!(cfg.roles.contains(&Role::new("Editor")));
    }

    #[test]
    fn role_list_must_include_admin() {
        assert_eq!(
            load(&[("ADMIN_ROLES", "Owner,Recruiter")]).unwrap_err(),
            ConfigError::MissingAdminRole
        );
        assert_eq!(
            load(&[("ADMIN_ROLES", "admin,Recruiter")]).unwrap_err(),
            ConfigError::MissingAdminRole
        );
    }

    #[test]
    fn bootstrap_admin_needs_both_values() {
        assert_eq!(
            load(&[("BOOTSTRAP_ADMIN_EMAIL", "root@example.com")]).unwrap_err(),
            ConfigError::IncompleteBootstrapAdmin
        );
        let cfg = load(&[
            ("BOOTSTRAP_ADMIN_EMAIL", "root@example.com"),
            ("BOOTSTRAP_ADMIN_PASSWORD", "hunter22"),
        ])
        .unwrap();
        let debug = format!("{:?}", cfg.bootstrap_admin);
        assert!(!debug.contains("hunter22"));
    }

    #[test]
    fn secret_never_appears_in_debug_output() {
        let cfg = load(&[("JWT_SECRET", "super-secret-signing-key")]).unwrap();
        assert!(!format!("{cfg:?}").contains("super-secret-signing-key"));
    }

    #[test]
    fn bcrypt_cost_is_range_checked() {
        assert!(matches!(
            load(&[("BCRYPT_COST", "3")]),
            Err(ConfigError::InvalidBcryptCost(_))
        ));
        assert_eq!(load(&[("BCRYPT_COST", "4")]).unwrap().bcrypt_cost, 4);
    }
}
