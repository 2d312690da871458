use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role tag carried in credential records and token claims.
///
/// Roles are opaque, case-sensitive strings at this layer; the set of roles a
/// deployment accepts is a [`RoleSet`] loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    /// Full access, including admin-user management.
    pub const ADMIN: Role = Role(Cow::Borrowed("Admin"));

    /// Manages job postings and applicants.
    pub const RECRUITER: Role = Role(Cow::Borrowed("Recruiter"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The role enumeration accepted by this deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSet {
    roles: Vec<Role>,
}

impl RoleSet {
    /// Build a role set, dropping blanks and duplicates while keeping order.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut roles: Vec<Role> = Vec::new();
        for name in names {
            let name = name.into().trim().to_string();
            if name.is_empty() || roles.iter().any(|r| r.as_str() == name) {
                continue;
            }
            roles.push(Role::new(name));
        }
        Self { roles }
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn contains(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    /// Resolve a submitted role name against the enumeration (exact match).
    pub fn parse(&self, name: &str) -> Option<Role> {
        self.roles.iter().find(|r| r.as_str() == name).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter()
    }
}

impl Default for RoleSet {
    fn default() -> Self {
        Self {
            roles: vec![Role::ADMIN, Role::RECRUITER],
        }
    }
}
