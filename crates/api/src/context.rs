use careers_auth::Principal;

/// Principal context for a request (verified token claims).
///
/// Inserted by the auth middleware; present on every protected route.
#[derive(Debug, Clone, PartialEq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}
