use chatop_auth::{Role, VerifiedClaims};

/// Identity established for one request by a verified bearer token.
///
/// Present in the request extensions iff the token verified; handlers behind
/// the policy layer can rely on it for non-public routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    subject: String,
    role: Role,
}

impl IdentityContext {
    pub fn new(subject: impl Into<String>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            role,
        }
    }

    /// The principal's email.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

impl From<VerifiedClaims> for IdentityContext {
    fn from(claims: VerifiedClaims) -> Self {
        Self::new(claims.subject, claims.role)
    }
}
