//! Route authorization policy: a static rule table consulted after authentication.
//!
//! - No IO after construction
//! - No HTTP types (method and path are plain strings)
//! - Roles are matched by set membership only (no hierarchy)

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Role;

/// One row of the route table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRule {
    /// Exact path, `/base/**` (base and descendants) or `prefix*` (string prefix).
    pub pattern: String,

    /// HTTP methods this rule is restricted to; empty means any method.
    #[serde(default)]
    pub methods: Vec<String>,

    /// Roles allowed through; empty means any authenticated principal.
    #[serde(default)]
    pub roles: BTreeSet<Role>,

    /// Permit without an identity.
    #[serde(default)]
    pub anonymous: bool,
}

impl AuthorizationRule {
    pub fn public(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            methods: Vec::new(),
            roles: BTreeSet::new(),
            anonymous: true,
        }
    }

    pub fn authenticated(pattern: impl Into<String>) -> Self {
        Self {
            anonymous: false,
            ..Self::public(pattern)
        }
    }

    pub fn with_roles(pattern: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            roles: roles.into_iter().collect(),
            ..Self::authenticated(pattern)
        }
    }

    pub fn for_methods<I, M>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        self.methods = methods.into_iter().map(Into::into).collect();
        self
    }
}

/// Why a request may not proceed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessDenied {
    #[error("authentication required")]
    Unauthenticated,

    #[error("role {role} may not access {path}")]
    Forbidden { role: Role, path: String },
}

/// Invalid rule table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("invalid route pattern '{0}': {1}")]
    InvalidPattern(String, &'static str),

    #[error("invalid policy file: {0}")]
    InvalidFile(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Matcher {
    Exact(String),
    Subtree(String),
    Prefix(String),
}

impl Matcher {
    fn parse(pattern: &str) -> Result<Self, PolicyError> {
        let invalid = |why| PolicyError::InvalidPattern(pattern.to_string(), why);
        if !pattern.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }

        let matcher = if let Some(base) = pattern.strip_suffix("/**") {
            Matcher::Subtree(base.to_string())
        } else if let Some(prefix) = pattern.strip_suffix('*') {
            Matcher::Prefix(prefix.to_string())
        } else {
            Matcher::Exact(pattern.to_string())
        };

        if matcher.literal().contains('*') {
            return Err(invalid("wildcards are only allowed as a suffix"));
        }
        Ok(matcher)
    }

    fn literal(&self) -> &str {
        match self {
            Matcher::Exact(p) | Matcher::Subtree(p) | Matcher::Prefix(p) => p,
        }
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            Matcher::Exact(p) => path == p,
            Matcher::Subtree(base) => {
                base.is_empty()
                    || path == base
                    || path.strip_prefix(base.as_str()).is_some_and(|rest| rest.starts_with('/'))
            }
            Matcher::Prefix(p) => path.starts_with(p.as_str()),
        }
    }

    /// Longer literal wins; exact beats a wildcard with the same literal.
    fn specificity(&self) -> (usize, u8) {
        match self {
            Matcher::Exact(p) => (p.len(), 1),
            Matcher::Subtree(p) | Matcher::Prefix(p) => (p.len(), 0),
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    rule: AuthorizationRule,
    matcher: Matcher,
}

impl CompiledRule {
    fn applies_to(&self, method: &str, path: &str) -> bool {
        let method_ok = self.rule.methods.is_empty()
            || self.rule.methods.iter().any(|m| m.eq_ignore_ascii_case(method));
        method_ok && self.matcher.matches(path)
    }

    fn rank(&self) -> (usize, u8, u8) {
        let (len, exact) = self.matcher.specificity();
        (len, exact, u8::from(!self.rule.methods.is_empty()))
    }
}

#[derive(Debug, Deserialize)]
struct PolicyFile {
    #[serde(rename = "rule", default)]
    rules: Vec<AuthorizationRule>,
}

/// Immutable, shareable rule table.
#[derive(Debug, Clone)]
pub struct AuthorizationPolicy {
    rules: Vec<CompiledRule>,
}

impl AuthorizationPolicy {
    pub fn new(rules: Vec<AuthorizationRule>) -> Result<Self, PolicyError> {
        let rules = rules
            .into_iter()
            .map(|rule| {
                let matcher = Matcher::parse(&rule.pattern)?;
                Ok(CompiledRule { rule, matcher })
            })
            .collect::<Result<Vec<_>, PolicyError>>()?;
        Ok(Self { rules })
    }

    /// Parse a TOML table made of `[[rule]]` entries.
    pub fn from_toml_str(source: &str) -> Result<Self, PolicyError> {
        let file: PolicyFile = toml::from_str(source).map_err(|e| PolicyError::InvalidFile(e.to_string()))?;
        Self::new(file.rules)
    }

    /// Route table of the rental API.
    pub fn builtin() -> Result<Self, PolicyError> {
        let members = [Role::User, Role::Admin];
        Self::new(vec![
            AuthorizationRule::public("/health"),
            AuthorizationRule::public("/api/auth/**"),
            AuthorizationRule::with_roles("/api/auth/me", members),
            AuthorizationRule::with_roles("/api/rentals/**", members),
            AuthorizationRule::with_roles("/api/messages/**", members),
            AuthorizationRule::with_roles("/api/user/**", members),
            AuthorizationRule::with_roles("/api/admin/**", [Role::Admin]),
        ])
    }

    pub fn rules(&self) -> impl Iterator<Item = &AuthorizationRule> {
        self.rules.iter().map(|c| &c.rule)
    }

    /// Most specific rule for the request; ties go to the rule declared first.
    pub fn matching_rule(&self, method: &str, path: &str) -> Option<&AuthorizationRule> {
        let mut best: Option<&CompiledRule> = None;
        for candidate in self.rules.iter().filter(|c| c.applies_to(method, path)) {
            if best.is_none_or(|b| candidate.rank() > b.rank()) {
                best = Some(candidate);
            }
        }
        best.map(|c| &c.rule)
    }

    /// Decide whether a request with the given identity role (`None` = anonymous) may proceed.
    ///
    /// Paths without a rule require any authenticated principal.
    pub fn authorize(&self, method: &str, path: &str, role: Option<Role>) -> Result<(), AccessDenied> {
        let rule = self.matching_rule(method, path);
        if rule.is_some_and(|r| r.anonymous) {
            return Ok(());
        }

        let Some(role) = role else {
            return Err(AccessDenied::Unauthenticated);
        };

        match rule {
            Some(r) if !r.roles.is_empty() && !r.roles.contains(&role) => Err(AccessDenied::Forbidden {
                role,
                path: path.to_string(),
            }),
            _ => Ok(()),
        }
    }
}
