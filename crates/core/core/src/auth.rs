//! Injected authorization capability.
//!
//! Identity lives in an external OAuth/role system. The endpoints only need
//! the boolean answer, so they take an `Authorizer` as a precondition and
//! stay decoupled from any identity protocol.

/// The caller of an endpoint, as far as this service can see it.
#[derive(Debug, Clone, Default)]
pub struct Principal {
    /// Bearer token presented with the request, if any.
    pub token: Option<String>,
}

impl Principal {
    /// An unidentified caller.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A caller presenting a bearer token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }
}

/// Capability check gating the ingestion and query endpoints.
pub trait Authorizer: Send + Sync {
    /// Whether this caller may use the service.
    fn is_authorized(&self, principal: &Principal) -> bool;
}

/// Admits every caller. Development default.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn is_authorized(&self, _principal: &Principal) -> bool {
        true
    }
}

/// Admits callers presenting a configured shared secret.
#[derive(Debug, Clone)]
pub struct SharedSecret {
    secret: String,
}

impl SharedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl Authorizer for SharedSecret {
    fn is_authorized(&self, principal: &Principal) -> bool {
        principal
            .token
            .as_deref()
            .is_some_and(|token| token == self.secret)
    }
}
