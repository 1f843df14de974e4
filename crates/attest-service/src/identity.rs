//! Caller identity capability.
//!
//! Token validation happens upstream; this trait only surfaces the opaque
//! identifier the transport layer already extracted. The identifier is used
//! for object-key composition and stored-object metadata, nothing else.

use std::fmt;

use crate::error::IdentityError;

/// Opaque caller identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerId(String);

impl CallerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait CallerIdentity: Send + Sync {
    /// The identifier of the caller on whose behalf this invocation runs.
    fn caller_id(&self) -> Result<CallerId, IdentityError>;
}

/// Identity provider bound to one fixed principal, for transports that
/// resolve the caller before constructing the service.
pub struct FixedIdentity(CallerId);

impl FixedIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(CallerId::new(id))
    }
}

impl CallerIdentity for FixedIdentity {
    fn caller_id(&self) -> Result<CallerId, IdentityError> {
        Ok(self.0.clone())
    }
}
