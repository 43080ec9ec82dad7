//! Authorization gate for privileged catalog operations.
//!
//! # Responsibility
//! - Parse bearer credentials from a raw `Authorization` header value.
//! - Require a superuser principal before create, update and delete.
//!
//! # Invariants
//! - Deny by default: a missing or malformed header is `Unauthorized`.
//! - Token verification is delegated to an [`Authenticator`]; this module
//!   never inspects token contents.
//! - Product services never call this gate; callers run it first.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Auth scheme accepted in the `Authorization` header.
pub const BEARER_AUTH_TYPE: &str = "Bearer";

const FORBIDDEN_SUPERUSER_ONLY: &str = "Only superuser allow.";

/// Catalog operations as seen by the authorization gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Get,
    PartialUpdate,
    Delete,
    List,
}

impl Operation {
    /// Returns whether the operation needs a superuser principal.
    pub fn requires_superuser(self) -> bool {
        match self {
            Self::Create | Self::PartialUpdate | Self::Delete => true,
            Self::Get | Self::List => false,
        }
    }
}

/// Bearer token extracted from a well-formed header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerCredential {
    token: String,
}

impl BearerCredential {
    /// Parses `"Bearer <token>"`.
    ///
    /// # Errors
    /// Returns `AccessError::Unauthorized` when the header is missing, uses
    /// another scheme, or carries an empty token.
    pub fn parse(header: Option<&str>) -> Result<Self, AccessError> {
        let header = header.ok_or(AccessError::Unauthorized)?;
        let token = header
            .strip_prefix(BEARER_AUTH_TYPE)
            .and_then(|rest| rest.strip_prefix(' '))
            .filter(|token| !token.is_empty() && !token.contains(char::is_whitespace))
            .ok_or(AccessError::Unauthorized)?;

        Ok(Self {
            token: token.to_string(),
        })
    }

    /// Raw token text, for the authenticator only.
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Authenticated caller identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub is_superuser: bool,
}

/// Token validator seam, e.g. a JWT verifier owned by the transport layer.
pub trait Authenticator {
    /// Resolves `credential` to a principal.
    ///
    /// Implementations return `AccessError::Unauthorized` for invalid or
    /// expired tokens.
    fn authenticate(&self, credential: &BearerCredential) -> Result<Principal, AccessError>;
}

/// Authorization failures raised before the core is entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// No credential, or one that is malformed or invalid.
    Unauthorized,
    /// Valid credential without sufficient privilege.
    Forbidden(String),
}

impl Display for AccessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::Forbidden(detail) => write!(f, "Access Denied: {detail}"),
        }
    }
}

impl Error for AccessError {}

/// Authenticates `header` and requires the principal to be a superuser.
pub fn require_superuser(
    header: Option<&str>,
    authenticator: &impl Authenticator,
) -> Result<Principal, AccessError> {
    let credential = BearerCredential::parse(header)?;
    let principal = authenticator.authenticate(&credential)?;
    if !principal.is_superuser {
        return Err(AccessError::Forbidden(FORBIDDEN_SUPERUSER_ONLY.to_string()));
    }
    Ok(principal)
}

/// Runs the gate only when `operation` is privileged.
///
/// Returns `Ok(None)` for read operations, which need no credential.
pub fn authorize(
    operation: Operation,
    header: Option<&str>,
    authenticator: &impl Authenticator,
) -> Result<Option<Principal>, AccessError> {
    if !operation.requires_superuser() {
        return Ok(None);
    }
    require_superuser(header, authenticator).map(Some)
}
