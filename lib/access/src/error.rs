//! Error types for the access crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `AccessError`: the request may not proceed (401/403 territory)
//! - `LookupError`: a role source could not be read; never fatal, the
//!   resolver logs it and moves on to the next source

use crate::auth::Denial;
use hrdesk_core::{EmployeeId, RoleId};
use std::fmt;

/// Message for requests without an authenticated principal.
pub const UNAUTHENTICATED_MESSAGE: &str = "Unauthenticated.";

/// Message for forbidden requests.
pub const FORBIDDEN_MESSAGE: &str = "You do not have permission to access this resource.";

/// Reasons a request is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// No authenticated principal.
    Unauthenticated,
    /// The principal's effective role is absent or not among the required roles.
    Forbidden(Box<Denial>),
}

impl AccessError {
    /// HTTP-equivalent status for this refusal.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            Self::Forbidden(_) => 403,
        }
    }

    /// Human-readable message suitable for the client.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Unauthenticated => UNAUTHENTICATED_MESSAGE,
            Self::Forbidden(_) => FORBIDDEN_MESSAGE,
        }
    }

    /// Returns the denial details for a forbidden request.
    #[must_use]
    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Self::Unauthenticated => None,
            Self::Forbidden(denial) => Some(denial),
        }
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "user is not authenticated"),
            Self::Forbidden(denial) => write!(f, "{denial}"),
        }
    }
}

impl std::error::Error for AccessError {}

/// Failures reading a role source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// An employee references a role that does not exist.
    DanglingRole { employee_id: EmployeeId, role_id: RoleId },
    /// The backing store or policy provider failed.
    Unavailable { source: String, reason: String },
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingRole {
                employee_id,
                role_id,
            } => {
                write!(f, "employee {employee_id} references missing role {role_id}")
            }
            Self::Unavailable { source, reason } => {
                write!(f, "role source '{source}' unavailable: {reason}")
            }
        }
    }
}

impl std::error::Error for LookupError {}
