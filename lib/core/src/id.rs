//! Strongly-typed identifiers for HR entities.
//!
//! Identifiers wrap a ULID and render with a short type prefix
//! (`usr_01H...`), so an employee id can never be handed to code that
//! expects a user id.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Error returned when parsing an ID from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse.
    pub id_type: &'static str,
    /// The reason for the parse failure.
    pub reason: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {}: {}", self.id_type, self.reason)
    }
}

impl std::error::Error for ParseIdError {}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Ulid);

        impl $name {
            /// Creates a new ID with a randomly generated ULID.
            #[must_use]
            pub fn new() -> Self {
                Self(Ulid::new())
            }

            /// Creates an ID from a ULID.
            #[must_use]
            pub const fn from_ulid(ulid: Ulid) -> Self {
                Self(ulid)
            }

            /// Returns the underlying ULID.
            #[must_use]
            pub const fn as_ulid(&self) -> Ulid {
                self.0
            }

            /// Returns the prefix used for display formatting.
            #[must_use]
            pub const fn prefix() -> &'static str {
                $prefix
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}_{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let ulid_str = s
                    .strip_prefix(concat!($prefix, "_"))
                    .unwrap_or(s);

                Ulid::from_str(ulid_str)
                    .map(Self)
                    .map_err(|e| ParseIdError {
                        id_type: stringify!($name),
                        reason: e.to_string(),
                    })
            }
        }

        impl From<Ulid> for $name {
            fn from(ulid: Ulid) -> Self {
                Self(ulid)
            }
        }

        impl From<$name> for Ulid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Unique identifier for a login account (the principal).
    UserId,
    "usr"
);

define_id!(
    /// Unique identifier for an employee record.
    EmployeeId,
    "emp"
);

define_id!(
    /// Unique identifier for a job role (Admin, HR Manager, ...).
    RoleId,
    "role"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_type_prefix() {
        assert!(UserId::new().to_string().starts_with("usr_"));
        assert!(EmployeeId::new().to_string().starts_with("emp_"));
        assert!(RoleId::new().to_string().starts_with("role_"));
    }

    #[test]
    fn parse_with_prefix() {
        let id = EmployeeId::new();
        let parsed: EmployeeId = id.to_string().parse().expect("should parse");
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_without_prefix() {
        let ulid = Ulid::new();
        let id: RoleId = ulid.to_string().parse().expect("should parse");
        assert_eq!(id.as_ulid(), ulid);
    }

    #[test]
    fn parse_rejects_foreign_prefix() {
        let employee = EmployeeId::new();
        let result: Result<UserId, _> = employee.to_string().parse();
        let err = result.expect_err("emp_ prefix is not a user id");
        assert_eq!(err.id_type, "UserId");
    }

    #[test]
    fn parse_invalid_ulid() {
        let err = "not_a_ulid"
            .parse::<UserId>()
            .expect_err("should not parse");
        assert_eq!(err.id_type, "UserId");
        assert!(err.to_string().contains("UserId"));
    }

    #[test]
    fn serializes_as_bare_ulid() {
        let ulid = Ulid::new();
        let id = UserId::from_ulid(ulid);
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, format!("\"{ulid}\""));
    }
}
