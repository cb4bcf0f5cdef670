//! Role resolution and role-gated access control for hrdesk.
//!
//! This crate provides:
//! - Principal, employee and role records (`Principal`, `Employee`, `Role`)
//! - Role-name normalization and route requirement parsing (`RoleName`, `RequiredRoles`)
//! - Sessions and the cached effective role (`Session`, `RoleCache`)
//! - Effective-role resolution and authorization (`AccessResolver`)
//! - Row-level scoping for per-employee records (`RecordScope`)
//!
//! # Resolution Model
//!
//! A principal's effective role is the first non-blank answer from the
//! session cache, the configured role source, and the legacy role column.
//! A role read from the role source is cached in the session. Comparison
//! against a route's required roles ignores case and surrounding whitespace;
//! a route with no required roles admits any authenticated principal.
//!
//! # Example
//!
//! ```
//! use hrdesk_access::{
//!     AccessResolver, AuthContext, Employee, MemoryDirectory, Principal, RequestTarget,
//!     RequiredRoles, Role, RoleCache, RoleSource,
//! };
//! use std::sync::Arc;
//!
//! let directory = MemoryDirectory::new();
//! let role = Role::new("HR Manager");
//! let employee = Employee::new("Alice Doe").with_role(role.id());
//! let principal = Principal::new("alice").with_employee(employee.id());
//! directory.insert_role(role);
//! directory.insert_employee(employee);
//!
//! let resolver = AccessResolver::new(RoleSource::EmployeeRelation(Arc::new(directory)));
//! let mut ctx = AuthContext::authenticated(principal, RoleCache::empty());
//!
//! let required = RequiredRoles::from("Admin, hr manager");
//! let target = RequestTarget::new("GET", "/employees");
//! assert!(resolver.authorize(&mut ctx, &required, &target).is_ok());
//!
//! // The resolved role is now cached for the rest of the session.
//! assert_eq!(ctx.cache.role(), Some("HR Manager"));
//! ```

pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod principal;
pub mod resolver;
pub mod role;
pub mod scope;
pub mod session;
pub mod source;

// Re-export main types at crate root
pub use auth::{Access, AuthContext, Denial, RequestTarget, ResolvedRole, RoleOrigin};
pub use config::{AccessConfig, RoleSourceKind};
pub use directory::{DirectorySeed, MemoryDirectory};
pub use error::{AccessError, FORBIDDEN_MESSAGE, LookupError, UNAUTHENTICATED_MESSAGE};
pub use principal::{Employee, Principal};
pub use resolver::AccessResolver;
pub use role::{RequiredRoles, Role, RoleName};
pub use scope::RecordScope;
pub use session::{RoleCache, Session, SessionId};
pub use source::{
    EmployeeDirectory, EmployeeRole, PrincipalDirectory, ProvidedRole, RolePolicy, RoleSource,
};
