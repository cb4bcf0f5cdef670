//! Core domain types and utilities for hrdesk.
//!
//! This crate provides the identifier types and error handling foundation
//! shared by the access-control library and the HTTP host.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{EmployeeId, ParseIdError, RoleId, UserId};
