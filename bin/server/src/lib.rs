//! hrdesk web server.
//!
//! Hosts HR routes behind role gates: each request's session is resolved to
//! a principal and an effective role, and the gate admits it or answers
//! 401/403 in the format the caller expects.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod pages;
pub mod seed;
