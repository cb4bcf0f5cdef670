//! HR routes behind role gates.
//!
//! Rendering is left to the front end; these handlers return the data a
//! page would show.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hrdesk_access::{Employee, RecordScope};
use hrdesk_core::EmployeeId;
use serde::Serialize;
use std::sync::Arc;

use crate::auth::{AppState, AuthRejection, CurrentUser};

/// Errors from page handlers.
#[derive(Debug)]
pub enum PageError {
    NotFound,
    Rejected(AuthRejection),
}

impl From<AuthRejection> for PageError {
    fn from(rejection: AuthRejection) -> Self {
        Self::Rejected(rejection)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            Self::Rejected(rejection) => rejection.into_response(),
        }
    }
}

fn internal(user: &CurrentUser, error: impl std::fmt::Display) -> PageError {
    tracing::error!(error = %error, user_id = %user.principal().id(), "Page lookup failed");
    PageError::Rejected(AuthRejection::InternalError {
        format: user.format(),
    })
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub greeting: String,
    pub role: Option<String>,
}

/// Landing page for any signed-in user.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Json<Dashboard>, PageError> {
    let principal = user.principal();
    let employee = match user.cache().employee_id().or(principal.employee_id()) {
        Some(id) => state
            .directory
            .employee(id)
            .map_err(|e| internal(&user, e))?,
        None => None,
    };

    Ok(Json(Dashboard {
        greeting: format!("Welcome, {}", principal.display_name(employee.as_ref())),
        role: user.cache().role().map(str::to_string),
    }))
}

/// Employee list, for HR.
pub async fn employees(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Json<Vec<Employee>>, PageError> {
    let employees = state
        .directory
        .employees()
        .map_err(|e| internal(&user, e))?;
    Ok(Json(employees))
}

/// A single employee record; non-privileged users may only view their own.
pub async fn employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> Result<Json<Employee>, PageError> {
    let id: EmployeeId = id.parse().map_err(|_| PageError::NotFound)?;

    let mut ctx = user.context();
    let scope = RecordScope::for_context(&state.resolver, &mut ctx, &state.privileged_roles)
        .map_err(|e| internal(&user, e))?;
    if !scope.permits(id) {
        tracing::warn!(
            user_id = %user.principal().id(),
            employee_id = %id,
            "Employee record outside caller's scope"
        );
        return Err(AuthRejection::Forbidden {
            format: user.format(),
        }
        .into());
    }

    state
        .directory
        .employee(id)
        .map_err(|e| internal(&user, e))?
        .map(Json)
        .ok_or(PageError::NotFound)
}
