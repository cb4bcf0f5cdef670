//! Application routing.
//!
//! Every route except logout sits behind a [`RoleGate`]. A gate with no
//! roles still requires a signed-in user.

use axum::{Router, middleware::from_fn_with_state, routing::get};
use std::sync::Arc;

use crate::auth::{self, AppState, RoleGate, require_roles};
use crate::pages;

/// Roles allowed to browse the employee list.
pub const HR_ROLES: &str = "Admin,HR Manager";

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let hr_only: Router<Arc<AppState>> = Router::new()
        .route("/employees", get(pages::employees))
        .route_layer(from_fn_with_state(
            RoleGate::new(state.clone(), HR_ROLES),
            require_roles,
        ));

    let signed_in: Router<Arc<AppState>> = Router::new()
        .route("/dashboard", get(pages::dashboard))
        .route("/employees/{id}", get(pages::employee))
        .route("/me", get(auth::me))
        .route_layer(from_fn_with_state(
            RoleGate::open(state.clone()),
            require_roles,
        ));

    Router::new()
        .merge(hr_only)
        .merge(signed_in)
        .route("/logout", get(auth::logout).post(auth::logout))
        .with_state(state)
}
