//! Session routes: who am I, and logout.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use hrdesk_access::{RecordScope, SessionId};
use hrdesk_core::{EmployeeId, UserId};
use serde::Serialize;
use std::sync::Arc;
use time::Duration as TimeDuration;

use super::{AppState, AuthRejection, CurrentUser};

/// The caller's identity and effective role.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: UserId,
    pub name: String,
    pub role: Option<String>,
    /// Where the role came from: `session`, `provider` or `legacy_column`.
    pub role_origin: Option<String>,
    pub employee_id: Option<EmployeeId>,
    pub scope: RecordScope,
}

/// Reports the caller's effective role and what records they can see.
pub async fn me(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Json<MeResponse>, AuthRejection> {
    let mut ctx = user.context();
    let resolved = state
        .resolver
        .resolve_effective_role(&mut ctx)
        .map_err(|e| describe_failed(&user, e))?;
    let scope = RecordScope::for_context(&state.resolver, &mut ctx, &state.privileged_roles)
        .map_err(|e| describe_failed(&user, e))?;

    let principal = user.principal();
    let employee_id = ctx.cache.employee_id().or(principal.employee_id());
    let employee = match employee_id {
        Some(id) => state.directory.employee(id).map_err(|e| describe_failed(&user, e))?,
        None => None,
    };

    Ok(Json(MeResponse {
        user_id: principal.id(),
        name: principal.display_name(employee.as_ref()).to_string(),
        role: resolved.as_ref().map(|r| r.name().to_string()),
        role_origin: resolved.as_ref().map(|r| r.origin().to_string()),
        employee_id,
        scope,
    }))
}

fn describe_failed(user: &CurrentUser, error: impl std::fmt::Display) -> AuthRejection {
    tracing::error!(error = %error, user_id = %user.principal().id(), "Failed to describe caller");
    AuthRejection::InternalError {
        format: user.format(),
    }
}

/// Logs out by deleting the session and clearing the session cookie.
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let cookie_name = state.session_config.cookie_name.clone();

    if let Some(session_cookie) = jar.get(&cookie_name) {
        let session_id = SessionId::new(session_cookie.value().to_string());
        match state.sessions.delete(&session_id).await {
            Ok(()) => tracing::info!(session_id = %session_id, "Logged out"),
            Err(e) => {
                tracing::warn!(error = %e, session_id = %session_id, "Failed to delete session");
            }
        }
    }

    let remove_session = Cookie::build((cookie_name, ""))
        .path("/")
        .max_age(TimeDuration::ZERO);

    (jar.add(remove_session), Redirect::to(&state.login_path))
}

#[cfg(test)]
mod tests {
    use crate::app::router;
    use crate::auth::{AppState, MemorySessionStore, SessionStore};
    use crate::config::ServerConfig;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use hrdesk_access::{Employee, MemoryDirectory, Principal, Role, RoleCache};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn setup(title: &str) -> (Arc<AppState>, Arc<MemorySessionStore>, String, Employee) {
        let store = Arc::new(MemorySessionStore::new());
        let directory = Arc::new(MemoryDirectory::new());
        let role = Role::new(title);
        let employee = Employee::new("Kim Lee").with_role(role.id());
        let principal = Principal::new("kim").with_employee(employee.id());
        let user_id = principal.id();
        directory.insert_role(role);
        directory.insert_employee(employee.clone());
        directory.insert_principal(principal);

        let state = Arc::new(AppState::new(
            directory,
            store.clone(),
            &ServerConfig::default(),
        ));
        let (_, cookie) = state.start_session(user_id).await.expect("session");
        let cookie = format!("{}={}", cookie.name(), cookie.value());
        (state, store, cookie, employee)
    }

    #[tokio::test]
    async fn me_reports_role_origin_and_scope() {
        let (state, _, cookie, employee) = setup("Developer").await;

        let request = Request::builder()
            .uri("/me")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .expect("request");
        let response = router(state).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(body["name"], "Kim Lee");
        assert_eq!(body["role"], "Developer");
        // The gate already cached the role on this request.
        assert_eq!(body["role_origin"], "session");
        assert_eq!(body["scope"]["scope"], "employee");
        assert_eq!(
            body["scope"]["employee_id"],
            serde_json::to_value(employee.id()).expect("serialize")
        );
    }

    #[tokio::test]
    async fn logout_deletes_session_and_clears_cookie() {
        let (state, store, cookie, _) = setup("Admin").await;
        assert_eq!(store.len().await, 1);

        let request = Request::builder()
            .uri("/logout")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .expect("request");
        let response = router(state).oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).expect("location"),
            "/login"
        );
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("set-cookie")
            .to_str()
            .expect("ascii");
        assert!(set_cookie.starts_with("session=;"));
        assert!(set_cookie.contains("Max-Age=0"));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn logout_without_session_still_redirects() {
        let (state, store, _, _) = setup("Admin").await;

        let request = Request::builder()
            .uri("/logout")
            .body(Body::empty())
            .expect("request");
        let response = router(state).oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn me_uses_role_cached_by_earlier_requests() {
        let (state, store, cookie, _) = setup("Developer").await;
        let session_id = cookie
            .split_once('=')
            .map(|(_, id)| hrdesk_access::SessionId::from(id))
            .expect("cookie value");
        store
            .update_cache(&session_id, RoleCache::with_role("HR Manager"))
            .await
            .expect("update");

        let request = Request::builder()
            .uri("/me")
            .header(header::COOKIE, &cookie)
            .header(header::ACCEPT, "application/json")
            .body(Body::empty())
            .expect("request");
        let response = router(state).oneshot(request).await.expect("response");

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(body["role"], "HR Manager");
        assert_eq!(body["scope"], serde_json::json!({ "scope": "all" }));
    }
}
