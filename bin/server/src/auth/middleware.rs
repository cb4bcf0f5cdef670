//! Role-gating middleware and extractors for Axum.

use axum::{
    Json,
    extract::{FromRequestParts, MatchedPath, Request, State},
    http::{HeaderMap, StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use hrdesk_access::{
    AccessError, AuthContext, Denial, FORBIDDEN_MESSAGE, Principal, PrincipalDirectory,
    RequestTarget, RequiredRoles, RoleCache, Session, SessionId, UNAUTHENTICATED_MESSAGE,
};
use rootcause::prelude::Report;
use serde_json::json;
use std::sync::Arc;

use super::AppState;
use crate::error::GateError;

/// How a rejection should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// API or XHR caller: JSON body with a `message`.
    Json,
    /// Browser page: redirect to login, or a plain error page.
    Page,
}

impl ResponseFormat {
    /// Picks the format the caller expects.
    ///
    /// JSON is expected when the first `Accept` entry is a JSON type
    /// (`application/json`, `application/problem+json`, ...), or the request
    /// was made with `X-Requested-With: XMLHttpRequest` outside of PJAX.
    #[must_use]
    pub fn negotiate(headers: &HeaderMap) -> Self {
        let ajax = header_value(headers, "x-requested-with")
            .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"));
        let pjax = headers.contains_key("x-pjax");
        let wants_json = header_value(headers, header::ACCEPT.as_str())
            .and_then(|accept| accept.split(',').next())
            .is_some_and(|first| first.contains("/json") || first.contains("+json"));

        if (ajax && !pjax) || wants_json {
            Self::Json
        } else {
            Self::Page
        }
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Required roles for a group of routes, bound to the application state.
///
/// Used as the state of [`require_roles`]:
///
/// ```ignore
/// router.route_layer(axum::middleware::from_fn_with_state(
///     RoleGate::new(state.clone(), "Admin,HR Manager"),
///     require_roles,
/// ))
/// ```
#[derive(Clone)]
pub struct RoleGate {
    state: Arc<AppState>,
    required: RequiredRoles,
}

impl RoleGate {
    pub fn new(state: Arc<AppState>, required: impl Into<RequiredRoles>) -> Self {
        Self {
            state,
            required: required.into(),
        }
    }

    /// A gate that admits any authenticated principal.
    pub fn open(state: Arc<AppState>) -> Self {
        Self::new(state, RequiredRoles::none())
    }

    #[must_use]
    pub fn required(&self) -> &RequiredRoles {
        &self.required
    }
}

/// The admitted caller, available to handlers behind a [`RoleGate`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    session_id: SessionId,
    principal: Principal,
    cache: RoleCache,
    format: ResponseFormat,
}

impl CurrentUser {
    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    #[must_use]
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// The role cache as it stood after the gate resolved the role.
    #[must_use]
    pub fn cache(&self) -> &RoleCache {
        &self.cache
    }

    #[must_use]
    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    /// A fresh resolution context for further role checks in the handler.
    #[must_use]
    pub fn context(&self) -> AuthContext {
        AuthContext::authenticated(self.principal.clone(), self.cache.clone())
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Only present when the route sits behind `require_roles`.
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!(path = %parts.uri.path(), "handler is not behind a role gate");
                AuthRejection::InternalError {
                    format: ResponseFormat::negotiate(&parts.headers),
                }
            })
    }
}

/// Who is making the request, as far as the session says.
enum Visitor {
    Anonymous,
    Member {
        session: Session,
        principal: Principal,
    },
}

/// Admits the request if the caller holds one of the gate's roles.
///
/// Resolution may fill the session's role cache; the updated cache is
/// written back whether or not the request is admitted. Denials are logged
/// with the caller, their role, the allowed roles and the request target.
pub async fn require_roles(
    State(gate): State<RoleGate>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let format = ResponseFormat::negotiate(request.headers());
    let target = request_target(&request);
    let state = &gate.state;

    let visitor = match load_visitor(state, &jar).await {
        Ok(visitor) => visitor,
        Err(e) => {
            tracing::error!(error = %e, request = %target, "Role gate failed");
            return AuthRejection::InternalError { format }.into_response();
        }
    };

    let (mut ctx, session) = match visitor {
        Visitor::Anonymous => (AuthContext::anonymous(), None),
        Visitor::Member { session, principal } => (
            AuthContext::authenticated(principal, session.cache().clone()),
            Some(session),
        ),
    };

    let outcome = state.resolver.authorize(&mut ctx, &gate.required, &target);

    if let Some(session) = &session {
        persist_cache(state, session, &ctx.cache).await;
    }

    match outcome {
        Ok(access) => {
            tracing::debug!(request = %target, access = ?access, "Access granted");
            if let (Some(session), Some(principal)) = (session, ctx.principal()) {
                request.extensions_mut().insert(CurrentUser {
                    session_id: session.id().clone(),
                    principal: principal.clone(),
                    cache: ctx.cache.clone(),
                    format,
                });
            }
            next.run(request).await
        }
        Err(report) => {
            let error = report.current_context();
            if let Some(denial) = error.denial() {
                log_denial(denial);
            }
            AuthRejection::from_access_error(error, format, &state.login_path).into_response()
        }
    }
}

async fn load_visitor(state: &AppState, jar: &CookieJar) -> Result<Visitor, Report<GateError>> {
    let Some(cookie) = jar.get(&state.session_config.cookie_name) else {
        return Ok(Visitor::Anonymous);
    };
    let session_id = SessionId::new(cookie.value().to_string());

    let session = state
        .sessions
        .find(&session_id)
        .await
        .map_err(|e| GateError::Session {
            details: e.to_string(),
        })?;
    let Some(session) = session else {
        return Ok(Visitor::Anonymous);
    };

    if session.is_expired() {
        tracing::debug!(session_id = %session_id, "Session expired");
        if let Err(e) = state.sessions.delete(&session_id).await {
            tracing::warn!(error = %e, session_id = %session_id, "Failed to delete expired session");
        }
        return Ok(Visitor::Anonymous);
    }

    let principal = state
        .directory
        .principal(session.user_id())
        .map_err(|e| GateError::Directory {
            details: e.to_string(),
        })?;
    match principal {
        Some(principal) => Ok(Visitor::Member { session, principal }),
        None => {
            tracing::warn!(user_id = %session.user_id(), "Session refers to an unknown user");
            Ok(Visitor::Anonymous)
        }
    }
}

async fn persist_cache(state: &AppState, session: &Session, cache: &RoleCache) {
    if session.cache() == cache {
        return;
    }
    if let Err(e) = state.sessions.update_cache(session.id(), cache.clone()).await {
        tracing::warn!(error = %e, session_id = %session.id(), "Failed to save role cache");
    }
}

fn request_target(request: &Request) -> RequestTarget {
    let target = RequestTarget::new(request.method().as_str(), request.uri().path());
    match request.extensions().get::<MatchedPath>() {
        Some(route) => target.with_route(route.as_str()),
        None => target,
    }
}

fn log_denial(denial: &Denial) {
    tracing::warn!(
        user_id = %denial.principal_id(),
        current_role = denial.resolved_role().unwrap_or_default(),
        allowed_roles = %denial.required(),
        route = denial.target().route().unwrap_or_default(),
        uri = denial.target().path(),
        method = denial.target().method(),
        "Unauthorized access attempt"
    );
}

/// Rejection produced by the role gate and its extractors.
#[derive(Debug)]
pub enum AuthRejection {
    NotAuthenticated {
        format: ResponseFormat,
        login_path: String,
    },
    Forbidden {
        format: ResponseFormat,
    },
    InternalError {
        format: ResponseFormat,
    },
}

impl AuthRejection {
    /// Maps a resolver decision to the response the caller expects.
    #[must_use]
    pub fn from_access_error(error: &AccessError, format: ResponseFormat, login_path: &str) -> Self {
        match error {
            AccessError::Unauthenticated => Self::NotAuthenticated {
                format,
                login_path: login_path.to_string(),
            },
            AccessError::Forbidden(_) => Self::Forbidden { format },
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::NotAuthenticated {
                format: ResponseFormat::Json,
                ..
            } => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": UNAUTHENTICATED_MESSAGE })),
            )
                .into_response(),
            Self::NotAuthenticated {
                format: ResponseFormat::Page,
                login_path,
            } => Redirect::to(&login_path).into_response(),
            Self::Forbidden {
                format: ResponseFormat::Json,
            } => (
                StatusCode::FORBIDDEN,
                Json(json!({ "message": format!("Forbidden. {FORBIDDEN_MESSAGE}") })),
            )
                .into_response(),
            Self::Forbidden {
                format: ResponseFormat::Page,
            } => (StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE).into_response(),
            Self::InternalError {
                format: ResponseFormat::Json,
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Server Error" })),
            )
                .into_response(),
            Self::InternalError {
                format: ResponseFormat::Page,
            } => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response(),
        }
    }
}
