use axum::{
    extract::{Request, State},
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::views::SESSION_COOKIE;
use crate::auth::{authorize, AppError, AuthService, OrRedirect, Rejection, Role, UserSession};

/// Resolve the session cookie into a `UserSession` request extension
pub async fn session_middleware(
    State(auth_service): State<AuthService>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, Rejection> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or(AppError::Unauthenticated)
        .or_redirect("/login")?;

    let session = auth_service
        .resolve_session(&token)
        .await
        .or_redirect("/login")?;

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

/// Shared body of the role gates: denied callers go back to their own landing page
async fn require_role(minimum: Role, request: Request, next: Next) -> Result<Response, Rejection> {
    let session = extract_user_session(&request).or_redirect("/login")?;
    authorize(session, minimum).or_redirect(session.role.landing_path())?;

    Ok(next.run(request).await)
}

/// Instructor or Admin middleware
pub async fn instructor_or_admin_middleware(
    request: Request,
    next: Next,
) -> Result<Response, Rejection> {
    require_role(Role::Instructor, request, next).await
}

/// Admin-only middleware
pub async fn admin_only_middleware(request: Request, next: Next) -> Result<Response, Rejection> {
    require_role(Role::Admin, request, next).await
}

/// The student area is for students only, staff are sent to their dashboard
pub async fn student_only_middleware(
    request: Request,
    next: Next,
) -> Result<Response, Rejection> {
    let session = extract_user_session(&request).or_redirect("/login")?;
    if session.role != Role::Student {
        return Err(AppError::forbidden("Access denied. This is the student area.")
            .redirect_to(session.role.landing_path()));
    }

    Ok(next.run(request).await)
}

/// Extract user session from request (for use in middleware)
pub fn extract_user_session(request: &Request) -> Result<&UserSession, AppError> {
    request
        .extensions()
        .get::<UserSession>()
        .ok_or(AppError::Unauthenticated)
}

/// Security headers middleware
pub fn security_headers_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    )
}

pub fn frame_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        HeaderName::from_static("x-frame-options"),
        HeaderValue::from_static("DENY"),
    )
}
