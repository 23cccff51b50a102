//! Authentication middleware
//!
//! Axum middleware guarding the staff API with JWT bearer tokens.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::AppError;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// Routes reachable without a token
fn is_public_api_route(path: &str) -> bool {
    path == "/api/auth/login" || path == "/api/menu" || path.starts_with("/api/menu/")
}

/// Require a valid staff token.
///
/// Extracts and validates `Authorization: Bearer <token>`, then inserts
/// [`CurrentUser`] into the request extensions.
///
/// # Skipped
///
/// - `OPTIONS *` (CORS preflight)
/// - non-`/api/` paths (health checks, 404s)
/// - `/api/auth/login` and the customer menu under `/api/menu`
///
/// # Errors
///
/// | Case | Response |
/// |------|----------|
/// | No Authorization header | 401 NotAuthenticated |
/// | Expired token | 401 TokenExpired |
/// | Anything else | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS
        || !path.starts_with("/api/")
        || is_public_api_route(path)
    {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            req.extensions_mut().insert(CurrentUser::from(claims));
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes() {
        assert!(is_public_api_route("/api/auth/login"));
        assert!(is_public_api_route("/api/menu"));
        assert!(is_public_api_route("/api/menu/table/4/call-waiter"));
        assert!(!is_public_api_route("/api/menuitems"));
        assert!(!is_public_api_route("/api/auth/me"));
        assert!(!is_public_api_route("/api/orders/1"));
    }
}
