//! Authentication and request logging middleware

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::{info, warn};

use crate::{
    error::{ApiError, ApiResult},
    jwt::JwtService,
    state::AppState,
};

/// Authenticated staff member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
}

/// Resolve the bearer token in `headers` to a staff member
pub fn authenticate(headers: &HeaderMap, jwt_service: &JwtService) -> ApiResult<AuthUser> {
    if !headers.contains_key(AUTHORIZATION) {
        return Err(ApiError::Unauthorized(
            "No authorization header provided".to_string(),
        ));
    }

    let Authorization(bearer) = headers
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| ApiError::Unauthorized("Expected a bearer token".to_string()))?;

    let claims = jwt_service.validate_token(bearer.token()).map_err(|e| {
        warn!("Rejected token: {}", e);
        ApiError::Unauthorized("Invalid or expired token".to_string())
    })?;

    let id = claims
        .user_id()
        .ok_or_else(|| ApiError::Unauthorized("Invalid token subject".to_string()))?;

    Ok(AuthUser { id })
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(req.headers(), &state.jwt_service)?;

    if !state.staff_repository.exists(user.id).await? {
        warn!("Token subject {} no longer exists", user.id);
        return Err(ApiError::Unauthorized("Unknown user".to_string()));
    }

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Log method, path, status and latency of every request
pub async fn log_requests(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Request handled"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{jwt::JwtConfig, state::test_support::TEST_SECRET};
    use axum::http::HeaderValue;

    fn jwt() -> JwtService {
        JwtService::new(JwtConfig {
            secret: TEST_SECRET.to_string(),
            access_token_expiry: 900,
        })
        .unwrap()
    }

    fn headers(authorization: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(authorization).unwrap());
        headers
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let result = authenticate(&HeaderMap::new(), &jwt());
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_non_bearer_scheme_is_unauthorized() {
        let result = authenticate(&headers("Basic dXNlcjpwYXNz"), &jwt());
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_garbage_token_is_unauthorized() {
        let result = authenticate(&headers("Bearer not.a.token"), &jwt());
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_valid_token_resolves_user() {
        let jwt = jwt();
        let token = jwt.generate_access_token(5).unwrap();

        let user = authenticate(&headers(&format!("Bearer {token}")), &jwt).unwrap();
        assert_eq!(user, AuthUser { id: 5 });
    }
}
