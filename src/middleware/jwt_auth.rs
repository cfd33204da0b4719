use crate::{
    app_state::AppState,
    error::{ApiError, Result},
    services::UserIdentity,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Identity for routes that also serve anonymous visitors
#[derive(Debug, Clone, Default)]
pub struct MaybeIdentity(pub Option<UserIdentity>);

fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>> {
    let Some(auth_header) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return Ok(None);
    };

    // Parse "Bearer <token>" format
    auth_header
        .strip_prefix("Bearer ")
        .map(Some)
        .ok_or_else(|| {
            ApiError::InvalidToken(
                "Invalid Authorization format, expected 'Bearer <token>'".to_string(),
            )
        })
}

/// JWT authentication middleware
///
/// Validates the identity provider's access token and stores the caller's
/// identity in request extensions.
///
/// Returns 401 Unauthorized if the header is missing or token validation fails.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = bearer_token(request.headers())?
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let identity = state.jwt_service.identity_from_token(token)?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Optional JWT authentication middleware
///
/// Same as [`jwt_auth_middleware`] but never rejects: a missing, malformed,
/// or expired token simply leaves the request anonymous.
pub async fn optional_jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match bearer_token(request.headers()) {
        Ok(Some(token)) => match state.jwt_service.identity_from_token(token) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::debug!("Ignoring unusable access token: {}", e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::debug!("Ignoring malformed Authorization header: {}", e);
            None
        }
    };

    if let Some(identity) = identity {
        request.extensions_mut().insert(identity);
    }

    next.run(request).await
}

/// Axum extractor for user identity
///
/// Only works on routes protected by jwt_auth_middleware.
impl<S> FromRequestParts<S> for UserIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserIdentity>()
            .cloned()
            .ok_or_else(|| {
                ApiError::Unauthorized(
                    "User identity not found - route must be protected by jwt_auth_middleware"
                        .to_string(),
                )
            })
    }
}

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        Ok(MaybeIdentity(parts.extensions.get::<UserIdentity>().cloned()))
    }
}
