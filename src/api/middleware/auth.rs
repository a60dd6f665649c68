//! Bearer-token authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;
use crate::infra::RepoKeyResolver;

/// Authenticated subject extracted from a validated token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub uid: String,
}

/// Token authentication middleware.
///
/// Extracts the bearer token, validates it against the signing key
/// currently on record for its `(subject, audience)` pair, and injects
/// the resolved subject into the request extensions. Any failure
/// short-circuits with 401 and the downstream handler never runs.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let resolver = RepoKeyResolver(state.auth_repo.clone());
    let uid = state.token_authority.parse_token(token, &resolver).await?;

    request.extensions_mut().insert(CurrentUser { uid });

    Ok(next.run(request).await)
}
