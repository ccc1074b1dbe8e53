use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use crate::auth::{Claims, JwtAuth};
use crate::error::ApiError;

/// Authenticated user context extracted from JWT
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self { user_id: claims.sub }
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn require_auth(
    State(jwt): State<Arc<JwtAuth>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| ApiError::unauthorized("Invalid Authorization header format")))
        .transpose()?;

    let token = JwtAuth::bearer_token(header)?;
    let claims = jwt.verify(token)?;

    let auth_user = AuthUser::from(claims);
    debug!(user_id = %auth_user.user_id, "authenticated request");
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}
