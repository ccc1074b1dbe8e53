use axum::{extract::State, Extension};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Validated};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserParams {
    user_id: Uuid,
}

/// GET /users/:userId
pub async fn get(State(state): State<AppState>, validated: Validated) -> ApiResult<User> {
    let params: UserParams = validated.params_as()?;
    let user = state.users.get_user(params.user_id).await?;
    Ok(ApiResponse::success(user))
}

/// PATCH /users/:userId - users may only edit their own profile
pub async fn patch(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    validated: Validated,
) -> ApiResult<User> {
    let params: UserParams = validated.params_as()?;
    let user = state
        .users
        .update_user(auth.user_id, params.user_id, &validated.body)
        .await?;
    Ok(ApiResponse::success(user))
}
