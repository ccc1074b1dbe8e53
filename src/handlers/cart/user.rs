use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{CartItem, CartSummary};
use crate::middleware::{ApiResponse, ApiResult, Validated};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserParams {
    user_id: Uuid,
}

/// GET /cart/summary/:userId
pub async fn summary(State(state): State<AppState>, validated: Validated) -> ApiResult<CartSummary> {
    let params: UserParams = validated.params_as()?;
    let summary = state.cart.get_cart_summary(params.user_id).await?;
    Ok(ApiResponse::success(summary))
}

/// GET /cart/user/:userId
pub async fn items(State(state): State<AppState>, validated: Validated) -> ApiResult<Vec<CartItem>> {
    let params: UserParams = validated.params_as()?;
    let items = state.cart.list_cart_items(params.user_id).await?;
    Ok(ApiResponse::success(items))
}
