use axum::{extract::State, Extension};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::CartItem;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Validated};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddItemBody {
    product_id: Uuid,
    quantity: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemParams {
    item_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct QuantityBody {
    quantity: i64,
}

/// POST /cart - add a product to the caller's cart
pub async fn post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    validated: Validated,
) -> ApiResult<CartItem> {
    let body: AddItemBody = validated.body_as()?;
    let item = state
        .cart
        .add_item_to_cart(auth.user_id, body.product_id, body.quantity)
        .await?;
    Ok(ApiResponse::created(item))
}

/// PATCH /cart/:itemId - change the quantity of one of the caller's items
pub async fn patch(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    validated: Validated,
) -> ApiResult<CartItem> {
    let params: ItemParams = validated.params_as()?;
    let body: QuantityBody = validated.body_as()?;
    let item = state
        .cart
        .update_cart_item(auth.user_id, params.item_id, body.quantity)
        .await?;
    Ok(ApiResponse::success(item))
}

/// DELETE /cart/:itemId
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    validated: Validated,
) -> ApiResult<()> {
    let params: ItemParams = validated.params_as()?;
    state.cart.delete_cart_item(auth.user_id, params.item_id).await?;
    Ok(ApiResponse::no_content())
}
