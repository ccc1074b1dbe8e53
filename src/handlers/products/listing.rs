use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::ProductWithCategory;
use crate::middleware::{ApiResponse, ApiResult, Validated};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SellerParams {
    user_id: Uuid,
}

/// GET /products - public listing filtered by query string
pub async fn search(State(state): State<AppState>, validated: Validated) -> ApiResult<Vec<ProductWithCategory>> {
    let products = state.products.search_products_listing(&validated.query).await?;
    Ok(ApiResponse::success(products))
}

/// GET /products/user/:userId - everything a seller lists
pub async fn by_seller(State(state): State<AppState>, validated: Validated) -> ApiResult<Vec<ProductWithCategory>> {
    let params: SellerParams = validated.params_as()?;
    let products = state.products.list_products_by_user(params.user_id).await?;
    Ok(ApiResponse::success(products))
}
