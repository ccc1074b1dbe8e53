use axum::{extract::State, Extension};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{NewProduct, Product};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Validated};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductParams {
    product_id: Uuid,
}

/// POST /products - create a product sold by the caller
pub async fn post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    validated: Validated,
) -> ApiResult<Product> {
    let data: NewProduct = validated.body_as()?;
    let product = state.products.add_product(auth.user_id, data).await?;
    Ok(ApiResponse::created(product))
}

/// PATCH /products/:productId - partial update by the seller
pub async fn patch(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    validated: Validated,
) -> ApiResult<Product> {
    let params: ProductParams = validated.params_as()?;
    let product = state
        .products
        .update_product(auth.user_id, params.product_id, &validated.body)
        .await?;
    Ok(ApiResponse::success(product))
}
