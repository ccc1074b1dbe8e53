use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::database::models::{CartItem, CartSummary};
use crate::database::{QueryExecutor, SqlParam};
use crate::services::error::ServiceError;
use crate::services::ownership::ensure_owner;

/// Stored-query ids used by [`CartService`]
#[derive(Debug, Clone)]
pub struct CartQueries {
    pub add_item: &'static str,
    pub update_item: &'static str,
    pub delete_item: &'static str,
    pub get_item: &'static str,
    pub list_items: &'static str,
    pub summary: &'static str,
}

impl Default for CartQueries {
    fn default() -> Self {
        Self {
            add_item: "cart/addItemCart",
            update_item: "cart/updateItemCart",
            delete_item: "cart/deleteItemCart",
            get_item: "cart/getItemCartById",
            list_items: "cart/getItemsCartByUserId",
            summary: "cart/getCartSummaryByUserId",
        }
    }
}

#[derive(Clone)]
pub struct CartService {
    db: Arc<dyn QueryExecutor>,
    queries: Arc<CartQueries>,
}

impl CartService {
    pub fn new(db: Arc<dyn QueryExecutor>) -> Self {
        Self::with_queries(db, CartQueries::default())
    }

    pub fn with_queries(db: Arc<dyn QueryExecutor>, queries: CartQueries) -> Self {
        Self {
            db,
            queries: Arc::new(queries),
        }
    }

    /// Add `quantity` of a product to the user's cart, accumulating onto an
    /// existing line for the same product.
    #[instrument(skip(self))]
    pub async fn add_item_to_cart(&self, user_id: Uuid, product_id: Uuid, quantity: i64) -> Result<CartItem, ServiceError> {
        let params = vec![
            SqlParam::value(user_id.to_string()),
            SqlParam::value(product_id.to_string()),
            SqlParam::value(quantity),
        ];

        let result = match self.db.execute(self.queries.add_item, params).await {
            Ok(result) => result,
            Err(err) if err.is_foreign_key_violation() => return Err(ServiceError::ProductNotFound),
            Err(err) => return Err(err.into()),
        };

        let item: CartItem = result.first()?.ok_or(ServiceError::ProductNotFound)?;
        info!(item_id = %item.id, quantity = item.quantity, "cart item saved");
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn update_cart_item(&self, user_id: Uuid, item_id: Uuid, quantity: i64) -> Result<CartItem, ServiceError> {
        self.owned_item(user_id, item_id).await?;

        let params = vec![SqlParam::value(item_id.to_string()), SqlParam::value(quantity)];
        let updated: CartItem = self
            .db
            .execute(self.queries.update_item, params)
            .await?
            .first()?
            .ok_or(ServiceError::ItemNotFound)?;

        info!(item_id = %updated.id, quantity = updated.quantity, "cart item updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_cart_item(&self, user_id: Uuid, item_id: Uuid) -> Result<(), ServiceError> {
        self.owned_item(user_id, item_id).await?;

        let result = self
            .db
            .execute(self.queries.delete_item, vec![SqlParam::value(item_id.to_string())])
            .await?;
        if result.is_empty() {
            return Err(ServiceError::ItemNotFound);
        }

        info!(item_id = %item_id, "cart item deleted");
        Ok(())
    }

    /// Aggregate of the user's cart; a user without rows gets the zero summary.
    #[instrument(skip(self))]
    pub async fn get_cart_summary(&self, user_id: Uuid) -> Result<CartSummary, ServiceError> {
        let summary = self
            .db
            .execute(self.queries.summary, vec![SqlParam::value(user_id.to_string())])
            .await?
            .first()?;
        Ok(summary.unwrap_or_else(|| CartSummary::empty(user_id)))
    }

    #[instrument(skip(self))]
    pub async fn list_cart_items(&self, user_id: Uuid) -> Result<Vec<CartItem>, ServiceError> {
        let result = self
            .db
            .execute(self.queries.list_items, vec![SqlParam::value(user_id.to_string())])
            .await?;
        Ok(result.decode_all()?)
    }

    async fn owned_item(&self, user_id: Uuid, item_id: Uuid) -> Result<CartItem, ServiceError> {
        let existing = self
            .db
            .execute(self.queries.get_item, vec![SqlParam::value(item_id.to_string())])
            .await?
            .first::<CartItem>()?;
        ensure_owner(existing, user_id, ServiceError::ItemNotFound)
    }
}
