use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::database::models::{NewProduct, Product, ProductWithCategory};
use crate::database::{build_update_params, build_update_values, FieldWhitelist, QueryExecutor, SqlParam};
use crate::services::error::ServiceError;
use crate::services::ownership::ensure_owner;

/// Fields a seller may change, in `products/updateProduct` parameter order.
/// `sellerId` is deliberately absent.
pub const PRODUCT_UPDATE_FIELDS: FieldWhitelist = FieldWhitelist::new(&[
    "title",
    "description",
    "price",
    "stock",
    "categoryId",
    "subcategoryId",
    "actif",
]);

/// Listing filters, in `products/getProductsListing` parameter order
pub const PRODUCT_SEARCH_FIELDS: FieldWhitelist = FieldWhitelist::new(&[
    "title",
    "categoryId",
    "subcategoryId",
    "sellerId",
    "minPrice",
    "maxPrice",
    "actif",
    "limit",
    "offset",
]);

/// Stored-query ids used by [`ProductService`]
#[derive(Debug, Clone)]
pub struct ProductQueries {
    pub add: &'static str,
    pub update: &'static str,
    pub get_by_id: &'static str,
    pub list_by_user: &'static str,
    pub listing: &'static str,
}

impl Default for ProductQueries {
    fn default() -> Self {
        Self {
            add: "products/addProduct",
            update: "products/updateProduct",
            get_by_id: "products/getProductById",
            list_by_user: "products/getProductsByUserId",
            listing: "products/getProductsListing",
        }
    }
}

#[derive(Clone)]
pub struct ProductService {
    db: Arc<dyn QueryExecutor>,
    queries: Arc<ProductQueries>,
}

impl ProductService {
    pub fn new(db: Arc<dyn QueryExecutor>) -> Self {
        Self::with_queries(db, ProductQueries::default())
    }

    pub fn with_queries(db: Arc<dyn QueryExecutor>, queries: ProductQueries) -> Self {
        Self {
            db,
            queries: Arc::new(queries),
        }
    }

    /// Create a product owned by `user_id`.
    ///
    /// A category or subcategory that does not exist surfaces from the store
    /// as a foreign-key violation and is reported as
    /// [`ServiceError::ProductCategoryNotFound`].
    #[instrument(skip(self, data), fields(title = %data.title))]
    pub async fn add_product(&self, user_id: Uuid, data: NewProduct) -> Result<Product, ServiceError> {
        let params = vec![
            SqlParam::value(data.title),
            optional(data.description),
            SqlParam::value(data.price),
            SqlParam::value(data.category_id.to_string()),
            optional(data.subcategory_id.map(|id| id.to_string())),
            optional(data.stock),
            SqlParam::value(user_id.to_string()),
            optional(data.actif),
        ];

        let result = match self.db.execute(self.queries.add, params).await {
            Ok(result) => result,
            Err(err) if err.is_foreign_key_violation() => {
                warn!(error = %err, "product references a missing category");
                return Err(ServiceError::ProductCategoryNotFound);
            }
            Err(err) => return Err(err.into()),
        };

        let product: Product = result.first()?.ok_or(ServiceError::ProductNotCreated)?;
        info!(product_id = %product.id, "product created");
        Ok(product)
    }

    /// Apply a sparse patch to a product the user sells. Keys outside
    /// [`PRODUCT_UPDATE_FIELDS`] are ignored.
    #[instrument(skip(self, patch))]
    pub async fn update_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        patch: &Map<String, Value>,
    ) -> Result<Product, ServiceError> {
        let existing = self
            .db
            .execute(self.queries.get_by_id, vec![SqlParam::value(product_id.to_string())])
            .await?
            .first::<Product>()?;
        ensure_owner(existing, user_id, ServiceError::ProductNotFound)?;

        let params = build_update_params(product_id.to_string(), &PRODUCT_UPDATE_FIELDS, patch);
        let product: Product = self
            .db
            .execute(self.queries.update, params)
            .await?
            .first()?
            .ok_or(ServiceError::ProductNotUpdated)?;

        info!(product_id = %product.id, "product updated");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn list_products_by_user(&self, user_id: Uuid) -> Result<Vec<ProductWithCategory>, ServiceError> {
        let result = self
            .db
            .execute(self.queries.list_by_user, vec![SqlParam::value(user_id.to_string())])
            .await?;
        Ok(result.decode_all()?)
    }

    /// Listing filtered by any subset of [`PRODUCT_SEARCH_FIELDS`]
    #[instrument(skip(self, filters))]
    pub async fn search_products_listing(&self, filters: &Map<String, Value>) -> Result<Vec<ProductWithCategory>, ServiceError> {
        let params = build_update_values(&PRODUCT_SEARCH_FIELDS, filters);
        let result = self.db.execute(self.queries.listing, params).await?;
        Ok(result.decode_all()?)
    }
}

fn optional<T: Into<Value>>(value: Option<T>) -> SqlParam {
    match value {
        Some(v) => SqlParam::value(v),
        None => SqlParam::Keep,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{DatabaseError, FOREIGN_KEY_VIOLATION};
    use crate::testing::ScriptedExecutor;
    use serde_json::json;

    fn product_row(id: Uuid, seller: Uuid) -> Value {
        json!({
            "id": id,
            "title": "Desk lamp",
            "description": null,
            "price": 19.9,
            "stock": 4,
            "category_id": Uuid::new_v4(),
            "subcategory_id": null,
            "seller_id": seller,
            "actif": true,
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z",
        })
    }

    fn new_product(category: Uuid) -> NewProduct {
        NewProduct {
            title: "Desk lamp".into(),
            description: Some("Brass".into()),
            price: 19.9,
            stock: None,
            category_id: category,
            subcategory_id: None,
            actif: None,
        }
    }

    fn patch(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn add_product_forces_seller_to_caller() {
        let db = Arc::new(ScriptedExecutor::new());
        let user = Uuid::new_v4();
        let category = Uuid::new_v4();
        db.respond("products/addProduct", vec![product_row(Uuid::new_v4(), user)]);

        let product = ProductService::new(db.clone()).add_product(user, new_product(category)).await.unwrap();
        assert_eq!(product.seller_id, user);

        let params = &db.calls()[0].params;
        assert_eq!(params.len(), 8);
        assert_eq!(params[0], SqlParam::value("Desk lamp"));
        assert_eq!(params[3], SqlParam::value(category.to_string()));
        assert_eq!(params[4], SqlParam::Keep);
        assert_eq!(params[6], SqlParam::value(user.to_string()));
    }

    #[tokio::test]
    async fn add_product_with_unknown_category_is_a_conflict() {
        let db = Arc::new(ScriptedExecutor::new());
        db.fail(
            "products/addProduct",
            DatabaseError::query(Some(FOREIGN_KEY_VIOLATION), "violates foreign key constraint"),
        );

        let err = ProductService::new(db.clone())
            .add_product(Uuid::new_v4(), new_product(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ProductCategoryNotFound));
    }

    #[tokio::test]
    async fn add_product_with_no_row_is_not_created() {
        let db = Arc::new(ScriptedExecutor::new());
        let err = ProductService::new(db.clone())
            .add_product(Uuid::new_v4(), new_product(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ProductNotCreated));
    }

    #[tokio::test]
    async fn other_store_errors_pass_through() {
        let db = Arc::new(ScriptedExecutor::new());
        db.fail("products/addProduct", DatabaseError::query(Some("23505"), "duplicate key value"));
        let err = ProductService::new(db.clone())
            .add_product(Uuid::new_v4(), new_product(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Database(_)));
    }

    #[tokio::test]
    async fn update_missing_product_is_not_found() {
        let db = Arc::new(ScriptedExecutor::new());
        let err = ProductService::new(db.clone())
            .update_product(Uuid::new_v4(), Uuid::new_v4(), &patch(json!({"price": 5})))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ProductNotFound));
        assert_eq!(db.call_ids(), vec!["products/getProductById"]);
    }

    #[tokio::test]
    async fn non_seller_cannot_update() {
        let db = Arc::new(ScriptedExecutor::new());
        let id = Uuid::new_v4();
        db.respond("products/getProductById", vec![product_row(id, Uuid::new_v4())]);

        let err = ProductService::new(db.clone())
            .update_product(Uuid::new_v4(), id, &patch(json!({"price": 5})))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized));
        assert_eq!(db.call_ids(), vec!["products/getProductById"]);
    }

    #[tokio::test]
    async fn seller_update_uses_whitelist_positions() {
        let db = Arc::new(ScriptedExecutor::new());
        let seller = Uuid::new_v4();
        let id = Uuid::new_v4();
        db.respond("products/getProductById", vec![product_row(id, seller)])
            .respond("products/updateProduct", vec![product_row(id, seller)]);

        ProductService::new(db.clone())
            .update_product(seller, id, &patch(json!({"stock": 7, "sellerId": Uuid::new_v4()})))
            .await
            .unwrap();

        let params = &db.calls()[1].params;
        assert_eq!(params.len(), PRODUCT_UPDATE_FIELDS.len() + 1);
        assert_eq!(params[0], SqlParam::value(id.to_string()));
        assert_eq!(params[4], SqlParam::value(7));
        assert_eq!(params.iter().filter(|p| p.is_keep()).count(), PRODUCT_UPDATE_FIELDS.len() - 1);
    }

    #[tokio::test]
    async fn update_with_no_row_is_not_updated() {
        let db = Arc::new(ScriptedExecutor::new());
        let seller = Uuid::new_v4();
        let id = Uuid::new_v4();
        db.respond("products/getProductById", vec![product_row(id, seller)])
            .respond_empty("products/updateProduct");

        let err = ProductService::new(db.clone())
            .update_product(seller, id, &patch(json!({"title": "New"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ProductNotUpdated));
    }

    #[tokio::test]
    async fn search_sends_one_param_per_filter() {
        let db = Arc::new(ScriptedExecutor::new());
        let mut row = product_row(Uuid::new_v4(), Uuid::new_v4());
        row["category_name"] = json!("Lighting");
        row["subcategory_name"] = Value::Null;
        db.respond("products/getProductsListing", vec![row]);

        let listing = ProductService::new(db.clone())
            .search_products_listing(&patch(json!({"maxPrice": 50, "title": "lamp"})))
            .await
            .unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].category_name.as_deref(), Some("Lighting"));

        let params = &db.calls()[0].params;
        assert_eq!(params.len(), PRODUCT_SEARCH_FIELDS.len());
        assert_eq!(params[0], SqlParam::value("lamp"));
        assert_eq!(params[5], SqlParam::value(50));
    }

    #[tokio::test]
    async fn seller_without_products_gets_empty_list() {
        let db = Arc::new(ScriptedExecutor::new());
        let listing = ProductService::new(db.clone()).list_products_by_user(Uuid::new_v4()).await.unwrap();
        assert!(listing.is_empty());
    }
}
