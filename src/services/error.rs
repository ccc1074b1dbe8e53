use thiserror::Error;

use crate::database::DatabaseError;

/// Domain outcome of a failed service operation.
///
/// Each operation fails with exactly one of these. The display strings are
/// for logs; clients see [`ServiceError::code`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Cart item not found")]
    ItemNotFound,

    #[error("Product not found")]
    ProductNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Product not created")]
    ProductNotCreated,

    #[error("Product not updated")]
    ProductNotUpdated,

    #[error("Product category not found")]
    ProductCategoryNotFound,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl ServiceError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::ItemNotFound => "ITEM_NOT_FOUND",
            ServiceError::ProductNotFound => "PRODUCT_NOT_FOUND",
            ServiceError::UserNotFound => "USER_NOT_FOUND",
            ServiceError::Unauthorized => "UNAUTHORIZED",
            ServiceError::ProductNotCreated => "PRODUCT_NOT_CREATED",
            ServiceError::ProductNotUpdated => "PRODUCT_NOT_UPDATED",
            ServiceError::ProductCategoryNotFound => "PRODUCT_CATEGORY_NOT_FOUND",
            ServiceError::Database(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ServiceError::ItemNotFound.code(), "ITEM_NOT_FOUND");
        assert_eq!(ServiceError::ProductCategoryNotFound.code(), "PRODUCT_CATEGORY_NOT_FOUND");
        assert_eq!(
            ServiceError::from(DatabaseError::UnknownQuery("cart/x".into())).code(),
            "INTERNAL_SERVER_ERROR"
        );
    }
}
