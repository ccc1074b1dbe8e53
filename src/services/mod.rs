pub mod cart;
pub mod error;
pub mod ownership;
pub mod products;
pub mod users;

pub use cart::{CartQueries, CartService};
pub use error::ServiceError;
pub use ownership::{ensure_owner, Owned};
pub use products::{ProductQueries, ProductService, PRODUCT_SEARCH_FIELDS, PRODUCT_UPDATE_FIELDS};
pub use users::{UserQueries, UserService, USER_UPDATE_FIELDS};
