pub mod listing;
pub mod product;
pub mod validator;

// Re-export handler functions for use in routing
pub use product::patch as product_patch;
pub use product::post as product_post;

pub use listing::by_seller as products_by_seller;
pub use listing::search as products_search;
