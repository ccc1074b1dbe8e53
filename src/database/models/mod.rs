pub mod cart;
pub mod product;
pub mod user;

pub use cart::{CartItem, CartSummary};
pub use product::{NewProduct, Product, ProductWithCategory};
pub use user::User;
