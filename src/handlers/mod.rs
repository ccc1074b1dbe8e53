// Handlers grouped by resource. Each resource module pairs its handlers with
// a `validator` module declaring the request schema of every route.
pub mod cart;
pub mod products;
pub mod root;
pub mod users;

pub use root::{health, root};
