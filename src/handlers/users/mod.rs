pub mod user;
pub mod validator;

pub use user::get as user_get;
pub use user::patch as user_patch;
