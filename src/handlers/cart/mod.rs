pub mod items;
pub mod user;
pub mod validator;

// Re-export handler functions for use in routing
pub use items::delete as item_delete;
pub use items::patch as item_patch;
pub use items::post as item_post;

pub use user::items as user_items;
pub use user::summary as user_summary;
