pub mod auth;
pub mod logger;
pub mod response;
pub mod validate;

pub use auth::{require_auth, AuthUser};
pub use logger::log_requests;
pub use response::{ApiResponse, ApiResult};
pub use validate::{validate_request, Validated};
