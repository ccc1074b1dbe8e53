use std::sync::Arc;

use crate::auth::JwtAuth;
use crate::database::QueryExecutor;
use crate::services::{CartService, ProductService, UserService};

/// Shared handles injected into every handler. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn QueryExecutor>,
    pub jwt: Arc<JwtAuth>,
    pub cart: CartService,
    pub products: ProductService,
    pub users: UserService,
}

impl AppState {
    pub fn new(db: Arc<dyn QueryExecutor>, jwt: JwtAuth) -> Self {
        Self {
            cart: CartService::new(db.clone()),
            products: ProductService::new(db.clone()),
            users: UserService::new(db.clone()),
            jwt: Arc::new(jwt),
            db,
        }
    }
}
