use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers::{self, cart, products, users};
use crate::middleware::{log_requests, require_auth, validate_request};
use crate::state::AppState;

/// Build the full application router
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(public_product_routes())
        // Protected
        .merge(protected_routes(&state))
        // Global middleware
        .layer(cors_layer(&config.security.cors_origins))
        .layer(RequestBodyLimitLayer::new(config.server.max_request_size_bytes))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http());

    if config.server.enable_request_logging {
        router = router.layer(from_fn(log_requests));
    }

    router.with_state(state)
}

fn public_product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(products::products_search).layer(from_fn_with_state(products::validator::listing(), validate_request)),
        )
        .route(
            "/products/user/:userId",
            get(products::products_by_seller)
                .layer(from_fn_with_state(products::validator::seller_products(), validate_request)),
        )
}

/// Authentication runs before route-level validation
fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/cart",
            post(cart::item_post).layer(from_fn_with_state(cart::validator::add_item(), validate_request)),
        )
        .route(
            "/cart/:itemId",
            patch(cart::item_patch).layer(from_fn_with_state(cart::validator::update_item(), validate_request)),
        )
        .route(
            "/cart/:itemId",
            delete(cart::item_delete).layer(from_fn_with_state(cart::validator::delete_item(), validate_request)),
        )
        .route(
            "/cart/summary/:userId",
            get(cart::user_summary).layer(from_fn_with_state(cart::validator::user_cart(), validate_request)),
        )
        .route(
            "/cart/user/:userId",
            get(cart::user_items).layer(from_fn_with_state(cart::validator::user_cart(), validate_request)),
        )
        .route(
            "/products",
            post(products::product_post)
                .layer(from_fn_with_state(products::validator::add_product(), validate_request)),
        )
        .route(
            "/products/:productId",
            patch(products::product_patch)
                .layer(from_fn_with_state(products::validator::update_product(), validate_request)),
        )
        .route(
            "/users/:userId",
            get(users::user_get).layer(from_fn_with_state(users::validator::get_user(), validate_request)),
        )
        .route(
            "/users/:userId",
            patch(users::user_patch).layer(from_fn_with_state(users::validator::update_user(), validate_request)),
        )
        .route_layer(from_fn_with_state(state.jwt.clone(), require_auth))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
