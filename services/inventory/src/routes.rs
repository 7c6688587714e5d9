//! Inventory service routes

use axum::{
    Json, Router,
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;

use crate::{
    error::ApiError,
    middleware::{auth_middleware, log_requests},
    state::AppState,
};

pub mod product;
pub mod staff;

/// Create the router for the inventory service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/product", post(product::create_product))
        .route("/product/", post(product::create_product))
        .route(
            "/product/:id",
            put(product::update_product).delete(product::delete_product),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/staff/register", post(staff::register))
        .route("/staff/login", post(staff::login))
        .route("/product", get(product::get_products))
        .route("/product/search", get(product::search_products))
        .merge(protected_routes)
        .fallback(not_found)
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match common::database::health_check(&state.db_pool).await {
        Ok(true) => "ok",
        _ => "unavailable",
    };

    Json(json!({
        "status": "ok",
        "service": "inventory",
        "database": database,
    }))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Page not found".to_string())
}
