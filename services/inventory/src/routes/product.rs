//! Product endpoints

use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;

use crate::{
    error::{ApiError, ApiResult},
    filters::{ProductFilter, ProductQueryParams},
    middleware::AuthUser,
    models::{
        ApiResponse, MessageResponse,
        product::{ProductListing, ProductPayload},
    },
    repositories::ProductAccess,
    state::AppState,
    validation::validate_product,
};

/// List products with optional filters, ordering and pagination
pub async fn get_products(
    State(state): State<AppState>,
    Query(params): Query<ProductQueryParams>,
) -> ApiResult<impl IntoResponse> {
    list_products(&state, ProductFilter::from_params(params)).await
}

/// Search available products
pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<ProductQueryParams>,
) -> ApiResult<impl IntoResponse> {
    list_products(&state, ProductFilter::for_search(params)).await
}

async fn list_products(
    state: &AppState,
    filter: ProductFilter,
) -> ApiResult<Json<ApiResponse<Vec<ProductListing>>>> {
    let products = state
        .product_repository
        .list(&filter)
        .await
        .map_err(|e| {
            error!("Failed to list products: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(ApiResponse::new("success", products)))
}

/// Create a product owned by the authenticated staff member
pub async fn create_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    validate_product(&payload).map_err(ApiError::BadRequest)?;

    let product = state
        .product_repository
        .create(user.id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to create product: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new("success", product))))
}

/// Update a product owned by the authenticated staff member
pub async fn update_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_product_id(&id)?;
    let Json(payload) = payload?;
    validate_product(&payload).map_err(ApiError::BadRequest)?;

    let access = state
        .product_repository
        .update(id, user.id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to update product {}: {}", id, e);
            ApiError::InternalServerError
        })?;
    require_access(access)?;

    Ok(Json(MessageResponse::new("Product updated successfully")))
}

/// Delete a product owned by the authenticated staff member
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_product_id(&id)?;

    let access = state
        .product_repository
        .delete(id, user.id)
        .await
        .map_err(|e| {
            error!("Failed to delete product {}: {}", id, e);
            ApiError::InternalServerError
        })?;
    require_access(access)?;

    Ok(Json(MessageResponse::new("Product deleted successfully")))
}

/// Product ids are integers; anything else cannot name a product
fn parse_product_id(raw: &str) -> ApiResult<i64> {
    raw.parse()
        .map_err(|_| ApiError::NotFound("product not found".to_string()))
}

fn require_access(access: ProductAccess) -> ApiResult<()> {
    match access {
        ProductAccess::Granted => Ok(()),
        ProductAccess::Missing => Err(ApiError::NotFound("product not found".to_string())),
        ProductAccess::Forbidden => Err(ApiError::Forbidden(
            "product belongs to another staff member".to_string(),
        )),
    }
}
