use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::category_models::{Category, CategoryPage, CategoryRequest};
use crate::error::{ApiError, ErrorBody};
use crate::pagination::{PageQuery, PageRequest};
use crate::routes::AppState;

#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Invalid category", body = ErrorBody)
    )
)]
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let Json(request) =
        payload.map_err(|e| ApiError::from_rejection(e, "Error creating category"))?;

    let category = state
        .categories
        .create(request)
        .await
        .map_err(ApiError::context("Error creating category"))?;

    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    params(PageQuery),
    responses(
        (status = 200, description = "A page of categories", body = CategoryPage),
        (status = 400, description = "Lookup failed", body = ErrorBody)
    )
)]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<CategoryPage>, ApiError> {
    let page = state
        .categories
        .list(PageRequest::from(&query))
        .await
        .map_err(ApiError::context("Error getting categories"))?;

    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "The category", body = Category),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "Category not found", body = ErrorBody)
    )
)]
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    let category = state
        .categories
        .get_by_id(&id)
        .await
        .map_err(ApiError::context("Error getting category"))?;

    Ok(Json(category))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = String, Path, description = "Category id")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category replaced", body = Category),
        (status = 400, description = "Invalid category", body = ErrorBody),
        (status = 404, description = "Category not found", body = ErrorBody)
    )
)]
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> Result<Json<Category>, ApiError> {
    let Json(request) =
        payload.map_err(|e| ApiError::from_rejection(e, "Error updating category"))?;

    let category = state
        .categories
        .update(&id, request)
        .await
        .map_err(ApiError::context("Error updating category"))?;

    Ok(Json(category))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "The deleted category", body = Category),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "Category not found", body = ErrorBody)
    )
)]
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    let category = state
        .categories
        .delete(&id)
        .await
        .map_err(ApiError::context("Error deleting category"))?;

    Ok(Json(category))
}
