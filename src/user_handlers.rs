use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::error::{ApiError, ErrorBody};
use crate::pagination::{PageQuery, PageRequest};
use crate::packet_models::Packet;
use crate::routes::AppState;
use crate::user_models::{
    AddPacketRequest, CreateUserRequest, UpdateUserRequest, UserPage, UserView,
};

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserView),
        (status = 400, description = "Invalid user", body = ErrorBody)
    )
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserView>), ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::from_rejection(e, "Error creating user"))?;

    let user = state
        .users
        .create(request)
        .await
        .map_err(ApiError::context("Error creating user"))?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(PageQuery),
    responses(
        (status = 200, description = "A page of available users", body = UserPage),
        (status = 400, description = "Lookup failed", body = ErrorBody)
    )
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<UserPage>, ApiError> {
    let page = state
        .users
        .list(PageRequest::from(&query))
        .await
        .map_err(ApiError::context("Error getting users"))?;

    Ok(Json(page.map(UserView::from).into()))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserView),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "User not found or deactivated", body = ErrorBody)
    )
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UserView>, ApiError> {
    let user = state
        .users
        .get_by_id(&id)
        .await
        .map_err(ApiError::context("Error getting user"))?;

    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserView),
        (status = 400, description = "Invalid user", body = ErrorBody),
        (status = 404, description = "User not found or deactivated", body = ErrorBody)
    )
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserView>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::from_rejection(e, "Error updating user"))?;

    let user = state
        .users
        .update(&id, request)
        .await
        .map_err(ApiError::context("Error updating user"))?;

    Ok(Json(user.into()))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "The deleted user", body = UserView),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UserView>, ApiError> {
    let user = state
        .users
        .delete(&id)
        .await
        .map_err(ApiError::context("Error deleting user"))?;

    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}/deactivate",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "The deactivated user", body = UserView),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
pub async fn deactivate_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UserView>, ApiError> {
    let user = state
        .users
        .deactivate(&id)
        .await
        .map_err(ApiError::context("Error deactivating user"))?;

    Ok(Json(user.into()))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}/packets",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Packets owned by the user", body = [Packet]),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Lookup failed", body = ErrorBody)
    )
)]
pub async fn get_user_packets(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Packet>>, ApiError> {
    let packets = state
        .users
        .list_packets(&id)
        .await
        .map_err(ApiError::context_with(
            "Error retrieving packets",
            StatusCode::INTERNAL_SERVER_ERROR,
        ))?;

    Ok(Json(packets))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/packets",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    request_body = AddPacketRequest,
    responses(
        (status = 200, description = "The user with the packet attached", body = UserView),
        (status = 400, description = "Missing or malformed packet id", body = ErrorBody),
        (status = 404, description = "User or packet not found", body = ErrorBody),
        (status = 500, description = "Update failed", body = ErrorBody)
    )
)]
pub async fn add_packet_to_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<AddPacketRequest>, JsonRejection>,
) -> Result<Json<UserView>, ApiError> {
    let Json(request) =
        payload.map_err(|e| ApiError::from_rejection(e, "Error adding packet to user"))?;

    let Some(packet_id) = request.packet_id.filter(|p| !p.is_empty()) else {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Packet ID is required"));
    };

    let user = state
        .users
        .add_packet(&id, &packet_id)
        .await
        .map_err(ApiError::context_with(
            "Error adding packet to user",
            StatusCode::INTERNAL_SERVER_ERROR,
        ))?;

    Ok(Json(user.into()))
}
