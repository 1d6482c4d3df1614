use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::error::{ApiError, ErrorBody};
use crate::pagination::{PageQuery, PageRequest};
use crate::packet_models::{Packet, PacketPage, PacketRequest, PacketView};
use crate::routes::AppState;

#[utoipa::path(
    post,
    path = "/api/packets",
    tag = "packets",
    request_body = PacketRequest,
    responses(
        (status = 201, description = "Packet created", body = PacketView),
        (status = 400, description = "Invalid packet", body = ErrorBody)
    )
)]
pub async fn create_packet(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PacketRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PacketView>), ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::from_rejection(e, "Error creating packet"))?;

    let packet = state
        .packets
        .create(request)
        .await
        .map_err(ApiError::context("Error creating packet"))?;

    Ok((StatusCode::CREATED, Json(packet)))
}

#[utoipa::path(
    get,
    path = "/api/packets",
    tag = "packets",
    params(PageQuery),
    responses(
        (status = 200, description = "A page of packets", body = PacketPage),
        (status = 400, description = "Lookup failed", body = ErrorBody)
    )
)]
pub async fn list_packets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PacketPage>, ApiError> {
    let page = state
        .packets
        .list(PageRequest::from(&query))
        .await
        .map_err(ApiError::context("Error getting packets"))?;

    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/api/packets/{id}",
    tag = "packets",
    params(("id" = String, Path, description = "Packet id")),
    responses(
        (status = 200, description = "The packet with its categories", body = PacketView),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "Packet not found", body = ErrorBody)
    )
)]
pub async fn get_packet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PacketView>, ApiError> {
    let packet = state
        .packets
        .get_by_id(&id)
        .await
        .map_err(ApiError::context("Error getting packet"))?;

    Ok(Json(packet))
}

#[utoipa::path(
    put,
    path = "/api/packets/{id}",
    tag = "packets",
    params(("id" = String, Path, description = "Packet id")),
    request_body = PacketRequest,
    responses(
        (status = 200, description = "Packet updated", body = PacketView),
        (status = 400, description = "Invalid packet", body = ErrorBody),
        (status = 404, description = "Packet not found", body = ErrorBody)
    )
)]
pub async fn update_packet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<PacketRequest>, JsonRejection>,
) -> Result<Json<PacketView>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::from_rejection(e, "Error updating packet"))?;

    let packet = state
        .packets
        .update(&id, request)
        .await
        .map_err(ApiError::context("Error updating packet"))?;

    Ok(Json(packet))
}

#[utoipa::path(
    delete,
    path = "/api/packets/{id}",
    tag = "packets",
    params(("id" = String, Path, description = "Packet id")),
    responses(
        (status = 200, description = "The deleted packet", body = Packet),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "Packet not found", body = ErrorBody)
    )
)]
pub async fn delete_packet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Packet>, ApiError> {
    let packet = state
        .packets
        .delete(&id)
        .await
        .map_err(ApiError::context("Error deleting packet"))?;

    Ok(Json(packet))
}

#[utoipa::path(
    post,
    path = "/api/packets/{id}/categories/{categoryId}",
    tag = "packets",
    params(
        ("id" = String, Path, description = "Packet id"),
        ("categoryId" = String, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "The packet with the category attached", body = PacketView),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "Packet or category not found", body = ErrorBody)
    )
)]
pub async fn add_category_to_packet(
    State(state): State<Arc<AppState>>,
    Path((id, category_id)): Path<(String, String)>,
) -> Result<Json<PacketView>, ApiError> {
    let packet = state
        .packets
        .add_category(&id, &category_id)
        .await
        .map_err(ApiError::context("Error adding category to packet"))?;

    Ok(Json(packet))
}

#[utoipa::path(
    delete,
    path = "/api/packets/{id}/categories/{categoryId}",
    tag = "packets",
    params(
        ("id" = String, Path, description = "Packet id"),
        ("categoryId" = String, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "The packet without the category", body = PacketView),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "Packet not found", body = ErrorBody)
    )
)]
pub async fn remove_category_from_packet(
    State(state): State<Arc<AppState>>,
    Path((id, category_id)): Path<(String, String)>,
) -> Result<Json<PacketView>, ApiError> {
    let packet = state
        .packets
        .remove_category(&id, &category_id)
        .await
        .map_err(ApiError::context("Error removing category from packet"))?;

    Ok(Json(packet))
}

#[utoipa::path(
    get,
    path = "/api/packets/search/category/{categoryId}",
    tag = "packets",
    params(
        ("categoryId" = String, Path, description = "Category id"),
        PageQuery
    ),
    responses(
        (status = 200, description = "A page of packets in the category", body = PacketPage),
        (status = 400, description = "Malformed id", body = ErrorBody)
    )
)]
pub async fn search_packets_by_category(
    State(state): State<Arc<AppState>>,
    Path(category_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PacketPage>, ApiError> {
    let page = state
        .packets
        .search_by_category(&category_id, PageRequest::from(&query))
        .await
        .map_err(ApiError::context("Error searching packets by category"))?;

    Ok(Json(page.into()))
}
