//! OpenAPI document for the REST API, served by Swagger UI at `/api-docs`.

use utoipa::OpenApi;

use crate::category_models::{Category, CategoryPage, CategoryRequest};
use crate::error::ErrorBody;
use crate::packet_models::{CategoryRef, Packet, PacketPage, PacketRequest, PacketView};
use crate::user_models::{
    AddPacketRequest, CreateUserRequest, UpdateUserRequest, UserPage, UserView,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Packet service API",
        description = "CRUD over users, packets and categories."
    ),
    paths(
        crate::user_handlers::create_user,
        crate::user_handlers::list_users,
        crate::user_handlers::get_user,
        crate::user_handlers::update_user,
        crate::user_handlers::delete_user,
        crate::user_handlers::deactivate_user,
        crate::user_handlers::get_user_packets,
        crate::user_handlers::add_packet_to_user,
        crate::packet_handlers::create_packet,
        crate::packet_handlers::list_packets,
        crate::packet_handlers::get_packet,
        crate::packet_handlers::update_packet,
        crate::packet_handlers::delete_packet,
        crate::packet_handlers::add_category_to_packet,
        crate::packet_handlers::remove_category_from_packet,
        crate::packet_handlers::search_packets_by_category,
        crate::category_handlers::create_category,
        crate::category_handlers::list_categories,
        crate::category_handlers::get_category,
        crate::category_handlers::update_category,
        crate::category_handlers::delete_category,
    ),
    components(schemas(
        UserView,
        UserPage,
        CreateUserRequest,
        UpdateUserRequest,
        AddPacketRequest,
        Packet,
        PacketView,
        PacketPage,
        PacketRequest,
        CategoryRef,
        Category,
        CategoryPage,
        CategoryRequest,
        ErrorBody,
    )),
    tags(
        (name = "users", description = "Users and the packets they own"),
        (name = "packets", description = "Packets and their categories"),
        (name = "categories", description = "Packet categories")
    )
)]
pub struct ApiDoc;
