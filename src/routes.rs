use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::category_handlers::*;
use crate::category_service::CategoryService;
use crate::doc::ApiDoc;
use crate::packet_handlers::*;
use crate::packet_service::PacketService;
use crate::storage::Database;
use crate::user_handlers::*;
use crate::user_service::UserService;

/// Services shared by every request. They hold no per-request state.
pub struct AppState {
    pub users: UserService,
    pub packets: PacketService,
    pub categories: CategoryService,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            users: UserService::new(db.clone()),
            packets: PacketService::new(db.clone()),
            categories: CategoryService::new(db),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/users", post(create_user).get(list_users))
        .route(
            "/api/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/users/:id/deactivate", put(deactivate_user))
        .route(
            "/api/users/:id/packets",
            get(get_user_packets).post(add_packet_to_user),
        )
        .route("/api/packets", post(create_packet).get(list_packets))
        .route(
            "/api/packets/search/category/:categoryId",
            get(search_packets_by_category),
        )
        .route(
            "/api/packets/:id",
            get(get_packet).put(update_packet).delete(delete_packet),
        )
        .route(
            "/api/packets/:id/categories/:categoryId",
            post(add_category_to_packet).delete(remove_category_from_packet),
        )
        .route("/api/categories", post(create_category).get(list_categories))
        .route(
            "/api/categories/:id",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
