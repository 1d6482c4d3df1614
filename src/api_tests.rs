//! Request/response tests driving the full router.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::category_service::CategoryService;
use crate::packet_service::PacketService;
use crate::routes::{router, AppState};
use crate::storage::Database;
use crate::user_service::{UserService, TEST_BCRYPT_COST};

const MISSING_ID: &str = "65f1c2a9b3e4d5f6a7b8c9d0";

fn app() -> Router {
    let db = Arc::new(Database::in_memory());
    let state = AppState {
        users: UserService::with_cost(db.clone(), TEST_BCRYPT_COST),
        packets: PacketService::new(db.clone()),
        categories: CategoryService::new(db),
    };
    router(Arc::new(state))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_category(app: &Router, name: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/categories",
        Some(json!({ "name": name, "description": "x", "priority": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

async fn create_packet(app: &Router, name: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/packets",
        Some(json!({ "name": name, "description": "y", "status": "open" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

async fn create_user(app: &Router, name: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/users",
        Some(json!({
            "name": name,
            "email": format!("{}@example.com", name),
            "password": "secret",
            "phone": "600123123"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn category_packet_search_scenario() {
    let app = app();

    let category = create_category(&app, "fragile").await;
    assert_eq!(category["isActive"], true);
    assert_eq!(category["_id"].as_str().unwrap().len(), 24);
    let category_id = category["_id"].as_str().unwrap();

    let packet = create_packet(&app, "box").await;
    assert_eq!(packet["status"], "open");
    let packet_id = packet["_id"].as_str().unwrap();

    let uri = format!("/api/packets/{}/categories/{}", packet_id, category_id);
    let (status, attached) = send(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(attached["categories"], json!([category]));

    let (status, again) = send(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["categories"].as_array().unwrap().len(), 1);

    let (status, found) = send(
        &app,
        Method::GET,
        &format!("/api/packets/search/category/{}?page=1&limit=10", category_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["totalPackets"], 1);
    assert_eq!(found["totalPages"], 1);
    assert_eq!(found["currentPage"], 1);
    assert_eq!(found["data"][0]["name"], "box");
}

#[tokio::test]
async fn deleting_a_referenced_category_leaves_a_dangling_id() {
    let app = app();
    let category = create_category(&app, "fragile").await;
    let category_id = category["_id"].as_str().unwrap();
    let packet = create_packet(&app, "box").await;
    let packet_id = packet["_id"].as_str().unwrap();

    send(
        &app,
        Method::POST,
        &format!("/api/packets/{}/categories/{}", packet_id, category_id),
        None,
    )
    .await;

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/categories/{}", category_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, fetched) = send(
        &app,
        Method::GET,
        &format!("/api/packets/{}", packet_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["categories"], json!([category_id]));

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/categories/{}", category_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Category not found");
}

#[tokio::test]
async fn detaching_a_category() {
    let app = app();
    let category = create_category(&app, "fragile").await;
    let packet = create_packet(&app, "box").await;
    let uri = format!(
        "/api/packets/{}/categories/{}",
        packet["_id"].as_str().unwrap(),
        category["_id"].as_str().unwrap()
    );

    send(&app, Method::POST, &uri, None).await;
    let (status, detached) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detached["categories"], json!([]));

    let (status, again) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["categories"], json!([]));
}

#[tokio::test]
async fn list_pagination_and_defaults() {
    let app = app();
    for i in 0..5 {
        create_category(&app, &format!("c{}", i)).await;
    }

    let (status, page) = send(&app, Method::GET, "/api/categories?page=2&limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["totalCategories"], 5);
    assert_eq!(page["totalPages"], 3);
    assert_eq!(page["currentPage"], 2);
    assert_eq!(page["data"][0]["name"], "c2");
    assert_eq!(page["data"][1]["name"], "c3");

    let (_, defaulted) = send(&app, Method::GET, "/api/categories?page=abc&limit=", None).await;
    assert_eq!(defaulted["currentPage"], 1);
    assert_eq!(defaulted["totalPages"], 1);
    assert_eq!(defaulted["data"].as_array().unwrap().len(), 5);

    let (status, empty) = send(&app, Method::GET, "/api/categories?page=7", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty["data"], json!([]));
}

#[tokio::test]
async fn category_validation_failures() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/categories",
        Some(json!({ "name": "fragile", "description": "x", "priority": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Error creating category");
    assert!(body["error"].as_str().unwrap().contains("priority"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/categories",
        Some(json!({ "description": "x", "priority": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("name"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/categories",
        Some(json!("not an object")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Error creating category");

    let (status, _) = send(&app, Method::GET, "/api/categories/not-an-id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn category_replace_and_missing_ids() {
    let app = app();
    let category = create_category(&app, "fragile").await;
    let uri = format!("/api/categories/{}", category["_id"].as_str().unwrap());

    let (status, replaced) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "name": "heavy", "description": "z", "priority": 4, "isActive": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["name"], "heavy");
    assert_eq!(replaced["isActive"], false);
    assert_eq!(replaced["_id"], category["_id"]);

    let missing = format!("/api/categories/{}", MISSING_ID);
    let body = json!({ "name": "a", "description": "b", "priority": 0 });
    assert_eq!(send(&app, Method::PUT, &missing, Some(body)).await.0, StatusCode::NOT_FOUND);
    assert_eq!(send(&app, Method::DELETE, &missing, None).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn packet_update_and_delete_use_404_for_missing() {
    let app = app();
    let packet = create_packet(&app, "box").await;
    let uri = format!("/api/packets/{}", packet["_id"].as_str().unwrap());

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "status": "shipped" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "shipped");
    assert_eq!(updated["name"], "box");

    let (status, deleted) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["name"], "box");

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Packet not found");
    assert_eq!(send(&app, Method::PUT, &uri, Some(json!({}))).await.0, StatusCode::NOT_FOUND);
    assert_eq!(send(&app, Method::DELETE, &uri, None).await.0, StatusCode::NOT_FOUND);

    let (_, list) = send(&app, Method::GET, "/api/packets", None).await;
    assert_eq!(list["totalPackets"], 0);
}

#[tokio::test]
async fn user_lifecycle_with_soft_delete() {
    let app = app();
    let user = create_user(&app, "ana").await;
    assert!(user.get("password").is_none());
    assert_eq!(user["available"], true);
    assert_eq!(user["email"], "ana@example.com");
    let uri = format!("/api/users/{}", user["_id"].as_str().unwrap());

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "phone": "699000000" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["phone"], "699000000");

    let (status, deactivated) = send(&app, Method::PUT, &format!("{}/deactivate", uri), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deactivated["available"], false);

    assert_eq!(send(&app, Method::GET, &uri, None).await.0, StatusCode::NOT_FOUND);
    let (_, list) = send(&app, Method::GET, "/api/users", None).await;
    assert_eq!(list["totalUsers"], 0);
    assert_eq!(list["data"], json!([]));

    // delete does not filter on availability, so the record is still there
    let (status, deleted) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["available"], false);
    assert_eq!(send(&app, Method::DELETE, &uri, None).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_rejects_invalid_email() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({ "name": "ana", "email": "ana", "password": "p", "phone": "1" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Error creating user");
    assert_eq!(body["error"], "ana is not a valid email!");
}

#[tokio::test]
async fn user_packet_relationship() {
    let app = app();
    let user = create_user(&app, "ana").await;
    let packet = create_packet(&app, "box").await;
    let uri = format!("/api/users/{}/packets", user["_id"].as_str().unwrap());

    let (status, body) = send(&app, Method::POST, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Packet ID is required");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/users/{}/packets", MISSING_ID),
        Some(json!({ "packetId": packet["_id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    for _ in 0..2 {
        let (status, updated) =
            send(&app, Method::POST, &uri, Some(json!({ "packetId": packet["_id"] }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["packets"], json!([packet["_id"]]));
    }

    let (status, owned) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(owned.as_array().unwrap().len(), 1);
    assert_eq!(owned[0]["name"], "box");

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/users/{}/packets", MISSING_ID),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn serves_the_openapi_document() {
    let app = app();
    let (status, doc) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/packets/{id}/categories/{categoryId}"].is_object());
}
