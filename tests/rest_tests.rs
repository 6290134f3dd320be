//! HTTP-level tests: routing, status codes, and the JSON envelopes,
//! exercised through an in-process test server.

use axum::http::StatusCode;
use crm::server::{AppState, build_router};
use crm::storage::InMemoryStore;
use serde_json::{Value, json};
use std::sync::Arc;

fn test_server() -> axum_test::TestServer {
    let state = AppState {
        store: Arc::new(InMemoryStore::new()),
    };
    axum_test::TestServer::new(build_router(state))
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = test_server();
    let response = server.get("/health").await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["service"], json!("crm-rs"));
}

#[tokio::test]
async fn test_create_customer_over_http() {
    let server = test_server();
    let response = server
        .post("/customers")
        .json(&json!({ "name": "Alice", "email": "alice@example.com" }))
        .await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["message"], json!("Customer created successfully."));
    assert_eq!(body["customer"]["name"], json!("Alice"));
    assert_eq!(body["customer"]["id"], json!(1));
}

#[tokio::test]
async fn test_validation_failure_maps_to_400() {
    let server = test_server();
    let response = server
        .post("/customers")
        .json(&json!({ "name": "Bob", "email": "bob@example.com", "phone": "nope" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["code"], json!("VALIDATION_ERROR"));
    assert_eq!(
        body["message"],
        json!("Phone must match +1234567890 or 123-456-7890.")
    );
    assert_eq!(body["details"]["field"], json!("phone"));
}

#[tokio::test]
async fn test_missing_reference_maps_to_404() {
    let server = test_server();
    let response = server
        .post("/orders")
        .json(&json!({ "customer_id": 99, "product_ids": [1] }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["code"], json!("NOT_FOUND"));
    assert_eq!(body["message"], json!("Customer with id 99 not found."));
}

#[tokio::test]
async fn test_bulk_endpoint_reports_partial_failures() {
    let server = test_server();
    let response = server
        .post("/customers/bulk")
        .json(&json!([
            { "name": "One", "email": "one@example.com" },
            { "name": "Two", "email": "one@example.com" },
        ]))
        .await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["customers"].as_array().unwrap().len(), 1);
    assert_eq!(body["errors"], json!(["Row 2: Email already exists."]));
}

#[tokio::test]
async fn test_list_products_with_filter_order_and_pagination() {
    let server = test_server();
    for (name, price) in [("Cable", "4.00"), ("Monitor", "120.00"), ("Dock", "80.00")] {
        server
            .post("/products")
            .json(&json!({ "name": name, "price": price, "stock": 5 }))
            .await
            .assert_status(StatusCode::OK);
    }

    let response = server
        .get("/products")
        .add_query_param("filter", r#"{"price_gte":"50.00"}"#)
        .add_query_param("order_by", "-price")
        .add_query_param("page", "1")
        .add_query_param("limit", "10")
        .await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Monitor", "Dock"]);
    assert_eq!(body["pagination"]["total"], json!(2));
    assert_eq!(body["pagination"]["total_pages"], json!(1));
}

#[tokio::test]
async fn test_bad_filter_json_is_a_filter_error() {
    let server = test_server();
    let response = server
        .get("/customers")
        .add_query_param("filter", "{broken")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["code"], json!("FILTER_VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_unknown_filter_field_rejected_over_http() {
    let server = test_server();
    let response = server
        .get("/products")
        .add_query_param("filter", r#"{"colour":"red"}"#)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["message"], json!("Unknown filter field 'colour'"));
}

#[tokio::test]
async fn test_order_flow_over_http() {
    let server = test_server();
    server
        .post("/customers")
        .json(&json!({ "name": "Alice", "email": "alice@example.com" }))
        .await
        .assert_status(StatusCode::OK);
    server
        .post("/products")
        .json(&json!({ "name": "Laptop", "price": "999.99", "stock": 4 }))
        .await
        .assert_status(StatusCode::OK);

    let response = server
        .post("/orders")
        .json(&json!({ "customer_id": 1, "product_ids": [1] }))
        .await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["order"]["total_amount"], json!("999.99"));
    assert_eq!(body["order"]["customer"]["name"], json!("Alice"));

    let list = server.get("/orders").await;
    list.assert_status(StatusCode::OK);
    let listed: Value = list.json();
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_restock_endpoint() {
    let server = test_server();
    server
        .post("/products")
        .json(&json!({ "name": "Cable", "price": "4.00", "stock": 2 }))
        .await
        .assert_status(StatusCode::OK);
    server
        .post("/products")
        .json(&json!({ "name": "Monitor", "price": "120.00", "stock": 30 }))
        .await
        .assert_status(StatusCode::OK);

    let response = server.post("/products/restock-low").await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["message"], json!("Updated 1 products with low stock."));
    assert_eq!(body["products"][0]["stock"], json!(12));
}

#[tokio::test]
async fn test_recalculate_total_endpoint() {
    let server = test_server();
    server
        .post("/customers")
        .json(&json!({ "name": "Alice", "email": "alice@example.com" }))
        .await
        .assert_status(StatusCode::OK);
    server
        .post("/products")
        .json(&json!({ "name": "Laptop", "price": "10.00", "stock": 4 }))
        .await
        .assert_status(StatusCode::OK);
    server
        .post("/orders")
        .json(&json!({ "customer_id": 1, "product_ids": [1] }))
        .await
        .assert_status(StatusCode::OK);

    let response = server.post("/orders/1/recalculate-total").await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["order"]["total_amount"], json!("10.00"));

    let missing = server.post("/orders/99/recalculate-total").await;
    missing.assert_status(StatusCode::NOT_FOUND);
}
