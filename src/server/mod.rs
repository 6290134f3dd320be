//! HTTP exposure for the CRM core
//!
//! A thin axum layer over the query resolvers and mutation handlers in
//! [`crate::api`]. The router holds only the shared store; all semantics
//! live below in the core. Errors convert to JSON responses through
//! [`crate::core::CrmError`]'s `IntoResponse`.

pub mod params;

use crate::api;
use crate::core::error::CrmError;
use crate::core::store::CrmStore;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use params::{ListParams, PaginatedResponse};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CrmStore>,
}

/// Build the full API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/customers", get(list_customers).post(create_customer))
        .route("/customers/bulk", post(bulk_create_customers))
        .route("/products", get(list_products).post(create_product))
        .route("/products/restock-low", post(restock_low_products))
        .route("/orders", get(list_orders).post(create_order))
        .route(
            "/orders/{id}/recalculate-total",
            post(recalculate_order_total),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the API with graceful shutdown on SIGINT/SIGTERM
pub async fn serve(state: AppState, addr: &str) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", error);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => tracing::error!("Failed to install SIGTERM handler: {}", error),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C signal, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM signal, shutting down"),
    }
}

// === Handlers ===

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "crm-rs"
    }))
}

async fn list_customers(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, CrmError> {
    let filter = params.filter_value()?;
    let order = params.order_value();
    let rows = api::all_customers(state.store.as_ref(), filter.as_ref(), order.as_ref()).await?;
    let page = PaginatedResponse::paginate(rows, &params);
    Ok(Json(json!(page)))
}

async fn create_customer(
    State(state): State<AppState>,
    Json(input): Json<Value>,
) -> Result<Json<Value>, CrmError> {
    let payload = api::create_customer(state.store.as_ref(), &input).await?;
    Ok(Json(json!(payload)))
}

async fn bulk_create_customers(
    State(state): State<AppState>,
    Json(inputs): Json<Vec<Value>>,
) -> Result<Json<Value>, CrmError> {
    let payload = api::bulk_create_customers(state.store.as_ref(), &inputs).await?;
    Ok(Json(json!(payload)))
}

async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, CrmError> {
    let filter = params.filter_value()?;
    let order = params.order_value();
    let rows = api::all_products(state.store.as_ref(), filter.as_ref(), order.as_ref()).await?;
    let page = PaginatedResponse::paginate(rows, &params);
    Ok(Json(json!(page)))
}

async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<Value>,
) -> Result<Json<Value>, CrmError> {
    let product = api::create_product(state.store.as_ref(), &input).await?;
    Ok(Json(json!({ "product": product })))
}

async fn restock_low_products(State(state): State<AppState>) -> Result<Json<Value>, CrmError> {
    let payload = api::update_low_stock_products(state.store.as_ref()).await?;
    Ok(Json(json!(payload)))
}

async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, CrmError> {
    let filter = params.filter_value()?;
    let order = params.order_value();
    let rows = api::all_orders(state.store.as_ref(), filter.as_ref(), order.as_ref()).await?;
    let page = PaginatedResponse::paginate(rows, &params);
    Ok(Json(json!(page)))
}

async fn create_order(
    State(state): State<AppState>,
    Json(input): Json<Value>,
) -> Result<Json<Value>, CrmError> {
    let detail = api::create_order(state.store.as_ref(), &input).await?;
    Ok(Json(json!({ "order": detail })))
}

async fn recalculate_order_total(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, CrmError> {
    let order =
        api::recalculate_order_total(state.store.as_ref(), &Value::String(id)).await?;
    Ok(Json(json!({ "order": order })))
}
