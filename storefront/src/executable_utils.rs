use clap::Parser;
use serde::{Deserialize, Serialize};
use std::{error::Error, sync::Arc};

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use http::header;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use common::config::{BackendConfig, Config};

use crate::{
    error::StoreError,
    lifecycle::OrderLifecycle,
    model::{NotificationKind, OrderDraft, OrderStatus, ProductDraft, ProductPatch},
    notification::NotificationDispatcher,
    storage::{OrderStorage, ProductStorage},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to config file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: String,
}

pub fn initialize_executable() -> Result<Config, Box<dyn Error + Send + Sync>> {
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    println!("Loading config from: {}", args.config);
    let config = Config::load(&args.config)?;

    Ok(config)
}

pub fn initialize_tracing(log_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(log_level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[derive(Clone)]
pub struct AppState {
    pub lifecycle: OrderLifecycle,
    pub orders: Arc<dyn OrderStorage>,
    pub products: Arc<dyn ProductStorage>,
    pub dispatcher: Arc<NotificationDispatcher>,
}

impl AppState {
    pub fn new(
        lifecycle: OrderLifecycle,
        orders: Arc<dyn OrderStorage>,
        products: Arc<dyn ProductStorage>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            lifecycle,
            orders,
            products,
            dispatcher,
        }
    }
}

fn error_response(e: StoreError) -> Response {
    let status = match &e {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Validation(_) => StatusCode::BAD_REQUEST,
        StoreError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        StoreError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string()).into_response()
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK").into_response()
}

// ---------------------------------------------------------------------------
// Customer order routes
// ---------------------------------------------------------------------------

pub async fn create_order(
    State(state): State<AppState>,
    Json(draft): Json<OrderDraft>,
) -> Response {
    match state.lifecycle.create_order(draft).await {
        Ok(order) => {
            // Best-effort confirmation; the order stands whatever happens
            // to the email.
            state
                .dispatcher
                .notify_best_effort(&order, NotificationKind::OrderPlaced)
                .await;
            (StatusCode::CREATED, Json(order)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create order");
            error_response(e)
        }
    }
}

#[derive(Deserialize)]
pub struct MineQuery {
    pub email: String,
}

pub async fn my_orders(
    State(state): State<AppState>,
    Query(query): Query<MineQuery>,
) -> Response {
    match state.orders.orders_for_email(&query.email).await {
        Ok(orders) => Json(orders).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list customer orders");
            error_response(e)
        }
    }
}

pub async fn get_order(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.orders.get_order(id).await {
        Ok(order) => Json(order).into_response(),
        Err(e) => error_response(e),
    }
}

// ---------------------------------------------------------------------------
// Admin order routes
// ---------------------------------------------------------------------------

pub async fn admin_orders(State(state): State<AppState>) -> Response {
    match state.orders.all_orders(None).await {
        Ok(orders) => Json(orders).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list orders");
            error_response(e)
        }
    }
}

pub async fn admin_recent_orders(State(state): State<AppState>) -> Response {
    match state.orders.all_orders(Some(5)).await {
        Ok(orders) => Json(orders).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list recent orders");
            error_response(e)
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_orders: u64,
    pub total_products: u64,
    pub total_revenue: i64,
}

pub async fn admin_stats(State(state): State<AppState>) -> Response {
    let totals = async {
        let total_orders = state.orders.count_orders().await?;
        let total_products = state.products.count_products().await?;
        let total_revenue = state
            .orders
            .all_orders(None)
            .await?
            .iter()
            .map(|order| order.total_price)
            .sum();
        Ok::<_, StoreError>(AdminStats {
            total_orders,
            total_products,
            total_revenue,
        })
    };
    match totals.await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to compute dashboard stats");
            error_response(e)
        }
    }
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: OrderStatus,
}

pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusRequest>,
) -> Response {
    match state.lifecycle.set_status(id, request.status).await {
        Ok(update) => {
            // Notify only on a real transition; re-setting the same status
            // stays silent.
            if update.changed {
                state
                    .dispatcher
                    .notify_best_effort(&update.order, NotificationKind::for_status(request.status))
                    .await;
            }
            Json(update.order).into_response()
        }
        Err(e) => {
            tracing::error!(order_id = %id, error = %e, "Failed to update order status");
            error_response(e)
        }
    }
}

#[derive(Deserialize)]
pub struct TrackingRequest {
    #[serde(rename = "trackingId")]
    pub tracking_id: String,
}

pub async fn update_order_tracking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TrackingRequest>,
) -> Response {
    let tracking_id = request.tracking_id;
    match state.lifecycle.set_tracking(id, tracking_id.clone()).await {
        Ok(update) => {
            if update.changed && !tracking_id.is_empty() {
                state
                    .dispatcher
                    .notify_best_effort(&update.order, NotificationKind::TrackingUpdated)
                    .await;
            }
            Json(update.order).into_response()
        }
        Err(e) => {
            tracing::error!(order_id = %id, error = %e, "Failed to update order tracking");
            error_response(e)
        }
    }
}

#[derive(Deserialize, Default)]
pub struct NotifyRequest {
    pub kind: Option<String>,
}

#[derive(Serialize)]
pub struct NotifyResponse {
    pub message: String,
    #[serde(rename = "messageId")]
    pub message_id: String,
}

/// Force a notification regardless of the changed-check. Unlike the
/// mutation routes, the delivery result is surfaced to the caller.
///
/// The body is optional; a kind override arrives as `{"kind": "..."}`.
/// A non-empty body that is not valid JSON is rejected, while the kind
/// value itself is parsed leniently like every caller-supplied kind.
pub async fn notify_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: axum::body::Bytes,
) -> Response {
    let order = match state.orders.get_order(id).await {
        Ok(order) => order,
        Err(e) => return error_response(e),
    };
    let request: NotifyRequest = if body.is_empty() {
        NotifyRequest::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(request) => request,
            Err(e) => {
                return error_response(StoreError::Validation(format!(
                    "malformed notify body: {e}"
                )))
            }
        }
    };
    let kind = request
        .kind
        .map(|raw| NotificationKind::parse_lenient(&raw))
        .unwrap_or_else(|| NotificationKind::for_status(order.status));

    match state.dispatcher.notify(&order, kind).await {
        Ok(message_id) => Json(NotifyResponse {
            message: "Notification sent successfully".to_string(),
            message_id,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(order_id = %id, error = %e, "Failed to send notification");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to send notification: {e}"),
            )
                .into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog routes
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default)]
pub struct ProductQuery {
    pub featured: Option<bool>,
    pub category: Option<String>,
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Response {
    match state.products.all_products().await {
        Ok(mut products) => {
            if let Some(featured) = query.featured {
                products.retain(|p| p.featured == featured);
            }
            if let Some(category) = &query.category {
                products.retain(|p| {
                    serde_json::to_value(p.category)
                        .map(|v| v == serde_json::Value::String(category.clone()))
                        .unwrap_or(false)
                });
            }
            Json(products).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list products");
            error_response(e)
        }
    }
}

pub async fn get_product(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.products.get_product(id).await {
        Ok(product) => Json(product).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(draft): Json<ProductDraft>,
) -> Response {
    let product = draft.into_product(Uuid::new_v4(), chrono::Utc::now());
    match state.products.insert_product(&product).await {
        Ok(()) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create product");
            error_response(e)
        }
    }
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ProductPatch>,
) -> Response {
    match state.products.update_product(id, &patch).await {
        Ok(product) => Json(product).into_response(),
        Err(e) => {
            tracing::error!(product_id = %id, error = %e, "Failed to update product");
            error_response(e)
        }
    }
}

pub async fn delete_product(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.products.delete_product(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

// ---------------------------------------------------------------------------
// Router and server loop
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    Router::new()
        .route("/api/orders", post(create_order))
        .route("/api/orders/mine", get(my_orders))
        .route("/api/orders/{id}", get(get_order))
        .route("/api/admin/orders", get(admin_orders))
        .route("/api/admin/orders/recent", get(admin_recent_orders))
        .route("/api/admin/stats", get(admin_stats))
        .route("/api/admin/orders/{id}/status", put(update_order_status))
        .route("/api/admin/orders/{id}/tracking", put(update_order_tracking))
        .route("/api/admin/orders/{id}/notify", post(notify_order))
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(
                    cors_origin
                        .parse::<header::HeaderValue>()
                        .unwrap_or(header::HeaderValue::from_static("*")),
                )
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn run_backend(
    config: BackendConfig,
    state: AppState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let app = build_router(state, &config.cors_origin);

    tracing::info!("Starting backend service at {}", config.server_address);
    let listener = tokio::net::TcpListener::bind(&config.server_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
