mod mocks;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use mocks::{draft_with_items, response_body_string, sample_item, test_state, RecordingTransport};
use storefront::executable_utils::{
    admin_stats, create_order, create_product, delete_product, get_order, get_product,
    my_orders, notify_order, update_order_status, update_order_tracking, update_product,
    MineQuery, StatusRequest, TrackingRequest,
};
use storefront::model::{Order, OrderStatus, Product, ProductDraft, ProductCategory};
use storefront::storage::OrderStorage;

async fn create_test_order(state: &storefront::executable_utils::AppState) -> Order {
    let response = create_order(
        State(state.clone()),
        Json(draft_with_items(vec![sample_item(1000, 2)], 200)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    serde_json::from_str(&response_body_string(response).await).unwrap()
}

#[tokio::test]
async fn create_order_persists_and_sends_confirmation() {
    let transport = RecordingTransport::new();
    let (state, storage) = test_state(transport.clone());

    let order = create_test_order(&state).await;

    assert_eq!(order.status, OrderStatus::Processing);
    assert_eq!(order.items_price, 2000);
    assert_eq!(order.total_price, 2200);
    assert_eq!(storage.count_orders().await.unwrap(), 1);
    assert_eq!(transport.sent_count(), 1);
    assert_eq!(
        transport.last_subject().unwrap(),
        "Order Confirmation - WatchCraft"
    );
}

#[tokio::test]
async fn empty_cart_is_rejected_with_no_side_effects() {
    let transport = RecordingTransport::new();
    let (state, storage) = test_state(transport.clone());

    let response = create_order(State(state), Json(draft_with_items(vec![], 200))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(storage.count_orders().await.unwrap(), 0);
    assert_eq!(transport.sent_count(), 0);
}

#[tokio::test]
async fn duplicate_submission_creates_two_orders_and_two_emails() {
    // No idempotency key: a double-click creates two distinct records.
    let transport = RecordingTransport::new();
    let (state, storage) = test_state(transport.clone());

    let first = create_test_order(&state).await;
    let second = create_test_order(&state).await;

    assert_ne!(first.id, second.id);
    assert_eq!(storage.count_orders().await.unwrap(), 2);
    assert_eq!(transport.sent_count(), 2);
}

#[tokio::test]
async fn status_transition_fires_exactly_one_matching_notification() {
    let transport = RecordingTransport::new();
    let (state, _) = test_state(transport.clone());
    let order = create_test_order(&state).await;
    let sends_before = transport.sent_count();

    let response = update_order_status(
        State(state.clone()),
        Path(order.id),
        Json(StatusRequest {
            status: OrderStatus::Shipped,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(transport.sent_count(), sends_before + 1);
    assert_eq!(
        transport.last_subject().unwrap(),
        "Your Order Has Been Shipped - WatchCraft"
    );

    // Shipped -> Shipped is a no-op and stays silent.
    let response = update_order_status(
        State(state),
        Path(order.id),
        Json(StatusRequest {
            status: OrderStatus::Shipped,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(transport.sent_count(), sends_before + 1);
}

#[tokio::test]
async fn tracking_update_fires_once_then_force_notify_fires_unconditionally() {
    let transport = RecordingTransport::new();
    let (state, _) = test_state(transport.clone());
    let order = create_test_order(&state).await;
    let sends_before = transport.sent_count();

    let response = update_order_tracking(
        State(state.clone()),
        Path(order.id),
        Json(TrackingRequest {
            tracking_id: "TRK123".to_string(),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(transport.sent_count(), sends_before + 1);
    assert!(transport
        .last_subject()
        .unwrap()
        .starts_with("Tracking Information Updated"));

    // Same value again: silent.
    let response = update_order_tracking(
        State(state.clone()),
        Path(order.id),
        Json(TrackingRequest {
            tracking_id: "TRK123".to_string(),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(transport.sent_count(), sends_before + 1);

    // Force-notify ignores the changed-check entirely.
    let response = notify_order(State(state), Path(order.id), axum::body::Bytes::new()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(transport.sent_count(), sends_before + 2);
}

#[tokio::test]
async fn notification_failure_never_blocks_the_mutation() {
    let transport = RecordingTransport::failing();
    let (state, storage) = test_state(transport.clone());
    let order = create_test_order(&state).await;

    let response = update_order_status(
        State(state.clone()),
        Path(order.id),
        Json(StatusRequest {
            status: OrderStatus::OutForDelivery,
        }),
    )
    .await;

    // The HTTP outcome and the stored record are untouched by the outage.
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        storage.get_order(order.id).await.unwrap().status,
        OrderStatus::OutForDelivery
    );
    assert_eq!(transport.sent_count(), 0);
}

#[tokio::test]
async fn force_notify_surfaces_delivery_failure() {
    let transport = RecordingTransport::failing();
    let (state, _) = test_state(transport);
    let order = create_test_order(&state).await;

    let response = notify_order(State(state), Path(order.id), axum::body::Bytes::new()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response_body_string(response).await;
    assert!(body.contains("Failed to send notification"));
}

#[tokio::test]
async fn force_notify_with_unknown_kind_falls_back_to_processing() {
    let transport = RecordingTransport::new();
    let (state, _) = test_state(transport.clone());
    let order = create_test_order(&state).await;

    let response = notify_order(
        State(state),
        Path(order.id),
        axum::body::Bytes::from(r#"{"kind":"somethingWeird"}"#),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        transport.last_subject().unwrap(),
        "Your Order is Being Processed - WatchCraft"
    );
}

#[tokio::test]
async fn force_notify_rejects_a_malformed_body() {
    let transport = RecordingTransport::new();
    let (state, _) = test_state(transport.clone());
    let order = create_test_order(&state).await;
    let sends_before = transport.sent_count();

    let response = notify_order(
        State(state),
        Path(order.id),
        axum::body::Bytes::from(r#"{"kind": "#),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(transport.sent_count(), sends_before);
}

#[tokio::test]
async fn hostile_prices_are_rejected_at_the_http_boundary() {
    let transport = RecordingTransport::new();
    let (state, storage) = test_state(transport.clone());

    let response = create_order(
        State(state.clone()),
        Json(draft_with_items(vec![sample_item(i64::MAX, 2)], 0)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = create_order(
        State(state),
        Json(draft_with_items(vec![sample_item(-500, 1)], 0)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(storage.count_orders().await.unwrap(), 0);
    assert_eq!(transport.sent_count(), 0);
}

#[tokio::test]
async fn unknown_order_is_not_found() {
    let (state, _) = test_state(RecordingTransport::new());

    let response = get_order(State(state.clone()), Path(Uuid::new_v4())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = update_order_status(
        State(state),
        Path(Uuid::new_v4()),
        Json(StatusRequest {
            status: OrderStatus::Shipped,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn my_orders_returns_only_the_requesting_identity() {
    let (state, _) = test_state(RecordingTransport::new());
    let mine = create_test_order(&state).await;
    let _other = create_test_order(&state).await;

    let response = my_orders(
        State(state),
        Query(MineQuery {
            email: mine.shipping_address.email.clone(),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let orders: Vec<Order> = serde_json::from_str(&response_body_string(response).await).unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, mine.id);
}

fn watch_draft(name: &str, price: i64) -> ProductDraft {
    serde_json::from_value(serde_json::json!({
        "name": name,
        "image": "/images/watch.jpg",
        "brand": "WatchCraft",
        "description": "A fine watch",
        "price": price,
        "category": "Luxury Watches",
    }))
    .unwrap()
}

#[tokio::test]
async fn product_crud_round_trip() {
    let (state, _) = test_state(RecordingTransport::new());

    let response = create_product(State(state.clone()), Json(watch_draft("Regatta", 250_000))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let product: Product = serde_json::from_str(&response_body_string(response).await).unwrap();
    assert_eq!(product.category, ProductCategory::LuxuryWatches);
    assert_eq!(product.movement, "Automatic");

    // Allow-listed patch: only the named fields change.
    let patch = serde_json::from_value(serde_json::json!({ "price": 199_000 })).unwrap();
    let response = update_product(State(state.clone()), Path(product.id), Json(patch)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Product = serde_json::from_str(&response_body_string(response).await).unwrap();
    assert_eq!(updated.price, 199_000);
    assert_eq!(updated.name, "Regatta");

    let response = delete_product(State(state.clone()), Path(product.id)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = get_product(State(state), Path(product.id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_stats_totals_orders_products_and_revenue() {
    let (state, _) = test_state(RecordingTransport::new());
    let _first = create_test_order(&state).await;
    let _second = create_test_order(&state).await;
    let response = create_product(State(state.clone()), Json(watch_draft("Diver", 80_000))).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = admin_stats(State(state)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let stats: serde_json::Value =
        serde_json::from_str(&response_body_string(response).await).unwrap();
    assert_eq!(stats["totalOrders"], 2);
    assert_eq!(stats["totalProducts"], 1);
    assert_eq!(stats["totalRevenue"], 4400);
}
