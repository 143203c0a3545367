mod mocks;

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use common::config::EmailConfig;
use mocks::{sample_item, test_shipping_address, RecordingTransport, SlowTransport};
use storefront::error::StoreError;
use storefront::model::{NotificationKind, Order, OrderStatus};
use storefront::notification::{BrevoTransport, EmailTransport, NotificationDispatcher};

fn sample_order() -> Order {
    Order {
        id: Uuid::new_v4(),
        items: vec![sample_item(1000, 2)],
        shipping_address: test_shipping_address(),
        items_price: 2000,
        shipping_price: 200,
        total_price: 2200,
        status: OrderStatus::Processing,
        tracking_id: None,
        created_at: chrono::Utc::now(),
    }
}

#[tokio::test]
async fn notify_delivers_once_and_returns_the_message_id() {
    let transport = RecordingTransport::new();
    let dispatcher = NotificationDispatcher::new(transport.clone(), Duration::from_millis(250));
    let order = sample_order();

    let message_id = dispatcher
        .notify(&order, NotificationKind::Shipped)
        .await
        .unwrap();

    assert_eq!(message_id, "msg-1");
    assert_eq!(transport.sent_count(), 1);
    let sent = transport.sent.lock().unwrap();
    let (to, message) = &sent[0];
    assert_eq!(to, &order.shipping_address.email);
    assert_eq!(message.subject, "Your Order Has Been Shipped - WatchCraft");
}

#[tokio::test]
async fn notify_surfaces_provider_failure() {
    let transport = RecordingTransport::failing();
    let dispatcher = NotificationDispatcher::new(transport, Duration::from_millis(250));

    let result = dispatcher
        .notify(&sample_order(), NotificationKind::Delivered)
        .await;

    assert!(matches!(result, Err(StoreError::Delivery(_))));
}

#[tokio::test]
async fn best_effort_swallows_provider_failure() {
    let transport = RecordingTransport::failing();
    let dispatcher = NotificationDispatcher::new(transport.clone(), Duration::from_millis(250));

    // Must not panic or propagate anything.
    dispatcher
        .notify_best_effort(&sample_order(), NotificationKind::OrderPlaced)
        .await;

    assert_eq!(transport.sent_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn slow_transport_hits_the_hard_timeout() {
    let dispatcher = NotificationDispatcher::new(Arc::new(SlowTransport), Duration::from_millis(50));

    let result = dispatcher
        .notify(&sample_order(), NotificationKind::Processing)
        .await;

    match result {
        Err(StoreError::Delivery(reason)) => assert!(reason.contains("timed out")),
        other => panic!("expected delivery timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_api_key_is_a_delivery_failure_not_a_panic() {
    let transport = BrevoTransport::new(EmailConfig::default());
    let order = sample_order();
    let message = storefront::notification::render(&order, NotificationKind::OrderPlaced);

    let result = transport.send(&order.shipping_address.email, &message).await;

    match result {
        Err(StoreError::Delivery(reason)) => assert!(reason.contains("configuration")),
        other => panic!("expected delivery failure, got {other:?}"),
    }
}
