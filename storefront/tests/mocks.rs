use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use storefront::error::StoreError;
use storefront::executable_utils::AppState;
use storefront::lifecycle::OrderLifecycle;
use storefront::model::{OrderDraft, OrderItem, ShippingAddress};
use storefront::notification::{EmailMessage, EmailTransport, NotificationDispatcher};
use storefront::storage::MemoryStorage;

/// Transport that records every send and can be flipped into a failing
/// mode, so tests can assert both delivery counts and failure isolation.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<(String, EmailMessage)>>,
    pub fail: AtomicBool,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let transport = Self::default();
        transport.fail.store(true, Ordering::SeqCst);
        Arc::new(transport)
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last_subject(&self) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .last()
            .map(|(_, message)| message.subject.clone())
    }
}

#[async_trait]
impl EmailTransport for RecordingTransport {
    async fn send(&self, to: &str, message: &EmailMessage) -> Result<String, StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::delivery("simulated provider outage"));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push((to.to_string(), message.clone()));
        Ok(format!("msg-{}", sent.len()))
    }
}

/// Transport that never answers within any reasonable deadline.
pub struct SlowTransport;

#[async_trait]
impl EmailTransport for SlowTransport {
    async fn send(&self, _to: &str, _message: &EmailMessage) -> Result<String, StoreError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok("never".to_string())
    }
}

pub fn test_shipping_address() -> ShippingAddress {
    ShippingAddress {
        name: "Asha Rao".to_string(),
        email: common::test_helpers::generate_unique_email(),
        phone: "555-0100".to_string(),
        address: "12 Clock Lane".to_string(),
        city: "Pune".to_string(),
        state: "MH".to_string(),
        zip_code: "411001".to_string(),
    }
}

pub fn sample_item(unit_price: i64, quantity: u32) -> OrderItem {
    OrderItem {
        product_id: Uuid::new_v4(),
        name: "Chronograph".to_string(),
        image: "/images/chrono.jpg".to_string(),
        unit_price,
        quantity,
    }
}

pub fn draft_with_items(items: Vec<OrderItem>, shipping_price: i64) -> OrderDraft {
    OrderDraft {
        items,
        shipping_address: test_shipping_address(),
        items_price: None,
        shipping_price,
        total_price: None,
    }
}

/// Build an AppState over in-memory storage and the given transport.
pub fn test_state(transport: Arc<dyn EmailTransport>) -> (AppState, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let lifecycle = OrderLifecycle::new(storage.clone());
    let timeout = Duration::from_millis(common::test_helpers::test_config().email.send_timeout_ms);
    let dispatcher = Arc::new(NotificationDispatcher::new(transport, timeout));
    let state = AppState::new(lifecycle, storage.clone(), storage.clone(), dispatcher);
    (state, storage)
}

pub async fn response_body_string(response: axum::response::Response) -> String {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    String::from_utf8(body_bytes.to_vec()).expect("Response body is not valid UTF-8")
}
