use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{FieldUpdate, Order, OrderDraft, OrderStatus};
use crate::storage::OrderStorage;

/// Applies order mutations against the order store and reports whether the
/// targeted field actually changed. Deciding whether that change warrants a
/// notification is the caller's business, which is what keeps a no-op
/// update from producing a duplicate email.
#[derive(Clone)]
pub struct OrderLifecycle {
    storage: Arc<dyn OrderStorage>,
}

impl OrderLifecycle {
    pub fn new(storage: Arc<dyn OrderStorage>) -> Self {
        Self { storage }
    }

    /// Validate a checkout draft and persist it as a `Processing` order.
    ///
    /// Prices are computed server-side from the item snapshot; client-echoed
    /// prices must agree or the draft is rejected before anything is
    /// persisted.
    pub async fn create_order(&self, draft: OrderDraft) -> Result<Order, StoreError> {
        if draft.items.is_empty() {
            return Err(StoreError::validation("No order items"));
        }
        if draft.items.iter().any(|item| item.quantity == 0) {
            return Err(StoreError::validation("Item quantity must be at least 1"));
        }
        if draft.items.iter().any(|item| item.unit_price < 0) {
            return Err(StoreError::validation("Item price must not be negative"));
        }
        if draft.shipping_price < 0 {
            return Err(StoreError::validation("Shipping price must not be negative"));
        }
        let address = &draft.shipping_address;
        let required = [
            ("name", &address.name),
            ("email", &address.email),
            ("phone", &address.phone),
            ("address", &address.address),
            ("city", &address.city),
            ("state", &address.state),
            ("zipCode", &address.zip_code),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(StoreError::Validation(format!(
                    "Shipping address field '{field}' is required"
                )));
            }
        }

        let items_price = draft
            .items
            .iter()
            .try_fold(0i64, |acc, item| {
                item.line_total().and_then(|line| acc.checked_add(line))
            })
            .ok_or_else(|| StoreError::validation("Order totals overflow"))?;
        let total_price = items_price
            .checked_add(draft.shipping_price)
            .ok_or_else(|| StoreError::validation("Order totals overflow"))?;
        if let Some(claimed) = draft.items_price {
            if claimed != items_price {
                return Err(StoreError::Validation(format!(
                    "Items price mismatch: claimed {claimed}, computed {items_price}"
                )));
            }
        }
        if let Some(claimed) = draft.total_price {
            if claimed != total_price {
                return Err(StoreError::Validation(format!(
                    "Total price mismatch: claimed {claimed}, computed {total_price}"
                )));
            }
        }

        let order = Order {
            id: Uuid::new_v4(),
            items: draft.items,
            shipping_address: draft.shipping_address,
            items_price,
            shipping_price: draft.shipping_price,
            total_price,
            status: OrderStatus::Processing,
            tracking_id: None,
            created_at: Utc::now(),
        };
        self.storage.insert_order(&order).await?;
        info!(order_id = %order.id, "Created order");
        Ok(order)
    }

    /// Set the lifecycle status. Load, capture the previous value, persist
    /// the new one; `changed` compares against whatever was read
    /// (last write wins, no optimistic locking).
    pub async fn set_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<FieldUpdate, StoreError> {
        let mut order = self.storage.get_order(id).await?;
        let previous = order.status;
        order.status = status;
        self.storage.save_order(&order).await?;
        debug!(
            order_id = %id,
            previous = previous.as_str(),
            new = status.as_str(),
            "Updated order status"
        );
        Ok(FieldUpdate {
            order,
            changed: previous != status,
        })
    }

    /// Set the carrier tracking id, independent of status.
    pub async fn set_tracking(
        &self,
        id: Uuid,
        tracking_id: String,
    ) -> Result<FieldUpdate, StoreError> {
        let mut order = self.storage.get_order(id).await?;
        let previous = order.tracking_id.clone();
        let new = Some(tracking_id);
        order.tracking_id = new.clone();
        self.storage.save_order(&order).await?;
        debug!(order_id = %id, "Updated order tracking id");
        Ok(FieldUpdate {
            order,
            changed: previous != new,
        })
    }
}
