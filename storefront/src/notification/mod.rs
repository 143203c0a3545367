pub mod templates;

pub use templates::{render, EmailMessage};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use common::config::EmailConfig;

use crate::error::StoreError;
use crate::model::{NotificationKind, Order};

/// Opaque email capability: one attempt, no retry. Returns the provider's
/// message id on success.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, to: &str, message: &EmailMessage) -> Result<String, StoreError>;
}

/// Brevo transactional email API client.
pub struct BrevoTransport {
    client: reqwest::Client,
    config: EmailConfig,
}

#[derive(Deserialize)]
struct BrevoResponse {
    #[serde(rename = "messageId", default)]
    message_id: Option<String>,
}

impl BrevoTransport {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl EmailTransport for BrevoTransport {
    async fn send(&self, to: &str, message: &EmailMessage) -> Result<String, StoreError> {
        // A missing key is a configuration problem reported as a delivery
        // failure, never a startup failure.
        if self.config.api_key.is_empty() {
            error!("Missing Brevo API key. Check BREVO_API_KEY env variable.");
            return Err(StoreError::delivery("Email configuration missing"));
        }

        let reply_to = self
            .config
            .reply_to_email
            .as_deref()
            .unwrap_or(&self.config.sender_email);
        let body = json!({
            "subject": message.subject,
            "htmlContent": message.html_body,
            "sender": {
                "name": self.config.sender_name,
                "email": self.config.sender_email,
            },
            "to": [{ "email": to }],
            "replyTo": {
                "name": format!("{} Support", self.config.sender_name),
                "email": reply_to,
            },
        });

        info!("Attempting to send email to: {}", to);
        let response = self
            .client
            .post(&self.config.api_url)
            .header("api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Delivery(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(StoreError::Delivery(format!(
                "provider returned {status}: {detail}"
            )));
        }

        let parsed: BrevoResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Delivery(e.to_string()))?;
        let message_id = parsed.message_id.unwrap_or_default();
        info!("Email sent successfully. Message ID: {}", message_id);
        Ok(message_id)
    }
}

/// Renders the template for an order event and attempts delivery once,
/// bounded by a hard timeout so a slow provider can never hang the mutation
/// that triggered it.
pub struct NotificationDispatcher {
    transport: Arc<dyn EmailTransport>,
    send_timeout: Duration,
}

impl NotificationDispatcher {
    pub fn new(transport: Arc<dyn EmailTransport>, send_timeout: Duration) -> Self {
        Self {
            transport,
            send_timeout,
        }
    }

    /// Single delivery attempt; the error carries the provider's reason or
    /// the timeout. Callers on mutation paths must go through
    /// [`notify_best_effort`](Self::notify_best_effort) instead.
    pub async fn notify(
        &self,
        order: &Order,
        kind: NotificationKind,
    ) -> Result<String, StoreError> {
        let message = templates::render(order, kind);
        let to = order.shipping_address.email.as_str();
        match tokio::time::timeout(self.send_timeout, self.transport.send(to, &message)).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::delivery(format!(
                "email send timed out after {:?}",
                self.send_timeout
            ))),
        }
    }

    /// Attempt delivery and swallow the outcome. Failure is logged and
    /// discarded; it never propagates to the order mutation that asked for
    /// the notification.
    pub async fn notify_best_effort(&self, order: &Order, kind: NotificationKind) {
        match self.notify(order, kind).await {
            Ok(message_id) => {
                info!(order_id = %order.id, kind = ?kind, message_id, "Notification sent");
            }
            Err(e) => {
                error!(order_id = %order.id, kind = ?kind, error = %e, "Failed to send notification");
            }
        }
    }
}
