use serde::Serialize;

use crate::model::{NotificationKind, Order};

/// A rendered transactional email, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub subject: String,
    pub html_body: String,
}

fn item_rows(order: &Order) -> String {
    order
        .items
        .iter()
        .map(|item| {
            format!(
                "<tr>\
                 <td style=\"padding: 8px; border: 1px solid #e2e8f0;\">{}</td>\
                 <td style=\"text-align: right; padding: 8px; border: 1px solid #e2e8f0;\">{}</td>\
                 <td style=\"text-align: right; padding: 8px; border: 1px solid #e2e8f0;\">Rs {}</td>\
                 </tr>",
                item.name, item.quantity, item.unit_price
            )
        })
        .collect()
}

fn shipping_block(order: &Order) -> String {
    let address = &order.shipping_address;
    format!(
        "{}<br>{}, {} {}",
        address.address, address.city, address.state, address.zip_code
    )
}

fn wrap(body: String) -> String {
    format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">{body}</div>"
    )
}

/// Render the template for an event kind. Pure and deterministic in
/// `(order, kind)`; never mutates the order. Each kind maps to exactly one
/// template.
pub fn render(order: &Order, kind: NotificationKind) -> EmailMessage {
    let number = order.order_number();
    let name = &order.shipping_address.name;
    let date = order.created_at.format("%-d/%-m/%Y");

    match kind {
        NotificationKind::OrderPlaced => EmailMessage {
            subject: "Order Confirmation - WatchCraft".to_string(),
            html_body: wrap(format!(
                "<h2 style=\"color: #1a365d;\">Thank You for Your Order #{number}</h2>\
                 <p>Dear {name},</p>\
                 <p>We're excited to confirm that we've received your order!</p>\
                 <div style=\"background-color: #f7fafc; padding: 15px; border-radius: 5px; margin: 20px 0;\">\
                 <h3 style=\"color: #2c5282; margin-top: 0;\">Order Summary:</h3>\
                 <p><strong>Order Number:</strong> #{number}</p>\
                 <p><strong>Order Date:</strong> {date}</p>\
                 <p><strong>Total Amount:</strong> Rs {total}</p>\
                 <h4 style=\"color: #2c5282; margin-top: 15px;\">Items Ordered:</h4>\
                 <table style=\"width: 100%; border-collapse: collapse;\">\
                 <tr style=\"background-color: #edf2f7;\">\
                 <th style=\"text-align: left; padding: 8px; border: 1px solid #e2e8f0;\">Item</th>\
                 <th style=\"text-align: right; padding: 8px; border: 1px solid #e2e8f0;\">Qty</th>\
                 <th style=\"text-align: right; padding: 8px; border: 1px solid #e2e8f0;\">Price</th>\
                 </tr>{rows}</table>\
                 <div style=\"margin-top: 15px;\">\
                 <p><strong>Shipping Address:</strong><br>{shipping}</p>\
                 </div></div>\
                 <p>We're preparing your order and will notify you once it ships. \
                 You can check your order status anytime by logging into your account.</p>\
                 <p>If you have any questions, please contact our customer service team.</p>\
                 <p>Best regards,<br>The WatchCraft Team</p>",
                total = order.total_price,
                rows = item_rows(order),
                shipping = shipping_block(order),
            )),
        },
        NotificationKind::Processing => EmailMessage {
            subject: "Your Order is Being Processed - WatchCraft".to_string(),
            html_body: wrap(format!(
                "<h2 style=\"color: #1a365d;\">Order Confirmation #{number}</h2>\
                 <p>Dear {name},</p>\
                 <p>Thank you for shopping with WatchCraft! We're currently processing your order.</p>\
                 <div style=\"background-color: #f7fafc; padding: 15px; border-radius: 5px; margin: 20px 0;\">\
                 <h3 style=\"color: #2c5282; margin-top: 0;\">Order Details:</h3>\
                 <p><strong>Order Number:</strong> #{number}</p>\
                 <p><strong>Order Date:</strong> {date}</p>\
                 <p><strong>Total Amount:</strong> Rs {total}</p>\
                 </div>\
                 <p>We'll send you another email when your order ships.</p>\
                 <p>Best regards,<br>The WatchCraft Team</p>",
                total = order.total_price,
            )),
        },
        NotificationKind::Shipped => EmailMessage {
            subject: "Your Order Has Been Shipped - WatchCraft".to_string(),
            html_body: wrap(format!(
                "<h2 style=\"color: #1a365d;\">Order Shipped #{number}</h2>\
                 <p>Dear {name},</p>\
                 <p>Great news! Your order has been shipped and is on its way to you.</p>\
                 <div style=\"background-color: #f7fafc; padding: 15px; border-radius: 5px; margin: 20px 0;\">\
                 <h3 style=\"color: #2c5282; margin-top: 0;\">Shipping Details:</h3>\
                 <p><strong>Order Number:</strong> #{number}</p>\
                 <p><strong>Tracking Number:</strong> {tracking}</p>\
                 <p><strong>Shipping Address:</strong><br>{shipping}</p>\
                 </div>\
                 <p>You can track your package using the tracking number above.</p>\
                 <p>Best regards,<br>The WatchCraft Team</p>",
                tracking = order
                    .tracking_id
                    .as_deref()
                    .unwrap_or("Will be updated soon"),
                shipping = shipping_block(order),
            )),
        },
        NotificationKind::OutForDelivery => EmailMessage {
            subject: "Your Order is Out for Delivery - WatchCraft".to_string(),
            html_body: wrap(format!(
                "<h2 style=\"color: #1a365d;\">Order Out for Delivery #{number}</h2>\
                 <p>Dear {name},</p>\
                 <p>Your order is out for delivery and should arrive today!</p>\
                 <div style=\"background-color: #f7fafc; padding: 15px; border-radius: 5px; margin: 20px 0;\">\
                 <h3 style=\"color: #2c5282; margin-top: 0;\">Delivery Details:</h3>\
                 <p><strong>Order Number:</strong> #{number}</p>\
                 <p><strong>Tracking Number:</strong> {tracking}</p>\
                 <p><strong>Delivery Address:</strong><br>{shipping}</p>\
                 </div>\
                 <p>Someone should be available to receive the package.</p>\
                 <p>Best regards,<br>The WatchCraft Team</p>",
                tracking = order.tracking_id.as_deref().unwrap_or("N/A"),
                shipping = shipping_block(order),
            )),
        },
        NotificationKind::Delivered => EmailMessage {
            subject: "Your Order Has Been Delivered - WatchCraft".to_string(),
            html_body: wrap(format!(
                "<h2 style=\"color: #1a365d;\">Order Delivered #{number}</h2>\
                 <p>Dear {name},</p>\
                 <p>Your order has been delivered! We hope you enjoy your new watch.</p>\
                 <div style=\"background-color: #f7fafc; padding: 15px; border-radius: 5px; margin: 20px 0;\">\
                 <h3 style=\"color: #2c5282; margin-top: 0;\">Order Summary:</h3>\
                 <p><strong>Order Number:</strong> #{number}</p>\
                 </div>\
                 <p>If you have any questions about your order, please don't hesitate to contact us.</p>\
                 <p>Best regards,<br>The WatchCraft Team</p>",
            )),
        },
        NotificationKind::TrackingUpdated => EmailMessage {
            subject: format!("Tracking Information Updated - WatchCraft Order #{number}"),
            html_body: wrap(format!(
                "<h2 style=\"color: #1a365d;\">Tracking Information Updated</h2>\
                 <p>Dear {name},</p>\
                 <p>The tracking information for your order has been updated.</p>\
                 <div style=\"background-color: #f7fafc; padding: 15px; border-radius: 5px; margin: 20px 0;\">\
                 <h3 style=\"color: #2c5282; margin-top: 0;\">Updated Tracking Details:</h3>\
                 <p><strong>Order Number:</strong> #{number}</p>\
                 <p><strong>Tracking Number:</strong> {tracking}</p>\
                 <p><strong>Order Status:</strong> {status}</p>\
                 </div>\
                 <p>You can track your package using the tracking number above.</p>\
                 <p>Best regards,<br>The WatchCraft Team</p>",
                tracking = order.tracking_id.as_deref().unwrap_or(""),
                status = order.status.as_str(),
            )),
        },
    }
}
