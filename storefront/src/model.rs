use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ModelId = Uuid;

/// Delivery-progress state of an order. Transitions are administrator
/// driven and unordered; `Processing` is the initial value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Processing,
    Shipped,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
        }
    }
}

/// Event kinds the notification dispatcher knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    OrderPlaced,
    Processing,
    Shipped,
    OutForDelivery,
    Delivered,
    TrackingUpdated,
}

impl NotificationKind {
    /// The kind that announces the given lifecycle status.
    pub fn for_status(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Processing => NotificationKind::Processing,
            OrderStatus::Shipped => NotificationKind::Shipped,
            OrderStatus::OutForDelivery => NotificationKind::OutForDelivery,
            OrderStatus::Delivered => NotificationKind::Delivered,
        }
    }

    /// Lenient parse used for caller-supplied kinds. Unknown values fall
    /// back to `Processing`; the fallback is deliberate and covered by
    /// tests rather than an implicit map miss.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw {
            "orderPlaced" => NotificationKind::OrderPlaced,
            "processing" => NotificationKind::Processing,
            "shipped" => NotificationKind::Shipped,
            "outForDelivery" => NotificationKind::OutForDelivery,
            "delivered" => NotificationKind::Delivered,
            "trackingUpdated" => NotificationKind::TrackingUpdated,
            _ => NotificationKind::Processing,
        }
    }
}

/// A line item snapshotted at order-creation time; `unit_price` is not a
/// live reference to the current catalog price. Prices are minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ModelId,
    pub name: String,
    pub image: String,
    pub unit_price: i64,
    pub quantity: u32,
}

impl OrderItem {
    /// Line total in minor units, `None` on i64 overflow. Prices arrive
    /// from the client and are validated, not trusted.
    pub fn line_total(&self) -> Option<i64> {
        self.unit_price.checked_mul(i64::from(self.quantity))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: ModelId,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub items_price: i64,
    pub shipping_price: i64,
    pub total_price: i64,
    pub status: OrderStatus,
    pub tracking_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Short human-facing order number, the tail of the id.
    pub fn order_number(&self) -> String {
        let simple = self.id.simple().to_string();
        simple[simple.len() - 6..].to_string()
    }
}

/// Checkout payload before the order gets an identity and a status.
/// `items_price`/`total_price` are optional client echoes; when present
/// they must agree with the server-computed values.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    #[serde(rename = "orderItems")]
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub items_price: Option<i64>,
    pub shipping_price: i64,
    #[serde(default)]
    pub total_price: Option<i64>,
}

/// Result of a single-field order mutation. `changed` is true when the
/// persisted value differs from the previous one; callers use it to decide
/// whether a notification is warranted.
#[derive(Debug, Clone)]
pub struct FieldUpdate {
    pub order: Order,
    pub changed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductCategory {
    #[serde(rename = "Smart Watches")]
    SmartWatches,
    #[serde(rename = "Casual Watches")]
    CasualWatches,
    #[serde(rename = "Wallets")]
    Wallets,
    #[serde(rename = "Luxury Watches")]
    LuxuryWatches,
    #[serde(rename = "Sports Watches")]
    SportsWatches,
    #[serde(rename = "Accessories")]
    Accessories,
}

impl Default for ProductCategory {
    fn default() -> Self {
        ProductCategory::CasualWatches
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ModelId,
    pub name: String,
    pub image: String,
    pub brand: String,
    pub description: String,
    pub price: i64,
    pub old_price: Option<i64>,
    pub count_in_stock: u32,
    pub rating: f32,
    pub num_reviews: u32,
    pub featured: bool,
    pub category: ProductCategory,
    pub movement: String,
    pub case_material: String,
    pub water_resistance: String,
    pub warranty: String,
    pub created_at: DateTime<Utc>,
}

/// New-product payload; descriptive watch attributes carry catalog defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub image: String,
    pub brand: String,
    pub description: String,
    pub price: i64,
    #[serde(default)]
    pub old_price: Option<i64>,
    #[serde(default)]
    pub count_in_stock: u32,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub num_reviews: u32,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub category: ProductCategory,
    #[serde(default = "default_movement")]
    pub movement: String,
    #[serde(default = "default_case_material")]
    pub case_material: String,
    #[serde(default = "default_water_resistance")]
    pub water_resistance: String,
    #[serde(default = "default_warranty")]
    pub warranty: String,
}

fn default_movement() -> String {
    "Automatic".to_string()
}

fn default_case_material() -> String {
    "Stainless Steel".to_string()
}

fn default_water_resistance() -> String {
    "100m".to_string()
}

fn default_warranty() -> String {
    "2 Years".to_string()
}

impl ProductDraft {
    pub fn into_product(self, id: ModelId, created_at: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            image: self.image,
            brand: self.brand,
            description: self.description,
            price: self.price,
            old_price: self.old_price,
            count_in_stock: self.count_in_stock,
            rating: self.rating,
            num_reviews: self.num_reviews,
            featured: self.featured,
            category: self.category,
            movement: self.movement,
            case_material: self.case_material,
            water_resistance: self.water_resistance,
            warranty: self.warranty,
            created_at,
        }
    }
}

/// Allow-listed updatable product fields. Updates go through this struct
/// rather than copying arbitrary request keys onto the record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub image: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub old_price: Option<Option<i64>>,
    pub count_in_stock: Option<u32>,
    pub rating: Option<f32>,
    pub num_reviews: Option<u32>,
    pub featured: Option<bool>,
    pub category: Option<ProductCategory>,
    pub movement: Option<String>,
    pub case_material: Option<String>,
    pub water_resistance: Option<String>,
    pub warranty: Option<String>,
}

impl ProductPatch {
    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(image) = &self.image {
            product.image = image.clone();
        }
        if let Some(brand) = &self.brand {
            product.brand = brand.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(old_price) = self.old_price {
            product.old_price = old_price;
        }
        if let Some(count_in_stock) = self.count_in_stock {
            product.count_in_stock = count_in_stock;
        }
        if let Some(rating) = self.rating {
            product.rating = rating;
        }
        if let Some(num_reviews) = self.num_reviews {
            product.num_reviews = num_reviews;
        }
        if let Some(featured) = self.featured {
            product.featured = featured;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(movement) = &self.movement {
            product.movement = movement.clone();
        }
        if let Some(case_material) = &self.case_material {
            product.case_material = case_material.clone();
        }
        if let Some(water_resistance) = &self.water_resistance {
            product.water_resistance = water_resistance.clone();
        }
        if let Some(warranty) = &self.warranty {
            product.warranty = warranty.clone();
        }
    }
}
