//! # Domain Types
//!
//! Entity types stored by the catalog and returned to clients.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐            ┌─────────────────┐                     │
//! │  │    Product      │◄ ─ ─ ─ ─ ─ │     Order       │                     │
//! │  │  ─────────────  │  by id     │  ─────────────  │                     │
//! │  │  id             │  (weak)    │  id             │                     │
//! │  │  likes          │            │  buyerEmail     │                     │
//! │  │  urls / links   │            │  products: [id] │                     │
//! │  │  user / tags    │            │  status         │                     │
//! │  └─────────────────┘            └────────┬────────┘                     │
//! │                                          │ resolution (read path only)  │
//! │                                          ▼                              │
//! │                                 ┌─────────────────┐                     │
//! │                                 │  ResolvedOrder  │                     │
//! │                                 │  products:      │                     │
//! │                                 │  [Product|null] │                     │
//! │                                 └─────────────────┘                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Names
//! Product fields are snake_case (`alt_description`, `user.first_name`) with
//! camelCase aliases accepted on input. Order fields are camelCase
//! (`buyerEmail`). Stored documents use exactly the serialized shape.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

// =============================================================================
// Product
// =============================================================================

/// Image URLs of a product. All three are required.
///
/// Missing keys deserialize to empty strings so that validation, not serde,
/// reports which one is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUrls {
    #[serde(default)]
    pub regular: String,
    #[serde(default)]
    pub small: String,
    #[serde(default)]
    pub thumb: String,
}

/// Links of a product. Both are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLinks {
    /// Serialized as `self`.
    #[serde(rename = "self", default)]
    pub self_link: String,
    #[serde(default)]
    pub html: String,
}

/// The user who published the product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUser {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "firstName")]
    pub first_name: String,
    #[serde(default, alias = "lastName", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, alias = "portfolioUrl", skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
    #[serde(default)]
    pub username: String,
}

/// A tag attached to a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub title: String,
}

impl Tag {
    pub fn new(title: impl Into<String>) -> Self {
        Tag {
            title: title.into(),
        }
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier, generated at creation when not supplied.
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, alias = "altDescription", skip_serializing_if = "Option::is_none")]
    pub alt_description: Option<String>,

    pub likes: i64,

    pub urls: ProductUrls,

    pub links: ProductLinks,

    pub user: ProductUser,

    /// Ordered; filtering matches on `title`.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Product {
    /// Checks whether any tag entry has exactly this title.
    pub fn has_tag(&self, title: &str) -> bool {
        self.tags.iter().any(|tag| tag.title == title)
    }
}

/// Fields supplied by a client to create a product.
///
/// Every required field is optional here; [`validate_new_product`]
/// turns a draft into a [`Product`] or reports the first missing field.
///
/// [`validate_new_product`]: crate::validation::validate_new_product
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "altDescription")]
    pub alt_description: Option<String>,
    #[serde(default)]
    pub likes: Option<i64>,
    #[serde(default)]
    pub urls: Option<ProductUrls>,
    #[serde(default)]
    pub links: Option<ProductLinks>,
    #[serde(default)]
    pub user: Option<ProductUser>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl NewProduct {
    /// Returns the client-supplied id as given; a blank id counts as absent.
    pub fn requested_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order.
///
/// Lifecycle order is `CREATED → PENDING → COMPLETED`; whether edits must
/// follow it is decided by [`StatusPolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Created,
    Pending,
    Completed,
}

impl OrderStatus {
    /// All accepted values, in lifecycle order.
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Created,
        OrderStatus::Pending,
        OrderStatus::Completed,
    ];

    /// Returns the stored/wire representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Pending => "PENDING",
            OrderStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: OrderStatus::ALL.iter().map(|s| s.to_string()).collect(),
            })
    }
}

/// How strictly order edits treat status changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPolicy {
    /// Any enumerated status is accepted from any prior status.
    #[default]
    Permissive,
    /// Status may stay or move later in the lifecycle, never back.
    Forward,
}

impl StatusPolicy {
    /// Checks whether an edit may move an order from `from` to `to`.
    pub fn allows(&self, from: OrderStatus, to: OrderStatus) -> bool {
        match self {
            StatusPolicy::Permissive => true,
            StatusPolicy::Forward => to >= from,
        }
    }
}

impl FromStr for StatusPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(StatusPolicy::Permissive),
            "forward" => Ok(StatusPolicy::Forward),
            _ => Err(ValidationError::NotAllowed {
                field: "status policy".to_string(),
                allowed: vec!["permissive".to_string(), "forward".to_string()],
            }),
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order as stored: products are referenced by id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub buyer_email: String,
    /// Product ids. Never embedded product objects.
    pub products: Vec<String>,
    #[serde(default)]
    pub status: OrderStatus,
}

/// Fields supplied by a client to create an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub buyer_email: Option<String>,
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

impl NewOrder {
    /// Returns the client-supplied id as given; a blank id counts as absent.
    pub fn requested_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }
}

/// An order as returned on the read path, with product references expanded.
///
/// Slots keep the stored order and length; a reference to a product that no
/// longer exists is `None` (serialized as `null`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOrder {
    pub id: String,
    pub buyer_email: String,
    pub products: Vec<Option<Product>>,
    pub status: OrderStatus,
}

impl ResolvedOrder {
    /// Builds the read view from a stored order and its resolved slots.
    pub fn from_parts(order: Order, products: Vec<Option<Product>>) -> Self {
        ResolvedOrder {
            id: order.id,
            buyer_email: order.buyer_email,
            products,
            status: order.status,
        }
    }

    /// Number of references that did not resolve.
    pub fn missing_count(&self) -> usize {
        self.products.iter().filter(|slot| slot.is_none()).count()
    }
}

// =============================================================================
// Delete Acknowledgement
// =============================================================================

/// Response of a successful destroy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    pub success: bool,
    pub message: String,
}

impl DeleteAck {
    /// Acknowledges deletion of an entity, e.g. `"Product deleted successfully"`.
    pub fn deleted(entity: &str) -> Self {
        DeleteAck {
            success: true,
            message: format!("{} deleted successfully", entity),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Created);
    }

    #[test]
    fn test_order_status_wire_format() {
        assert_eq!(serde_json::to_value(OrderStatus::Pending).unwrap(), json!("PENDING"));
        assert_eq!("COMPLETED".parse::<OrderStatus>().unwrap(), OrderStatus::Completed);
        assert!("pending".parse::<OrderStatus>().is_err());
        assert!("SHIPPED".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_policy() {
        let permissive = StatusPolicy::Permissive;
        assert!(permissive.allows(OrderStatus::Completed, OrderStatus::Created));

        let forward = StatusPolicy::Forward;
        assert!(forward.allows(OrderStatus::Created, OrderStatus::Completed));
        assert!(forward.allows(OrderStatus::Pending, OrderStatus::Pending));
        assert!(!forward.allows(OrderStatus::Pending, OrderStatus::Created));

        assert_eq!("Forward".parse::<StatusPolicy>().unwrap(), StatusPolicy::Forward);
        assert!("strict".parse::<StatusPolicy>().is_err());
    }

    #[test]
    fn test_product_accepts_camel_case_aliases() {
        let product: Product = serde_json::from_value(json!({
            "id": "p1",
            "altDescription": "alt",
            "likes": 3,
            "urls": { "regular": "a", "small": "b", "thumb": "c" },
            "links": { "self": "s", "html": "h" },
            "user": { "id": "u1", "firstName": "A", "username": "a1" }
        }))
        .unwrap();

        assert_eq!(product.alt_description.as_deref(), Some("alt"));
        assert_eq!(product.user.first_name, "A");
        assert_eq!(product.links.self_link, "s");
        assert!(product.tags.is_empty());

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["alt_description"], json!("alt"));
        assert_eq!(value["links"]["self"], json!("s"));
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_resolved_order_serializes_missing_as_null() {
        let order = Order {
            id: "o1".to_string(),
            buyer_email: "b@example.com".to_string(),
            products: vec!["gone".to_string()],
            status: OrderStatus::Created,
        };
        let resolved = ResolvedOrder::from_parts(order, vec![None]);

        assert_eq!(resolved.missing_count(), 1);
        let value = serde_json::to_value(&resolved).unwrap();
        assert_eq!(value["buyerEmail"], json!("b@example.com"));
        assert_eq!(value["products"], json!([null]));
    }

    #[test]
    fn test_requested_id_ignores_blank() {
        let draft = NewOrder {
            id: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(draft.requested_id(), None);
    }

    #[test]
    fn test_requested_id_kept_verbatim() {
        let draft = NewProduct {
            id: Some(" p1 ".to_string()),
            ..Default::default()
        };
        assert_eq!(draft.requested_id(), Some(" p1 "));
    }

    #[test]
    fn test_delete_ack_message() {
        let ack = DeleteAck::deleted("Order");
        assert!(ack.success);
        assert_eq!(ack.message, "Order deleted successfully");
    }
}
