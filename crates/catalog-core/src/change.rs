//! # Edit Allow-Lists
//!
//! Partial updates applied by the `edit` operations.
//!
//! Every key of an edit body must name an editable field; anything else
//! (including `id`) is rejected before the stored record is touched. Present
//! keys overwrite the stored value, absent keys leave it alone.
//!
//! ```text
//!   {"status": "PENDING"}          → status overwritten, rest unchanged
//!   {"status": "PENDING", "x": 1}  → NotAllowed { field: "x" }
//!   {"likes": null}                → Required { field: "likes" }
//!   {"products": [{"id": "p1"}]}   → InvalidFormat { field: "products" }
//! ```

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Order, OrderStatus, Product, ProductLinks, ProductUrls, ProductUser, StatusPolicy, Tag};
use crate::validation::{from_json, ValidationResult};

/// Keys accepted in a product edit body.
pub const PRODUCT_EDITABLE_FIELDS: &[&str] = &[
    "description",
    "alt_description",
    "altDescription",
    "likes",
    "urls",
    "links",
    "user",
    "tags",
];

/// Product keys that may not be set to `null`.
const PRODUCT_NON_NULL_FIELDS: &[&str] = &["likes", "urls", "links", "user"];

/// Keys accepted in an order edit body.
pub const ORDER_EDITABLE_FIELDS: &[&str] = &["buyerEmail", "products", "status"];

/// Order keys that may not be set to `null`.
const ORDER_NON_NULL_FIELDS: &[&str] = &["buyerEmail", "products", "status"];

// =============================================================================
// Product Change
// =============================================================================

/// A partial product update.
///
/// `description` and `alt_description` distinguish "absent" (`None`) from
/// "cleared" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductChange {
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, alias = "altDescription", deserialize_with = "present")]
    pub alt_description: Option<Option<String>>,
    #[serde(default)]
    pub likes: Option<i64>,
    #[serde(default)]
    pub urls: Option<ProductUrls>,
    #[serde(default)]
    pub links: Option<ProductLinks>,
    #[serde(default)]
    pub user: Option<ProductUser>,
    /// `null` clears the tag list.
    #[serde(default, deserialize_with = "present")]
    pub tags: Option<Option<Vec<Tag>>>,
}

impl ProductChange {
    /// Parses an edit body, enforcing the product allow-list.
    pub fn from_json(value: Value) -> ValidationResult<Self> {
        check_keys(&value, PRODUCT_EDITABLE_FIELDS, PRODUCT_NON_NULL_FIELDS)?;
        from_json(value)
    }

    /// Names of the fields this change overwrites.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.description.is_some() {
            fields.push("description");
        }
        if self.alt_description.is_some() {
            fields.push("alt_description");
        }
        if self.likes.is_some() {
            fields.push("likes");
        }
        if self.urls.is_some() {
            fields.push("urls");
        }
        if self.links.is_some() {
            fields.push("links");
        }
        if self.user.is_some() {
            fields.push("user");
        }
        if self.tags.is_some() {
            fields.push("tags");
        }
        fields
    }

    /// Overwrites every present field on the product.
    ///
    /// The result is not validated here; callers re-run
    /// [`validate_product`](crate::validation::validate_product) before saving.
    pub fn apply_to(self, product: &mut Product) {
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(alt_description) = self.alt_description {
            product.alt_description = alt_description;
        }
        if let Some(likes) = self.likes {
            product.likes = likes;
        }
        if let Some(urls) = self.urls {
            product.urls = urls;
        }
        if let Some(links) = self.links {
            product.links = links;
        }
        if let Some(user) = self.user {
            product.user = user;
        }
        if let Some(tags) = self.tags {
            product.tags = tags.unwrap_or_default();
        }
    }
}

// =============================================================================
// Order Change
// =============================================================================

/// A partial order update.
///
/// `products` only ever holds raw ids: a body carrying resolved product
/// objects is rejected, so the stored form never contains embedded products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderChange {
    #[serde(default)]
    pub buyer_email: Option<String>,
    #[serde(default)]
    pub products: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

impl OrderChange {
    /// Parses an edit body, enforcing the order allow-list.
    pub fn from_json(value: Value) -> ValidationResult<Self> {
        check_keys(&value, ORDER_EDITABLE_FIELDS, ORDER_NON_NULL_FIELDS)?;

        if let Some(products) = value.get("products") {
            let all_ids = products
                .as_array()
                .is_some_and(|entries| entries.iter().all(Value::is_string));
            if !all_ids {
                return Err(ValidationError::invalid(
                    "products",
                    "must be an array of product ids",
                ));
            }
        }

        from_json(value)
    }

    /// Shorthand for a status-only change.
    pub fn status(status: OrderStatus) -> Self {
        OrderChange {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Names of the fields this change overwrites.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.buyer_email.is_some() {
            fields.push("buyerEmail");
        }
        if self.products.is_some() {
            fields.push("products");
        }
        if self.status.is_some() {
            fields.push("status");
        }
        fields
    }

    /// Overwrites every present field on the stored order.
    ///
    /// The status transition is checked against `policy` before anything is
    /// modified, so a refused change leaves the order untouched.
    pub fn apply_to(self, order: &mut Order, policy: StatusPolicy) -> CoreResult<()> {
        if let Some(status) = self.status {
            if !policy.allows(order.status, status) {
                return Err(CoreError::InvalidStatusTransition {
                    from: order.status,
                    to: status,
                });
            }
        }

        if let Some(buyer_email) = self.buyer_email {
            order.buyer_email = buyer_email;
        }
        if let Some(products) = self.products {
            order.products = products;
        }
        if let Some(status) = self.status {
            order.status = status;
        }

        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Rejects non-objects, keys outside `allowed`, and `null` for `non_null` keys.
fn check_keys(value: &Value, allowed: &[&str], non_null: &[&str]) -> ValidationResult<()> {
    let object = value
        .as_object()
        .ok_or_else(|| ValidationError::invalid("body", "must be a JSON object"))?;

    for (key, field_value) in object {
        if !allowed.contains(&key.as_str()) {
            return Err(ValidationError::NotAllowed {
                field: key.clone(),
                allowed: allowed.iter().map(|field| field.to_string()).collect(),
            });
        }

        if field_value.is_null() && non_null.contains(&key.as_str()) {
            return Err(ValidationError::required(key.as_str()));
        }
    }

    Ok(())
}

/// Maps a present key (even `null`) to `Some(..)`; absent keys stay `None`
/// through `#[serde(default)]`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// Unit Tests
// =============================================================================
