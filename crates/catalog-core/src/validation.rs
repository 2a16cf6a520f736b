//! # Validation Module
//!
//! Required-field rules for products and orders.
//!
//! ## Where Validation Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP boundary                                                │
//! │  └── from_json: body must be a JSON object of the right shape          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repository (create / edit)                                   │
//! │  └── THIS MODULE: required fields present and non-empty                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Document store                                               │
//! │  ├── PRIMARY KEY (collection, id)                                      │
//! │  └── json_valid(body)                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Edits re-run [`validate_product`] / [`validate_order`] on the merged
//! record, so an edit cannot blank out a required field either.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ValidationError;
use crate::types::{NewOrder, NewProduct, Order, Product};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Request Bodies
// =============================================================================

/// Deserializes a request body, reporting shape errors as validation errors.
///
/// ## Example
/// ```rust
/// use catalog_core::validation::from_json;
/// use catalog_core::NewOrder;
/// use serde_json::json;
///
/// let draft: NewOrder = from_json(json!({ "buyerEmail": "a@b.c", "products": ["p1"] })).unwrap();
/// assert_eq!(draft.products, vec!["p1".to_string()]);
///
/// assert!(from_json::<NewOrder>(json!(["not", "an", "object"])).is_err());
/// ```
pub fn from_json<T: DeserializeOwned>(value: Value) -> ValidationResult<T> {
    if !value.is_object() {
        return Err(ValidationError::invalid("body", "must be a JSON object"));
    }

    serde_json::from_value(value).map_err(|e| ValidationError::invalid("body", e.to_string()))
}

// =============================================================================
// Products
// =============================================================================

/// Validates a product before it is persisted.
///
/// ## Rules
/// - `id` non-empty
/// - `urls.{regular, small, thumb}` non-empty
/// - `links.{self, html}` non-empty
/// - `user.{id, first_name, username}` non-empty
/// - every `tags[i].title` non-empty
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    require("id", &product.id)?;

    require("urls.regular", &product.urls.regular)?;
    require("urls.small", &product.urls.small)?;
    require("urls.thumb", &product.urls.thumb)?;

    require("links.self", &product.links.self_link)?;
    require("links.html", &product.links.html)?;

    require("user.id", &product.user.id)?;
    require("user.first_name", &product.user.first_name)?;
    require("user.username", &product.user.username)?;

    for (i, tag) in product.tags.iter().enumerate() {
        require(&format!("tags[{}].title", i), &tag.title)?;
    }

    Ok(())
}

/// Turns a create draft into a product with the given id.
///
/// Fails on the first missing required field; nothing is generated here, the
/// caller picks the id (client-supplied or fresh).
pub fn validate_new_product(draft: NewProduct, id: String) -> ValidationResult<Product> {
    let product = Product {
        id,
        description: draft.description,
        alt_description: draft.alt_description,
        likes: draft.likes.ok_or_else(|| ValidationError::required("likes"))?,
        urls: draft.urls.ok_or_else(|| ValidationError::required("urls"))?,
        links: draft.links.ok_or_else(|| ValidationError::required("links"))?,
        user: draft.user.ok_or_else(|| ValidationError::required("user"))?,
        tags: draft.tags,
    };

    validate_product(&product)?;
    Ok(product)
}

// =============================================================================
// Orders
// =============================================================================

/// Validates an order before it is persisted.
///
/// ## Rules
/// - `id` non-empty
/// - `buyerEmail` non-empty
/// - `products` non-empty, every entry non-empty
///
/// Product ids are not checked against the product collection; dangling
/// references are tolerated and resolve to `null` on read.
pub fn validate_order(order: &Order) -> ValidationResult<()> {
    require("id", &order.id)?;
    require("buyerEmail", &order.buyer_email)?;

    if order.products.is_empty() {
        return Err(ValidationError::required("products"));
    }

    for (i, product_id) in order.products.iter().enumerate() {
        require(&format!("products[{}]", i), product_id)?;
    }

    Ok(())
}

/// Turns a create draft into an order with the given id.
///
/// `status` defaults to `CREATED`.
pub fn validate_new_order(draft: NewOrder, id: String) -> ValidationResult<Order> {
    let order = Order {
        id,
        buyer_email: draft
            .buyer_email
            .ok_or_else(|| ValidationError::required("buyerEmail"))?,
        products: draft.products,
        status: draft.status.unwrap_or_default(),
    };

    validate_order(&order)?;
    Ok(order)
}

fn require(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderStatus;
    use serde_json::json;

    fn product_body() -> Value {
        json!({
            "likes": 3,
            "urls": { "regular": "a", "small": "b", "thumb": "c" },
            "links": { "self": "s", "html": "h" },
            "user": { "id": "u1", "first_name": "A", "username": "a1" }
        })
    }

    #[test]
    fn test_new_product_valid() {
        let draft: NewProduct = from_json(product_body()).unwrap();
        let product = validate_new_product(draft, "p1".to_string()).unwrap();

        assert_eq!(product.id, "p1");
        assert_eq!(product.likes, 3);
        assert_eq!(product.user.username, "a1");
    }

    #[test]
    fn test_new_product_missing_likes() {
        let mut body = product_body();
        body.as_object_mut().unwrap().remove("likes");

        let draft: NewProduct = from_json(body).unwrap();
        let err = validate_new_product(draft, "p1".to_string()).unwrap_err();
        assert_eq!(err, ValidationError::required("likes"));
    }

    #[test]
    fn test_new_product_missing_nested_field() {
        let mut body = product_body();
        body["urls"] = json!({ "regular": "a", "thumb": "c" });
        body["tags"] = json!([{ "title": "nature" }, {}]);

        let draft: NewProduct = from_json(body).unwrap();
        let err = validate_new_product(draft, "p1".to_string()).unwrap_err();
        assert_eq!(err, ValidationError::required("urls.small"));
    }

    #[test]
    fn test_new_product_empty_tag_title() {
        let mut body = product_body();
        body["tags"] = json!([{ "title": "nature" }, { "title": "" }]);

        let draft: NewProduct = from_json(body).unwrap();
        let err = validate_new_product(draft, "p1".to_string()).unwrap_err();
        assert_eq!(err, ValidationError::required("tags[1].title"));
    }

    #[test]
    fn test_wrong_type_is_invalid_format() {
        let mut body = product_body();
        body["likes"] = json!("many");

        let err = from_json::<NewProduct>(body).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { ref field, .. } if field == "body"));
    }

    #[test]
    fn test_new_order_defaults_status() {
        let draft: NewOrder = from_json(json!({
            "buyerEmail": "buyer@example.com",
            "products": ["p1", "p2"]
        }))
        .unwrap();

        let order = validate_new_order(draft, "o1".to_string()).unwrap();
        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(order.products.len(), 2);
    }

    #[test]
    fn test_new_order_requires_fields() {
        let draft: NewOrder = from_json(json!({ "products": ["p1"] })).unwrap();
        assert_eq!(
            validate_new_order(draft, "o1".to_string()).unwrap_err(),
            ValidationError::required("buyerEmail")
        );

        let draft: NewOrder = from_json(json!({ "buyerEmail": "b@example.com" })).unwrap();
        assert_eq!(
            validate_new_order(draft, "o1".to_string()).unwrap_err(),
            ValidationError::required("products")
        );

        let draft: NewOrder =
            from_json(json!({ "buyerEmail": "b@example.com", "products": ["p1", " "] })).unwrap();
        assert_eq!(
            validate_new_order(draft, "o1".to_string()).unwrap_err(),
            ValidationError::required("products[1]")
        );
    }

    #[test]
    fn test_unknown_status_rejected() {
        let err = from_json::<NewOrder>(json!({
            "buyerEmail": "b@example.com",
            "products": ["p1"],
            "status": "SHIPPED"
        }))
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }
}
