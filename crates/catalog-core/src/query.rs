//! # List Queries
//!
//! Filters and offset/limit windows for the `list` operations.
//!
//! Both query types deserialize straight from a URL query string
//! (`?offset=10&limit=5&tag=nature`); missing values fall back to
//! [`DEFAULT_OFFSET`] and [`DEFAULT_LIMIT`]. No upper bound is put on `limit`.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::OrderStatus;

/// Records skipped when the caller gives no offset.
pub const DEFAULT_OFFSET: u64 = 0;

/// Records returned when the caller gives no limit.
pub const DEFAULT_LIMIT: u64 = 25;

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

/// `?status=` means no filter; any other value must name a status.
fn optional_status<'de, D>(deserializer: D) -> Result<Option<OrderStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => OrderStatus::from_str(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Filter for listing products.
///
/// ## Example
/// ```rust
/// use catalog_core::ProductListQuery;
///
/// let query = ProductListQuery::new().offset(25).tag("nature");
/// assert_eq!(query.limit, 25);
/// assert_eq!(query.tag_filter(), Some("nature"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListQuery {
    #[serde(default)]
    pub offset: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub tag: Option<String>,
}

impl Default for ProductListQuery {
    fn default() -> Self {
        ProductListQuery {
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
            tag: None,
        }
    }
}

impl ProductListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// The tag to filter on; an empty tag means no filter.
    pub fn tag_filter(&self) -> Option<&str> {
        self.tag.as_deref().filter(|tag| !tag.is_empty())
    }
}

/// Filter for listing orders. Both predicates apply together (AND).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListQuery {
    #[serde(default)]
    pub offset: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default, deserialize_with = "optional_status")]
    pub status: Option<OrderStatus>,
}

impl Default for OrderListQuery {
    fn default() -> Self {
        OrderListQuery {
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
            product_id: None,
            status: None,
        }
    }
}

impl OrderListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// The product id to filter on; an empty id means no filter.
    pub fn referenced_product(&self) -> Option<&str> {
        self.product_id.as_deref().filter(|id| !id.is_empty())
    }
}
