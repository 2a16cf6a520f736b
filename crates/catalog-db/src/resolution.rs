//! # Reference Resolution
//!
//! Expands the product ids stored on an order into product records.
//!
//! ```text
//!   stored:   products: ["p2", "gone", "p1"]
//!                          │      │      │
//!                 one batch lookup (id IN ..)
//!                          ▼      ▼      ▼
//!   resolved: products: [{p2..}, null, {p1..}]
//! ```
//!
//! Slot order and count always match the stored ids. A dangling reference is
//! not an error; it becomes `None` and is logged.

use tracing::warn;

use catalog_core::{Order, ResolvedOrder};

use crate::error::DbResult;
use crate::repository::product::ProductRepository;

/// Resolves one order's product references.
pub async fn resolve_order(products: &ProductRepository, order: Order) -> DbResult<ResolvedOrder> {
    let slots = products.get_many(&order.products).await?;
    let resolved = ResolvedOrder::from_parts(order, slots);

    let missing = resolved.missing_count();
    if missing > 0 {
        warn!(
            order_id = %resolved.id,
            missing,
            "Order references products that no longer exist"
        );
    }

    Ok(resolved)
}
