//! # Repository Module
//!
//! Product and order repositories over the [`DocumentStore`].
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  HTTP handler                                                           │
//! │       │                                                                 │
//! │       │  state.orders.get("7f3a...")                                    │
//! │       ▼                                                                 │
//! │  OrderRepository ──────────────► ProductRepository                      │
//! │  ├── list(&query)                (resolves product references)          │
//! │  ├── get(id)                     ├── list(&query)                       │
//! │  ├── create(draft)               ├── get(id) / get_many(ids)            │
//! │  ├── edit(id, change)            ├── create(draft)                      │
//! │  └── destroy(id)                 ├── edit(id, change)                   │
//! │       │                          └── destroy(id)                        │
//! │       ▼                                   │                             │
//! │  DocumentStore (one shared pool) ◄────────┘                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Product listing by tag and CRUD
//! - [`OrderRepository`] - Order listing by product/status, CRUD with
//!   product references resolved on read
//!
//! [`DocumentStore`]: crate::store::DocumentStore
//! [`ProductRepository`]: product::ProductRepository
//! [`OrderRepository`]: order::OrderRepository

use uuid::Uuid;

pub mod order;
pub mod product;

/// Generates a new document id (UUID v4) for records created without one.
pub fn generate_document_id() -> String {
    Uuid::new_v4().to_string()
}
