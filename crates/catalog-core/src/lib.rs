//! # catalog-core: Pure Domain Logic for the Catalog Service
//!
//! This crate holds the entity types, their required-field rules, the
//! edit allow-lists and the list/pagination query types. It has zero I/O
//! dependencies; storage lives in `catalog-db`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Catalog Service Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 HTTP boundary (catalog-api)                     │   │
//! │  │    GET /products ──► POST /orders ──► PUT /orders/:id ...       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ catalog-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ validation │  │  change   │  │   query   │  │   │
//! │  │   │  Product  │  │  required  │  │ allow-    │  │  offset / │  │   │
//! │  │   │  Order    │  │  fields    │  │ lists     │  │  limit    │  │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 catalog-db (Storage Layer)                      │   │
//! │  │        document store, repositories, reference resolution       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, Order, OrderStatus and the resolved order view
//! - [`validation`] - Required-field checks run before every write
//! - [`change`] - Allow-listed partial updates for edits
//! - [`query`] - List filters with offset/limit defaults
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use catalog_core::{OrderStatus, StatusPolicy};
//!
//! let policy = StatusPolicy::Forward;
//! assert!(policy.allows(OrderStatus::Created, OrderStatus::Pending));
//! assert!(!policy.allows(OrderStatus::Completed, OrderStatus::Created));
//!
//! // The default policy accepts any enumerated value from any prior value.
//! assert!(StatusPolicy::default().allows(OrderStatus::Completed, OrderStatus::Created));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod change;
pub mod error;
pub mod query;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use change::{OrderChange, ProductChange};
pub use error::{CoreError, CoreResult, ValidationError};
pub use query::{OrderListQuery, ProductListQuery, DEFAULT_LIMIT, DEFAULT_OFFSET};
pub use types::*;
