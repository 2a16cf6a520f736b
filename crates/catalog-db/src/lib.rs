//! # catalog-db: Storage Layer for the Catalog Service
//!
//! Document storage for products and orders, on SQLite through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Data Flow                                │
//! │                                                                         │
//! │  HTTP handler (GET /orders/:id)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                   catalog-db (THIS CRATE)                       │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌──────────────┐     │    │
//! │  │   │   Database    │   │  Repositories  │   │  Migrations  │     │    │
//! │  │   │   (pool.rs)   │   │  ProductRepo   │   │  (embedded)  │     │    │
//! │  │   │               │──►│  OrderRepo ──► │   │ 001_init.sql │     │    │
//! │  │   │  SqlitePool   │   │   resolution   │   │              │     │    │
//! │  │   └───────────────┘   └───────┬────────┘   └──────────────┘     │    │
//! │  │                               ▼                                 │    │
//! │  │                  DocumentStore (store.rs)                       │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │          SQLite: documents(collection, id, body JSON)           │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded schema bootstrap
//! - [`store`] - Generic document store and query builder
//! - [`repository`] - Product and order repositories
//! - [`resolution`] - Order → product reference expansion
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use catalog_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./catalog.db")).await?;
//!
//! let page = db.products().list(&ProductListQuery::new().tag("nature")).await?;
//! let order = db.orders().get("uuid-here").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod resolution;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use migrations::MigrationStatus;
pub use pool::{Database, DbConfig};
pub use store::{Document, DocumentStore, FindQuery};

// Repository re-exports for convenience
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
