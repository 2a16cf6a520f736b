//! # Catalog API
//!
//! HTTP/JSON server for the product and order catalog.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog API                                     │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐ │
//! │  │  /products     │  │  /orders       │  │  /health                   │ │
//! │  │                │  │                │  │                            │ │
//! │  │ • list (?tag)  │  │ • list         │  │ • pool liveness            │ │
//! │  │ • get          │  │   (?productId, │  │ • schema status            │ │
//! │  │ • create       │  │    ?status)    │  │                            │ │
//! │  │ • edit         │  │ • get/create/  │  │                            │ │
//! │  │ • delete       │  │   edit resolve │  │                            │ │
//! │  │                │  │ • delete       │  │                            │ │
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘ │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐   │
//! │  │  catalog-db: ProductRepository • OrderRepository • SQLite        │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `CATALOG_HTTP_PORT` - HTTP port (default: 1337)
//! - `CATALOG_BIND_ADDR` - Interface to bind (default: 0.0.0.0)
//! - `CATALOG_DB_PATH` - SQLite database file (default: ./catalog.db)
//! - `CATALOG_DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `CATALOG_ORDER_STATUS_POLICY` - `permissive` (default) or `forward`
//! - `RUST_LOG` - Log filter (default: `info,catalog=debug,sqlx=warn`)

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ErrorCode};
pub use routes::router;
pub use state::AppState;
