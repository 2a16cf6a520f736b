//! # HTTP Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Router (TraceLayer)                                                    │
//! │   ├── products   GET/POST /products      GET/PUT/DELETE /products/:id   │
//! │   ├── orders     GET/POST /orders        GET/PUT/DELETE /orders/:id     │
//! │   └── health     GET /health                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod health;
pub mod orders;
pub mod products;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(products::router())
        .merge(orders::router())
        .merge(health::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
