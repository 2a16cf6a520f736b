//! Shared handler state.

use catalog_db::{Database, OrderRepository, ProductRepository};

/// Cloned into every handler by axum.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub products: ProductRepository,
    pub orders: OrderRepository,
}

impl AppState {
    /// Builds the repositories once over the database's pool.
    pub fn new(db: Database) -> Self {
        AppState {
            products: db.products(),
            orders: db.orders(),
            db,
        }
    }
}
