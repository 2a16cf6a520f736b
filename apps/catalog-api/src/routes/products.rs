//! Product route handlers.
//!
//! | Verb   | Path            | Handler          |
//! |--------|-----------------|------------------|
//! | GET    | `/products`     | `list_products`  |
//! | POST   | `/products`     | `create_product` |
//! | GET    | `/products/:id` | `get_product`    |
//! | PUT    | `/products/:id` | `edit_product`   |
//! | DELETE | `/products/:id` | `delete_product` |

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use catalog_core::validation::from_json;
use catalog_core::{DeleteAck, NewProduct, Product, ProductChange, ProductListQuery};

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(edit_product).delete(delete_product),
        )
}

/// GET /products?offset&limit&tag
async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ProductListQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let Query(query) = query?;
    let products = state.products.list(&query).await?;
    Ok(Json(products))
}

/// GET /products/:id
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    state
        .products
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product", &id))
}

/// POST /products
async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Json(body) = body?;
    let draft: NewProduct = from_json(body)?;

    let product = state.products.create(draft).await?;
    tracing::info!(id = %product.id, "Product created");

    Ok(Json(product))
}

/// PUT /products/:id
async fn edit_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Json(body) = body?;
    let change = ProductChange::from_json(body)?;

    let product = state.products.edit(&id, change).await?;
    Ok(Json(product))
}

/// DELETE /products/:id
///
/// Every failure, not-found included, answers 500 with a fixed message; the
/// repository has already logged the cause.
async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, ApiError> {
    state
        .products
        .destroy(&id)
        .await
        .map(Json)
        .map_err(|_| ApiError::internal("Failed to delete the product"))
}
