//! Order route handlers.
//!
//! Single-order responses carry resolved products (a deleted product shows
//! up as `null` in its slot); the list carries raw product ids.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use catalog_core::validation::from_json;
use catalog_core::{DeleteAck, NewOrder, Order, OrderChange, OrderListQuery, ResolvedOrder};

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route(
            "/orders/:id",
            get(get_order).put(edit_order).delete(delete_order),
        )
}

/// GET /orders?offset&limit&productId&status
async fn list_orders(
    State(state): State<AppState>,
    query: Result<Query<OrderListQuery>, QueryRejection>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let Query(query) = query?;
    let orders = state.orders.list(&query).await?;
    Ok(Json(orders))
}

/// GET /orders/:id
async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResolvedOrder>, ApiError> {
    state
        .orders
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Order", &id))
}

/// POST /orders
async fn create_order(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ResolvedOrder>, ApiError> {
    let Json(body) = body?;
    let draft: NewOrder = from_json(body)?;

    let order = state.orders.create(draft).await?;
    tracing::info!(id = %order.id, products = order.products.len(), "Order created");

    Ok(Json(order))
}

/// PUT /orders/:id
async fn edit_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ResolvedOrder>, ApiError> {
    let Json(body) = body?;
    let change = OrderChange::from_json(body)?;

    let order = state.orders.edit(&id, change).await?;
    Ok(Json(order))
}

/// DELETE /orders/:id
async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, ApiError> {
    state
        .orders
        .destroy(&id)
        .await
        .map(Json)
        .map_err(|_| ApiError::internal("Failed to delete the order"))
}
