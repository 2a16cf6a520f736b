//! # Order Repository
//!
//! Storage operations for orders.
//!
//! Orders are stored with raw product ids. Single-order reads and every
//! write return the resolved view ([`ResolvedOrder`]); the list returns the
//! stored form.
//!
//! ## Status Lifecycle
//! ```text
//!   CREATED ──► PENDING ──► COMPLETED
//!
//!   Permissive (default): any value from any value
//!   Forward:              same or later only, COMPLETED → CREATED refused
//! ```

use tracing::{debug, error};

use catalog_core::validation::{validate_new_order, validate_order};
use catalog_core::{DeleteAck, NewOrder, Order, OrderChange, OrderListQuery, ResolvedOrder, StatusPolicy};

use crate::error::{DbError, DbResult};
use crate::repository::generate_document_id;
use crate::repository::product::ProductRepository;
use crate::resolution::resolve_order;
use crate::store::{Document, DocumentStore, FindQuery};

/// Repository for order storage operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = OrderRepository::new(store, products)
///     .with_status_policy(StatusPolicy::Forward);
///
/// let order = repo.edit("uuid-here", OrderChange::status(OrderStatus::Pending)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderRepository {
    store: DocumentStore,
    products: ProductRepository,
    status_policy: StatusPolicy,
}

impl OrderRepository {
    /// Creates a new OrderRepository with the permissive status policy.
    pub fn new(store: DocumentStore, products: ProductRepository) -> Self {
        OrderRepository {
            store,
            products,
            status_policy: StatusPolicy::default(),
        }
    }

    /// Replaces the status policy applied on edit.
    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    pub fn status_policy(&self) -> StatusPolicy {
        self.status_policy
    }

    /// Lists orders.
    ///
    /// ## Arguments
    /// * `query` - offset, limit and two optional filters combined with AND:
    ///   `productId` (order references it) and `status` (exact match)
    ///
    /// ## Returns
    /// Stored orders (raw product ids), sorted by id.
    pub async fn list(&self, query: &OrderListQuery) -> DbResult<Vec<Order>> {
        debug!(
            offset = query.offset,
            limit = query.limit,
            product_id = ?query.referenced_product(),
            status = ?query.status,
            "Listing orders"
        );

        let mut find = FindQuery::new().skip(query.offset).limit(query.limit);
        if let Some(product_id) = query.referenced_product() {
            find = find.where_contains("products", product_id);
        }
        if let Some(status) = query.status {
            find = find.where_eq("status", status.as_str());
        }

        let orders: Vec<Order> = self.store.find(&find).await?;

        debug!(count = orders.len(), "List returned orders");
        Ok(orders)
    }

    /// Gets an order by id with its product references resolved.
    ///
    /// ## Returns
    /// * `Ok(Some(ResolvedOrder))` - Order found; dangling references are `None`
    /// * `Ok(None)` - No order with this id
    pub async fn get(&self, id: &str) -> DbResult<Option<ResolvedOrder>> {
        debug!(id = %id, "Getting order");

        match self.find_stored(id).await? {
            Some(order) => Ok(Some(resolve_order(&self.products, order).await?)),
            None => Ok(None),
        }
    }

    /// Creates an order.
    ///
    /// ## What This Does
    /// 1. Uses the supplied id, or generates a UUID when it is absent or blank
    /// 2. Requires `buyerEmail` and a non-empty `products` list
    /// 3. Defaults `status` to `CREATED`
    /// 4. Stores the raw ids and returns the resolved view
    ///
    /// Product ids are not checked for existence.
    pub async fn create(&self, draft: NewOrder) -> DbResult<ResolvedOrder> {
        let id = draft
            .requested_id()
            .map(str::to_string)
            .unwrap_or_else(generate_document_id);

        let order = validate_new_order(draft, id)?;

        debug!(
            id = %order.id,
            products = order.products.len(),
            status = %order.status,
            "Creating order"
        );
        self.store.insert(&order).await?;

        resolve_order(&self.products, order).await
    }

    /// Applies an allow-listed partial update.
    ///
    /// Always works on the stored (raw id) form, so resolved product objects
    /// never reach the store. Last write wins.
    ///
    /// ## Returns
    /// * `Ok(ResolvedOrder)` - The updated order, resolved
    /// * `Err(DbError::NotFound)` - No order with this id
    /// * `Err(DbError::Domain(CoreError::InvalidStatusTransition))` - Refused
    ///   by the forward-only policy
    /// * `Err(DbError::Domain(CoreError::Validation))` - Result is invalid
    pub async fn edit(&self, id: &str, change: OrderChange) -> DbResult<ResolvedOrder> {
        debug!(id = %id, fields = ?change.fields(), "Editing order");

        let mut order = self
            .find_stored(id)
            .await?
            .ok_or_else(|| DbError::not_found(Order::ENTITY, id))?;

        change.apply_to(&mut order, self.status_policy)?;
        validate_order(&order)?;

        self.store.replace(&order).await?;

        resolve_order(&self.products, order).await
    }

    /// Deletes an order.
    ///
    /// ## Returns
    /// * `Ok(DeleteAck)` - `"Order deleted successfully"`
    /// * `Err(DbError::NotFound)` - No order with this id
    pub async fn destroy(&self, id: &str) -> DbResult<DeleteAck> {
        let result = self.remove(id).await;

        if let Err(ref e) = result {
            error!(id = %id, error = %e, "Error deleting order");
        }

        result
    }

    async fn remove(&self, id: &str) -> DbResult<DeleteAck> {
        if self.find_stored(id).await?.is_none() {
            return Err(DbError::not_found(Order::ENTITY, id));
        }

        self.store.delete::<Order>(id).await?;
        debug!(id = %id, "Order deleted");

        Ok(DeleteAck::deleted(Order::ENTITY))
    }

    /// Counts all stored orders.
    pub async fn count(&self) -> DbResult<i64> {
        self.store.count::<Order>(&FindQuery::new()).await
    }

    async fn find_stored(&self, id: &str) -> DbResult<Option<Order>> {
        self.store.find_by_id(id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use catalog_core::{CoreError, NewProduct, OrderStatus, ValidationError};
    use serde_json::json;

    async fn setup() -> (OrderRepository, ProductRepository) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let products = db.products();

        for id in ["p1", "p2"] {
            let draft: NewProduct = serde_json::from_value(json!({
                "id": id,
                "likes": 1,
                "urls": {"regular": "r", "small": "s", "thumb": "t"},
                "links": {"self": "self", "html": "html"},
                "user": {"id": "u1", "first_name": "Ada", "username": "ada"}
            }))
            .unwrap();
            products.create(draft).await.unwrap();
        }

        (db.orders(), products)
    }

    fn draft(id: &str, products: &[&str], status: Option<OrderStatus>) -> NewOrder {
        NewOrder {
            id: Some(id.to_string()),
            buyer_email: Some("buyer@example.com".to_string()),
            products: products.iter().map(|p| p.to_string()).collect(),
            status,
        }
    }

    fn ids(orders: &[Order]) -> Vec<&str> {
        orders.iter().map(|o| o.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_resolves_products() {
        let (repo, _) = setup().await;

        let created = repo.create(draft("o1", &["p2", "p1"], None)).await.unwrap();
        assert_eq!(created.status, OrderStatus::Created);

        let resolved: Vec<&str> = created
            .products
            .iter()
            .map(|slot| slot.as_ref().map(|p| p.id.as_str()).unwrap_or("-"))
            .collect();
        assert_eq!(resolved, vec!["p2", "p1"]);

        let fetched = repo.get("o1").await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(repo.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_requires_buyer_and_products() {
        let (repo, _) = setup().await;

        let mut no_buyer = draft("o1", &["p1"], None);
        no_buyer.buyer_email = None;
        let err = repo.create(no_buyer).await.unwrap_err();
        assert_eq!(err.as_validation(), Some(&ValidationError::required("buyerEmail")));

        let err = repo.create(draft("o2", &[], None)).await.unwrap_err();
        assert_eq!(err.as_validation(), Some(&ValidationError::required("products")));

        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_generates_id() {
        let (repo, _) = setup().await;

        let mut without_id = draft("", &["p1"], None);
        without_id.id = None;

        let created = repo.create(without_id).await.unwrap();
        assert!(!created.id.is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_combine() {
        let (repo, _) = setup().await;
        repo.create(draft("o3", &["p1"], Some(OrderStatus::Pending))).await.unwrap();
        repo.create(draft("o1", &["p1", "p2"], Some(OrderStatus::Created))).await.unwrap();
        repo.create(draft("o2", &["p2"], Some(OrderStatus::Pending))).await.unwrap();

        let all = repo.list(&OrderListQuery::new()).await.unwrap();
        assert_eq!(ids(&all), vec!["o1", "o2", "o3"]);
        assert_eq!(all[0].products, vec!["p1", "p2"]);

        let with_p1 = repo.list(&OrderListQuery::new().product_id("p1")).await.unwrap();
        assert_eq!(ids(&with_p1), vec!["o1", "o3"]);

        let pending = repo
            .list(&OrderListQuery::new().status(OrderStatus::Pending))
            .await
            .unwrap();
        assert_eq!(ids(&pending), vec!["o2", "o3"]);

        let both = repo
            .list(&OrderListQuery::new().product_id("p1").status(OrderStatus::Pending))
            .await
            .unwrap();
        assert_eq!(ids(&both), vec!["o3"]);

        let page = repo.list(&OrderListQuery::new().offset(1).limit(1)).await.unwrap();
        assert_eq!(ids(&page), vec!["o2"]);
    }

    #[tokio::test]
    async fn test_edit_status_only() {
        let (repo, _) = setup().await;
        repo.create(draft("o1", &["p1", "p2"], None)).await.unwrap();

        let change = OrderChange::from_json(json!({"status": "PENDING"})).unwrap();
        let edited = repo.edit("o1", change).await.unwrap();

        assert_eq!(edited.status, OrderStatus::Pending);
        assert_eq!(edited.buyer_email, "buyer@example.com");
        assert_eq!(edited.products.len(), 2);

        // Stored form keeps raw ids.
        let stored = repo.list(&OrderListQuery::new()).await.unwrap();
        assert_eq!(stored[0].products, vec!["p1", "p2"]);
        assert_eq!(stored[0].status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_edit_missing_order() {
        let (repo, _) = setup().await;

        let err = repo
            .edit("missing", OrderChange::status(OrderStatus::Completed))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_permissive_policy_allows_backwards() {
        let (repo, _) = setup().await;
        repo.create(draft("o1", &["p1"], Some(OrderStatus::Completed))).await.unwrap();

        let edited = repo
            .edit("o1", OrderChange::status(OrderStatus::Created))
            .await
            .unwrap();
        assert_eq!(edited.status, OrderStatus::Created);
    }

    #[tokio::test]
    async fn test_forward_policy_refuses_backwards() {
        let (repo, _) = setup().await;
        let repo = repo.with_status_policy(StatusPolicy::Forward);
        repo.create(draft("o1", &["p1"], Some(OrderStatus::Completed))).await.unwrap();

        let err = repo
            .edit("o1", OrderChange::status(OrderStatus::Pending))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InvalidStatusTransition {
                from: OrderStatus::Completed,
                to: OrderStatus::Pending,
            })
        ));

        let stored = repo.get("o1").await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn test_deleted_product_leaves_null_slot() {
        let (repo, products) = setup().await;
        repo.create(draft("o1", &["p1", "p2"], None)).await.unwrap();

        products.destroy("p1").await.unwrap();

        let order = repo.get("o1").await.unwrap().unwrap();
        assert!(order.products[0].is_none());
        assert_eq!(order.products[1].as_ref().map(|p| p.id.as_str()), Some("p2"));
    }

    #[tokio::test]
    async fn test_destroy() {
        let (repo, _) = setup().await;
        repo.create(draft("o1", &["p1"], None)).await.unwrap();

        let err = repo.destroy("missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(repo.count().await.unwrap(), 1);

        let ack = repo.destroy("o1").await.unwrap();
        assert_eq!(ack.message, "Order deleted successfully");
        assert!(repo.get("o1").await.unwrap().is_none());
    }
}
