//! # Product Repository
//!
//! Storage operations for products.
//!
//! ## Key Operations
//! - Paginated listing, optionally filtered by tag title
//! - Batch lookup used to resolve order references
//! - Create / edit / destroy
//!
//! ## Tag Filter
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET /products?tag=nature&offset=0&limit=2                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  products with any tags[i].title == "nature"                            │
//! │  ┌──────┬───────────────────────────────┐                               │
//! │  │ id   │ tags                          │                               │
//! │  ├──────┼───────────────────────────────┤                               │
//! │  │ p-01 │ [nature, forest]              │ ← MATCH                       │
//! │  │ p-02 │ [city]                        │                               │
//! │  │ p-03 │ [Nature]                      │   (exact, case-sensitive)     │
//! │  │ p-04 │ [sea, nature]                 │ ← MATCH                       │
//! │  └──────┴───────────────────────────────┘                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sorted by id, skip 0, take 2 → [p-01, p-04]                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use tracing::{debug, error};

use catalog_core::validation::{validate_new_product, validate_product};
use catalog_core::{DeleteAck, NewProduct, Product, ProductChange, ProductListQuery};

use crate::error::{DbError, DbResult};
use crate::repository::generate_document_id;
use crate::store::{Document, DocumentStore, FindQuery};

/// Repository for product storage operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(store);
///
/// let page = repo.list(&ProductListQuery::new().tag("nature")).await?;
/// let product = repo.get("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    store: DocumentStore,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(store: DocumentStore) -> Self {
        ProductRepository { store }
    }

    /// Lists products, optionally only those carrying a tag title.
    ///
    /// ## Arguments
    /// * `query` - offset, limit and optional tag. An empty tag means no filter.
    ///
    /// ## Returns
    /// At most `limit` products, sorted by id, after skipping `offset`
    /// matches. Past the end the page is empty.
    pub async fn list(&self, query: &ProductListQuery) -> DbResult<Vec<Product>> {
        debug!(
            offset = query.offset,
            limit = query.limit,
            tag = ?query.tag_filter(),
            "Listing products"
        );

        let mut find = FindQuery::new().skip(query.offset).limit(query.limit);
        if let Some(tag) = query.tag_filter() {
            find = find.where_elem_match("tags", "title", tag);
        }

        let products: Vec<Product> = self.store.find(&find).await?;

        debug!(count = products.len(), "List returned products");
        Ok(products)
    }

    /// Gets a product by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - No product with this id
    pub async fn get(&self, id: &str) -> DbResult<Option<Product>> {
        debug!(id = %id, "Getting product");
        self.store.find_by_id(id).await
    }

    /// Looks up many products in one query.
    ///
    /// ## Returns
    /// One slot per input id, in input order (duplicates included). Ids with
    /// no stored product give `None`.
    pub async fn get_many(&self, ids: &[String]) -> DbResult<Vec<Option<Product>>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut unique = ids.to_vec();
        unique.sort();
        unique.dedup();

        let found: HashMap<String, Product> = self
            .store
            .find_by_ids::<Product>(&unique)
            .await?
            .into_iter()
            .map(|product| (product.id.clone(), product))
            .collect();

        Ok(ids.iter().map(|id| found.get(id).cloned()).collect())
    }

    /// Creates a product.
    ///
    /// ## What This Does
    /// 1. Uses the supplied id, or generates a UUID when it is absent or blank
    /// 2. Checks required fields (`likes`, `urls.*`, `links.*`, `user.*`, tag titles)
    /// 3. Inserts the document
    ///
    /// ## Returns
    /// * `Ok(Product)` - The stored product
    /// * `Err(DbError::Domain(..))` - A required field is missing
    /// * `Err(DbError::UniqueViolation)` - The id is already taken
    pub async fn create(&self, draft: NewProduct) -> DbResult<Product> {
        let id = draft
            .requested_id()
            .map(str::to_string)
            .unwrap_or_else(generate_document_id);

        let product = validate_new_product(draft, id)?;

        debug!(id = %product.id, tags = product.tags.len(), "Creating product");
        self.store.insert(&product).await?;

        Ok(product)
    }

    /// Applies an allow-listed partial update.
    ///
    /// Last write wins: the product is read, changed and written back without
    /// locking.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The updated product
    /// * `Err(DbError::NotFound)` - No product with this id
    /// * `Err(DbError::Domain(..))` - The result would miss a required field
    pub async fn edit(&self, id: &str, change: ProductChange) -> DbResult<Product> {
        debug!(id = %id, fields = ?change.fields(), "Editing product");

        let mut product = self
            .get(id)
            .await?
            .ok_or_else(|| DbError::not_found(Product::ENTITY, id))?;

        change.apply_to(&mut product);
        validate_product(&product)?;

        self.store.replace(&product).await?;
        Ok(product)
    }

    /// Deletes a product.
    ///
    /// Orders that reference it are left alone; their slot resolves to
    /// `None` from then on.
    ///
    /// ## Returns
    /// * `Ok(DeleteAck)` - `"Product deleted successfully"`
    /// * `Err(DbError::NotFound)` - No product with this id
    pub async fn destroy(&self, id: &str) -> DbResult<DeleteAck> {
        let result = self.remove(id).await;

        if let Err(ref e) = result {
            error!(id = %id, error = %e, "Error deleting product");
        }

        result
    }

    async fn remove(&self, id: &str) -> DbResult<DeleteAck> {
        if self.get(id).await?.is_none() {
            return Err(DbError::not_found(Product::ENTITY, id));
        }

        self.store.delete::<Product>(id).await?;
        debug!(id = %id, "Product deleted");

        Ok(DeleteAck::deleted(Product::ENTITY))
    }

    /// Counts all stored products.
    pub async fn count(&self) -> DbResult<i64> {
        self.store.count::<Product>(&FindQuery::new()).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use catalog_core::{ProductLinks, ProductUrls, ProductUser, Tag, ValidationError};
    use serde_json::json;

    fn draft(id: &str, tags: &[&str]) -> NewProduct {
        NewProduct {
            id: Some(id.to_string()),
            description: Some(format!("Photo {}", id)),
            alt_description: None,
            likes: Some(10),
            urls: Some(ProductUrls {
                regular: format!("https://img.test/{}/regular.jpg", id),
                small: format!("https://img.test/{}/small.jpg", id),
                thumb: format!("https://img.test/{}/thumb.jpg", id),
            }),
            links: Some(ProductLinks {
                self_link: format!("https://api.test/photos/{}", id),
                html: format!("https://img.test/photos/{}", id),
            }),
            user: Some(ProductUser {
                id: "u1".to_string(),
                first_name: "Ada".to_string(),
                last_name: None,
                portfolio_url: None,
                username: "ada".to_string(),
            }),
            tags: tags.iter().map(|t| Tag::new(*t)).collect(),
        }
    }

    async fn setup() -> ProductRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.products()
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = setup().await;

        let created = repo.create(draft("p1", &["nature"])).await.unwrap();
        assert_eq!(created.id, "p1");

        let fetched = repo.get("p1").await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(repo.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_generates_id() {
        let repo = setup().await;

        let mut without_id = draft("ignored", &[]);
        without_id.id = Some("   ".to_string());

        let created = repo.create(without_id).await.unwrap();
        assert!(!created.id.trim().is_empty());
        assert_ne!(created.id, "ignored");
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_keeps_padded_id() {
        let repo = setup().await;
        repo.create(draft("p1", &[])).await.unwrap();

        let padded = repo.create(draft(" p1 ", &[])).await.unwrap();
        assert_eq!(padded.id, " p1 ");
        assert_eq!(repo.count().await.unwrap(), 2);
        assert!(repo.get(" p1 ").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_missing_required_field() {
        let repo = setup().await;

        let mut bad = draft("p1", &[]);
        bad.likes = None;

        let err = repo.create(bad).await.unwrap_err();
        assert_eq!(err.as_validation(), Some(&ValidationError::required("likes")));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_duplicate_id() {
        let repo = setup().await;
        repo.create(draft("p1", &[])).await.unwrap();

        let err = repo.create(draft("p1", &[])).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_filters_by_tag_and_paginates() {
        let repo = setup().await;
        repo.create(draft("p3", &["Nature"])).await.unwrap();
        repo.create(draft("p1", &["nature", "forest"])).await.unwrap();
        repo.create(draft("p4", &["sea", "nature"])).await.unwrap();
        repo.create(draft("p2", &["city"])).await.unwrap();

        let all = repo.list(&ProductListQuery::new()).await.unwrap();
        assert_eq!(ids(&all), vec!["p1", "p2", "p3", "p4"]);

        let tagged = repo
            .list(&ProductListQuery::new().tag("nature"))
            .await
            .unwrap();
        assert_eq!(ids(&tagged), vec!["p1", "p4"]);

        let page = repo
            .list(&ProductListQuery::new().offset(1).limit(2))
            .await
            .unwrap();
        assert_eq!(ids(&page), vec!["p2", "p3"]);

        let past_end = repo
            .list(&ProductListQuery::new().offset(10))
            .await
            .unwrap();
        assert!(past_end.is_empty());

        let empty_tag = repo.list(&ProductListQuery::new().tag("")).await.unwrap();
        assert_eq!(empty_tag.len(), 4);
    }

    #[tokio::test]
    async fn test_get_many_keeps_input_order() {
        let repo = setup().await;
        repo.create(draft("p1", &[])).await.unwrap();
        repo.create(draft("p2", &[])).await.unwrap();

        let ids = vec![
            "p2".to_string(),
            "gone".to_string(),
            "p1".to_string(),
            "p2".to_string(),
        ];
        let slots = repo.get_many(&ids).await.unwrap();

        let resolved: Vec<Option<&str>> = slots
            .iter()
            .map(|slot| slot.as_ref().map(|p| p.id.as_str()))
            .collect();
        assert_eq!(resolved, vec![Some("p2"), None, Some("p1"), Some("p2")]);

        assert!(repo.get_many(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_applies_allowed_fields() {
        let repo = setup().await;
        repo.create(draft("p1", &["nature"])).await.unwrap();

        let change = ProductChange::from_json(json!({
            "likes": 42,
            "description": null,
            "tags": [{"title": "sea"}]
        }))
        .unwrap();

        let edited = repo.edit("p1", change).await.unwrap();
        assert_eq!(edited.likes, 42);
        assert_eq!(edited.description, None);
        assert!(edited.has_tag("sea"));
        assert!(!edited.has_tag("nature"));

        let stored = repo.get("p1").await.unwrap().unwrap();
        assert_eq!(stored, edited);
    }

    #[tokio::test]
    async fn test_edit_missing_product() {
        let repo = setup().await;

        let change = ProductChange::from_json(json!({"likes": 1})).unwrap();
        let err = repo.edit("missing", change).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Product not found: missing");
    }

    #[tokio::test]
    async fn test_edit_rejects_blank_required_field() {
        let repo = setup().await;
        repo.create(draft("p1", &[])).await.unwrap();

        let change = ProductChange::from_json(json!({
            "urls": {"regular": "https://img.test/r.jpg", "small": "", "thumb": "t"}
        }))
        .unwrap();

        let err = repo.edit("p1", change).await.unwrap_err();
        assert!(err.as_validation().is_some());

        let stored = repo.get("p1").await.unwrap().unwrap();
        assert_eq!(stored.urls.small, "https://img.test/p1/small.jpg");
    }

    #[tokio::test]
    async fn test_destroy() {
        let repo = setup().await;
        repo.create(draft("p1", &[])).await.unwrap();

        let ack = repo.destroy("p1").await.unwrap();
        assert!(ack.success);
        assert_eq!(ack.message, "Product deleted successfully");
        assert!(repo.get("p1").await.unwrap().is_none());

        let err = repo.destroy("p1").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
