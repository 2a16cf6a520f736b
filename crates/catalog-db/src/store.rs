//! # Document Store
//!
//! A small document store over one SQLite table.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  documents                                                              │
//! │  ┌────────────┬──────────┬─────────────────────────────────────────┐    │
//! │  │ collection │ id       │ body (JSON)                             │    │
//! │  ├────────────┼──────────┼─────────────────────────────────────────┤    │
//! │  │ products   │ 0b1e...  │ {"id":"0b1e...","likes":3,"tags":[..]}  │    │
//! │  │ orders     │ 7f3a...  │ {"id":"7f3a...","products":["0b1e..."]} │    │
//! │  └────────────┴──────────┴─────────────────────────────────────────┘    │
//! │                                                                         │
//! │  FindQuery predicates → SQL (JSON1)                                     │
//! │  ─────────────────────────────────                                      │
//! │  where_eq("status", v)          json_extract(body, '$.status') = ?      │
//! │  where_contains("products", v)  EXISTS (.. json_each(body, '$.products')│
//! │                                         WHERE elem.value = ?)           │
//! │  where_elem_match("tags",       EXISTS (.. json_each(body, '$.tags')    │
//! │                   "title", v)     WHERE json_extract(elem.value,        │
//! │                                                    '$.title') = ?)      │
//! │  id_in([..])                    id IN (?, ?, ..)                        │
//! │                                                                         │
//! │  Always: ORDER BY id ASC LIMIT <limit> OFFSET <skip>                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names come from code, are checked against a conservative identifier
//! pattern and inlined as JSON paths; every value is a bound parameter.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{Sqlite, SqlitePool};
use tracing::debug;

use catalog_core::{Order, Product};

use crate::error::{DbError, DbResult};

/// Upper bound on ids bound into a single `IN (..)` clause.
const MAX_IDS_PER_QUERY: usize = 500;

// =============================================================================
// Document
// =============================================================================

/// A value stored in its own collection and keyed by a string id.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + Unpin + 'static {
    /// Collection name, e.g. `"products"`.
    const COLLECTION: &'static str;

    /// Human-readable entity name used in errors, e.g. `"Product"`.
    const ENTITY: &'static str;

    fn id(&self) -> &str;
}

impl Document for Product {
    const COLLECTION: &'static str = "products";
    const ENTITY: &'static str = "Product";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for Order {
    const COLLECTION: &'static str = "orders";
    const ENTITY: &'static str = "Order";

    fn id(&self) -> &str {
        &self.id
    }
}

// =============================================================================
// Find Query
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Filter {
    Eq { field: String, value: String },
    Contains { field: String, value: String },
    ElemMatch { field: String, sub_field: String, value: String },
    IdIn(Vec<String>),
}

/// A conjunction of predicates plus an offset/limit window.
///
/// ## Example
/// ```rust
/// use catalog_db::store::FindQuery;
///
/// let query = FindQuery::new()
///     .where_eq("status", "PENDING")
///     .where_contains("products", "p1")
///     .skip(10)
///     .limit(5);
///
/// let (sql, params) = query.build_select("orders").unwrap();
/// assert!(sql.ends_with("ORDER BY id ASC LIMIT 5 OFFSET 10"));
/// assert_eq!(params, vec!["orders", "PENDING", "p1"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindQuery {
    filters: Vec<Filter>,
    skip: u64,
    limit: Option<u64>,
}

impl FindQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scalar field equals `value`.
    pub fn where_eq(mut self, field: &str, value: &str) -> Self {
        self.filters.push(Filter::Eq {
            field: field.to_string(),
            value: value.to_string(),
        });
        self
    }

    /// Array field has an element equal to `value`.
    pub fn where_contains(mut self, field: &str, value: &str) -> Self {
        self.filters.push(Filter::Contains {
            field: field.to_string(),
            value: value.to_string(),
        });
        self
    }

    /// Array-of-objects field has an element whose `sub_field` equals `value`.
    pub fn where_elem_match(mut self, field: &str, sub_field: &str, value: &str) -> Self {
        self.filters.push(Filter::ElemMatch {
            field: field.to_string(),
            sub_field: sub_field.to_string(),
            value: value.to_string(),
        });
        self
    }

    /// Document id is one of `ids`. An empty set matches nothing.
    pub fn id_in(mut self, ids: &[String]) -> Self {
        self.filters.push(Filter::IdIn(ids.to_vec()));
        self
    }

    /// Number of matching documents to skip.
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    /// Maximum number of documents to return.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Builds `SELECT body ...` for the collection, returning `(sql, params)`.
    pub fn build_select(&self, collection: &str) -> DbResult<(String, Vec<String>)> {
        let (mut sql, params) = self.build_filtered("SELECT body", collection)?;

        // SQLite needs a LIMIT to accept an OFFSET; -1 means unbounded.
        let limit = self.limit.map(clamp_to_i64).unwrap_or(-1);
        sql.push_str(&format!(
            " ORDER BY id ASC LIMIT {} OFFSET {}",
            limit,
            clamp_to_i64(self.skip)
        ));

        Ok((sql, params))
    }

    /// Builds `SELECT COUNT(*) ...` for the collection, ignoring skip/limit.
    pub fn build_count(&self, collection: &str) -> DbResult<(String, Vec<String>)> {
        self.build_filtered("SELECT COUNT(*)", collection)
    }

    fn build_filtered(&self, projection: &str, collection: &str) -> DbResult<(String, Vec<String>)> {
        let mut sql = format!("{} FROM documents WHERE collection = ?", projection);
        let mut params = vec![collection.to_string()];

        for filter in &self.filters {
            match filter {
                Filter::Eq { field, value } => {
                    sql.push_str(&format!(" AND json_extract(body, {}) = ?", json_path(field)?));
                    params.push(value.clone());
                }
                Filter::Contains { field, value } => {
                    sql.push_str(&format!(
                        " AND EXISTS (SELECT 1 FROM json_each(documents.body, {}) AS elem WHERE elem.value = ?)",
                        json_path(field)?
                    ));
                    params.push(value.clone());
                }
                Filter::ElemMatch {
                    field,
                    sub_field,
                    value,
                } => {
                    sql.push_str(&format!(
                        " AND EXISTS (SELECT 1 FROM json_each(documents.body, {}) AS elem WHERE json_extract(elem.value, {}) = ?)",
                        json_path(field)?,
                        json_path(sub_field)?
                    ));
                    params.push(value.clone());
                }
                Filter::IdIn(ids) if ids.is_empty() => {
                    sql.push_str(" AND 0");
                }
                Filter::IdIn(ids) => {
                    let placeholders = vec!["?"; ids.len()].join(", ");
                    sql.push_str(&format!(" AND id IN ({})", placeholders));
                    params.extend(ids.iter().cloned());
                }
            }
        }

        Ok((sql, params))
    }
}

/// Formats a field name as a quoted JSON path literal (`'$.field'`).
fn json_path(field: &str) -> DbResult<String> {
    let valid = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid {
        return Err(DbError::QueryFailed(format!(
            "invalid document field name: {:?}",
            field
        )));
    }

    Ok(format!("'$.{}'", field))
}

fn clamp_to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

// =============================================================================
// Document Store
// =============================================================================

/// Storage client shared by the repositories.
///
/// Cheap to clone (wraps the pool). Repositories receive it through their
/// constructors; there is no global handle.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    pool: SqlitePool,
}

impl DocumentStore {
    /// Creates a store over an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        DocumentStore { pool }
    }

    /// Returns every document of `D`'s collection matching the query.
    pub async fn find<D: Document>(&self, query: &FindQuery) -> DbResult<Vec<D>> {
        let (sql, params) = query.build_select(D::COLLECTION)?;
        debug!(collection = D::COLLECTION, sql = %sql, "Executing find");

        let bodies = self.fetch_bodies(&sql, &params).await?;
        decode_all(&bodies)
    }

    /// Fetches one document by id.
    pub async fn find_by_id<D: Document>(&self, id: &str) -> DbResult<Option<D>> {
        let body: Option<String> = sqlx::query_scalar::<Sqlite, String>(
            "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
        )
        .bind(D::COLLECTION)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        body.map(|body| serde_json::from_str(&body).map_err(DbError::from))
            .transpose()
    }

    /// Fetches every document whose id is in `ids` (set membership).
    ///
    /// Missing ids are simply absent from the result; order follows `id`.
    pub async fn find_by_ids<D: Document>(&self, ids: &[String]) -> DbResult<Vec<D>> {
        let mut documents = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(MAX_IDS_PER_QUERY) {
            let query = FindQuery::new().id_in(chunk);
            documents.extend(self.find::<D>(&query).await?);
        }

        Ok(documents)
    }

    /// Counts documents matching the query (skip/limit ignored).
    pub async fn count<D: Document>(&self, query: &FindQuery) -> DbResult<i64> {
        let (sql, params) = query.build_count(D::COLLECTION)?;

        let mut count_query = sqlx::query_scalar::<Sqlite, i64>(&sql);
        for param in &params {
            count_query = count_query.bind(param.as_str());
        }

        Ok(count_query.fetch_one(&self.pool).await?)
    }

    /// Inserts a new document.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - id already used in this collection
    pub async fn insert<D: Document>(&self, document: &D) -> DbResult<()> {
        let body = serde_json::to_string(document)?;

        let result = sqlx::query("INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)")
            .bind(D::COLLECTION)
            .bind(document.id())
            .bind(&body)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(DbError::duplicate("id", document.id()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrites the stored body of an existing document.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no document with this id
    pub async fn replace<D: Document>(&self, document: &D) -> DbResult<()> {
        let body = serde_json::to_string(document)?;

        let result = sqlx::query("UPDATE documents SET body = ?3 WHERE collection = ?1 AND id = ?2")
            .bind(D::COLLECTION)
            .bind(document.id())
            .bind(&body)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(D::ENTITY, document.id()));
        }

        Ok(())
    }

    /// Deletes a document by id.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no document with this id
    pub async fn delete<D: Document>(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ?1 AND id = ?2")
            .bind(D::COLLECTION)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(D::ENTITY, id));
        }

        Ok(())
    }

    async fn fetch_bodies(&self, sql: &str, params: &[String]) -> DbResult<Vec<String>> {
        let mut query = sqlx::query_scalar::<Sqlite, String>(sql);
        for param in params {
            query = query.bind(param.as_str());
        }

        Ok(query.fetch_all(&self.pool).await?)
    }
}

fn decode_all<D: Document>(bodies: &[String]) -> DbResult<Vec<D>> {
    bodies
        .iter()
        .map(|body| serde_json::from_str(body).map_err(DbError::from))
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Label {
        name: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        kind: String,
        refs: Vec<String>,
        labels: Vec<Label>,
    }

    impl Document for Note {
        const COLLECTION: &'static str = "notes";
        const ENTITY: &'static str = "Note";

        fn id(&self) -> &str {
            &self.id
        }
    }

    fn note(id: &str, kind: &str, refs: &[&str], labels: &[&str]) -> Note {
        Note {
            id: id.to_string(),
            kind: kind.to_string(),
            refs: refs.iter().map(|r| r.to_string()).collect(),
            labels: labels
                .iter()
                .map(|l| Label {
                    name: l.to_string(),
                })
                .collect(),
        }
    }

    async fn seeded_store() -> DocumentStore {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db.store();

        // Inserted out of id order on purpose.
        store.insert(&note("c", "memo", &["x", "y"], &["red"])).await.unwrap();
        store.insert(&note("a", "memo", &["y"], &["blue", "red"])).await.unwrap();
        store.insert(&note("d", "todo", &["x"], &[])).await.unwrap();
        store.insert(&note("b", "todo", &[], &["red"])).await.unwrap();

        store
    }

    fn ids(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_build_select_without_filters() {
        let (sql, params) = FindQuery::new().build_select("notes").unwrap();
        assert_eq!(
            sql,
            "SELECT body FROM documents WHERE collection = ? ORDER BY id ASC LIMIT -1 OFFSET 0"
        );
        assert_eq!(params, vec!["notes"]);
    }

    #[test]
    fn test_build_select_elem_match() {
        let (sql, params) = FindQuery::new()
            .where_elem_match("tags", "title", "nature")
            .build_select("products")
            .unwrap();

        assert!(sql.contains("json_each(documents.body, '$.tags')"));
        assert!(sql.contains("json_extract(elem.value, '$.title') = ?"));
        assert_eq!(params, vec!["products", "nature"]);
    }

    #[test]
    fn test_invalid_field_rejected() {
        let err = FindQuery::new()
            .where_eq("status') OR 1=1 --", "x")
            .build_select("orders")
            .unwrap_err();
        assert!(matches!(err, DbError::QueryFailed(_)));
    }

    #[test]
    fn test_empty_id_set_matches_nothing() {
        let (sql, _) = FindQuery::new().id_in(&[]).build_count("notes").unwrap();
        assert!(sql.ends_with("AND 0"));
    }

    #[tokio::test]
    async fn test_find_orders_by_id_and_paginates() {
        let store = seeded_store().await;

        let all: Vec<Note> = store.find(&FindQuery::new()).await.unwrap();
        assert_eq!(ids(&all), vec!["a", "b", "c", "d"]);

        let window: Vec<Note> = store.find(&FindQuery::new().skip(1).limit(2)).await.unwrap();
        assert_eq!(ids(&window), vec!["b", "c"]);

        let none: Vec<Note> = store.find(&FindQuery::new().limit(0)).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_predicates_combine_with_and() {
        let store = seeded_store().await;

        let memos: Vec<Note> = store.find(&FindQuery::new().where_eq("kind", "memo")).await.unwrap();
        assert_eq!(ids(&memos), vec!["a", "c"]);

        let refs_x: Vec<Note> = store.find(&FindQuery::new().where_contains("refs", "x")).await.unwrap();
        assert_eq!(ids(&refs_x), vec!["c", "d"]);

        let both: Vec<Note> = store
            .find(&FindQuery::new().where_eq("kind", "memo").where_contains("refs", "x"))
            .await
            .unwrap();
        assert_eq!(ids(&both), vec!["c"]);

        let red: Vec<Note> = store
            .find(&FindQuery::new().where_elem_match("labels", "name", "red"))
            .await
            .unwrap();
        assert_eq!(ids(&red), vec!["a", "b", "c"]);

        let count = store
            .count::<Note>(&FindQuery::new().where_elem_match("labels", "name", "red").limit(1))
            .await
            .unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_find_by_ids_skips_missing() {
        let store = seeded_store().await;

        let found: Vec<Note> = store
            .find_by_ids(&["d".to_string(), "zz".to_string(), "a".to_string()])
            .await
            .unwrap();
        assert_eq!(ids(&found), vec!["a", "d"]);
    }

    #[tokio::test]
    async fn test_insert_duplicate_id() {
        let store = seeded_store().await;

        let err = store.insert(&note("a", "memo", &[], &[])).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "a"));
    }

    #[tokio::test]
    async fn test_replace_and_delete() {
        let store = seeded_store().await;

        let mut updated = note("b", "memo", &["z"], &[]);
        store.replace(&updated).await.unwrap();
        let fetched: Option<Note> = store.find_by_id("b").await.unwrap();
        assert_eq!(fetched, Some(updated.clone()));

        store.delete::<Note>("b").await.unwrap();
        let fetched: Option<Note> = store.find_by_id("b").await.unwrap();
        assert_eq!(fetched, None);

        updated.id = "missing".to_string();
        assert!(store.replace(&updated).await.unwrap_err().is_not_found());
        assert!(store.delete::<Note>("missing").await.unwrap_err().is_not_found());
    }
}
