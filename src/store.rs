//! Storage abstraction shared by every collection.
//!
//! Handlers and services only see [`DocumentStore`]; the MongoDB-backed
//! implementation lives in `db.rs`. Every write touches a single document
//! (or a single `delete_many`), so atomicity never spans documents.

use async_trait::async_trait;
use mongodb::bson::{doc, Bson, Document};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("document encoding failed: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),
    #[error("document decoding failed: {0}")]
    Decode(#[from] mongodb::bson::de::Error),
    #[error("duplicate key: {0}")]
    Duplicate(String),
}

/// A document that can live in a [`DocumentStore`].
pub trait Record: Serialize + DeserializeOwned + Unpin + Send + Sync + 'static {
    fn id(&self) -> &str;
}

/// Equality match on one top-level field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Bson,
}

impl FieldFilter {
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        FieldFilter {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn into_document(self) -> Document {
        let mut filter = Document::new();
        filter.insert(self.field, self.value);
        filter
    }

    pub fn matches(&self, document: &Document) -> bool {
        document.get(&self.field) == Some(&self.value)
    }
}

/// Builds an optional filter from a query-string value.
pub fn optional_filter(field: &str, value: Option<String>) -> Option<FieldFilter> {
    value.map(|v| FieldFilter::eq(field, v))
}

pub fn set_field(field: &str, value: impl Into<Bson>) -> Document {
    let mut set = Document::new();
    set.insert(field, value.into());
    set
}

pub fn id_filter(id: &str) -> Document {
    doc! { "_id": id }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertOutcome {
    pub fn new(id: impl Into<String>) -> Self {
        InsertOutcome {
            acknowledged: true,
            inserted_id: id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteOutcome {
    pub fn new(deleted_count: u64) -> Self {
        DeleteOutcome {
            acknowledged: true,
            deleted_count,
        }
    }
}

#[async_trait]
pub trait DocumentStore<T: Record>: Send + Sync {
    /// All documents in natural storage order, optionally narrowed by one equality match.
    async fn find(&self, filter: Option<FieldFilter>) -> StoreResult<Vec<T>>;

    async fn find_one(&self, filter: FieldFilter) -> StoreResult<Option<T>>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<T>>;

    async fn insert(&self, record: &T) -> StoreResult<InsertOutcome>;

    /// `$set` the given fields on one document. With `upsert`, a missing
    /// document is created from the id and the fields.
    async fn update_by_id(&self, id: &str, set: Document, upsert: bool)
        -> StoreResult<UpdateOutcome>;

    async fn delete_by_id(&self, id: &str) -> StoreResult<DeleteOutcome>;

    async fn delete_many_by_ids(&self, ids: &[String]) -> StoreResult<DeleteOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_filter_matches_only_equal_values() {
        let filter = FieldFilter::eq("email", "a@x.com");
        assert!(filter.matches(&doc! { "email": "a@x.com", "role": "user" }));
        assert!(!filter.matches(&doc! { "email": "b@x.com" }));
        assert!(!filter.matches(&doc! { "role": "user" }));
    }

    #[test]
    fn field_filter_renders_as_query_document() {
        let filter = FieldFilter::eq("category", "tablet");
        assert_eq!(filter.into_document(), doc! { "category": "tablet" });
    }

    #[test]
    fn outcomes_use_driver_field_names() {
        let insert = serde_json::to_value(InsertOutcome::new("abc")).unwrap();
        assert_eq!(insert["insertedId"], "abc");
        let delete = serde_json::to_value(DeleteOutcome::new(2)).unwrap();
        assert_eq!(delete["deletedCount"], 2);
    }
}
