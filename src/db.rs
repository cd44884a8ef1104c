use async_trait::async_trait;
use futures::stream::TryStreamExt;
use log::info;
use mongodb::bson::{doc, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions, UpdateOptions};
use mongodb::{Client, Collection, Database, IndexModel};

use crate::config::Config;
use crate::models::User;
use crate::store::{
    id_filter, DeleteOutcome, DocumentStore, FieldFilter, InsertOutcome, Record, StoreError,
    StoreResult, UpdateOutcome,
};

pub const USERS: &str = "users";
pub const CATEGORIES: &str = "homeCategory";
pub const MEDICINE: &str = "medicine";
pub const CARTS: &str = "carts";
pub const PAYMENTS: &str = "payments";
pub const ADVERTISEMENTS: &str = "advertisement";

const DUPLICATE_KEY: i32 = 11000;

pub async fn connect(config: &Config) -> StoreResult<Database> {
    let client_options = ClientOptions::parse(&config.database_url).await?;
    let client = Client::with_options(client_options)?;
    info!("using database {}", config.database_name);
    Ok(client.database(&config.database_name))
}

/// Email is the directory key; the unique index turns a racing second signup
/// into a duplicate-key error instead of a second record.
pub async fn ensure_indexes(db: &Database) -> StoreResult<()> {
    let index = IndexModel::builder()
        .keys(doc! { "email": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();
    db.collection::<User>(USERS).create_index(index, None).await?;
    Ok(())
}

pub struct MongoStore<T> {
    collection: Collection<T>,
}

impl<T> MongoStore<T> {
    pub fn new(db: &Database, name: &str) -> Self {
        MongoStore {
            collection: db.collection(name),
        }
    }
}

fn classify(err: mongodb::error::Error) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY => {
            StoreError::Duplicate(write.message.clone())
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl<T: Record> DocumentStore<T> for MongoStore<T> {
    async fn find(&self, filter: Option<FieldFilter>) -> StoreResult<Vec<T>> {
        let cursor = self
            .collection
            .find(filter.map(FieldFilter::into_document), None)
            .await?;
        let records: Vec<T> = cursor.try_collect().await?;
        Ok(records)
    }

    async fn find_one(&self, filter: FieldFilter) -> StoreResult<Option<T>> {
        Ok(self.collection.find_one(filter.into_document(), None).await?)
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<T>> {
        Ok(self.collection.find_one(id_filter(id), None).await?)
    }

    async fn insert(&self, record: &T) -> StoreResult<InsertOutcome> {
        self.collection
            .insert_one(record, None)
            .await
            .map_err(classify)?;
        Ok(InsertOutcome::new(record.id()))
    }

    async fn update_by_id(
        &self,
        id: &str,
        set: Document,
        upsert: bool,
    ) -> StoreResult<UpdateOutcome> {
        let options = UpdateOptions::builder().upsert(upsert).build();
        let result = self
            .collection
            .update_one(id_filter(id), doc! { "$set": set }, options)
            .await
            .map_err(classify)?;
        Ok(UpdateOutcome {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_id: result
                .upserted_id
                .and_then(|id| id.as_str().map(str::to_owned)),
        })
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<DeleteOutcome> {
        let result = self.collection.delete_one(id_filter(id), None).await?;
        Ok(DeleteOutcome::new(result.deleted_count))
    }

    async fn delete_many_by_ids(&self, ids: &[String]) -> StoreResult<DeleteOutcome> {
        let filter = doc! { "_id": { "$in": ids.to_vec() } };
        let result = self.collection.delete_many(filter, None).await?;
        Ok(DeleteOutcome::new(result.deleted_count))
    }
}
