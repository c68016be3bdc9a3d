use async_trait::async_trait;
use bson::{doc, Bson, Document};

use crate::db::models::{CONNECTIONS, CONNECTION_ID, CONNECTION_OWNER, STATUS, STATUS_CONNECTED};
use crate::db::repository::collect_documents;
use crate::error::AppError;

/// Repository trait for the `connections` collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// List connections whose `user1` equals `user_id`.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Document>, AppError>;

    /// Insert a connection request as given. Returns the store-assigned `_id`.
    async fn insert(&self, connection: Document) -> Result<Bson, AppError>;

    /// Mark the connection as `connected`. Returns the modified count.
    async fn accept(&self, connection_id: &str) -> Result<u64, AppError>;

    /// Delete the connection. Returns the deleted count.
    async fn delete(&self, connection_id: &str) -> Result<u64, AppError>;
}

/// MongoDB implementation of the ConnectionRepository.
pub struct MongoConnectionRepository {
    collection: mongodb::Collection<Document>,
}

impl MongoConnectionRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection(CONNECTIONS),
        }
    }
}

#[async_trait]
impl ConnectionRepository for MongoConnectionRepository {
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Document>, AppError> {
        let cursor = self
            .collection
            .find(doc! { CONNECTION_OWNER: user_id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        collect_documents(cursor).await
    }

    async fn insert(&self, connection: Document) -> Result<Bson, AppError> {
        let result = self
            .collection
            .insert_one(connection)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.inserted_id)
    }

    async fn accept(&self, connection_id: &str) -> Result<u64, AppError> {
        let result = self
            .collection
            .update_one(
                doc! { CONNECTION_ID: connection_id },
                doc! { "$set": { STATUS: STATUS_CONNECTED } },
            )
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.modified_count)
    }

    async fn delete(&self, connection_id: &str) -> Result<u64, AppError> {
        let result = self
            .collection
            .delete_one(doc! { CONNECTION_ID: connection_id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.deleted_count)
    }
}
