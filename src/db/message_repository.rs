use async_trait::async_trait;
use bson::{doc, Bson, Document};

use crate::db::models::{MESSAGES, MESSAGE_ID, MESSAGE_RECIPIENT};
use crate::db::repository::collect_documents;
use crate::error::AppError;

/// Repository trait for the `messages` collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// List messages whose `to` equals `user_id`.
    async fn list_for_recipient(&self, user_id: &str) -> Result<Vec<Document>, AppError>;

    /// Insert the message as given. Returns the store-assigned `_id`.
    async fn insert(&self, message: Document) -> Result<Bson, AppError>;

    /// Delete the message. Returns the deleted count.
    async fn delete(&self, message_id: &str) -> Result<u64, AppError>;
}

/// MongoDB implementation of the MessageRepository.
pub struct MongoMessageRepository {
    collection: mongodb::Collection<Document>,
}

impl MongoMessageRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection(MESSAGES),
        }
    }
}

#[async_trait]
impl MessageRepository for MongoMessageRepository {
    async fn list_for_recipient(&self, user_id: &str) -> Result<Vec<Document>, AppError> {
        let cursor = self
            .collection
            .find(doc! { MESSAGE_RECIPIENT: user_id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        collect_documents(cursor).await
    }

    async fn insert(&self, message: Document) -> Result<Bson, AppError> {
        let result = self
            .collection
            .insert_one(message)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.inserted_id)
    }

    async fn delete(&self, message_id: &str) -> Result<u64, AppError> {
        let result = self
            .collection
            .delete_one(doc! { MESSAGE_ID: message_id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.deleted_count)
    }
}
