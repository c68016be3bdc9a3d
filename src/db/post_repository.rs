use async_trait::async_trait;
use bson::{doc, Bson, Document};

use crate::db::models::{LIKES, POSTS, POST_ID};
use crate::db::repository::collect_documents;
use crate::error::AppError;

/// Repository trait for the `posts` collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// List every post.
    async fn list(&self) -> Result<Vec<Document>, AppError>;

    /// Find a post by `postId`.
    async fn find_by_post_id(&self, post_id: &str) -> Result<Option<Document>, AppError>;

    /// Insert the post as given. Returns the store-assigned `_id`.
    async fn insert(&self, post: Document) -> Result<Bson, AppError>;

    /// Atomically add one to `likes`. Returns the modified count.
    async fn increment_likes(&self, post_id: &str) -> Result<u64, AppError>;

    /// Delete the post. Returns the deleted count.
    async fn delete(&self, post_id: &str) -> Result<u64, AppError>;
}

/// MongoDB implementation of the PostRepository.
pub struct MongoPostRepository {
    collection: mongodb::Collection<Document>,
}

impl MongoPostRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection(POSTS),
        }
    }
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    async fn list(&self) -> Result<Vec<Document>, AppError> {
        let cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        collect_documents(cursor).await
    }

    async fn find_by_post_id(&self, post_id: &str) -> Result<Option<Document>, AppError> {
        self.collection
            .find_one(doc! { POST_ID: post_id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn insert(&self, post: Document) -> Result<Bson, AppError> {
        let result = self
            .collection
            .insert_one(post)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.inserted_id)
    }

    async fn increment_likes(&self, post_id: &str) -> Result<u64, AppError> {
        // $inc on a missing field starts it at 0
        let result = self
            .collection
            .update_one(doc! { POST_ID: post_id }, doc! { "$inc": { LIKES: 1 } })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.modified_count)
    }

    async fn delete(&self, post_id: &str) -> Result<u64, AppError> {
        let result = self
            .collection
            .delete_one(doc! { POST_ID: post_id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.deleted_count)
    }
}
