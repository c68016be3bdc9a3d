use async_trait::async_trait;
use bson::{doc, Bson, Document};

use crate::db::models::{IS_PREMIUM, PROFILE_VIEWS, SKILLS, USERS, USER_ID};
use crate::db::repository::collect_documents;
use crate::error::AppError;

/// Repository trait for the `users` collection.
///
/// Each update flavour is its own method so that the update operator
/// (`$set` of the body, `$push`, `$set` of a literal) stays explicit.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List every user.
    async fn list(&self) -> Result<Vec<Document>, AppError>;

    /// Find a user by `userId`.
    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<Document>, AppError>;

    /// Insert the document as given. Returns the store-assigned `_id`.
    async fn insert(&self, user: Document) -> Result<Bson, AppError>;

    /// Merge `fields` into the user with `$set`. Returns the modified count.
    async fn update_fields(&self, user_id: &str, fields: Document) -> Result<u64, AppError>;

    /// Delete the user. Returns the deleted count.
    async fn delete(&self, user_id: &str) -> Result<u64, AppError>;

    /// Find a user projected down to its `profileViews` field.
    async fn find_profile_views(&self, user_id: &str) -> Result<Option<Document>, AppError>;

    /// Append `skill` to the user's `skills` array. Returns the modified count.
    async fn push_skill(&self, user_id: &str, skill: Bson) -> Result<u64, AppError>;

    /// Set `isPremium` to true. Returns the modified count.
    async fn set_premium(&self, user_id: &str) -> Result<u64, AppError>;
}

/// MongoDB implementation of the UserRepository.
pub struct MongoUserRepository {
    collection: mongodb::Collection<Document>,
}

impl MongoUserRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection(USERS),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn list(&self) -> Result<Vec<Document>, AppError> {
        let cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        collect_documents(cursor).await
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<Document>, AppError> {
        self.collection
            .find_one(doc! { USER_ID: user_id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn insert(&self, user: Document) -> Result<Bson, AppError> {
        let result = self
            .collection
            .insert_one(user)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.inserted_id)
    }

    async fn update_fields(&self, user_id: &str, fields: Document) -> Result<u64, AppError> {
        let result = self
            .collection
            .update_one(doc! { USER_ID: user_id }, doc! { "$set": fields })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.modified_count)
    }

    async fn delete(&self, user_id: &str) -> Result<u64, AppError> {
        let result = self
            .collection
            .delete_one(doc! { USER_ID: user_id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.deleted_count)
    }

    async fn find_profile_views(&self, user_id: &str) -> Result<Option<Document>, AppError> {
        self.collection
            .find_one(doc! { USER_ID: user_id })
            .projection(doc! { PROFILE_VIEWS: 1 })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn push_skill(&self, user_id: &str, skill: Bson) -> Result<u64, AppError> {
        let result = self
            .collection
            .update_one(doc! { USER_ID: user_id }, doc! { "$push": { SKILLS: skill } })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.modified_count)
    }

    async fn set_premium(&self, user_id: &str) -> Result<u64, AppError> {
        let result = self
            .collection
            .update_one(doc! { USER_ID: user_id }, doc! { "$set": { IS_PREMIUM: true } })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.modified_count)
    }
}
