use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::{Client, Cursor, Database};

use crate::config::AppConfig;
use crate::error::AppError;

/// Connect to MongoDB and verify the server is reachable.
///
/// The driver connects lazily, so a `ping` is issued to surface an
/// unreachable store at startup rather than on the first request.
pub async fn connect(config: &AppConfig) -> Result<Database, AppError> {
    let client = Client::with_uri_str(&config.mongodb_uri)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    let db = client.database(&config.database);

    db.run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(db)
}

/// Drain a cursor into a vector of documents.
pub(crate) async fn collect_documents(
    mut cursor: Cursor<Document>,
) -> Result<Vec<Document>, AppError> {
    let mut documents = Vec::new();
    while let Some(doc) = cursor
        .try_next()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
    {
        documents.push(doc);
    }

    Ok(documents)
}
