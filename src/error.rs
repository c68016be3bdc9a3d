use thiserror::Error;

/// Application-wide error types.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A store failure tagged with the operation that was being performed.
    #[error("Error {action}: {message}")]
    Operation {
        action: &'static str,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Tag a store failure with the operation in progress.
    ///
    /// Client-facing outcomes (`BadRequest`, `NotFound`) pass through untouched.
    pub fn doing(self, action: &'static str) -> Self {
        match self {
            AppError::Database(message) => AppError::Operation { action, message },
            other => other,
        }
    }
}

/// Extension for attaching an operation label to a fallible result.
pub trait OperationContext<T> {
    fn doing(self, action: &'static str) -> Result<T, AppError>;
}

impl<T> OperationContext<T> for Result<T, AppError> {
    fn doing(self, action: &'static str) -> Result<T, AppError> {
        self.map_err(|e| e.doing(action))
    }
}
