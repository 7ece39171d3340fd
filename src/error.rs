//! Error types for Bookshelf

use std::path::PathBuf;

use thiserror::Error;

/// Stable error codes, also used as the process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    NoSuchItem = 2,
    BadValue = 3,
    StorageFailure = 4,
    CorruptCatalog = 5,
    BadConfig = 6,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Book with id {0} not found")]
    NotFound(i32),

    #[error("Invalid status '{0}': use \"available\" or \"checked-out\"")]
    InvalidStatus(String),

    #[error("Storage error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog file {} is not a valid book list: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No book id left after {0}")]
    IdsExhausted(i32),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AppError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    /// Errors the catalog cannot recover from; the driver should stop.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AppError::Io { .. }
                | AppError::Corrupt { .. }
                | AppError::IdsExhausted(_)
                | AppError::Config(_)
        )
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::NotFound(_) => ErrorCode::NoSuchItem,
            AppError::InvalidStatus(_) => ErrorCode::BadValue,
            AppError::Io { .. } => ErrorCode::StorageFailure,
            AppError::Corrupt { .. } => ErrorCode::CorruptCatalog,
            AppError::IdsExhausted(_) => ErrorCode::Failure,
            AppError::Config(_) => ErrorCode::BadConfig,
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
