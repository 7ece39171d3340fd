//! Bookshelf - personal book catalog manager
//!
//! Keeps a single user's catalog of books in a local JSON file: add, remove,
//! search, list, and track whether each book is available or checked out.

pub mod config;
pub mod error;
pub mod menu;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult, ErrorCode};
pub use models::{Book, BookStatus, NewBook};
pub use repository::Repository;
pub use services::CatalogService;
