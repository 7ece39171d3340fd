//! Repository layer: the catalog's backing file.
//!
//! The whole catalog is one JSON array of book objects. Every save rewrites the
//! file from scratch; there is no incremental update.

use std::collections::HashSet;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::{
    config::StorageConfig,
    error::{AppError, AppResult},
    models::{Book, BookStatus, NewBook},
};

/// On-disk shape of a book. Older files may carry entries without an id.
#[derive(Debug, Deserialize)]
struct StoredBook {
    #[serde(default)]
    id: Option<i32>,
    title: String,
    author: String,
    year: i32,
    #[serde(default)]
    status: BookStatus,
}

#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
    atomic_write: bool,
}

impl Repository {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            path: config.path.clone(),
            atomic_write: config.atomic_write,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// Read the whole catalog. A missing or blank file is an empty catalog.
    pub fn load(&self) -> AppResult<Vec<Book>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No catalog at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(AppError::io(&self.path, e)),
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let stored: Vec<StoredBook> = serde_json::from_str(&raw).map_err(|source| self.corrupt(source))?;
        self.assign_ids(stored)
    }

    /// Keep stored ids, hand out fresh ones after the maximum to entries without one.
    fn assign_ids(&self, stored: Vec<StoredBook>) -> AppResult<Vec<Book>> {
        let mut seen = HashSet::with_capacity(stored.len());
        for id in stored.iter().filter_map(|s| s.id) {
            if !seen.insert(id) {
                return Err(self.corrupt(<serde_json::Error as serde::de::Error>::custom(
                    format!("duplicate book id {}", id),
                )));
            }
        }

        let mut next_id = seen.iter().copied().max().unwrap_or(0);
        let mut books = Vec::with_capacity(stored.len());
        for s in stored {
            let id = match s.id {
                Some(id) => id,
                None => {
                    next_id = next_id.checked_add(1).ok_or_else(|| {
                        self.corrupt(<serde_json::Error as serde::de::Error>::custom(format!(
                            "no id left for '{}' after {}",
                            s.title, next_id
                        )))
                    })?;
                    tracing::warn!("Book '{}' had no id, assigned {}", s.title, next_id);
                    next_id
                }
            };
            books.push(Book::with_status(id, NewBook::new(s.title, s.author, s.year), s.status));
        }
        Ok(books)
    }

    fn corrupt(&self, source: serde_json::Error) -> AppError {
        AppError::Corrupt {
            path: self.path.clone(),
            source,
        }
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Overwrite the backing file with `books`, in order.
    pub fn save(&self, books: &[Book]) -> AppResult<()> {
        let contents = encode(books).map_err(|e| AppError::io(&self.path, e.into()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| AppError::io(dir, e))?;

        if self.atomic_write {
            let mut tmp = NamedTempFile::new_in(dir).map_err(|e| AppError::io(dir, e))?;
            tmp.write_all(&contents)
                .and_then(|_| tmp.as_file().sync_all())
                .map_err(|e| AppError::io(tmp.path(), e))?;
            // Keep the permissions of the catalog being replaced
            if let Ok(meta) = fs::metadata(&self.path) {
                tmp.as_file()
                    .set_permissions(meta.permissions())
                    .map_err(|e| AppError::io(tmp.path(), e))?;
            }
            tmp.persist(&self.path)
                .map_err(|e| AppError::io(&self.path, e.error))?;
        } else {
            fs::write(&self.path, &contents).map_err(|e| AppError::io(&self.path, e))?;
        }

        tracing::debug!("Saved {} book(s) to {}", books.len(), self.path.display());
        Ok(())
    }
}

/// Pretty JSON with four-space indentation; non-ASCII text stays literal.
fn encode(books: &[Book]) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    books.serialize(&mut serializer)?;
    Ok(out)
}
