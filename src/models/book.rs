//! Book (catalog entry) model and related types.
//!
//! A `Book` only exists once the catalog has given it an id; callers describe
//! what they want to add with a `NewBook`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::error::AppError;

/// Lending status of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BookStatus {
    #[default]
    #[serde(rename = "available", alias = "в наличии")]
    Available,
    #[serde(rename = "checked-out", alias = "выдана")]
    CheckedOut,
}

impl BookStatus {
    /// Canonical label, as written to the catalog file
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "available",
            BookStatus::CheckedOut => "checked-out",
        }
    }
}

impl FromStr for BookStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "available" | "в наличии" => Ok(BookStatus::Available),
            "checked-out" | "выдана" => Ok(BookStatus::CheckedOut),
            _ => Err(AppError::InvalidStatus(s.to_string())),
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request to add a book to the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i32,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>, year: i32) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
        }
    }
}

/// Stored catalog entry. Field order matches the catalog file layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub(crate) id: i32,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub(crate) status: BookStatus,
}

impl Book {
    pub(crate) fn from_new(id: i32, new: NewBook) -> Self {
        Self::with_status(id, new, BookStatus::default())
    }

    pub(crate) fn with_status(id: i32, new: NewBook, status: BookStatus) -> Self {
        Self {
            id,
            title: new.title,
            author: new.author,
            year: new.year,
            status,
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn status(&self) -> BookStatus {
        self.status
    }

    /// Case-insensitive substring match on title, author or year
    pub fn matches(&self, term: &str) -> bool {
        self.matches_folded(&fold_case(term))
    }

    /// Same as `matches`, with `term` already passed through `fold_case`
    pub(crate) fn matches_folded(&self, term: &str) -> bool {
        fold_case(&self.title).contains(term)
            || fold_case(&self.author).contains(term)
            || self.year.to_string().contains(term)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Title: {}, Author: {}, Year: {}, Status: {}",
            self.id, self.title, self.author, self.year, self.status
        )
    }
}

/// NFC-normalize then lowercase, so composed and decomposed accents compare equal
pub(crate) fn fold_case(s: &str) -> String {
    s.nfc().collect::<String>().to_lowercase()
}
