//! Catalog management service
//!
//! Owns the in-memory book list and writes it back through the repository
//! after every mutation. A failed write undoes the mutation in memory before
//! the error is returned.

use crate::{
    error::{AppError, AppResult},
    models::{
        book::fold_case,
        Book, BookStatus, NewBook,
    },
    repository::Repository,
};

#[derive(Debug)]
pub struct CatalogService {
    repository: Repository,
    books: Vec<Book>,
    /// Highest id handed out so far; never decreases
    last_id: i32,
}

impl CatalogService {
    /// Load the catalog from the repository's backing file
    pub fn open(repository: Repository) -> AppResult<Self> {
        let books = repository.load()?;
        let last_id = books.iter().map(Book::id).max().unwrap_or(0);
        tracing::info!(
            "Loaded {} book(s) from {}",
            books.len(),
            repository.path().display()
        );
        Ok(Self {
            repository,
            books,
            last_id,
        })
    }

    /// All books, in insertion order
    pub fn list_books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Get a book by id
    pub fn find_by_id(&self, id: i32) -> AppResult<&Book> {
        self.books
            .iter()
            .find(|b| b.id == id)
            .ok_or(AppError::NotFound(id))
    }

    /// Books whose title, author or year contains `term`, ignoring case
    pub fn search_books(&self, term: &str) -> Vec<&Book> {
        let term = fold_case(term);
        self.books
            .iter()
            .filter(|b| b.matches_folded(&term))
            .collect()
    }

    /// Add a new book as available and persist the catalog
    pub fn add_book(&mut self, new: NewBook) -> AppResult<&Book> {
        let id = self.next_id()?;
        self.books.push(Book::from_new(id, new));

        if let Err(e) = self.persist() {
            self.books.pop();
            return Err(e);
        }

        let book = &self.books[self.books.len() - 1];
        tracing::info!("Catalog add: id={} title='{}'", book.id, book.title);
        Ok(book)
    }

    /// Remove a book and persist the catalog
    pub fn remove_book(&mut self, id: i32) -> AppResult<Book> {
        let Some(idx) = self.position(id) else {
            tracing::warn!("Catalog remove: id={} not found", id);
            return Err(AppError::NotFound(id));
        };
        let removed = self.books.remove(idx);

        if let Err(e) = self.persist() {
            self.books.insert(idx, removed);
            return Err(e);
        }

        tracing::info!("Catalog remove: id={} title='{}'", removed.id, removed.title);
        Ok(removed)
    }

    /// Change a book's status from user-supplied text
    pub fn change_status(&mut self, id: i32, new_status: &str) -> AppResult<&Book> {
        let status = new_status.parse::<BookStatus>().inspect_err(|_| {
            tracing::warn!("Catalog status: rejected '{}' for id={}", new_status, id);
        })?;
        self.set_status(id, status)
    }

    /// Set a book's status and persist the catalog
    pub fn set_status(&mut self, id: i32, status: BookStatus) -> AppResult<&Book> {
        let Some(idx) = self.position(id) else {
            tracing::warn!("Catalog status: id={} not found", id);
            return Err(AppError::NotFound(id));
        };
        let previous = std::mem::replace(&mut self.books[idx].status, status);

        if let Err(e) = self.persist() {
            self.books[idx].status = previous;
            return Err(e);
        }

        tracing::info!("Catalog status: id={} {} -> {}", id, previous, status);
        Ok(&self.books[idx])
    }

    fn position(&self, id: i32) -> Option<usize> {
        self.books.iter().position(|b| b.id == id)
    }

    fn next_id(&mut self) -> AppResult<i32> {
        let max_existing = self.books.iter().map(Book::id).max().unwrap_or(0);
        let current = self.last_id.max(max_existing);
        self.last_id = current
            .checked_add(1)
            .ok_or(AppError::IdsExhausted(current))?;
        Ok(self.last_id)
    }

    fn persist(&self) -> AppResult<()> {
        self.repository.save(&self.books)
    }
}
