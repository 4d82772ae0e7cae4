//! Book management service

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPayload, BookQuery, BookSummary},
    repository::Repository,
};

static FLAG_FORMAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[01]+$").unwrap());

/// Which write a payload is validated for; selects the client message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteKind {
    Add,
    Update,
}

impl WriteKind {
    fn prefix(self) -> &'static str {
        match self {
            WriteKind::Add => "Gagal menambahkan buku",
            WriteKind::Update => "Gagal memperbarui buku",
        }
    }
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Store a new book and return its id
    pub async fn add(&self, payload: &BookPayload) -> AppResult<String> {
        validate(payload, WriteKind::Add)?;

        let book = self.repository.books.create(payload, Utc::now()).await;

        if !self.repository.books.exists(&book.id).await {
            return Err(AppError::Internal("Buku gagal ditambahkan".to_string()));
        }

        tracing::info!(book_id = %book.id, name = %book.name, "Book added");
        Ok(book.id)
    }

    /// List condensed books, optionally filtered
    pub async fn list(&self, query: &BookQuery) -> Vec<BookSummary> {
        let books = self.repository.books.list().await;
        select(&books, query).into_iter().map(BookSummary::from).collect()
    }

    /// Number of stored books
    pub async fn count(&self) -> usize {
        self.repository.books.count().await
    }

    pub async fn get(&self, id: &str) -> AppResult<Book> {
        self.repository
            .books
            .get_by_id(id)
            .await
            .ok_or_else(|| AppError::NotFound("Buku tidak ditemukan".to_string()))
    }

    /// Replace a book's fields; the payload is checked before the id is looked up
    pub async fn update(&self, id: &str, payload: &BookPayload) -> AppResult<Book> {
        validate(payload, WriteKind::Update)?;

        let book = self
            .repository
            .books
            .update(id, payload, Utc::now())
            .await
            .ok_or_else(|| {
                AppError::NotFound("Gagal memperbarui buku. Id tidak ditemukan".to_string())
            })?;

        tracing::info!(book_id = %book.id, "Book updated");
        Ok(book)
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.repository.books.delete(id).await {
            return Err(AppError::NotFound(
                "Buku gagal dihapus. Id tidak ditemukan".to_string(),
            ));
        }

        tracing::info!(book_id = %id, "Book deleted");
        Ok(())
    }
}

fn validate(payload: &BookPayload, write: WriteKind) -> AppResult<()> {
    if payload.name().is_none() {
        return Err(AppError::Validation(format!(
            "{}. Mohon isi nama buku",
            write.prefix()
        )));
    }

    if payload.read_page > payload.page_count {
        return Err(AppError::Validation(format!(
            "{}. readPage tidak boleh lebih besar dari pageCount",
            write.prefix()
        )));
    }

    Ok(())
}

/// Parse a `reading`/`finished` query flag.
///
/// Only strings made of `0` and `1` are accepted; the flag is set when any `1` is present.
fn parse_flag(value: &str) -> Option<bool> {
    FLAG_FORMAT
        .is_match(value)
        .then(|| value.contains('1'))
}

/// Apply list filters.
///
/// Every applicable filter runs against the whole collection and replaces the
/// previous selection, so the last one given (name, reading, finished) wins.
fn select<'a>(books: &'a [Book], query: &BookQuery) -> Vec<&'a Book> {
    let mut selected: Vec<&Book> = books.iter().collect();

    if let Some(name) = query.name.as_deref().filter(|n| !n.is_empty()) {
        let needle = name.to_uppercase();
        selected = books
            .iter()
            .filter(|b| b.name.to_uppercase().contains(&needle))
            .collect();
    }

    if let Some(reading) = query.reading.as_deref().and_then(parse_flag) {
        selected = books.iter().filter(|b| b.reading == reading).collect();
    }

    if let Some(finished) = query.finished.as_deref().and_then(parse_flag) {
        selected = books.iter().filter(|b| b.finished == finished).collect();
    }

    selected
}
