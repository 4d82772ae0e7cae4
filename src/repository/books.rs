//! In-memory book collection

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::sync::RwLock;

use crate::models::book::{Book, BookPayload};

/// URL-safe alphabet used for generated ids (the nanoid alphabet)
const ID_ALPHABET: &[u8] = b"ModuleSymbhasOwnPr-0123456789ABCDEFGHNRVfgctiUvz_KqYTJkLxpZXIjQW";

/// Ordered book collection shared by all handlers.
///
/// Insertion order is preserved; updates happen in place.
#[derive(Clone)]
pub struct BooksRepository {
    books: Arc<RwLock<Vec<Book>>>,
    id_length: usize,
}

impl BooksRepository {
    pub fn new(id_length: usize) -> Self {
        Self {
            books: Arc::new(RwLock::new(Vec::new())),
            id_length: id_length.max(1),
        }
    }

    /// All books in insertion order
    pub async fn list(&self) -> Vec<Book> {
        self.books.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.books.read().await.len()
    }

    pub async fn get_by_id(&self, id: &str) -> Option<Book> {
        self.books.read().await.iter().find(|b| b.id == id).cloned()
    }

    pub async fn exists(&self, id: &str) -> bool {
        self.books.read().await.iter().any(|b| b.id == id)
    }

    /// Append a new book built from `payload` under a freshly generated id
    pub async fn create(&self, payload: &BookPayload, now: DateTime<Utc>) -> Book {
        let mut books = self.books.write().await;

        let mut id = generate_id(self.id_length);
        while books.iter().any(|b| b.id == id) {
            id = generate_id(self.id_length);
        }

        let book = Book::from_payload(id, payload, now);
        books.push(book.clone());
        book
    }

    /// Replace a book's fields in place, returning the updated record
    pub async fn update(&self, id: &str, payload: &BookPayload, now: DateTime<Utc>) -> Option<Book> {
        let mut books = self.books.write().await;
        let book = books.iter_mut().find(|b| b.id == id)?;
        book.apply(payload, now);
        Some(book.clone())
    }

    /// Returns true if the book existed and was removed
    pub async fn delete(&self, id: &str) -> bool {
        let mut books = self.books.write().await;
        match books.iter().position(|b| b.id == id) {
            Some(index) => {
                books.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Random id over the URL-safe alphabet
fn generate_id(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}
