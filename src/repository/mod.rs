//! Repository layer for book storage

pub mod books;

use crate::config::StoreConfig;

/// Main repository struct holding the in-memory collections
#[derive(Clone)]
pub struct Repository {
    pub books: books::BooksRepository,
}

impl Repository {
    /// Create a new, empty repository
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            books: books::BooksRepository::new(config.id_length),
        }
    }
}
