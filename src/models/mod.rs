//! Data models for the bookshelf

pub mod book;

pub use book::{Book, BookPayload, BookQuery, BookSummary};
