//! Bookshelf server
//!
//! A small REST JSON API for tracking books and reading progress. Books live
//! in an in-memory collection owned by the application state.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::Repository;
use services::Services;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<Services>,
}

impl AppState {
    /// Build the state with a fresh, empty book collection
    pub fn new(config: AppConfig) -> Self {
        let repository = Repository::new(&config.store);
        Self {
            services: Arc::new(Services::new(repository)),
            config: Arc::new(config),
        }
    }
}
