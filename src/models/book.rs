//! Book model and related types

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

/// ISO-8601 with millisecond precision, e.g. `2024-01-31T08:15:00.123Z`
fn serialize_millis<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Full book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier, assigned on creation
    pub id: String,
    pub name: String,
    /// Stored as sent by the client
    #[schema(value_type = Object)]
    pub year: Option<Value>,
    #[schema(value_type = Object)]
    pub author: Option<Value>,
    #[schema(value_type = Object)]
    pub summary: Option<Value>,
    #[schema(value_type = Object)]
    pub publisher: Option<Value>,
    /// Total number of pages
    pub page_count: u32,
    /// Number of pages read so far
    pub read_page: u32,
    /// Derived: `read_page == page_count` at the last write
    pub finished: bool,
    /// Whether the book is currently being read
    pub reading: bool,
    #[serde(serialize_with = "serialize_millis")]
    pub inserted_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_millis")]
    pub updated_at: DateTime<Utc>,
}

/// Create / update request body
///
/// Any `finished` key sent by the client is ignored; the flag is always derived.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub name: Option<String>,
    #[schema(value_type = Object)]
    pub year: Option<Value>,
    #[schema(value_type = Object)]
    pub author: Option<Value>,
    #[schema(value_type = Object)]
    pub summary: Option<Value>,
    #[schema(value_type = Object)]
    pub publisher: Option<Value>,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub read_page: u32,
    #[serde(default)]
    pub reading: bool,
}

impl BookPayload {
    /// The name, if present and non-empty
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    pub fn is_finished(&self) -> bool {
        self.page_count == self.read_page
    }
}

/// Condensed projection used by list responses
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    #[schema(value_type = Object)]
    pub publisher: Option<Value>,
}

/// List filters, kept as raw strings so malformed flags can be ignored
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of the book name
    pub name: Option<String>,
    /// `1` for books being read, `0` for the others
    pub reading: Option<String>,
    /// `1` for finished books, `0` for the others
    pub finished: Option<String>,
}

impl BookQuery {
    /// Build filters from raw query pairs, keeping the first value of a repeated key
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "name" => &mut query.name,
                "reading" => &mut query.reading,
                "finished" => &mut query.finished,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

impl Book {
    /// Build a new record from a validated payload
    pub fn from_payload(id: String, payload: &BookPayload, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: payload.name.clone().unwrap_or_default(),
            year: payload.year.clone(),
            author: payload.author.clone(),
            summary: payload.summary.clone(),
            publisher: payload.publisher.clone(),
            page_count: payload.page_count,
            read_page: payload.read_page,
            finished: payload.is_finished(),
            reading: payload.reading,
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Replace every field except `id` and `inserted_at`
    pub fn apply(&mut self, payload: &BookPayload, now: DateTime<Utc>) {
        self.name = payload.name.clone().unwrap_or_default();
        self.year = payload.year.clone();
        self.author = payload.author.clone();
        self.summary = payload.summary.clone();
        self.publisher = payload.publisher.clone();
        self.page_count = payload.page_count;
        self.read_page = payload.read_page;
        self.finished = payload.is_finished();
        self.reading = payload.reading;
        self.updated_at = now;
    }
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            publisher: book.publisher.clone(),
        }
    }
}
