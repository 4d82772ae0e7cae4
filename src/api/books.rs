//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppResult, ResponseStatus},
    models::book::{Book, BookPayload, BookQuery, BookSummary},
};

use super::ApiJson;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookIdData {
    pub book_id: String,
}

#[derive(Serialize, ToSchema)]
pub struct BookListData {
    pub books: Vec<BookSummary>,
}

#[derive(Serialize, ToSchema)]
pub struct BookData {
    pub book: Book,
}

#[derive(Serialize, ToSchema)]
pub struct AddBookResponse {
    pub status: ResponseStatus,
    pub message: String,
    pub data: BookIdData,
}

#[derive(Serialize, ToSchema)]
pub struct ListBooksResponse {
    pub status: ResponseStatus,
    pub data: BookListData,
}

#[derive(Serialize, ToSchema)]
pub struct GetBookResponse {
    pub status: ResponseStatus,
    pub data: BookData,
}

#[derive(Serialize, ToSchema)]
pub struct UpdateBookResponse {
    pub status: ResponseStatus,
    pub message: String,
    pub data: BookData,
}

#[derive(Serialize, ToSchema)]
pub struct DeleteBookResponse {
    pub status: ResponseStatus,
    pub message: String,
}

/// Add a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book added", body = AddBookResponse),
        (status = 400, description = "Missing name or readPage greater than pageCount", body = crate::error::ErrorResponse),
        (status = 500, description = "Book could not be stored", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_book(
    State(state): State<crate::AppState>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> AppResult<(StatusCode, Json<AddBookResponse>)> {
    let book_id = state.services.books.add(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(AddBookResponse {
            status: ResponseStatus::Success,
            message: "Buku berhasil ditambahkan".to_string(),
            data: BookIdData { book_id },
        }),
    ))
}

/// List books, optionally filtered by name, reading or finished
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Condensed list of books", body = ListBooksResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    query: Option<Query<Vec<(String, String)>>>,
) -> Json<ListBooksResponse> {
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_default();
    let books = state.services.books.list(&BookQuery::from_pairs(pairs)).await;

    Json(ListBooksResponse {
        status: ResponseStatus::Success,
        data: BookListData { books },
    })
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{bookId}",
    tag = "books",
    params(("bookId" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = GetBookResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(book_id): Path<String>,
) -> AppResult<Json<GetBookResponse>> {
    let book = state.services.books.get(&book_id).await?;

    Ok(Json(GetBookResponse {
        status: ResponseStatus::Success,
        data: BookData { book },
    }))
}

/// Replace a book's details
#[utoipa::path(
    put,
    path = "/books/{bookId}",
    tag = "books",
    params(("bookId" = String, Path, description = "Book ID")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = UpdateBookResponse),
        (status = 400, description = "Missing name or readPage greater than pageCount", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(book_id): Path<String>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> AppResult<Json<UpdateBookResponse>> {
    let book = state.services.books.update(&book_id, &payload).await?;

    Ok(Json(UpdateBookResponse {
        status: ResponseStatus::Success,
        message: "Buku berhasil diperbarui".to_string(),
        data: BookData { book },
    }))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{bookId}",
    tag = "books",
    params(("bookId" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = DeleteBookResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(book_id): Path<String>,
) -> AppResult<Json<DeleteBookResponse>> {
    state.services.books.delete(&book_id).await?;

    Ok(Json(DeleteBookResponse {
        status: ResponseStatus::Success,
        message: "Buku berhasil dihapus".to_string(),
    }))
}
