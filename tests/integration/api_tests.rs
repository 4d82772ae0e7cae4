//! API integration tests

use bookshelf_server::{api, AppConfig, AppState};
use reqwest::Client;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Start a server with an empty collection and return its base URL
async fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");

    let app = api::router(AppState::new(AppConfig::default()));
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });

    format!("http://{}", addr)
}

fn book(name: &str, page_count: u32, read_page: u32, reading: bool) -> Value {
    json!({
        "name": name,
        "year": 2010,
        "author": "John Doe",
        "summary": "Lorem ipsum dolor sit amet",
        "publisher": "Dicoding Indonesia",
        "pageCount": page_count,
        "readPage": read_page,
        "reading": reading
    })
}

/// Add a book and return its id
async fn add_book(client: &Client, base: &str, body: &Value) -> String {
    let response = client
        .post(format!("{}/books", base))
        .json(body)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"]["bookId"].as_str().expect("No book ID").to_string()
}

async fn list_books(client: &Client, base: &str, query: &str) -> Vec<Value> {
    let response = client
        .get(format!("{}/books{}", base, query))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");
    body["data"]["books"].as_array().expect("No books array").clone()
}

#[tokio::test]
async fn test_health_check() {
    let base = spawn_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/health", base))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_add_book() {
    let base = spawn_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/books", base))
        .json(&book("Go", 100, 100, false))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Buku berhasil ditambahkan");
    assert!(body["data"]["bookId"].is_string());
}

#[tokio::test]
async fn test_add_book_without_name() {
    let base = spawn_server().await;
    let client = Client::new();

    let mut payload = book("", 100, 10, false);
    payload.as_object_mut().unwrap().remove("name");

    let response = client
        .post(format!("{}/books", base))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Gagal menambahkan buku. Mohon isi nama buku");
    assert!(list_books(&client, &base, "").await.is_empty());
}

#[tokio::test]
async fn test_add_book_read_page_over_page_count() {
    let base = spawn_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/books", base))
        .json(&book("Go", 100, 150, false))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "fail");
    assert_eq!(
        body["message"],
        "Gagal menambahkan buku. readPage tidak boleh lebih besar dari pageCount"
    );
    assert!(list_books(&client, &base, "").await.is_empty());
}

#[tokio::test]
async fn test_malformed_body() {
    let base = spawn_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/books", base))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "fail");
}

#[tokio::test]
async fn test_get_book() {
    let base = spawn_server().await;
    let client = Client::new();
    let id = add_book(&client, &base, &book("Go", 100, 25, true)).await;

    let response = client
        .get(format!("{}/books/{}", base, id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");
    let stored = &body["data"]["book"];
    assert_eq!(stored["id"], id.as_str());
    assert_eq!(stored["name"], "Go");
    assert_eq!(stored["year"], 2010);
    assert_eq!(stored["author"], "John Doe");
    assert_eq!(stored["summary"], "Lorem ipsum dolor sit amet");
    assert_eq!(stored["publisher"], "Dicoding Indonesia");
    assert_eq!(stored["pageCount"], 100);
    assert_eq!(stored["readPage"], 25);
    assert_eq!(stored["reading"], true);
    assert_eq!(stored["finished"], false);
    assert_eq!(stored["insertedAt"], stored["updatedAt"]);
}

#[tokio::test]
async fn test_get_unknown_book() {
    let base = spawn_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/books/xxxxxxxxxxxxxxxx", base))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Buku tidak ditemukan");
}

#[tokio::test]
async fn test_list_books_with_filters() {
    let base = spawn_server().await;
    let client = Client::new();
    let go = add_book(&client, &base, &book("Go", 100, 100, false)).await;
    let rust = add_book(&client, &base, &book("The Rust Book", 500, 10, true)).await;

    let books = list_books(&client, &base, "").await;
    assert_eq!(books.len(), 2);
    assert_eq!(
        books[0],
        json!({ "id": go, "name": "Go", "publisher": "Dicoding Indonesia" })
    );

    let books = list_books(&client, &base, "?name=go").await;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["id"], go.as_str());

    let books = list_books(&client, &base, "?reading=1").await;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["id"], rust.as_str());

    let books = list_books(&client, &base, "?finished=1").await;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["id"], go.as_str());

    let books = list_books(&client, &base, "?finished=0").await;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["id"], rust.as_str());

    assert_eq!(list_books(&client, &base, "?reading=true").await.len(), 2);
    assert!(list_books(&client, &base, "?name=dune").await.is_empty());

    // reading replaces the name filter instead of narrowing it
    let books = list_books(&client, &base, "?name=go&reading=1").await;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["id"], rust.as_str());
}

#[tokio::test]
async fn test_update_book() {
    let base = spawn_server().await;
    let client = Client::new();
    let id = add_book(&client, &base, &book("Go", 100, 10, true)).await;

    let response = client
        .put(format!("{}/books/{}", base, id))
        .json(&book("Go in Action", 300, 300, false))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Buku berhasil diperbarui");
    let updated = &body["data"]["book"];
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["name"], "Go in Action");
    assert_eq!(updated["finished"], true);
    assert_eq!(updated["reading"], false);
}

#[tokio::test]
async fn test_update_book_failures() {
    let base = spawn_server().await;
    let client = Client::new();
    let id = add_book(&client, &base, &book("Go", 100, 10, true)).await;

    let response = client
        .put(format!("{}/books/{}", base, id))
        .json(&book("", 100, 10, true))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Gagal memperbarui buku. Mohon isi nama buku");

    let response = client
        .put(format!("{}/books/{}", base, id))
        .json(&book("Go", 100, 200, true))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["message"],
        "Gagal memperbarui buku. readPage tidak boleh lebih besar dari pageCount"
    );

    let response = client
        .put(format!("{}/books/xxxxxxxxxxxxxxxx", base))
        .json(&book("Go", 100, 10, true))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Gagal memperbarui buku. Id tidak ditemukan");

    let books = list_books(&client, &base, "").await;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["name"], "Go");
}

#[tokio::test]
async fn test_delete_book() {
    let base = spawn_server().await;
    let client = Client::new();
    let id = add_book(&client, &base, &book("Go", 100, 10, false)).await;
    add_book(&client, &base, &book("Rust", 100, 10, false)).await;

    let response = client
        .delete(format!("{}/books/{}", base, id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Buku berhasil dihapus");
    assert_eq!(list_books(&client, &base, "").await.len(), 1);

    let response = client
        .delete(format!("{}/books/{}", base, id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Buku gagal dihapus. Id tidak ditemukan");
}

#[tokio::test]
async fn test_add_book_keeps_unvalidated_fields() {
    let base = spawn_server().await;
    let client = Client::new();

    let mut payload = book("Go", 100, 10, false);
    payload["year"] = json!("2010");
    payload["author"] = json!(123);
    let id = add_book(&client, &base, &payload).await;

    let response = client
        .get(format!("{}/books/{}", base, id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    let stored = &body["data"]["book"];
    assert_eq!(stored["year"], "2010");
    assert_eq!(stored["author"], 123);

    // millisecond precision, e.g. 2024-01-31T08:15:00.123Z
    let inserted_at = stored["insertedAt"].as_str().expect("No insertedAt");
    assert_eq!(inserted_at.len(), 24);
    assert!(inserted_at.ends_with('Z'));
}

#[tokio::test]
async fn test_list_books_with_repeated_filter() {
    let base = spawn_server().await;
    let client = Client::new();
    add_book(&client, &base, &book("Go", 100, 100, false)).await;
    let rust = add_book(&client, &base, &book("Rust", 100, 10, true)).await;

    let books = list_books(&client, &base, "?reading=1&reading=0").await;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["id"], rust.as_str());
}
