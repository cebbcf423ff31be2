//! In-process mock backend for the integration tests.
//!
//! Serves the subset of the Libradesk REST API the client talks to, on a
//! random port. Every request is captured (method, path, query,
//! authorization, content-type) so tests can assert on the wire shape,
//! and multipart bodies are decoded field by field.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};

pub type Shared = Arc<Mutex<MockState>>;

#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Account {
    pub password: String,
    pub token: String,
    pub user: Value,
}

#[derive(Debug, Clone)]
pub struct MultipartCapture {
    pub fields: Vec<(String, String)>,
    pub cover: Option<(String, Vec<u8>)>,
}

#[derive(Debug, Default)]
pub struct MockState {
    pub captured: Vec<Captured>,
    pub fail_logout: bool,
    pub revoked: bool,
    pub accounts: HashMap<String, Account>,
    pub me_name: String,
    pub multipart: Option<MultipartCapture>,
    pub last_json_body: Option<Value>,
}

pub struct Mock {
    pub addr: SocketAddr,
    pub state: Shared,
}

impl Mock {
    pub async fn spawn() -> Self {
        Self::spawn_with(false).await
    }

    pub async fn spawn_with(fail_logout: bool) -> Self {
        let mut initial = MockState {
            fail_logout,
            me_name: "Ada Lovelace".to_string(),
            ..MockState::default()
        };
        initial.accounts.insert(
            "ada@example.com".to_string(),
            Account {
                password: "correct-horse".to_string(),
                token: "t-admin".to_string(),
                user: user_json(1, "Ada Lovelace", "ada@example.com", "admin"),
            },
        );
        initial.accounts.insert(
            "bob@example.com".to_string(),
            Account {
                password: "memberpass1".to_string(),
                token: "t-member".to_string(),
                user: user_json(2, "Bob Member", "bob@example.com", "member"),
            },
        );

        let state: Shared = Arc::new(Mutex::new(initial));
        let app = router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Mock { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Captured requests matching a path.
    pub fn requests_to(&self, path: &str) -> Vec<Captured> {
        self.state
            .lock()
            .captured
            .iter()
            .filter(|c| c.path == path)
            .cloned()
            .collect()
    }

    /// Invalidate every issued token, as a backend would on revocation.
    pub fn revoke_tokens(&self) {
        self.state.lock().revoked = true;
    }
}

pub fn user_json(id: i64, name: &str, email: &str, role: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "email": email,
        "role": role,
        "created_at": "2026-01-01T00:00:00Z",
        "updated_at": null
    })
}

pub fn book_json(id: i64) -> Value {
    json!({
        "id": id,
        "title": "Dune",
        "author": "Frank Herbert",
        "isbn": "978-0-441-17271-9",
        "genre": "science fiction",
        "description": "Desert planet",
        "total_copies": 5,
        "available_copies": 4,
        "publisher": null,
        "publication_year": 1965,
        "language": "en",
        "cover_image": null,
        "is_active": true,
        "created_at": "2026-01-10T09:00:00Z",
        "updated_at": null
    })
}

fn transaction_json(id: i64) -> Value {
    json!({
        "id": id,
        "book": book_json(1),
        "borrowed_at": "2026-07-01T10:00:00Z",
        "due_date": "2026-07-15T10:00:00Z",
        "returned_at": null,
        "status": "borrowed"
    })
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/status", get(|| async { StatusCode::OK }))
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/books", get(list_books).post(create_book))
        .route("/books/available", get(available_books))
        .route(
            "/books/:id",
            get(get_book).put(update_book).delete(delete_book),
        )
        .route("/books/:id/restore", post(restore_book))
        .route("/borrowers", get(list_borrowers).post(create_borrower))
        .route("/transactions", get(list_transactions))
        .route("/transactions/my-books", get(my_books))
        .route("/transactions/:id/return", post(return_book))
        .route("/admin/users", get(list_users).post(create_user))
        .route(
            "/admin/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/user/profile", put(update_profile))
        .layer(middleware::from_fn_with_state(state.clone(), capture))
        .with_state(state)
}

async fn capture(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let entry = Captured {
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
        query: req.uri().query().unwrap_or("").to_string(),
        authorization: header_value(req.headers(), header::AUTHORIZATION),
        content_type: header_value(req.headers(), header::CONTENT_TYPE),
    };
    state.lock().captured.push(entry);
    next.run(req).await
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    header_value(headers, header::AUTHORIZATION)
        .and_then(|v| v.strip_prefix("Bearer ").map(str::to_string))
}

fn unauthenticated() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Unauthenticated"})),
    )
        .into_response()
}

/// Resolve the bearer token to its account's user record.
fn authorize(state: &Shared, headers: &HeaderMap) -> Result<Value, Response> {
    let Some(token) = bearer(headers) else {
        return Err(unauthenticated());
    };
    let guard = state.lock();
    if guard.revoked {
        return Err(unauthenticated());
    }
    guard
        .accounts
        .values()
        .find(|a| a.token == token)
        .map(|a| a.user.clone())
        .ok_or_else(unauthenticated)
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
    #[serde(default)]
    #[allow(dead_code)]
    remember: bool,
}

async fn login(State(state): State<Shared>, Json(body): Json<LoginBody>) -> Response {
    let guard = state.lock();
    match guard.accounts.get(&body.email) {
        Some(account) if account.password == body.password => Json(json!({
            "user": account.user,
            "token": account.token
        }))
        .into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid credentials"})),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
struct RegisterBody {
    name: String,
    email: String,
    password: String,
    #[allow(dead_code)]
    password_confirmation: String,
}

async fn register(State(state): State<Shared>, Json(body): Json<RegisterBody>) -> Response {
    if body.email == "taken@example.com" {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "message": "The given data was invalid",
                "errors": {"email": ["The email has already been taken"]}
            })),
        )
            .into_response();
    }

    let user = user_json(7, &body.name, &body.email, "member");
    let deferred = body.email.ends_with("@deferred.example.com");
    let token = if deferred { "t-deferred" } else { "t-reg" };

    state.lock().accounts.insert(
        body.email.clone(),
        Account {
            password: body.password,
            token: token.to_string(),
            user: user.clone(),
        },
    );

    if deferred {
        // Some deployments defer session creation to a follow-up login.
        Json(json!({"user": user})).into_response()
    } else {
        Json(json!({"user": user, "token": token})).into_response()
    }
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if state.lock().fail_logout {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "boom"})),
        )
            .into_response();
    }
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut user = match authorize(&state, &headers) {
        Ok(user) => user,
        Err(resp) => return resp,
    };
    user["name"] = Value::String(state.lock().me_name.clone());
    Json(json!({"user": user})).into_response()
}

fn envelope(data: Value) -> Json<Value> {
    Json(json!({"success": true, "data": data}))
}

async fn list_books(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    Json(json!({
        "success": true,
        "data": [book_json(1), book_json(2)],
        "meta": {"current_page": 1, "last_page": 1, "per_page": 20, "total": 2}
    }))
    .into_response()
}

async fn available_books(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    envelope(json!([book_json(1)])).into_response()
}

async fn get_book(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    envelope(book_json(id)).into_response()
}

/// Accepts either JSON or multipart, mirroring the backend's book write
/// endpoints. The decoded multipart fields are kept for assertions.
async fn book_write(state: Shared, id: i64, req: Request) -> Response {
    if let Err(resp) = authorize(&state, req.headers()) {
        return resp;
    }

    let content_type = header_value(req.headers(), header::CONTENT_TYPE).unwrap_or_default();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = match Multipart::from_request(req, &()).await {
            Ok(multipart) => multipart,
            Err(_) => return StatusCode::BAD_REQUEST.into_response(),
        };
        let mut fields = Vec::new();
        let mut cover = None;
        let mut title = None;
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or("").to_string();
            if name == "cover_image" {
                let file_name = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await.unwrap().to_vec();
                cover = Some((file_name, bytes));
            } else {
                let text = field.text().await.unwrap();
                if name == "title" {
                    title = Some(text.clone());
                }
                fields.push((name, text));
            }
        }
        state.lock().multipart = Some(MultipartCapture { fields, cover });

        let mut book = book_json(id);
        if let Some(title) = title {
            book["title"] = Value::String(title);
        }
        envelope(book).into_response()
    } else {
        let bytes = axum::body::to_bytes(req.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = match serde_json::from_slice(&bytes) {
            Ok(body) => body,
            Err(_) => return StatusCode::BAD_REQUEST.into_response(),
        };
        state.lock().last_json_body = Some(body.clone());

        let mut book = book_json(id);
        if let Some(title) = body.get("title").and_then(Value::as_str) {
            book["title"] = Value::String(title.to_string());
        }
        envelope(book).into_response()
    }
}

async fn create_book(State(state): State<Shared>, req: Request) -> Response {
    book_write(state, 10, req).await
}

async fn update_book(State(state): State<Shared>, Path(id): Path<i64>, req: Request) -> Response {
    book_write(state, id, req).await
}

async fn delete_book(
    State(state): State<Shared>,
    Path(_id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    Json(json!({"success": true, "message": "Book deleted", "data": null})).into_response()
}

async fn restore_book(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    envelope(book_json(id)).into_response()
}

async fn list_borrowers(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    envelope(json!([{
        "id": 7,
        "name": "Grace Hopper",
        "email": "grace@example.com",
        "borrowedBooks": 1,
        "status": "active",
        "dueDate": "2026-09-01",
        "borrowed_book_id": 1
    }]))
    .into_response()
}

async fn create_borrower(State(state): State<Shared>, req: Request) -> Response {
    if let Err(resp) = authorize(&state, req.headers()) {
        return resp;
    }
    let bytes = axum::body::to_bytes(req.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    state.lock().last_json_body = Some(body.clone());
    envelope(json!({
        "id": 8,
        "name": body.get("name").and_then(Value::as_str).unwrap_or("?"),
        "email": body.get("email").and_then(Value::as_str).unwrap_or("?"),
        "borrowedBooks": 0,
        "status": "active",
        "dueDate": null,
        "borrowed_book_id": body.get("borrowed_book_id").cloned().unwrap_or(Value::Null)
    }))
    .into_response()
}

async fn list_transactions(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    // Transaction oversight is admin-only.
    if bearer(&headers).as_deref() == Some("t-member") {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"message": "Forbidden"})),
        )
            .into_response();
    }
    let mut tx = transaction_json(11);
    tx["user"] = user_json(2, "Bob Member", "bob@example.com", "member");
    envelope(json!([tx])).into_response()
}

async fn my_books(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    envelope(json!([transaction_json(11)])).into_response()
}

async fn return_book(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    if id == 999 {
        return Json(json!({
            "success": false,
            "message": "Transaction already completed"
        }))
        .into_response();
    }
    Json(json!({"success": true, "data": null})).into_response()
}

async fn list_users(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    Json(json!({
        "success": true,
        "data": [
            user_json(1, "Ada Lovelace", "ada@example.com", "admin"),
            user_json(2, "Bob Member", "bob@example.com", "member")
        ],
        "meta": {"current_page": 1, "last_page": 1, "per_page": 20, "total": 2}
    }))
    .into_response()
}

async fn create_user(State(state): State<Shared>, req: Request) -> Response {
    if let Err(resp) = authorize(&state, req.headers()) {
        return resp;
    }
    let bytes = axum::body::to_bytes(req.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    let user = user_json(
        5,
        body.get("name").and_then(Value::as_str).unwrap_or("?"),
        body.get("email").and_then(Value::as_str).unwrap_or("?"),
        body.get("role").and_then(Value::as_str).unwrap_or("member"),
    );
    envelope(user).into_response()
}

async fn get_user(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    envelope(user_json(id, "Bob Member", "bob@example.com", "member")).into_response()
}

async fn update_user(State(state): State<Shared>, Path(id): Path<i64>, req: Request) -> Response {
    if let Err(resp) = authorize(&state, req.headers()) {
        return resp;
    }
    let bytes = axum::body::to_bytes(req.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    state.lock().last_json_body = Some(body.clone());
    let user = user_json(
        id,
        body.get("name").and_then(Value::as_str).unwrap_or("Bob Member"),
        body.get("email").and_then(Value::as_str).unwrap_or("bob@example.com"),
        body.get("role").and_then(Value::as_str).unwrap_or("member"),
    );
    envelope(user).into_response()
}

async fn delete_user(
    State(state): State<Shared>,
    Path(_id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    Json(json!({"success": true, "message": "User deleted", "data": null})).into_response()
}

async fn update_profile(State(state): State<Shared>, req: Request) -> Response {
    let current = match authorize(&state, req.headers()) {
        Ok(user) => user,
        Err(resp) => return resp,
    };
    let bytes = axum::body::to_bytes(req.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    state.lock().last_json_body = Some(body.clone());

    let mut user = current;
    if let Some(name) = body.get("name").and_then(Value::as_str) {
        user["name"] = Value::String(name.to_string());
    }
    if let Some(email) = body.get("email").and_then(Value::as_str) {
        user["email"] = Value::String(email.to_string());
    }
    envelope(user).into_response()
}
