//! Handlers for `/api/books`.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shelf_authz::AuthUser;
use shelf_books::{Book, BookError, BookFields};
use shelf_http::AppError;
use shelf_kernel::CallCtx;

use super::models::{BookSummary, BooksHealth, ListQuery, MergeBooks};
use super::BooksState;

pub fn router(state: BooksState) -> Router {
    Router::new()
        .route("/", post(save_book).get(list_books))
        .route("/health", get(health_check))
        .route("/merge", post(merge_books))
        .route(
            "/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .route("/{id}/summary", get(summarize_book))
        .with_state(state)
}

fn call_ctx(state: &BooksState) -> CallCtx {
    CallCtx::background().with_timeout(state.op_timeout)
}

/// Translate a use-case failure into the HTTP error envelope.
fn app_error(err: BookError) -> AppError {
    let message = err.to_string();
    match err {
        BookError::Validation(message) => AppError::validation(Vec::new(), message),
        BookError::NotFound => AppError::not_found(message),
        BookError::Store(_) => AppError::Internal(anyhow::anyhow!(message)),
        BookError::Cancelled => AppError::unavailable(message),
        BookError::DeadlineExceeded => AppError::timeout(message),
    }
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

async fn health_check(State(state): State<BooksState>) -> Json<BooksHealth> {
    Json(BooksHealth {
        status: "ok".to_string(),
        assist: state.service.has_assist(),
    })
}

async fn save_book(
    State(state): State<BooksState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<BookFields>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let fields = json_body(payload)?;
    let book = state
        .service
        .save(&call_ctx(&state), &user_id, fields)
        .await
        .map_err(app_error)?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn list_books(
    State(state): State<BooksState>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Book>>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let books = state
        .service
        .list(&call_ctx(&state), &user_id, &query.keyword)
        .await
        .map_err(app_error)?;
    Ok(Json(books))
}

async fn get_book(
    State(state): State<BooksState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    let book = state
        .service
        .get(&call_ctx(&state), &id, &user_id)
        .await
        .map_err(app_error)?;
    Ok(Json(book))
}

async fn update_book(
    State(state): State<BooksState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<BookFields>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let fields = json_body(payload)?;
    let book = state
        .service
        .update(&call_ctx(&state), &id, &user_id, fields)
        .await
        .map_err(app_error)?;
    Ok(Json(book))
}

async fn delete_book(
    State(state): State<BooksState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .service
        .delete(&call_ctx(&state), &id, &user_id)
        .await
        .map_err(app_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn merge_books(
    State(state): State<BooksState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<MergeBooks>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let request = json_body(payload)?;
    let book = state
        .service
        .merge(&call_ctx(&state), &user_id, &request.book_ids)
        .await
        .map_err(app_error)?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn summarize_book(
    State(state): State<BooksState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<BookSummary>, AppError> {
    let summary = state
        .service
        .summarize(&call_ctx(&state), &id, &user_id)
        .await
        .map_err(app_error)?;
    Ok(Json(BookSummary { id, summary }))
}
