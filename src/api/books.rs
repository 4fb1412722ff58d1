//! Book catalog endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{Book, BookFilter, BookInput, BookQuery, StockAdjustment},
    AppState,
};

use super::{BookId, JsonBody};

/// List books, optionally filtered and sorted
#[utoipa::path(
    get,
    path = "/api/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let filter = BookFilter::from(&query);
    let books = state.services.inventory.list(&filter).await?;
    Ok(Json(books))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(State(state): State<AppState>, BookId(id): BookId) -> AppResult<Json<Book>> {
    let book = state.services.inventory.get(id).await?;
    Ok(Json(book))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/api/books",
    tag = "books",
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Missing or invalid fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<BookInput>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let created = state.services.inventory.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace every field of a book
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Missing or invalid fields", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    BookId(id): BookId,
    JsonBody(input): JsonBody<BookInput>,
) -> AppResult<Json<Book>> {
    let updated = state.services.inventory.update(id, input).await?;
    Ok(Json(updated))
}

/// Delete a book without loan or sale history
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Book has loans or sales", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(State(state): State<AppState>, BookId(id): BookId) -> AppResult<StatusCode> {
    state.services.inventory.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Restock or write off copies of a book
#[utoipa::path(
    patch,
    path = "/api/books/{id}/stock",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = StockAdjustment,
    responses(
        (status = 200, description = "Stock adjusted", body = Book),
        (status = 400, description = "Delta out of range", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Stock would leave its allowed range", body = crate::error::ErrorResponse)
    )
)]
pub async fn adjust_stock(
    State(state): State<AppState>,
    BookId(id): BookId,
    JsonBody(adjustment): JsonBody<StockAdjustment>,
) -> AppResult<Json<Book>> {
    let book = state.services.inventory.adjust_stock(id, adjustment).await?;
    Ok(Json(book))
}
