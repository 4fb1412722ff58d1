//! Sale endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::sale::{CreateSale, Sale, SaleDetails},
    AppState,
};

use super::{BookId, JsonBody};

/// Sell copies of a book
#[utoipa::path(
    post,
    path = "/api/books/{id}/sell",
    tag = "sales",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = CreateSale,
    responses(
        (status = 201, description = "Sale recorded", body = Sale),
        (status = 400, description = "Invalid sale data", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Insufficient stock", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_sale(
    State(state): State<AppState>,
    BookId(book_id): BookId,
    JsonBody(request): JsonBody<CreateSale>,
) -> AppResult<(StatusCode, Json<Sale>)> {
    let sale = state.services.sales.create_sale(book_id, request).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// List all sales, newest first
#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "sales",
    responses(
        (status = 200, description = "All sales with book title", body = Vec<SaleDetails>)
    )
)]
pub async fn list_sales(State(state): State<AppState>) -> AppResult<Json<Vec<SaleDetails>>> {
    let sales = state.services.sales.list_sales().await?;
    Ok(Json(sales))
}
