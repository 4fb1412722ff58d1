//! Loan endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, Loan, LoanDetails},
    AppState,
};

use super::{BookId, JsonBody};

/// Lend one copy of a book
#[utoipa::path(
    post,
    path = "/api/books/{id}/loan",
    tag = "loans",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = Loan),
        (status = 400, description = "Invalid loan data", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "No stock available", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_loan(
    State(state): State<AppState>,
    BookId(book_id): BookId,
    JsonBody(request): JsonBody<CreateLoan>,
) -> AppResult<(StatusCode, Json<Loan>)> {
    let loan = state.services.loans.create_loan(book_id, request).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

/// List all loans, newest first
#[utoipa::path(
    get,
    path = "/api/loans",
    tag = "loans",
    responses(
        (status = 200, description = "All loans with book title", body = Vec<LoanDetails>)
    )
)]
pub async fn list_loans(State(state): State<AppState>) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.list_loans().await?;
    Ok(Json(loans))
}
