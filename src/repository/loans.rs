//! Loans repository for database operations

use sqlx::{Any, AnyPool, Executor};

use crate::{
    error::{AppError, AppResult},
    models::loan::{Loan, LoanDetails, LoanStatus, NewLoan},
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: AnyPool,
}

impl LoansRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>(
            r#"
            SELECT id, book_id, borrower_name,
                   COALESCE(borrower_email, '') AS borrower_email, start_date, due_date, status
            FROM loans
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Préstamo {} no encontrado", id)))
    }

    /// All loans with their book title, most recent first
    pub async fn list_details(&self) -> AppResult<Vec<LoanDetails>> {
        let loans = sqlx::query_as::<_, LoanDetails>(
            r#"
            SELECT l.id, l.book_id, b.title AS book_title,
                   l.borrower_name, COALESCE(l.borrower_email, '') AS borrower_email,
                   l.start_date, l.due_date, l.status
            FROM loans l
            JOIN books b ON l.book_id = b.id
            ORDER BY l.start_date DESC, l.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// Insert an active loan and return its id
    pub async fn insert<'e, E>(&self, executor: E, loan: &NewLoan) -> AppResult<i64>
    where
        E: Executor<'e, Database = Any>,
    {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO loans (book_id, borrower_name, borrower_email, start_date, due_date, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(loan.book_id)
        .bind(loan.borrower_name.clone())
        .bind(loan.borrower_email.clone())
        .bind(loan.start_date.to_string())
        .bind(loan.due_date.to_string())
        .bind(LoanStatus::Active.as_str())
        .fetch_one(executor)
        .await?;

        Ok(id)
    }
}
