//! Books repository for database operations

use sqlx::{Any, AnyPool, Executor};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookFilter, NewBook, MAX_STOCK},
};

use super::{Conditions, SqlParam};

const BOOK_COLUMNS: &str = "id, title, author, year, stock, price";

/// Translate a listing filter into bound conditions
fn filter_conditions(filter: &BookFilter) -> Conditions {
    let mut conditions = Conditions::default();

    if let Some(ref q) = filter.q {
        // both sides folded by the engine, which may only fold ASCII
        let p = conditions.bind(SqlParam::Text(format!("%{}%", q)));
        conditions.push(format!(
            "(LOWER(title) LIKE LOWER({p}) OR LOWER(author) LIKE LOWER({p}) OR CAST(year AS TEXT) LIKE {p})"
        ));
    }

    if let Some(min) = filter.min_price {
        let p = conditions.bind(SqlParam::Float(min));
        conditions.push(format!("price >= {}", p));
    }

    if let Some(max) = filter.max_price {
        let p = conditions.bind(SqlParam::Float(max));
        conditions.push(format!("price <= {}", p));
    }

    if let Some(min) = filter.min_stock {
        let p = conditions.bind(SqlParam::Int(min));
        conditions.push(format!("stock >= {}", p));
    }

    if let Some(max) = filter.max_stock {
        let p = conditions.bind(SqlParam::Int(max));
        conditions.push(format!("stock <= {}", p));
    }

    if let Some(from) = filter.year_from {
        let p = conditions.bind(SqlParam::Int(from));
        conditions.push(format!("year >= {}", p));
    }

    if let Some(to) = filter.year_to {
        let p = conditions.bind(SqlParam::Int(to));
        conditions.push(format!("year <= {}", p));
    }

    conditions
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: AnyPool,
}

impl BooksRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// List books matching the filter, in the filter's order
    pub async fn list(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        let conditions = filter_conditions(filter);
        let sql = format!(
            "SELECT {} FROM books{} ORDER BY {}",
            BOOK_COLUMNS,
            conditions.where_clause(),
            filter.sort.order_by()
        );

        let mut query = sqlx::query_as::<_, Book>(&sql);
        for param in conditions.params() {
            query = match param {
                SqlParam::Int(v) => query.bind(*v),
                SqlParam::Float(v) => query.bind(*v),
                SqlParam::Text(v) => query.bind(v.clone()),
            };
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Libro {} no encontrado", id)))
    }

    pub async fn exists(&self, id: i64) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Insert a book and return the stored row
    pub async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books (title, author, year, stock, price) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            BOOK_COLUMNS
        ))
        .bind(book.title.as_str())
        .bind(book.author.as_str())
        .bind(book.year)
        .bind(book.stock)
        .bind(book.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Overwrite every field; `None` when the book does not exist
    pub async fn update(&self, id: i64, book: &NewBook) -> AppResult<Option<Book>> {
        let updated = sqlx::query_as::<_, Book>(&format!(
            "UPDATE books SET title = $1, author = $2, year = $3, stock = $4, price = $5 WHERE id = $6 RETURNING {}",
            BOOK_COLUMNS
        ))
        .bind(book.title.as_str())
        .bind(book.author.as_str())
        .bind(book.year)
        .bind(book.stock)
        .bind(book.price)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete a book that no loan or sale references.
    ///
    /// Returns the number of deleted rows; 0 means missing or referenced.
    pub async fn delete_unreferenced(&self, id: i64) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM books
            WHERE id = $1
              AND NOT EXISTS (SELECT 1 FROM loans WHERE book_id = $1)
              AND NOT EXISTS (SELECT 1 FROM sales WHERE book_id = $1)
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Add `delta` to the stock unless the result would leave `0..=MAX_STOCK`.
    ///
    /// Check and write happen in one statement, so concurrent callers cannot
    /// both consume the last copies. Returns the number of updated rows; 0
    /// means the book is missing or the stock would go out of range.
    /// `delta` must itself lie within `-MAX_STOCK..=MAX_STOCK`.
    pub async fn adjust_stock<'e, E>(&self, executor: E, id: i64, delta: i64) -> AppResult<u64>
    where
        E: Executor<'e, Database = Any>,
    {
        let result = sqlx::query(
            "UPDATE books SET stock = stock + $1 WHERE id = $2 AND stock + $1 >= 0 AND stock + $1 <= $3",
        )
        .bind(delta)
        .bind(id)
        .bind(MAX_STOCK)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
