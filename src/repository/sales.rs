//! Sales repository for database operations

use sqlx::{Any, AnyPool, Executor};

use crate::{
    error::{AppError, AppResult},
    models::sale::{NewSale, Sale, SaleDetails},
};

#[derive(Clone)]
pub struct SalesRepository {
    pool: AnyPool,
}

impl SalesRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Get sale by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Sale> {
        sqlx::query_as::<_, Sale>(
            "SELECT id, book_id, buyer_name, quantity, total_price, sale_date FROM sales WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venta {} no encontrada", id)))
    }

    /// All sales with their book title, most recent first
    pub async fn list_details(&self) -> AppResult<Vec<SaleDetails>> {
        let sales = sqlx::query_as::<_, SaleDetails>(
            r#"
            SELECT s.id, s.book_id, b.title AS book_title,
                   s.buyer_name, s.quantity, s.total_price, s.sale_date
            FROM sales s
            JOIN books b ON s.book_id = b.id
            ORDER BY s.sale_date DESC, s.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Insert a sale and return its id
    pub async fn insert<'e, E>(&self, executor: E, sale: &NewSale) -> AppResult<i64>
    where
        E: Executor<'e, Database = Any>,
    {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO sales (book_id, buyer_name, quantity, total_price, sale_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(sale.book_id)
        .bind(sale.buyer_name.clone())
        .bind(sale.quantity)
        .bind(sale.total_price)
        .bind(sale.sale_date.to_string())
        .fetch_one(executor)
        .await?;

        Ok(id)
    }
}
