//! Sales service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        sale::{CreateSale, NewSale, Sale, SaleDetails},
        Timestamp,
    },
    repository::Repository,
};

const INVALID_SALE: &str = "Datos inválidos para venta";
const NOT_ENOUGH_STOCK: &str = "Stock insuficiente";

/// Unit price times quantity, rounded to cents
fn total_price(unit_price: f64, quantity: i64) -> f64 {
    (unit_price * quantity as f64 * 100.0).round() / 100.0
}

#[derive(Clone)]
pub struct SalesService {
    repository: Repository,
}

impl SalesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All sales with their book title, most recent first
    pub async fn list_sales(&self) -> AppResult<Vec<SaleDetails>> {
        self.repository.sales.list_details().await
    }

    /// Sell `quantity` copies of a book at its current price
    pub async fn create_sale(&self, book_id: i64, request: CreateSale) -> AppResult<Sale> {
        request
            .validate()
            .map_err(|e| AppError::invalid(INVALID_SALE, &e))?;

        let (Some(buyer_name), Some(quantity)) = (request.buyer_name, request.quantity) else {
            return Err(AppError::Validation(INVALID_SALE.to_string()));
        };

        let book = self.repository.books.get_by_id(book_id).await?;
        if book.stock < quantity {
            tracing::warn!(book_id, quantity, stock = book.stock, "Sale rejected: not enough stock");
            return Err(AppError::Conflict(NOT_ENOUGH_STOCK.to_string()));
        }

        let new_sale = NewSale {
            book_id,
            buyer_name,
            quantity,
            total_price: total_price(book.price, quantity),
            sale_date: Timestamp::now(),
        };

        let mut tx = self.repository.pool.begin().await?;
        let sale_id = self.repository.sales.insert(&mut *tx, &new_sale).await?;

        if self.repository.books.adjust_stock(&mut *tx, book_id, -quantity).await? == 0 {
            tx.rollback().await?;
            tracing::warn!(book_id, quantity, "Sale rejected: stock taken concurrently");
            return Err(AppError::Conflict(NOT_ENOUGH_STOCK.to_string()));
        }

        tx.commit().await?;
        tracing::info!(sale_id, book_id, quantity, total_price = new_sale.total_price, "Sale recorded");

        self.repository.sales.get_by_id(sale_id).await
    }
}
