//! Book inventory service: catalog CRUD and stock adjustments

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookFilter, BookInput, NewBook, StockAdjustment},
    repository::Repository,
};

const INVALID_BOOK: &str = "Faltan datos del libro";
const BOOK_NOT_FOUND: &str = "Libro no encontrado";
const BOOK_HAS_HISTORY: &str = "El libro tiene préstamos o ventas registrados";
const NOT_ENOUGH_STOCK: &str = "Stock insuficiente";
const STOCK_LIMIT_EXCEEDED: &str = "Stock máximo superado";
const INVALID_ADJUSTMENT: &str = "Ajuste de stock inválido";

#[derive(Clone)]
pub struct InventoryService {
    repository: Repository,
}

fn validated(input: BookInput) -> AppResult<NewBook> {
    input
        .validate()
        .map_err(|e| AppError::invalid(INVALID_BOOK, &e))?;
    input
        .into_new_book()
        .ok_or_else(|| AppError::Validation(INVALID_BOOK.to_string()))
}

impl InventoryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List books matching the filter
    pub async fn list(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        self.repository.books.list(filter).await
    }

    /// Get a book by ID
    pub async fn get(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a book; omitted stock and price default to 0
    pub async fn create(&self, input: BookInput) -> AppResult<Book> {
        let book = validated(input)?;
        let created = self.repository.books.create(&book).await?;
        tracing::info!(book_id = created.id, "Book created");
        Ok(created)
    }

    /// Replace all fields of a book
    pub async fn update(&self, id: i64, input: BookInput) -> AppResult<Book> {
        let book = validated(input)?;
        let updated = self
            .repository
            .books
            .update(id, &book)
            .await?
            .ok_or_else(|| AppError::NotFound(BOOK_NOT_FOUND.to_string()))?;
        tracing::info!(book_id = id, "Book updated");
        Ok(updated)
    }

    /// Delete a book without loan or sale history
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if self.repository.books.delete_unreferenced(id).await? > 0 {
            tracing::info!(book_id = id, "Book deleted");
            return Ok(());
        }

        if self.repository.books.exists(id).await? {
            Err(AppError::Conflict(BOOK_HAS_HISTORY.to_string()))
        } else {
            Err(AppError::NotFound(BOOK_NOT_FOUND.to_string()))
        }
    }

    /// Add `delta` (possibly negative) to the stock of a book
    pub async fn adjust_stock(&self, id: i64, adjustment: StockAdjustment) -> AppResult<Book> {
        adjustment
            .validate()
            .map_err(|e| AppError::invalid(INVALID_ADJUSTMENT, &e))?;
        let delta = adjustment.delta;

        let updated = self
            .repository
            .books
            .adjust_stock(&self.repository.pool, id, delta)
            .await?;

        if updated == 0 {
            return if self.repository.books.exists(id).await? {
                tracing::warn!(book_id = id, delta, "Stock adjustment rejected");
                let msg = if delta > 0 { STOCK_LIMIT_EXCEEDED } else { NOT_ENOUGH_STOCK };
                Err(AppError::Conflict(msg.to_string()))
            } else {
                Err(AppError::NotFound(BOOK_NOT_FOUND.to_string()))
            };
        }

        self.get(id).await
    }
}
