//! Loan management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        loan::{CreateLoan, Loan, LoanDetails, NewLoan},
        Timestamp,
    },
    repository::Repository,
};

const INVALID_LOAN: &str = "Datos inválidos para préstamo";
const NO_STOCK_FOR_LOAN: &str = "Sin stock disponible para préstamo";

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All loans with their book title, most recent first
    pub async fn list_loans(&self) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.list_details().await
    }

    /// Lend one copy of a book.
    ///
    /// The loan row and the stock decrement commit together or not at all.
    pub async fn create_loan(&self, book_id: i64, request: CreateLoan) -> AppResult<Loan> {
        let request = request.normalized();
        request
            .validate()
            .map_err(|e| AppError::invalid(INVALID_LOAN, &e))?;

        let (Some(borrower_name), Some(days)) = (request.borrower_name, request.days) else {
            return Err(AppError::Validation(INVALID_LOAN.to_string()));
        };

        let book = self.repository.books.get_by_id(book_id).await?;
        if book.stock <= 0 {
            tracing::warn!(book_id, "Loan rejected: no stock available");
            return Err(AppError::Conflict(NO_STOCK_FOR_LOAN.to_string()));
        }

        let start_date = Timestamp::now();
        let due_date = start_date
            .checked_add_days(days)
            .ok_or_else(|| AppError::Validation(format!("{} (days)", INVALID_LOAN)))?;

        let new_loan = NewLoan {
            book_id,
            borrower_name,
            borrower_email: request.borrower_email,
            start_date,
            due_date,
        };

        let mut tx = self.repository.pool.begin().await?;
        let loan_id = self.repository.loans.insert(&mut *tx, &new_loan).await?;

        // Stock may have been taken since the read above
        if self.repository.books.adjust_stock(&mut *tx, book_id, -1).await? == 0 {
            tx.rollback().await?;
            tracing::warn!(book_id, "Loan rejected: stock taken concurrently");
            return Err(AppError::Conflict(NO_STOCK_FOR_LOAN.to_string()));
        }

        tx.commit().await?;
        tracing::info!(loan_id, book_id, due_date = %due_date, "Loan created");

        self.repository.loans.get_by_id(loan_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{book::NewBook, loan::LoanStatus},
        services::Services,
    };

    async fn services_with_book(stock: i64) -> (Services, i64) {
        let pool = crate::db::init_in_memory().await.unwrap();
        let repository = Repository::new(pool);
        let book = repository
            .books
            .create(&NewBook {
                title: "Clean Code".into(),
                author: "Robert C. Martin".into(),
                year: 2008,
                stock,
                price: 22000.0,
            })
            .await
            .unwrap();
        (Services::new(repository), book.id)
    }

    fn request(name: &str, days: i64) -> CreateLoan {
        CreateLoan {
            borrower_name: Some(name.into()),
            borrower_email: None,
            days: Some(days),
        }
    }

    async fn loan_count(services: &Services) -> usize {
        services.loans.list_loans().await.unwrap().len()
    }

    #[tokio::test]
    async fn test_loan_decrements_stock() {
        let (services, book_id) = services_with_book(4).await;

        let loan = services
            .loans
            .create_loan(
                book_id,
                CreateLoan {
                    borrower_email: Some("pili@example.com".into()),
                    ..request("Pili", 3)
                },
            )
            .await
            .unwrap();

        assert_eq!(loan.book_id, book_id);
        assert_eq!(loan.borrower_name, "Pili");
        assert_eq!(loan.borrower_email.as_deref(), Some("pili@example.com"));
        assert_eq!(loan.status, LoanStatus::Active);
        assert_eq!(
            (loan.due_date.as_naive() - loan.start_date.as_naive()).num_days(),
            3
        );

        assert_eq!(services.inventory.get(book_id).await.unwrap().stock, 3);

        let listed = services.loans.list_loans().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].book_title, "Clean Code");
        assert_eq!(listed[0].loan.id, loan.id);
    }

    #[tokio::test]
    async fn test_loan_without_stock_writes_nothing() {
        let (services, book_id) = services_with_book(0).await;

        let err = services
            .loans
            .create_loan(book_id, request("Pili", 3))
            .await
            .unwrap_err();
        match err {
            AppError::Conflict(msg) => assert_eq!(msg, NO_STOCK_FOR_LOAN),
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(services.inventory.get(book_id).await.unwrap().stock, 0);
        assert_eq!(loan_count(&services).await, 0);
    }

    #[tokio::test]
    async fn test_invalid_requests_write_nothing() {
        let (services, book_id) = services_with_book(2).await;

        let invalid = [
            request("", 3),
            request("Pili", 0),
            CreateLoan {
                days: None,
                ..request("Pili", 1)
            },
            CreateLoan {
                borrower_email: Some("not-an-email".into()),
                ..request("Pili", 1)
            },
        ];

        for req in invalid {
            let result = services.loans.create_loan(book_id, req).await;
            assert!(matches!(result, Err(AppError::Validation(_))), "{result:?}");
        }

        let overflow = services
            .loans
            .create_loan(book_id, request("Pili", i64::MAX))
            .await;
        assert!(matches!(overflow, Err(AppError::Validation(_))));

        assert_eq!(services.inventory.get(book_id).await.unwrap().stock, 2);
        assert_eq!(loan_count(&services).await, 0);
    }

    #[tokio::test]
    async fn test_blank_email_is_stored_as_absent() {
        let (services, book_id) = services_with_book(1).await;

        let loan = services
            .loans
            .create_loan(
                book_id,
                CreateLoan {
                    borrower_email: Some("  ".into()),
                    ..request("Pili", 1)
                },
            )
            .await
            .unwrap();
        assert!(loan.borrower_email.is_none());
    }

    #[tokio::test]
    async fn test_unknown_book() {
        let (services, _) = services_with_book(1).await;

        let result = services.loans.create_loan(9999, request("Pili", 3)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(loan_count(&services).await, 0);
    }

    #[tokio::test]
    async fn test_concurrent_loans_on_last_copy() {
        let (services, book_id) = services_with_book(1).await;

        let (first, second) = tokio::join!(
            services.loans.create_loan(book_id, request("Pili", 3)),
            services.loans.create_loan(book_id, request("Ana", 3)),
        );

        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(AppError::Conflict(_)))));

        assert_eq!(services.inventory.get(book_id).await.unwrap().stock, 0);
        assert_eq!(loan_count(&services).await, 1);
    }
}
