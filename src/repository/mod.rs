//! Repository layer for database operations

pub mod books;
pub mod loans;
pub mod sales;

use sqlx::AnyPool;

use crate::error::AppResult;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: AnyPool,
    pub books: books::BooksRepository,
    pub loans: loans::LoansRepository,
    pub sales: sales::SalesRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: AnyPool) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            loans: loans::LoansRepository::new(pool.clone()),
            sales: sales::SalesRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip a trivial statement
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Replace all data with the e2e fixture catalog
    pub async fn reset_fixtures(&self) -> AppResult<Vec<i64>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM sales").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM loans").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM books").execute(&mut *tx).await?;

        let fixtures = [
            ("Clean Code", "Robert C. Martin", 2008_i64, 4_i64, 22000.0_f64),
            ("Design Patterns", "GoF", 1994, 2, 20000.0),
        ];

        let mut ids = Vec::with_capacity(fixtures.len());
        for (title, author, year, stock, price) in fixtures {
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO books (title, author, year, stock, price) VALUES ($1, $2, $3, $4, $5) RETURNING id",
            )
            .bind(title)
            .bind(author)
            .bind(year)
            .bind(stock)
            .bind(price)
            .fetch_one(&mut *tx)
            .await?;
            ids.push(id);
        }

        tx.commit().await?;
        Ok(ids)
    }
}

/// Bind value for statements assembled at runtime
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i64),
    Float(f64),
    Text(String),
}

/// `WHERE` conjunction with numbered placeholders.
///
/// A bound value may be referenced several times through the returned
/// placeholder.
#[derive(Debug, Default)]
pub struct Conditions {
    clauses: Vec<String>,
    params: Vec<SqlParam>,
}

impl Conditions {
    /// Register a value and return its `$N` placeholder
    pub fn bind(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("${}", self.params.len())
    }

    pub fn push(&mut self, clause: impl Into<String>) {
        self.clauses.push(clause.into());
    }

    /// Empty, or ` WHERE a AND b ...`
    pub fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditions_number_placeholders() {
        let mut conditions = Conditions::default();
        assert_eq!(conditions.where_clause(), "");

        let p1 = conditions.bind(SqlParam::Float(5.0));
        conditions.push(format!("price >= {}", p1));
        let p2 = conditions.bind(SqlParam::Text("%a%".into()));
        conditions.push(format!("(title LIKE {p} OR author LIKE {p})", p = p2));

        assert_eq!(
            conditions.where_clause(),
            " WHERE price >= $1 AND (title LIKE $2 OR author LIKE $2)"
        );
        assert_eq!(
            conditions.params(),
            &[SqlParam::Float(5.0), SqlParam::Text("%a%".into())]
        );
    }

    #[tokio::test]
    async fn test_reset_fixtures() {
        let repository = Repository::new(crate::db::init_in_memory().await.unwrap());
        repository.ping().await.unwrap();

        let ids = repository.reset_fixtures().await.unwrap();
        assert_eq!(ids.len(), 2);

        let again = repository.reset_fixtures().await.unwrap();
        assert_eq!(again.len(), 2);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&repository.pool)
            .await
            .unwrap();
        assert_eq!(count, 2);
    }
}
