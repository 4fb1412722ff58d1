//! Business logic services

pub mod inventory;
pub mod loans;
pub mod sales;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub inventory: inventory::InventoryService,
    pub loans: loans::LoansService,
    pub sales: sales::SalesService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            inventory: inventory::InventoryService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone()),
            sales: sales::SalesService::new(repository.clone()),
            repository,
        }
    }

    /// Database reachability, used by the readiness probe
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        self.repository.ping().await
    }

    /// Replace all data with the e2e fixture catalog
    pub async fn seed_fixtures(&self) -> crate::error::AppResult<Vec<i64>> {
        let ids = self.repository.reset_fixtures().await?;
        tracing::info!("Fixture catalog loaded ({} books)", ids.len());
        Ok(ids)
    }
}
