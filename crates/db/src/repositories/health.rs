//! Database reachability.

use async_trait::async_trait;
use nestegg_core::store::{StoreError, StoreHealth};
use sea_orm::DatabaseConnection;

use super::store_err;

/// Pings the connection pool.
#[derive(Debug, Clone)]
pub struct DatabaseHealth {
    db: DatabaseConnection,
}

impl DatabaseHealth {
    /// Creates a new health checker.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StoreHealth for DatabaseHealth {
    async fn ping(&self) -> Result<(), StoreError> {
        self.db.ping().await.map_err(store_err)
    }
}
