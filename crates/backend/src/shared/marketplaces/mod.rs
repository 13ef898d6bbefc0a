pub mod coupang;

use async_trait::async_trait;

use coupang::{GatewayError, InventoryPayload, SignedHeaders};

/// Трейт для шлюза, отдающего остатки по vendorItemId.
///
/// Реальная реализация — [`coupang::CoupangApiClient`]; в тестах executor
/// работает с подменным шлюзом.
#[async_trait]
pub trait InventoryGateway: Send + Sync {
    /// Выполнить подписанный GET по `path` (без хоста)
    async fn get_inventory(
        &self,
        path: &str,
        headers: &SignedHeaders,
    ) -> Result<InventoryPayload, GatewayError>;
}
