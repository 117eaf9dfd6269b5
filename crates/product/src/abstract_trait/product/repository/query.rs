use crate::model::product::Product as ProductModel;
use anyhow::Result;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynProductQueryRepository = Arc<dyn ProductQueryRepositoryTrait + Send + Sync>;

/// Read side of the product store. Every method except `find_by_ids`
/// only sees rows with `available = true`.
#[async_trait]
pub trait ProductQueryRepositoryTrait {
    async fn count_available(&self) -> Result<i64, RepositoryError>;
    async fn find_available(
        &self,
        skip: i64,
        take: i64,
    ) -> Result<Vec<ProductModel>, RepositoryError>;
    async fn find_available_by_id(
        &self,
        id: i32,
    ) -> Result<Option<ProductModel>, RepositoryError>;
    /// Ignores availability.
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<ProductModel>, RepositoryError>;
}
