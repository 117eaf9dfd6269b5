use crate::{
    domain::requests::product::{CreateProductRequest, UpdateProductRecord},
    model::product::Product as ProductModel,
};
use anyhow::Result;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynProductCommandRepository = Arc<dyn ProductCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ProductCommandRepositoryTrait {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ProductModel, RepositoryError>;
    async fn update_product(
        &self,
        id: i32,
        record: &UpdateProductRecord,
    ) -> Result<ProductModel, RepositoryError>;
    async fn trash_product(&self, id: i32) -> Result<ProductModel, RepositoryError>;
}
