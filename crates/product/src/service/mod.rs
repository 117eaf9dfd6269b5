pub mod command;
pub mod query;

use crate::{
    abstract_trait::product::repository::DynProductQueryRepository,
    model::product::Product as ProductModel,
};
use shared::errors::ServiceError;

pub(crate) fn product_not_found(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Product with id {id} not found"))
}

/// Lookup shared by reads and writes: a row that is missing or no longer
/// available is reported the same way.
pub(crate) async fn find_available_or_not_found(
    query: &DynProductQueryRepository,
    id: i32,
) -> Result<ProductModel, ServiceError> {
    query
        .find_available_by_id(id)
        .await
        .map_err(ServiceError::Repo)?
        .ok_or_else(|| product_not_found(id))
}
