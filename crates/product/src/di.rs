use crate::{
    abstract_trait::product::repository::{DynProductCommandRepository, DynProductQueryRepository},
    repository::{command::ProductCommandRepository, query::ProductQueryRepository},
    service::{
        command::{ProductCommandService, ProductCommandServiceDeps},
        query::ProductQueryService,
    },
};
use prometheus_client::registry::Registry;
use shared::config::ConnectionPool;
use std::{fmt, sync::Arc};

#[derive(Clone)]
pub struct DependenciesInject {
    pub product_query: ProductQueryService,
    pub product_command: ProductCommandService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("product_query", &"ProductQueryService")
            .field("product_command", &"ProductCommandService")
            .finish()
    }
}

impl DependenciesInject {
    pub fn new(pool: ConnectionPool, registry: &mut Registry) -> Self {
        let query: DynProductQueryRepository = Arc::new(ProductQueryRepository::new(pool.clone()));
        let command: DynProductCommandRepository =
            Arc::new(ProductCommandRepository::new(pool.clone()));

        Self::from_repositories(query, command, registry)
    }

    /// Wires services over any repository implementation.
    pub fn from_repositories(
        query: DynProductQueryRepository,
        command: DynProductCommandRepository,
        registry: &mut Registry,
    ) -> Self {
        let product_query = ProductQueryService::new(query.clone(), registry);

        let product_command = ProductCommandService::new(
            ProductCommandServiceDeps {
                command,
                query,
            },
            registry,
        );

        Self {
            product_query,
            product_command,
        }
    }
}
