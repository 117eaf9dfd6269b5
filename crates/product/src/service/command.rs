use crate::{
    abstract_trait::product::{
        repository::{DynProductCommandRepository, DynProductQueryRepository},
        service::ProductCommandServiceTrait,
    },
    domain::{
        requests::product::{
            CreateProductRequest, UpdateProductRecord, UpdateProductRequest, validate_request,
        },
        response::{api::ApiResponse, product::ProductResponse},
    },
    service::{find_available_or_not_found, product_not_found},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, OperationTracer},
};
use tracing::{error, info};

#[derive(Clone)]
pub struct ProductCommandService {
    command: DynProductCommandRepository,
    query: DynProductQueryRepository,
    tracer: OperationTracer,
}

pub struct ProductCommandServiceDeps {
    pub command: DynProductCommandRepository,
    pub query: DynProductQueryRepository,
}

impl ProductCommandService {
    pub fn new(deps: ProductCommandServiceDeps, registry: &mut Registry) -> Self {
        let ProductCommandServiceDeps { command, query } = deps;

        let metrics = Metrics::new();
        metrics.register(registry, "product_command_service", "ProductCommandService");

        Self {
            command,
            query,
            tracer: OperationTracer::new("product-command-service", metrics),
        }
    }
}

/// A row that disappeared after the existence check is reported like any
/// other missing product.
fn write_error(id: i32, err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::NotFound => product_not_found(id),
        other => ServiceError::Repo(other),
    }
}

#[async_trait]
impl ProductCommandServiceTrait for ProductCommandService {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🏗️ Creating new product: {}", req.name);

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "create_product",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "create"),
                KeyValue::new("product.name", req.name.clone()),
            ],
        );

        if let Err(e) = validate_request(req) {
            self.tracer
                .complete_error(&tracing_ctx, method, &e.to_string());
            return Err(e);
        }

        let product = match self.command.create_product(req).await {
            Ok(product) => product,
            Err(e) => {
                let msg = format!("Failed to create product: {e}");
                self.tracer.complete_error(&tracing_ctx, method, &msg);
                return Err(ServiceError::Repo(e));
            }
        };

        self.tracer
            .complete_success(&tracing_ctx, method, "Product created");

        Ok(ApiResponse::success(
            "Product created successfully",
            ProductResponse::from(product),
        ))
    }

    async fn update_product(
        &self,
        id: i32,
        req: &UpdateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("✏️ Updating product ID={id}");

        if let Some(body_id) = req.id
            && body_id != id
        {
            info!("Ignoring body id {body_id}, updating product ID={id}");
        }

        let method = Method::Put;
        let tracing_ctx = self.tracer.start(
            "update_product",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "update"),
                KeyValue::new("product.id", id.to_string()),
            ],
        );

        if let Err(e) = validate_request(req) {
            self.tracer
                .complete_error(&tracing_ctx, method, &e.to_string());
            return Err(e);
        }

        if let Err(e) = find_available_or_not_found(&self.query, id).await {
            error!("❌ Cannot update product ID {id}: {e}");
            self.tracer
                .complete_error(&tracing_ctx, method, &e.to_string());
            return Err(e);
        }

        let record = UpdateProductRecord::from(req.clone());

        let product = match self.command.update_product(id, &record).await {
            Ok(product) => product,
            Err(e) => {
                let msg = format!("Failed to update product ID {id}: {e}");
                self.tracer.complete_error(&tracing_ctx, method, &msg);
                return Err(write_error(id, e));
            }
        };

        self.tracer
            .complete_success(&tracing_ctx, method, "Product updated");

        Ok(ApiResponse::success(
            "Product updated successfully",
            ProductResponse::from(product),
        ))
    }

    async fn remove_product(&self, id: i32) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🗑️ Removing product ID={id}");

        let method = Method::Delete;
        let tracing_ctx = self.tracer.start(
            "remove_product",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "remove"),
                KeyValue::new("product.id", id.to_string()),
            ],
        );

        if let Err(e) = find_available_or_not_found(&self.query, id).await {
            error!("❌ Cannot remove product ID {id}: {e}");
            self.tracer
                .complete_error(&tracing_ctx, method, &e.to_string());
            return Err(e);
        }

        let product = match self.command.trash_product(id).await {
            Ok(product) => product,
            Err(e) => {
                let msg = format!("Failed to remove product ID {id}: {e}");
                self.tracer.complete_error(&tracing_ctx, method, &msg);
                return Err(write_error(id, e));
            }
        };

        self.tracer
            .complete_success(&tracing_ctx, method, "Product removed");

        Ok(ApiResponse::success(
            "Product removed successfully",
            ProductResponse::from(product),
        ))
    }
}
