use crate::{
    abstract_trait::product::{
        repository::DynProductQueryRepository, service::ProductQueryServiceTrait,
    },
    domain::{
        requests::product::{FindAllProducts, validate_request},
        response::{
            api::{ApiResponse, ApiResponsePagination},
            pagination::PaginationMeta,
            product::ProductResponse,
        },
    },
    service::find_available_or_not_found,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Method, Metrics, OperationTracer},
};
use std::collections::BTreeSet;
use tracing::{error, info};

#[derive(Clone)]
pub struct ProductQueryService {
    query: DynProductQueryRepository,
    tracer: OperationTracer,
}

impl ProductQueryService {
    pub fn new(query: DynProductQueryRepository, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();
        metrics.register(registry, "product_query_service", "ProductQueryService");

        Self {
            query,
            tracer: OperationTracer::new("product-query-service", metrics),
        }
    }
}

#[async_trait]
impl ProductQueryServiceTrait for ProductQueryService {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<ApiResponsePagination<Vec<ProductResponse>>, ServiceError> {
        info!(
            "🔍 Finding available products | Page: {}, Limit: {}",
            req.page, req.limit
        );

        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "product_find_all",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "find_all"),
                KeyValue::new("page", req.page.to_string()),
                KeyValue::new("limit", req.limit.to_string()),
            ],
        );

        if let Err(e) = validate_request(req) {
            self.tracer
                .complete_error(&tracing_ctx, method, &e.to_string());
            return Err(e);
        }

        let fetched = async {
            let total = self.query.count_available().await?;
            let products = self.query.find_available(req.skip(), req.take()).await?;
            Ok::<_, ServiceError>((products, total))
        }
        .await;

        let (products, total) = match fetched {
            Ok(res) => res,
            Err(e) => {
                let msg = format!("Failed to fetch available products: {e}");
                self.tracer.complete_error(&tracing_ctx, method, &msg);
                return Err(e);
            }
        };

        let data: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();
        let meta = PaginationMeta::new(req.page, req.limit, total);

        self.tracer
            .complete_success(&tracing_ctx, method, "Products retrieved from DB");

        info!("✅ Found {} products (total: {total})", data.len());

        Ok(ApiResponsePagination {
            status: "success".to_string(),
            message: "Products retrieved successfully".to_string(),
            data,
            meta,
        })
    }

    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🆔 Finding product by ID: {id}");

        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "product_find_by_id",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "find_by_id"),
                KeyValue::new("product.id", id.to_string()),
            ],
        );

        let product = match find_available_or_not_found(&self.query, id).await {
            Ok(product) => product,
            Err(e) => {
                error!("❌ Failed to find product ID {id}: {e}");
                self.tracer.complete_error(&tracing_ctx, method, &e.to_string());
                return Err(e);
            }
        };

        self.tracer
            .complete_success(&tracing_ctx, method, "Product retrieved from DB");

        info!("✅ Product retrieved: '{}' (ID: {id})", product.name);

        Ok(ApiResponse::success(
            "Product retrieved successfully",
            ProductResponse::from(product),
        ))
    }

    async fn validate_products(
        &self,
        ids: &[i32],
    ) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError> {
        let unique_ids: Vec<i32> = ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        info!(
            "🧾 Validating {} product IDs ({} distinct)",
            ids.len(),
            unique_ids.len()
        );

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "product_validate",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "validate_products"),
                KeyValue::new("product.ids", format!("{unique_ids:?}")),
            ],
        );

        let products = match self.query.find_by_ids(&unique_ids).await {
            Ok(products) => products,
            Err(e) => {
                let msg = format!("Database error while validating products: {e}");
                self.tracer.complete_error(&tracing_ctx, method, &msg);
                return Err(ServiceError::Repo(e));
            }
        };

        if products.len() != unique_ids.len() {
            let found: BTreeSet<i32> = products.iter().map(|p| p.product_id).collect();
            let missing: Vec<i32> = unique_ids
                .iter()
                .copied()
                .filter(|id| !found.contains(id))
                .collect();

            error!("❌ Products not found: {missing:?}");
            self.tracer
                .complete_error(&tracing_ctx, method, "Some products not found");
            return Err(ServiceError::BadRequest("Some products not found".to_string()));
        }

        self.tracer
            .complete_success(&tracing_ctx, method, "Products validated");

        Ok(ApiResponse::success(
            "Products validated successfully",
            products.into_iter().map(ProductResponse::from).collect(),
        ))
    }
}
