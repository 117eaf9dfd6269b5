use crate::{
    abstract_trait::product::service::DynProductQueryService,
    domain::requests::product::{FindAllProducts, default_limit, default_page},
};
use genproto::product::{
    ApiResponsePaginationProduct, ApiResponseProduct, ApiResponseProducts, FindAllProductRequest,
    FindByIdProductRequest, ValidateProductsRequest,
    product_query_service_server::ProductQueryService,
};
use shared::errors::AppErrorGrpc;
use tonic::{Request, Response, Status};
use tracing::info;

#[derive(Clone)]
pub struct ProductQueryServiceImpl {
    pub query: DynProductQueryService,
}

impl ProductQueryServiceImpl {
    pub fn new(query: DynProductQueryService) -> Self {
        Self { query }
    }
}

#[tonic::async_trait]
impl ProductQueryService for ProductQueryServiceImpl {
    async fn find_all(
        &self,
        request: Request<FindAllProductRequest>,
    ) -> Result<Response<ApiResponsePaginationProduct>, Status> {
        info!("Handling gRPC request: FindAll Products");

        let req = request.into_inner();

        let domain_req = FindAllProducts {
            page: req.page.unwrap_or_else(default_page),
            limit: req.limit.unwrap_or_else(default_limit),
        };

        let api_response = self
            .query
            .find_all(&domain_req)
            .await
            .map_err(AppErrorGrpc::from)?;

        let data: Vec<genproto::product::ProductResponse> = api_response
            .data
            .into_iter()
            .map(|item| item.into())
            .collect();

        let len = data.len();

        let reply = ApiResponsePaginationProduct {
            status: api_response.status,
            message: api_response.message,
            data,
            meta: Some(api_response.meta.into()),
        };

        info!("Successfully fetched {} Products", len);

        Ok(Response::new(reply))
    }

    async fn find_by_id(
        &self,
        request: Request<FindByIdProductRequest>,
    ) -> Result<Response<ApiResponseProduct>, Status> {
        info!("Handling gRPC request: Find Product by ID");

        let req = request.into_inner();

        let api_response = self
            .query
            .find_by_id(req.id)
            .await
            .map_err(AppErrorGrpc::from)?;

        let reply = ApiResponseProduct {
            status: api_response.status,
            message: api_response.message,
            data: Some(api_response.data.into()),
        };

        info!("Successfully fetched Product with ID: {}", req.id);
        Ok(Response::new(reply))
    }

    async fn validate_products(
        &self,
        request: Request<ValidateProductsRequest>,
    ) -> Result<Response<ApiResponseProducts>, Status> {
        info!("Handling gRPC request: Validate Products");

        let req = request.into_inner();

        let api_response = self
            .query
            .validate_products(&req.ids)
            .await
            .map_err(AppErrorGrpc::from)?;

        let reply = ApiResponseProducts {
            status: api_response.status,
            message: api_response.message,
            data: api_response.data.into_iter().map(|item| item.into()).collect(),
        };

        info!("Validated {} Products", reply.data.len());
        Ok(Response::new(reply))
    }
}
