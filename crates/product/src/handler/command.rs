use crate::{
    abstract_trait::product::service::DynProductCommandService,
    domain::requests::product::{
        CreateProductRequest as DomainCreateProductRequest,
        UpdateProductRequest as DomainUpdateProductRequest, parse_price,
        reject_with_price_violation,
    },
};
use genproto::product::{
    ApiResponseProduct, CreateProductRequest, FindByIdProductRequest, UpdateProductRequest,
    product_command_service_server::ProductCommandService,
};
use rust_decimal::Decimal;
use shared::errors::{AppErrorGrpc, ServiceError};
use tonic::{Request, Response, Status};
use tracing::info;

#[derive(Clone)]
pub struct ProductCommandServiceImpl {
    pub command: DynProductCommandService,
}

impl ProductCommandServiceImpl {
    pub fn new(command: DynProductCommandService) -> Self {
        Self { command }
    }
}

impl TryFrom<CreateProductRequest> for DomainCreateProductRequest {
    type Error = ServiceError;

    fn try_from(req: CreateProductRequest) -> Result<Self, Self::Error> {
        let parsed = parse_price(&req.price);

        let domain_req = DomainCreateProductRequest {
            name: req.name,
            // stand-in so the other fields are still checked
            price: parsed.as_ref().copied().unwrap_or(Decimal::ONE),
            available: req.available.unwrap_or(true),
        };

        match parsed {
            Ok(_) => Ok(domain_req),
            Err(violation) => Err(reject_with_price_violation(&domain_req, violation)),
        }
    }
}

#[tonic::async_trait]
impl ProductCommandService for ProductCommandServiceImpl {
    async fn create(
        &self,
        request: Request<CreateProductRequest>,
    ) -> Result<Response<ApiResponseProduct>, Status> {
        info!("Creating new Product");

        let domain_req = DomainCreateProductRequest::try_from(request.into_inner())
            .map_err(AppErrorGrpc::from)?;

        let api_response = self
            .command
            .create_product(&domain_req)
            .await
            .map_err(AppErrorGrpc::from)?;

        info!(
            "Product created successfully with ID: {}",
            api_response.data.id
        );

        let reply = ApiResponseProduct {
            status: api_response.status,
            message: api_response.message,
            data: Some(api_response.data.into()),
        };

        Ok(Response::new(reply))
    }

    async fn update(
        &self,
        request: Request<UpdateProductRequest>,
    ) -> Result<Response<ApiResponseProduct>, Status> {
        info!("Updating Product");

        let req = request.into_inner();
        let body = req.body.unwrap_or_default();

        let parsed_price = body.price.as_deref().map(parse_price).transpose();

        let domain_req = DomainUpdateProductRequest {
            id: body.id,
            name: body.name,
            price: parsed_price.as_ref().ok().copied().flatten(),
            available: body.available,
        };

        if let Err(violation) = parsed_price {
            let err = reject_with_price_violation(&domain_req, violation);
            return Err(AppErrorGrpc::from(err).into());
        }

        let api_response = self
            .command
            .update_product(req.id, &domain_req)
            .await
            .map_err(AppErrorGrpc::from)?;

        let reply = ApiResponseProduct {
            status: api_response.status,
            message: api_response.message,
            data: Some(api_response.data.into()),
        };

        info!("Product updated successfully: ID={}", req.id);
        Ok(Response::new(reply))
    }

    async fn remove(
        &self,
        request: Request<FindByIdProductRequest>,
    ) -> Result<Response<ApiResponseProduct>, Status> {
        info!("Soft deleting Product");

        let req = request.into_inner();

        let api_response = self
            .command
            .remove_product(req.id)
            .await
            .map_err(AppErrorGrpc::from)?;

        let reply = ApiResponseProduct {
            status: api_response.status,
            message: api_response.message,
            data: Some(api_response.data.into()),
        };

        info!("Product soft deleted: ID={}", req.id);
        Ok(Response::new(reply))
    }
}
