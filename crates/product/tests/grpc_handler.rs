mod common;

use common::setup;
use genproto::product::{
    CreateProductRequest, FindAllProductRequest, FindByIdProductRequest, UpdateProductBody,
    UpdateProductRequest, ValidateProductsRequest,
    product_command_service_server::ProductCommandService,
    product_query_service_server::ProductQueryService,
};
use product::handler::{command::ProductCommandServiceImpl, query::ProductQueryServiceImpl};
use shared::errors::{ErrorResponse, STATUS_CODE_METADATA};
use std::sync::Arc;
use tonic::{Code, Request, Status};

fn handlers() -> (
    Arc<common::InMemoryProductStore>,
    ProductCommandServiceImpl,
    ProductQueryServiceImpl,
) {
    let (store, deps) = setup();
    let command = ProductCommandServiceImpl::new(Arc::new(deps.product_command.clone()));
    let query = ProductQueryServiceImpl::new(Arc::new(deps.product_query.clone()));
    (store, command, query)
}

fn http_status(status: &Status) -> Option<&str> {
    status
        .metadata()
        .get(STATUS_CODE_METADATA)
        .and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn create_coerces_price_string_and_defaults_available() {
    let (_store, command, _query) = handlers();

    let reply = command
        .create(Request::new(CreateProductRequest {
            name: "Monitor".into(),
            price: "199.9900".into(),
            available: None,
        }))
        .await
        .unwrap()
        .into_inner();

    let data = reply.data.unwrap();
    assert_eq!(reply.status, "success");
    assert_eq!(data.name, "Monitor");
    assert_eq!(data.price, "199.9900");
    assert!(data.available);
}

#[tokio::test]
async fn create_with_non_numeric_price_is_invalid_argument() {
    let (store, command, _query) = handlers();

    let status = command
        .create(Request::new(CreateProductRequest {
            name: "Monitor".into(),
            price: "cheap".into(),
            available: Some(true),
        }))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
    assert!(status.message().contains("price"));
    assert_eq!(http_status(&status), Some("400"));
    assert_eq!(store.calls(), 0);
}

fn violated_fields(status: &Status) -> Vec<(String, String)> {
    let body: ErrorResponse = serde_json::from_slice(status.details()).unwrap();
    body.violations
        .into_iter()
        .map(|v| (v.field, v.constraint))
        .collect()
}

#[tokio::test]
async fn create_reports_bad_price_alongside_empty_name() {
    let (store, command, _query) = handlers();

    let status = command
        .create(Request::new(CreateProductRequest {
            name: String::new(),
            price: "abc".into(),
            available: None,
        }))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
    assert!(status.message().contains("name: "));
    assert!(status.message().contains("(is_number)"));
    assert_eq!(
        violated_fields(&status),
        vec![
            ("name".to_string(), "length".to_string()),
            ("price".to_string(), "is_number".to_string()),
        ]
    );
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn update_reports_bad_price_alongside_empty_name() {
    let (store, command, _query) = handlers();
    let id = store.seed("Lamp", "15.00", true);

    let status = command
        .update(Request::new(UpdateProductRequest {
            id,
            body: Some(UpdateProductBody {
                name: Some(String::new()),
                price: Some("abc".into()),
                ..Default::default()
            }),
        }))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
    assert_eq!(
        violated_fields(&status),
        vec![
            ("name".to_string(), "length".to_string()),
            ("price".to_string(), "is_number".to_string()),
        ]
    );
    assert_eq!(store.calls(), 0);
    assert_eq!(store.row(id).unwrap().name, "Lamp");
}

#[tokio::test]
async fn find_all_uses_defaults_when_fields_absent() {
    let (store, _command, query) = handlers();
    for i in 0..12 {
        store.seed(&format!("item-{i}"), "1", true);
    }

    let reply = query
        .find_all(Request::new(FindAllProductRequest {
            page: None,
            limit: None,
        }))
        .await
        .unwrap()
        .into_inner();

    let meta = reply.meta.unwrap();
    assert_eq!(reply.data.len(), 10);
    assert_eq!((meta.page, meta.limit), (1, 10));
    assert_eq!((meta.total_pages, meta.total_items), (2, 12));
}

#[tokio::test]
async fn find_all_with_zero_limit_is_rejected() {
    let (_store, _command, query) = handlers();

    let status = query
        .find_all(Request::new(FindAllProductRequest {
            page: Some(1),
            limit: Some(0),
        }))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn find_by_id_missing_maps_to_not_found() {
    let (_store, _command, query) = handlers();

    let status = query
        .find_by_id(Request::new(FindByIdProductRequest { id: 42 }))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::NotFound);
    assert_eq!(status.message(), "Product with id 42 not found");
    assert_eq!(http_status(&status), Some("404"));
}

#[tokio::test]
async fn update_uses_outer_id_over_body_id() {
    let (store, command, _query) = handlers();
    let id = store.seed("Cable", "4", true);

    let reply = command
        .update(Request::new(UpdateProductRequest {
            id,
            body: Some(UpdateProductBody {
                id: Some(999),
                name: Some("USB-C cable".into()),
                price: None,
                available: None,
            }),
        }))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(reply.data.unwrap().id, id);
    assert_eq!(store.row(id).unwrap().name, "USB-C cable");
}

#[tokio::test]
async fn remove_then_validate_still_sees_row() {
    let (store, command, query) = handlers();
    let id = store.seed("Speaker", "59", true);

    let removed = command
        .remove(Request::new(FindByIdProductRequest { id }))
        .await
        .unwrap()
        .into_inner();
    assert!(!removed.data.unwrap().available);

    let validated = query
        .validate_products(Request::new(ValidateProductsRequest { ids: vec![id, id] }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(validated.data.len(), 1);

    let status = query
        .validate_products(Request::new(ValidateProductsRequest {
            ids: vec![id, 1000],
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
    assert_eq!(status.message(), "Some products not found");
}
