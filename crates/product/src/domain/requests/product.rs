use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::errors::{FieldViolation, ServiceError, collect_violations};
use std::{borrow::Cow, str::FromStr};
use validator::{Validate, ValidationError};

pub const MAX_PRICE_DECIMAL_PLACES: u32 = 4;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindAllProducts {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be a positive number"))]
    pub page: i32,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, message = "limit must be a positive number"))]
    pub limit: i32,
}

pub fn default_page() -> i32 {
    1
}

pub fn default_limit() -> i32 {
    10
}

impl Default for FindAllProducts {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl FindAllProducts {
    pub fn skip(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }

    pub fn take(&self) -> i64 {
        self.limit as i64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "name should not be empty"))]
    pub name: String,

    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,

    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Partial update. `id` is tolerated in the payload but never applied:
/// the row to update is always chosen by the caller's out-of-band id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub id: Option<i32>,

    #[serde(default)]
    #[validate(length(min = 1, message = "name should not be empty"))]
    pub name: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_price"))]
    pub price: Option<Decimal>,

    #[serde(default)]
    pub available: Option<bool>,
}

/// Column changes for a partial update; absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateProductRecord {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub available: Option<bool>,
}

impl From<UpdateProductRequest> for UpdateProductRecord {
    fn from(value: UpdateProductRequest) -> Self {
        let UpdateProductRequest {
            id: _,
            name,
            price,
            available,
        } = value;

        UpdateProductRecord {
            name,
            price,
            available,
        }
    }
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        return Err(ValidationError::new("positive")
            .with_message(Cow::Borrowed("price must be a positive number")));
    }

    if price.normalize().scale() > MAX_PRICE_DECIMAL_PLACES {
        return Err(ValidationError::new("max_decimal_places").with_message(Cow::Owned(
            format!("price must have at most {MAX_PRICE_DECIMAL_PLACES} decimal places"),
        )));
    }

    Ok(())
}

/// Coerces the wire representation of a price into an exact decimal.
pub fn parse_price(raw: &str) -> Result<Decimal, FieldViolation> {
    Decimal::from_str(raw.trim()).map_err(|_| {
        FieldViolation::new(
            "price",
            "is_number",
            "price must be a number conforming to the specified constraints",
        )
    })
}

/// Rejects a request whose price failed coercion, reporting it together
/// with whatever the remaining fields violate.
pub fn reject_with_price_violation<T: Validate>(req: &T, price: FieldViolation) -> ServiceError {
    let mut violations: Vec<FieldViolation> = match req.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => collect_violations(&errors)
            .into_iter()
            .filter(|v| v.field != "price")
            .collect(),
    };
    violations.push(price);
    violations.sort_by(|a, b| a.field.cmp(&b.field).then(a.constraint.cmp(&b.constraint)));

    ServiceError::Validation(violations)
}

/// Runs the derived rules and converts failures into a service error.
pub fn validate_request<T: Validate>(req: &T) -> Result<(), ServiceError> {
    req.validate()
        .map_err(|errors| ServiceError::Validation(collect_violations(&errors)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(raw: &str) -> Decimal {
        Decimal::from_str(raw).unwrap()
    }

    fn violations<T: Validate>(req: &T) -> Vec<FieldViolation> {
        match validate_request(req) {
            Err(ServiceError::Validation(v)) => v,
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn create_accepts_four_decimal_places() {
        let req = CreateProductRequest {
            name: "Keyboard".into(),
            price: dec("9.9999"),
            available: true,
        };

        assert!(validate_request(&req).is_ok());
    }

    #[test]
    fn create_rejects_empty_name_and_non_positive_price() {
        let req = CreateProductRequest {
            name: String::new(),
            price: dec("0"),
            available: true,
        };

        let v = violations(&req);
        assert_eq!(v.len(), 2);
        assert_eq!((v[0].field.as_str(), v[0].constraint.as_str()), ("name", "length"));
        assert_eq!((v[1].field.as_str(), v[1].constraint.as_str()), ("price", "positive"));
    }

    #[test]
    fn negative_price_is_rejected() {
        let req = CreateProductRequest {
            name: "Mouse".into(),
            price: dec("-1.50"),
            available: true,
        };

        assert_eq!(violations(&req)[0].constraint, "positive");
    }

    #[test]
    fn update_rejects_five_decimal_places() {
        let req = UpdateProductRequest {
            price: Some(dec("9.99999")),
            ..Default::default()
        };

        let v = violations(&req);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].field, "price");
        assert_eq!(v[0].constraint, "max_decimal_places");
    }

    #[test]
    fn trailing_zeros_are_not_decimal_places() {
        let req = UpdateProductRequest {
            price: Some(dec("9.50000000")),
            ..Default::default()
        };

        assert!(validate_request(&req).is_ok());
    }

    #[test]
    fn empty_update_is_valid() {
        assert!(validate_request(&UpdateProductRequest::default()).is_ok());
    }

    #[test]
    fn update_record_drops_body_id() {
        let req = UpdateProductRequest {
            id: Some(999),
            name: Some("x".into()),
            ..Default::default()
        };

        let record = UpdateProductRecord::from(req);

        assert_eq!(
            record,
            UpdateProductRecord {
                name: Some("x".into()),
                price: None,
                available: None,
            }
        );
    }

    #[test]
    fn create_defaults_available_to_true() {
        let req: CreateProductRequest =
            serde_json::from_str(r#"{"name":"Desk","price":"120.5"}"#).unwrap();

        assert!(req.available);
        assert_eq!(req.price, dec("120.5"));
    }

    #[test]
    fn parse_price_rejects_non_numbers() {
        assert_eq!(parse_price(" 12.34 ").unwrap(), dec("12.34"));

        let violation = parse_price("twelve").unwrap_err();
        assert_eq!(violation.field, "price");
        assert_eq!(violation.constraint, "is_number");
    }

    #[test]
    fn unparseable_price_is_reported_with_other_fields() {
        let req = CreateProductRequest {
            name: String::new(),
            price: Decimal::ONE,
            available: true,
        };
        let price = parse_price("abc").unwrap_err();

        let v = match reject_with_price_violation(&req, price) {
            ServiceError::Validation(v) => v,
            other => panic!("expected validation failure, got {other:?}"),
        };

        let pairs: Vec<_> = v
            .iter()
            .map(|f| (f.field.as_str(), f.constraint.as_str()))
            .collect();
        assert_eq!(pairs, vec![("name", "length"), ("price", "is_number")]);
    }

    #[test]
    fn pagination_requires_positive_values() {
        let v = violations(&FindAllProducts { page: 0, limit: -3 });

        let fields: Vec<_> = v.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["limit", "page"]);
    }

    #[test]
    fn pagination_skip_and_take() {
        let req = FindAllProducts { page: 3, limit: 10 };

        assert_eq!(req.skip(), 20);
        assert_eq!(req.take(), 10);
        assert_eq!(FindAllProducts::default().skip(), 0);
    }
}
