#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use product::{
    abstract_trait::product::repository::{
        ProductCommandRepositoryTrait, ProductQueryRepositoryTrait,
    },
    di::DependenciesInject,
    domain::requests::product::{CreateProductRequest, UpdateProductRecord},
    model::product::Product as ProductModel,
};
use prometheus_client::registry::Registry;
use rust_decimal::Decimal;
use shared::errors::RepositoryError;
use std::{
    str::FromStr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

/// Product table kept in memory; every trait call is counted so tests
/// can assert that rejected input never reached the store.
#[derive(Default)]
pub struct InMemoryProductStore {
    rows: Mutex<Vec<ProductModel>>,
    calls: AtomicUsize,
    drop_before_write: AtomicBool,
}

impl InMemoryProductStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn row(&self, id: i32) -> Option<ProductModel> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.product_id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Seeds a row directly, bypassing validation and the call counter.
    pub fn seed(&self, name: &str, price: &str, available: bool) -> i32 {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as i32 + 1;
        let now = Utc::now().naive_utc();
        rows.push(ProductModel {
            product_id: id,
            name: name.to_string(),
            price: dec(price),
            available,
            created_at: Some(now),
            updated_at: Some(now),
        });
        id
    }

    /// Makes the next writes lose their row right before applying, as if
    /// a concurrent writer had removed it after the existence check.
    pub fn drop_rows_before_write(&self) {
        self.drop_before_write.store(true, Ordering::SeqCst);
    }

    fn take_row_if_dropping(&self, rows: &mut Vec<ProductModel>, id: i32) {
        if self.drop_before_write.load(Ordering::SeqCst) {
            rows.retain(|p| p.product_id != id);
        }
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for InMemoryProductStore {
    async fn count_available(&self) -> Result<i64, RepositoryError> {
        self.hit();
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|p| p.available).count() as i64)
    }

    async fn find_available(
        &self,
        skip: i64,
        take: i64,
    ) -> Result<Vec<ProductModel>, RepositoryError> {
        self.hit();
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|p| p.available)
            .skip(skip as usize)
            .take(take as usize)
            .cloned()
            .collect())
    }

    async fn find_available_by_id(
        &self,
        id: i32,
    ) -> Result<Option<ProductModel>, RepositoryError> {
        self.hit();
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|p| p.product_id == id && p.available)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<ProductModel>, RepositoryError> {
        self.hit();
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|p| ids.contains(&p.product_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for InMemoryProductStore {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ProductModel, RepositoryError> {
        self.hit();
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now().naive_utc();
        let product = ProductModel {
            product_id: rows.len() as i32 + 1,
            name: req.name.clone(),
            price: req.price,
            available: req.available,
            created_at: Some(now),
            updated_at: Some(now),
        };
        rows.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: i32,
        record: &UpdateProductRecord,
    ) -> Result<ProductModel, RepositoryError> {
        self.hit();
        let mut rows = self.rows.lock().unwrap();
        self.take_row_if_dropping(&mut rows, id);
        let row = rows
            .iter_mut()
            .find(|p| p.product_id == id)
            .ok_or(RepositoryError::NotFound)?;

        if let Some(name) = &record.name {
            row.name = name.clone();
        }
        if let Some(price) = record.price {
            row.price = price;
        }
        if let Some(available) = record.available {
            row.available = available;
        }
        row.updated_at = Some(Utc::now().naive_utc());

        Ok(row.clone())
    }

    async fn trash_product(&self, id: i32) -> Result<ProductModel, RepositoryError> {
        self.hit();
        let mut rows = self.rows.lock().unwrap();
        self.take_row_if_dropping(&mut rows, id);
        let row = rows
            .iter_mut()
            .find(|p| p.product_id == id)
            .ok_or(RepositoryError::NotFound)?;

        row.available = false;
        row.updated_at = Some(Utc::now().naive_utc());

        Ok(row.clone())
    }
}

pub fn dec(raw: &str) -> Decimal {
    Decimal::from_str(raw).unwrap()
}

pub fn setup() -> (Arc<InMemoryProductStore>, DependenciesInject) {
    let (store, deps, _registry) = setup_with_registry();
    (store, deps)
}

pub fn setup_with_registry() -> (Arc<InMemoryProductStore>, DependenciesInject, Registry) {
    let store = Arc::new(InMemoryProductStore::default());
    let mut registry = Registry::default();
    let deps = DependenciesInject::from_repositories(store.clone(), store.clone(), &mut registry);
    (store, deps, registry)
}

/// Renders the registry in the text exposition format.
pub fn encode_metrics(registry: &Registry) -> String {
    let mut buffer = String::new();
    prometheus_client::encoding::text::encode(&mut buffer, registry).unwrap();
    buffer
}
