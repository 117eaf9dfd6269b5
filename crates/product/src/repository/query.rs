use crate::{
    abstract_trait::product::repository::ProductQueryRepositoryTrait,
    model::product::Product as ProductModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

#[derive(Clone)]
pub struct ProductQueryRepository {
    db: ConnectionPool,
}

impl ProductQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for ProductQueryRepository {
    async fn count_available(&self) -> Result<i64, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM products
            WHERE available = TRUE
            "#,
        )
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to count available products: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(total)
    }

    async fn find_available(
        &self,
        skip: i64,
        take: i64,
    ) -> Result<Vec<ProductModel>, RepositoryError> {
        info!("🟢 Fetching available products | skip: {skip}, take: {take}");

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let products = sqlx::query_as::<_, ProductModel>(
            r#"
            SELECT
                product_id,
                name,
                price,
                available,
                created_at,
                updated_at
            FROM products
            WHERE available = TRUE
            ORDER BY product_id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(take)
        .bind(skip)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch available products: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(products)
    }

    async fn find_available_by_id(
        &self,
        id: i32,
    ) -> Result<Option<ProductModel>, RepositoryError> {
        info!("🆔 Fetching available product by ID: {id}");

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, ProductModel>(
            r#"
            SELECT
                product_id,
                name,
                price,
                available,
                created_at,
                updated_at
            FROM products
            WHERE product_id = $1
              AND available = TRUE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)?;

        Ok(result)
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<ProductModel>, RepositoryError> {
        info!("🧾 Fetching products by IDs: {ids:?}");

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let products = sqlx::query_as::<_, ProductModel>(
            r#"
            SELECT
                product_id,
                name,
                price,
                available,
                created_at,
                updated_at
            FROM products
            WHERE product_id = ANY($1)
            ORDER BY product_id ASC
            "#,
        )
        .bind(ids)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch products by IDs: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(products)
    }
}
