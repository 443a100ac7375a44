use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use tokio::sync::Mutex;

use crate::core::error::{AppError, Result};
use crate::features::products::models::Product;
use crate::features::products::store::ProductStore;

const PRODUCT_COLUMNS: &str = "id, name, price, stock_quantity, created_at, updated_at, is_active";

/// Postgres-backed product store over a `products` table.
///
/// Mutations execute inside a transaction that opens lazily on the first
/// staged write and stays open until `save_changes` commits it, so a batch
/// of staged writes becomes durable atomically. Reads route through the open
/// transaction when one exists and through the pool otherwise. Dropping the
/// store with an open transaction rolls the staged batch back.
pub struct PgProductStore {
    pool: PgPool,
    session: Mutex<Session>,
}

#[derive(Default)]
struct Session {
    tx: Option<Transaction<'static, Postgres>>,
    staged: u64,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            session: Mutex::new(Session::default()),
        }
    }

    async fn open_tx<'s>(
        &self,
        session: &'s mut Session,
    ) -> Result<&'s mut Transaction<'static, Postgres>> {
        let tx = match session.tx.take() {
            Some(tx) => tx,
            None => self.pool.begin().await.map_err(|e| {
                tracing::error!("Failed to begin transaction: {:?}", e);
                AppError::Database(e)
            })?,
        };
        Ok(session.tx.insert(tx))
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn get_all(&self) -> Result<Vec<Product>> {
        let mut session = self.session.lock().await;
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id");
        let query = sqlx::query_as::<_, Product>(&sql);
        let products = match session.tx.as_mut() {
            Some(tx) => query.fetch_all(&mut **tx).await,
            None => query.fetch_all(&self.pool).await,
        }
        .map_err(|e| {
            tracing::error!("Failed to load products: {:?}", e);
            AppError::Database(e)
        })?;
        Ok(products)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Product>> {
        let mut session = self.session.lock().await;
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let query = sqlx::query_as::<_, Product>(&sql).bind(id);
        let product = match session.tx.as_mut() {
            Some(tx) => query.fetch_optional(&mut **tx).await,
            None => query.fetch_optional(&self.pool).await,
        }
        .map_err(|e| {
            tracing::error!("Failed to load product {}: {:?}", id, e);
            AppError::Database(e)
        })?;
        Ok(product)
    }

    async fn add(&self, product: Product) -> Result<Product> {
        let mut session = self.session.lock().await;
        let tx = self.open_tx(&mut session).await?;
        let sql = format!(
            "INSERT INTO products (name, price, stock_quantity, created_at, updated_at, is_active) \
             VALUES ($1, $2, $3, $4, NULL, TRUE) \
             RETURNING {PRODUCT_COLUMNS}"
        );
        let stored = sqlx::query_as::<_, Product>(&sql)
            .bind(&product.name)
            .bind(product.price)
            .bind(product.stock_quantity)
            .bind(Utc::now())
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to stage product insert: {:?}", e);
                AppError::Database(e)
            })?;
        session.staged += 1;
        Ok(stored)
    }

    async fn update(&self, product: Product) -> Result<()> {
        let mut session = self.session.lock().await;
        let tx = self.open_tx(&mut session).await?;
        let result = sqlx::query(
            "UPDATE products \
             SET name = $2, price = $3, stock_quantity = $4, is_active = $5, updated_at = $6 \
             WHERE id = $1",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(product.stock_quantity)
        .bind(product.is_active)
        .bind(Utc::now())
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to stage product update {}: {:?}", product.id, e);
            AppError::Database(e)
        })?;
        session.staged += result.rows_affected();
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let mut session = self.session.lock().await;
        let tx = self.open_tx(&mut session).await?;
        let result = sqlx::query(
            "UPDATE products SET is_active = FALSE, updated_at = $2 WHERE id = $1",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to stage product delete {}: {:?}", id, e);
            AppError::Database(e)
        })?;
        session.staged += result.rows_affected();
        Ok(())
    }

    async fn exists(&self, id: i32) -> Result<bool> {
        let mut session = self.session.lock().await;
        let query = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(id);
        let found = match session.tx.as_mut() {
            Some(tx) => query.fetch_one(&mut **tx).await,
            None => query.fetch_one(&self.pool).await,
        }
        .map_err(|e| {
            tracing::error!("Failed to check product {}: {:?}", id, e);
            AppError::Database(e)
        })?;
        Ok(found)
    }

    async fn save_changes(&self) -> Result<u64> {
        let mut session = self.session.lock().await;
        let affected = session.staged;
        if let Some(tx) = session.tx.take() {
            tx.commit().await.map_err(|e| {
                tracing::error!("Failed to commit staged batch: {:?}", e);
                AppError::Database(e)
            })?;
        }
        session.staged = 0;
        Ok(affected)
    }
}
