use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::core::error::Result;
use crate::features::products::models::Product;
use crate::features::products::query::{ProductFilter, SortKey};
use crate::features::products::store::ProductStore;

/// Query and mutation surface over a product store.
///
/// Read operations evaluate a [`ProductFilter`] over the store's full scan
/// and return an empty vec for zero matches, never an error. Bulk passes
/// read the active working set, mutate every record in it and stage the
/// writes through the store; the owning unit of work commits the batch.
pub struct ProductRepository<S: ProductStore> {
    store: Arc<S>,
}

impl<S: ProductStore> ProductRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    async fn filtered(&self, filter: ProductFilter) -> Result<Vec<Product>> {
        let mut products = self.store.get_all().await?;
        products.retain(|p| filter.matches(p));
        Ok(products)
    }

    pub async fn get_all(&self) -> Result<Vec<Product>> {
        self.store.get_all().await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Product>> {
        self.store.get_by_id(id).await
    }

    pub async fn add(&self, product: Product) -> Result<Product> {
        self.store.add(product).await
    }

    pub async fn update(&self, product: Product) -> Result<()> {
        self.store.update(product).await
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        self.store.delete(id).await
    }

    pub async fn exists(&self, id: i32) -> Result<bool> {
        self.store.exists(id).await
    }

    pub async fn active_products(&self) -> Result<Vec<Product>> {
        self.filtered(ProductFilter::new().active()).await
    }

    pub async fn inactive_products(&self) -> Result<Vec<Product>> {
        self.filtered(ProductFilter::new().inactive()).await
    }

    pub async fn products_in_price_range(
        &self,
        min_price: Decimal,
        max_price: Decimal,
    ) -> Result<Vec<Product>> {
        self.filtered(
            ProductFilter::new()
                .active()
                .price_at_least(min_price)
                .price_at_most(max_price),
        )
        .await
    }

    pub async fn products_above_price(&self, price: Decimal) -> Result<Vec<Product>> {
        self.filtered(ProductFilter::new().active().price_at_least(price))
            .await
    }

    pub async fn products_below_price(&self, price: Decimal) -> Result<Vec<Product>> {
        self.filtered(ProductFilter::new().active().price_at_most(price))
            .await
    }

    pub async fn low_stock_products(&self, threshold: i32) -> Result<Vec<Product>> {
        self.filtered(ProductFilter::new().active().stock_at_most(threshold))
            .await
    }

    pub async fn out_of_stock_products(&self) -> Result<Vec<Product>> {
        self.filtered(ProductFilter::new().active().stock_exactly(0))
            .await
    }

    pub async fn products_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Product>> {
        self.filtered(
            ProductFilter::new()
                .active()
                .created_from(start)
                .created_until(end),
        )
        .await
    }

    pub async fn recently_added_products(&self, days: i64) -> Result<Vec<Product>> {
        let cutoff = Utc::now() - Duration::days(days);
        self.filtered(ProductFilter::new().active().created_from(cutoff))
            .await
    }

    /// Records that were never mutated carry no `updated_at` and never match.
    pub async fn recently_updated_products(&self, days: i64) -> Result<Vec<Product>> {
        let cutoff = Utc::now() - Duration::days(days);
        self.filtered(ProductFilter::new().active().updated_since(cutoff))
            .await
    }

    pub async fn search_products_by_name(&self, search_term: &str) -> Result<Vec<Product>> {
        self.filtered(ProductFilter::new().active().name_contains(search_term))
            .await
    }

    /// Active records ordered by the named field; unrecognized keys order
    /// by id. Descending swaps the comparator so equal keys keep store
    /// order either way.
    pub async fn products_with_sorting(
        &self,
        sort_by: &str,
        ascending: bool,
    ) -> Result<Vec<Product>> {
        let key = SortKey::parse(sort_by);
        let mut products = self.filtered(ProductFilter::new().active()).await?;
        products.sort_by(|a, b| {
            if ascending {
                key.compare(a, b)
            } else {
                key.compare(b, a)
            }
        });
        Ok(products)
    }

    /// Applies `price *= 1 ± percentage/100` to every active record and
    /// stages the writes. Returns the working-set size.
    pub async fn bulk_update_prices(&self, percentage: Decimal, increase: bool) -> Result<usize> {
        let adjustment = percentage / Decimal::ONE_HUNDRED;
        let factor = if increase {
            Decimal::ONE + adjustment
        } else {
            Decimal::ONE - adjustment
        };

        let working_set = self.filtered(ProductFilter::new().active()).await?;
        let affected = working_set.len();
        for mut product in working_set {
            product.price *= factor;
            self.store.update(product).await?;
        }
        tracing::debug!("Staged price adjustment for {} products", affected);
        Ok(affected)
    }

    /// Overwrites `stock_quantity` on every active record whose id is in
    /// `product_ids` and stages the writes. Unknown ids are silently
    /// ignored. Returns the working-set size.
    pub async fn bulk_update_stock(&self, product_ids: &[i32], quantity: i32) -> Result<usize> {
        let working_set = self
            .filtered(ProductFilter::new().active().id_in(product_ids))
            .await?;
        let affected = working_set.len();
        for mut product in working_set {
            product.stock_quantity = quantity;
            self.store.update(product).await?;
        }
        tracing::debug!("Staged stock overwrite for {} products", affected);
        Ok(affected)
    }

    /// Mean price over active records; `0` for an empty active set.
    pub async fn average_price(&self) -> Result<Decimal> {
        let products = self.filtered(ProductFilter::new().active()).await?;
        if products.is_empty() {
            return Ok(Decimal::ZERO);
        }
        let total: Decimal = products.iter().map(|p| p.price).sum();
        Ok(total / Decimal::from(products.len() as u64))
    }

    pub async fn total_stock_quantity(&self) -> Result<i64> {
        let products = self.filtered(ProductFilter::new().active()).await?;
        Ok(products.iter().map(|p| i64::from(p.stock_quantity)).sum())
    }

    pub async fn active_product_count(&self) -> Result<usize> {
        Ok(self.filtered(ProductFilter::new().active()).await?.len())
    }

    /// True iff no active record carries the exact name. A name freed by a
    /// logical delete counts as available again.
    pub async fn is_product_name_unique(&self, name: &str) -> Result<bool> {
        let matches = self
            .filtered(ProductFilter::new().active().name_equals(name))
            .await?;
        Ok(matches.is_empty())
    }

    /// True iff the record exists and holds at least the requested
    /// quantity. An absent id is `false`, not an error.
    pub async fn has_sufficient_stock(&self, product_id: i32, requested_quantity: i32) -> Result<bool> {
        let product = self.store.get_by_id(product_id).await?;
        Ok(product.is_some_and(|p| p.stock_quantity >= requested_quantity))
    }
}
