use std::sync::Arc;

use crate::core::error::Result;
use crate::features::products::repository::ProductRepository;
use crate::features::products::store::ProductStore;

/// Groups repository access with the commit boundary.
///
/// Built explicitly at request-scope start; mutations staged through
/// [`products`](Self::products) become durable only when `save_changes`
/// flushes them. Dropping the unit of work without committing discards the
/// staged batch (the in-memory overlay is dropped, a Postgres transaction
/// rolls back).
pub struct UnitOfWork<S: ProductStore> {
    products: ProductRepository<S>,
    store: Arc<S>,
}

impl<S: ProductStore> UnitOfWork<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            products: ProductRepository::new(Arc::clone(&store)),
            store,
        }
    }

    pub fn products(&self) -> &ProductRepository<S> {
        &self.products
    }

    /// Flushes every staged mutation in one batch. Returns the number of
    /// affected record writes.
    pub async fn save_changes(&self) -> Result<u64> {
        self.store.save_changes().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::products::store::InMemoryProductStore;
    use crate::shared::test_helpers::{dec, new_product};

    #[tokio::test]
    async fn save_changes_flushes_the_staged_batch() {
        let uow = UnitOfWork::new(Arc::new(InMemoryProductStore::new()));

        uow.products().add(new_product("Widget", dec("9.99"), 5)).await.unwrap();
        uow.products().add(new_product("Gadget", dec("4.50"), 2)).await.unwrap();
        uow.products().delete(1).await.unwrap();

        assert_eq!(uow.save_changes().await.unwrap(), 2);
        assert_eq!(uow.save_changes().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn bulk_pass_commits_as_one_batch() {
        let uow = UnitOfWork::new(Arc::new(InMemoryProductStore::new()));
        for name in ["A", "B", "C"] {
            uow.products().add(new_product(name, dec("10.00"), 1)).await.unwrap();
        }
        uow.save_changes().await.unwrap();

        let staged = uow.products().bulk_update_prices(dec("50"), true).await.unwrap();
        assert_eq!(staged, 3);
        assert_eq!(uow.save_changes().await.unwrap(), 3);
        assert_eq!(uow.products().average_price().await.unwrap(), dec("15.00"));
    }
}
