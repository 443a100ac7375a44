use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::core::error::Result;
use crate::features::products::models::Product;
use crate::features::products::store::ProductStore;

/// In-memory product store.
///
/// Records live in a committed map keyed by id; staged mutations sit in an
/// overlay that reads observe immediately (read-your-writes). `save_changes`
/// folds the overlay into the committed map in one batch. Ids are assigned
/// sequentially starting at 1 and never reused.
pub struct InMemoryProductStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    committed: BTreeMap<i32, Product>,
    staged: BTreeMap<i32, Product>,
    next_id: i32,
}

impl Inner {
    fn current(&self, id: i32) -> Option<&Product> {
        self.staged.get(&id).or_else(|| self.committed.get(&id))
    }
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Places a record directly into committed state, bypassing staging.
    #[cfg(test)]
    pub(crate) async fn insert_committed(&self, product: Product) {
        let mut inner = self.inner.write().await;
        inner.next_id = inner.next_id.max(product.id);
        inner.committed.insert(product.id, product);
    }
}

impl Default for InMemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn get_all(&self) -> Result<Vec<Product>> {
        let inner = self.inner.read().await;
        let mut merged = inner.committed.clone();
        merged.extend(inner.staged.iter().map(|(id, p)| (*id, p.clone())));
        Ok(merged.into_values().collect())
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Product>> {
        let inner = self.inner.read().await;
        Ok(inner.current(id).cloned())
    }

    async fn add(&self, mut product: Product) -> Result<Product> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        product.id = inner.next_id;
        product.created_at = Utc::now();
        product.updated_at = None;
        product.is_active = true;
        inner.staged.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(&self, product: Product) -> Result<()> {
        let mut inner = self.inner.write().await;
        let Some(current) = inner.current(product.id) else {
            return Ok(());
        };
        let stored = Product {
            id: current.id,
            created_at: current.created_at,
            updated_at: Some(Utc::now()),
            name: product.name,
            price: product.price,
            stock_quantity: product.stock_quantity,
            is_active: product.is_active,
        };
        inner.staged.insert(stored.id, stored);
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let mut inner = self.inner.write().await;
        let Some(current) = inner.current(id) else {
            return Ok(());
        };
        let mut stored = current.clone();
        stored.is_active = false;
        stored.updated_at = Some(Utc::now());
        inner.staged.insert(id, stored);
        Ok(())
    }

    async fn exists(&self, id: i32) -> Result<bool> {
        let inner = self.inner.read().await;
        Ok(inner.current(id).is_some())
    }

    async fn save_changes(&self) -> Result<u64> {
        let mut inner = self.inner.write().await;
        let affected = inner.staged.len() as u64;
        let staged = std::mem::take(&mut inner.staged);
        inner.committed.extend(staged);
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{dec, new_product};

    #[tokio::test]
    async fn add_assigns_sequential_ids_and_store_owned_fields() {
        let store = InMemoryProductStore::new();

        let mut first = new_product("Widget", dec("9.99"), 5);
        first.is_active = false; // caller cannot smuggle an inactive record in

        let first = store.add(first).await.unwrap();
        let second = store.add(new_product("Gadget", dec("4.50"), 2)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(first.is_active);
        assert!(first.updated_at.is_none());
        assert_eq!(first.name, "Widget");
        assert_eq!(first.price, dec("9.99"));
    }

    #[tokio::test]
    async fn save_changes_reports_the_staged_batch_size_once() {
        let store = InMemoryProductStore::new();
        store.add(new_product("A", dec("1.00"), 1)).await.unwrap();
        store.add(new_product("B", dec("2.00"), 1)).await.unwrap();

        assert_eq!(store.save_changes().await.unwrap(), 2);
        assert_eq!(store.save_changes().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn update_preserves_id_and_created_at() {
        let store = InMemoryProductStore::new();
        let added = store.add(new_product("Widget", dec("9.99"), 5)).await.unwrap();
        store.save_changes().await.unwrap();

        let mut changed = added.clone();
        changed.name = "Widget Mk2".to_string();
        changed.price = dec("12.00");
        store.update(changed).await.unwrap();

        let stored = store.get_by_id(added.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Widget Mk2");
        assert_eq!(stored.created_at, added.created_at);
        assert!(stored.updated_at.is_some());
    }

    #[tokio::test]
    async fn update_and_delete_on_missing_ids_are_no_ops() {
        let store = InMemoryProductStore::new();

        let mut ghost = new_product("Ghost", dec("1.00"), 1);
        ghost.id = 99;
        store.update(ghost).await.unwrap();
        store.delete(99).await.unwrap();

        assert_eq!(store.save_changes().await.unwrap(), 0);
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_keeps_the_row_and_flips_the_flag() {
        let store = InMemoryProductStore::new();
        let added = store.add(new_product("Widget", dec("9.99"), 5)).await.unwrap();

        store.delete(added.id).await.unwrap();

        let stored = store.get_by_id(added.id).await.unwrap().unwrap();
        assert!(!stored.is_active);
        assert!(stored.updated_at.is_some());
        assert!(store.exists(added.id).await.unwrap());
    }

    #[tokio::test]
    async fn get_all_returns_records_in_id_order() {
        let store = InMemoryProductStore::new();
        store.add(new_product("A", dec("1.00"), 1)).await.unwrap();
        store.add(new_product("B", dec("2.00"), 1)).await.unwrap();
        store.save_changes().await.unwrap();
        store.add(new_product("C", dec("3.00"), 1)).await.unwrap();

        let ids: Vec<i32> = store.get_all().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
