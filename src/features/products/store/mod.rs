//! Keyed storage for product records with staged mutations.
//!
//! Mutating operations stage their writes; nothing becomes durable until
//! `save_changes` flushes the staged batch in one go. This is what lets the
//! repository's bulk passes touch many records and commit them as a single
//! unit.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::products::models::Product;

pub use memory::InMemoryProductStore;
pub use postgres::PgProductStore;

/// Capability contract for product record storage.
///
/// Absent records are a valid result, not an error: `get_by_id` returns
/// `None`, `update` and `delete` on a missing id are silent no-ops.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Every record regardless of active flag, in store-native (id) order.
    async fn get_all(&self) -> Result<Vec<Product>>;

    async fn get_by_id(&self, id: i32) -> Result<Option<Product>>;

    /// Stages an insert. The store assigns `id` and `created_at`, clears
    /// `updated_at` and forces `is_active` on; caller-assigned fields are
    /// preserved. Returns the record as stored.
    async fn add(&self, product: Product) -> Result<Product>;

    /// Stages a full-record overwrite of the mutable fields (`name`,
    /// `price`, `stock_quantity`, `is_active`) and stamps `updated_at`.
    /// `id` and `created_at` keep their stored values.
    async fn update(&self, product: Product) -> Result<()>;

    /// Logical delete: stages `is_active = false` and stamps `updated_at`.
    /// The row itself is never removed.
    async fn delete(&self, id: i32) -> Result<()>;

    async fn exists(&self, id: i32) -> Result<bool>;

    /// Flushes every staged mutation in one batch and returns the number of
    /// staged record writes. A call with nothing staged returns 0.
    async fn save_changes(&self) -> Result<u64>;
}
