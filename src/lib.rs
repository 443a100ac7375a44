//! Data-access layer for product inventory records.
//!
//! The crate is organized the same way on every level: a [`ProductStore`]
//! holds the records and stages mutations, a [`ProductRepository`] composes
//! filter/sort/aggregate queries and bulk mutation passes over it, and a
//! [`UnitOfWork`] owns the commit boundary that makes staged work durable.
//! Consumers pick a store backend (in-memory or Postgres), wrap it in a unit
//! of work at request-scope start, and call `save_changes` once per batch.
//!
//! [`ProductStore`]: features::products::store::ProductStore
//! [`ProductRepository`]: features::products::repository::ProductRepository
//! [`UnitOfWork`]: features::products::unit_of_work::UnitOfWork

pub mod core;
pub mod features;
pub mod shared;

pub use crate::core::error::{AppError, Result};
pub use crate::features::products::dtos::{CreateProductDto, ProductDto, UpdateProductDto};
pub use crate::features::products::models::Product;
pub use crate::features::products::query::{ProductFilter, SortKey};
pub use crate::features::products::repository::ProductRepository;
pub use crate::features::products::store::{InMemoryProductStore, PgProductStore, ProductStore};
pub use crate::features::products::unit_of_work::UnitOfWork;
