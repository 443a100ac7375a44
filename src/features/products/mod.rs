//! Product inventory feature.
//!
//! Everything in this crate revolves around one record type: the product.
//! The store holds records and stages mutations, the repository layers
//! filter/sort/aggregate queries and bulk mutation passes on top, and the
//! unit of work owns the commit that makes a staged batch durable.

pub mod dtos;
pub mod models;
pub mod query;
pub mod repository;
pub mod store;
pub mod unit_of_work;

pub use models::Product;
pub use repository::ProductRepository;
pub use store::ProductStore;
pub use unit_of_work::UnitOfWork;
