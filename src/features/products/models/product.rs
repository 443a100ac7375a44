use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for a product inventory record.
///
/// `id` and `created_at` are assigned by the store and immutable afterwards.
/// `updated_at` stays `None` until the first mutation; every mutation after
/// that, including logical delete and bulk passes, stamps it. Deleting a
/// product never removes the row, it only flips `is_active`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}
