use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::features::products::models::Product;

/// Composable predicate over product records.
///
/// Conditions combine with AND; an empty filter matches every record.
/// Substring matching on the name is case-insensitive, exact matching is
/// case-sensitive. A filter on `updated_since` never matches records that
/// have not been mutated yet.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    active: Option<bool>,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
    max_stock: Option<i32>,
    exact_stock: Option<i32>,
    created_from: Option<DateTime<Utc>>,
    created_until: Option<DateTime<Utc>>,
    updated_since: Option<DateTime<Utc>>,
    name_contains: Option<String>,
    name_equals: Option<String>,
    ids: Option<HashSet<i32>>,
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(mut self) -> Self {
        self.active = Some(true);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = Some(false);
        self
    }

    pub fn price_at_least(mut self, min: Decimal) -> Self {
        self.min_price = Some(min);
        self
    }

    pub fn price_at_most(mut self, max: Decimal) -> Self {
        self.max_price = Some(max);
        self
    }

    pub fn stock_at_most(mut self, threshold: i32) -> Self {
        self.max_stock = Some(threshold);
        self
    }

    pub fn stock_exactly(mut self, quantity: i32) -> Self {
        self.exact_stock = Some(quantity);
        self
    }

    pub fn created_from(mut self, start: DateTime<Utc>) -> Self {
        self.created_from = Some(start);
        self
    }

    pub fn created_until(mut self, end: DateTime<Utc>) -> Self {
        self.created_until = Some(end);
        self
    }

    pub fn updated_since(mut self, cutoff: DateTime<Utc>) -> Self {
        self.updated_since = Some(cutoff);
        self
    }

    pub fn name_contains(mut self, term: &str) -> Self {
        self.name_contains = Some(term.to_lowercase());
        self
    }

    pub fn name_equals(mut self, name: &str) -> Self {
        self.name_equals = Some(name.to_string());
        self
    }

    pub fn id_in(mut self, ids: &[i32]) -> Self {
        self.ids = Some(ids.iter().copied().collect());
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(active) = self.active {
            if product.is_active != active {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if product.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price > max {
                return false;
            }
        }
        if let Some(threshold) = self.max_stock {
            if product.stock_quantity > threshold {
                return false;
            }
        }
        if let Some(quantity) = self.exact_stock {
            if product.stock_quantity != quantity {
                return false;
            }
        }
        if let Some(start) = self.created_from {
            if product.created_at < start {
                return false;
            }
        }
        if let Some(end) = self.created_until {
            if product.created_at > end {
                return false;
            }
        }
        if let Some(cutoff) = self.updated_since {
            match product.updated_at {
                Some(updated_at) if updated_at >= cutoff => {}
                _ => return false,
            }
        }
        if let Some(ref term) = self.name_contains {
            if !product.name.to_lowercase().contains(term) {
                return false;
            }
        }
        if let Some(ref name) = self.name_equals {
            if product.name != *name {
                return false;
            }
        }
        if let Some(ref ids) = self.ids {
            if !ids.contains(&product.id) {
                return false;
            }
        }
        true
    }
}

/// Field a sorted product listing orders by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Price,
    Stock,
    CreatedAt,
    Id,
}

impl SortKey {
    /// Maps a caller-supplied key to a sort field. Unrecognized keys order
    /// by id.
    pub fn parse(key: &str) -> Self {
        match key.to_lowercase().as_str() {
            "name" => Self::Name,
            "price" => Self::Price,
            "stock" => Self::Stock,
            "createdat" => Self::CreatedAt,
            _ => Self::Id,
        }
    }

    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Name => a.name.cmp(&b.name),
            Self::Price => a.price.cmp(&b.price),
            Self::Stock => a.stock_quantity.cmp(&b.stock_quantity),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::Id => a.id.cmp(&b.id),
        }
    }
}
