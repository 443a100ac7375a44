#[cfg(test)]
use std::str::FromStr;

#[cfg(test)]
use chrono::{Duration, Utc};

#[cfg(test)]
use rust_decimal::Decimal;

#[cfg(test)]
use crate::features::products::models::Product;

#[cfg(test)]
use crate::features::products::store::InMemoryProductStore;

#[cfg(test)]
#[allow(dead_code)]
pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

/// Active record with the given id, created now, never mutated.
#[cfg(test)]
#[allow(dead_code)]
pub fn product(id: i32, name: &str, price: Decimal, stock_quantity: i32) -> Product {
    Product {
        id,
        name: name.to_string(),
        price,
        stock_quantity,
        created_at: Utc::now(),
        updated_at: None,
        is_active: true,
    }
}

/// Record shaped like caller input to `add`: the store assigns the id.
#[cfg(test)]
#[allow(dead_code)]
pub fn new_product(name: &str, price: Decimal, stock_quantity: i32) -> Product {
    product(0, name, price, stock_quantity)
}

#[cfg(test)]
#[allow(dead_code)]
pub fn aged(mut product: Product, days: i64) -> Product {
    product.created_at = product.created_at - Duration::days(days);
    product
}

/// Store pre-populated with committed records, nothing staged.
#[cfg(test)]
#[allow(dead_code)]
pub async fn seeded_store(products: Vec<Product>) -> InMemoryProductStore {
    let store = InMemoryProductStore::new();
    for product in products {
        store.insert_committed(product).await;
    }
    store
}
