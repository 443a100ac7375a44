use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::products::models::Product;

/// Request DTO for creating a product
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductDto {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    pub price: Decimal,

    #[validate(range(min = 0, message = "Stock quantity must not be negative"))]
    pub stock_quantity: i32,
}

impl CreateProductDto {
    /// Validates the payload and maps it onto a record ready for the store;
    /// the store assigns `id` and the timestamps on `add`.
    pub fn into_product(self) -> Result<Product> {
        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        validate_price(self.price)?;

        Ok(Product {
            id: 0,
            name: self.name,
            price: self.price,
            stock_quantity: self.stock_quantity,
            created_at: Utc::now(),
            updated_at: None,
            is_active: true,
        })
    }
}

/// Request DTO for updating a product
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductDto {
    pub id: i32,

    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    pub price: Decimal,

    #[validate(range(min = 0, message = "Stock quantity must not be negative"))]
    pub stock_quantity: i32,

    pub is_active: bool,
}

impl UpdateProductDto {
    /// Validates the payload and overwrites the record's mutable fields.
    /// `updated_at` is stamped by the store when the change is staged.
    pub fn apply_to(&self, product: &mut Product) -> Result<()> {
        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        validate_price(self.price)?;

        product.name = self.name.clone();
        product.price = self.price;
        product.stock_quantity = self.stock_quantity;
        product.is_active = self.is_active;
        Ok(())
    }
}

// validator's `range` does not cover Decimal fields
fn validate_price(price: Decimal) -> Result<()> {
    if price < Decimal::ZERO {
        return Err(AppError::Validation(
            "Price must not be negative".to_string(),
        ));
    }
    Ok(())
}

/// Response DTO for a product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            price: p.price,
            stock_quantity: p.stock_quantity,
            created_at: p.created_at,
            updated_at: p.updated_at,
            is_active: p.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{dec, product};

    fn create_dto(name: &str, price: Decimal, stock: i32) -> CreateProductDto {
        CreateProductDto {
            name: name.to_string(),
            price,
            stock_quantity: stock,
        }
    }

    #[test]
    fn create_dto_maps_field_for_field() {
        let entity = create_dto("Widget", dec("9.99"), 5).into_product().unwrap();

        assert_eq!(entity.name, "Widget");
        assert_eq!(entity.price, dec("9.99"));
        assert_eq!(entity.stock_quantity, 5);
        assert!(entity.is_active);
        assert!(entity.updated_at.is_none());
    }

    #[test]
    fn create_dto_rejects_bad_payloads() {
        assert!(create_dto("", dec("1.00"), 1).into_product().is_err());
        assert!(create_dto(&"x".repeat(201), dec("1.00"), 1).into_product().is_err());
        assert!(create_dto("Widget", dec("-0.01"), 1).into_product().is_err());
        assert!(create_dto("Widget", dec("1.00"), -1).into_product().is_err());
        assert!(create_dto(&"x".repeat(200), dec("0"), 0)
            .into_product()
            .is_ok());
    }

    #[test]
    fn update_dto_overwrites_only_mutable_fields() {
        let mut entity = product(7, "Widget", dec("9.99"), 5);
        let created_at = entity.created_at;

        let dto = UpdateProductDto {
            id: 7,
            name: "Widget Mk2".to_string(),
            price: dec("12.50"),
            stock_quantity: 8,
            is_active: false,
        };
        dto.apply_to(&mut entity).unwrap();

        assert_eq!(entity.id, 7);
        assert_eq!(entity.created_at, created_at);
        assert_eq!(entity.name, "Widget Mk2");
        assert_eq!(entity.price, dec("12.50"));
        assert_eq!(entity.stock_quantity, 8);
        assert!(!entity.is_active);
    }

    #[test]
    fn update_dto_rejects_negative_price_without_touching_the_record() {
        let mut entity = product(7, "Widget", dec("9.99"), 5);

        let dto = UpdateProductDto {
            id: 7,
            name: "Widget".to_string(),
            price: dec("-1.00"),
            stock_quantity: 5,
            is_active: true,
        };
        assert!(dto.apply_to(&mut entity).is_err());
        assert_eq!(entity.price, dec("9.99"));
    }

    #[test]
    fn response_dto_serializes_camel_case_with_null_updated_at() {
        let dto = ProductDto::from(product(1, "Widget", dec("9.99"), 5));
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["stockQuantity"], 5);
        assert_eq!(json["isActive"], true);
        assert!(json["updatedAt"].is_null());
        assert!(json.get("stock_quantity").is_none());
    }
}
