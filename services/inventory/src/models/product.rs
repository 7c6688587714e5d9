//! Product models and their row mapping

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Row, postgres::PgRow};
use thiserror::Error;

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Clothing,
    Accessories,
    Footwear,
    Beverages,
}

impl Category {
    /// Name stored in the `category` column
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Clothing => "Clothing",
            Category::Accessories => "Accessories",
            Category::Footwear => "Footwear",
            Category::Beverages => "Beverages",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored category is not one of the known variants
#[derive(Debug, Error)]
#[error("unknown product category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Clothing" => Ok(Category::Clothing),
            "Accessories" => Ok(Category::Accessories),
            "Footwear" => Ok(Category::Footwear),
            "Beverages" => Ok(Category::Beverages),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// Payload for creating or updating a product
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    pub sku: String,
    pub category: Category,
    pub image_url: String,
    pub notes: String,
    pub price: f64,
    pub stock: i32,
    pub location: String,
    pub is_available: bool,
}

/// Full product record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "productId")]
    pub id: String,
    pub name: String,
    pub sku: String,
    pub category: Category,
    pub image_url: String,
    pub notes: String,
    pub price: f64,
    pub stock: i32,
    pub location: String,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// One row of a product listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub is_available: bool,
    pub sku: String,
    pub stock: i32,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub notes: String,
    pub location: String,
    pub image_url: String,
}

fn decode_id(row: &PgRow) -> Result<String, sqlx::Error> {
    let id: i64 = row.try_get("id_product")?;
    Ok(id.to_string())
}

fn decode_category(row: &PgRow) -> Result<Category, sqlx::Error> {
    let raw: String = row.try_get("category")?;
    raw.parse().map_err(|e: UnknownCategory| sqlx::Error::ColumnDecode {
        index: "category".to_string(),
        source: Box::new(e),
    })
}

impl FromRow<'_, PgRow> for ProductListing {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: decode_id(row)?,
            name: row.try_get("name")?,
            category: decode_category(row)?,
            is_available: row.try_get("is_available")?,
            sku: row.try_get("sku")?,
            stock: row.try_get("stock")?,
            price: row.try_get("price")?,
            created_at: row.try_get("created_at")?,
            notes: row.try_get("notes")?,
            location: row.try_get("location")?,
            image_url: row.try_get("image_url")?,
        })
    }
}

impl FromRow<'_, PgRow> for Product {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: decode_id(row)?,
            name: row.try_get("name")?,
            sku: row.try_get("sku")?,
            category: decode_category(row)?,
            image_url: row.try_get("image_url")?,
            notes: row.try_get("notes")?,
            price: row.try_get("price")?,
            stock: row.try_get("stock")?,
            location: row.try_get("location")?,
            is_available: row.try_get("is_available")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            deleted_at: row.try_get("deleted_at")?,
        })
    }
}
