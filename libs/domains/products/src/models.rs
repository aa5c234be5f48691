use chrono::{DateTime, Utc};
use domain_categories::Category;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Highest stock level still counted as "low" when bucketing
pub const LOW_STOCK_CEILING: i32 = 10;

/// Product status
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "product_status")]
pub enum ProductStatus {
    /// Listed and sellable
    #[default]
    #[sea_orm(string_value = "Active")]
    Active,
    #[sea_orm(string_value = "Inactive")]
    Inactive,
}

/// Stock level bucket used for filtering
///
/// The buckets partition the non-negative range: `out` is 0, `low` is 1..=10,
/// `normal` is 11 and up.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StockStatus {
    Normal,
    Low,
    Out,
}

impl StockStatus {
    pub fn of(stock: i32) -> Self {
        match stock {
            s if s > LOW_STOCK_CEILING => Self::Normal,
            s if s > 0 => Self::Low,
            _ => Self::Out,
        }
    }
}

/// Listing order on creation time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// A product with its category embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i32,
    /// Sequential human-readable code (`PROD-001`)
    pub product_code: String,
    pub status: ProductStatus,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Owning category, `null` if it could not be loaded
    pub category: Option<Category>,
}

/// DTO for creating a product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(exclusive_min = 0.0))]
    pub price: f64,

    #[validate(range(min = 0))]
    pub stock: i32,

    #[serde(default)]
    pub status: ProductStatus,

    pub category_id: Uuid,
}

/// DTO for updating a product; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(exclusive_min = 0.0))]
    pub price: Option<f64>,

    #[validate(range(min = 0))]
    pub stock: Option<i32>,

    pub status: Option<ProductStatus>,

    pub category_id: Option<Uuid>,
}

/// Query parameters for listing and exporting products
///
/// `status` and `stockStatus` values that don't name a variant are ignored.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    /// Case-insensitive substring of the name
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    /// `Active` or `Inactive`
    pub status: Option<String>,
    /// `normal`, `low` or `out`
    pub stock_status: Option<String>,
    /// 1-based page number (default 1)
    pub page: Option<u64>,
    /// Page size (default 10)
    pub limit: Option<u64>,
    /// `asc` or `desc` on creation time (default `desc`)
    pub order: Option<String>,
}

impl ProductFilter {
    pub fn sort_order(&self) -> SortOrder {
        self.order
            .as_deref()
            .and_then(|o| o.parse().ok())
            .unwrap_or_default()
    }
}

/// Body of the increment/decrement endpoints
///
/// `quantity` is kept as raw JSON so that strings, fractions and negatives
/// surface as `InvalidQuantity` instead of a generic body rejection.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct StockChange {
    #[serde(default)]
    #[schema(value_type = i32, minimum = 1)]
    pub quantity: Value,
}

impl StockChange {
    pub fn new(quantity: i32) -> Self {
        Self {
            quantity: Value::from(quantity),
        }
    }

    /// The quantity if it is a positive whole number that fits a stock column
    pub fn positive_quantity(&self) -> Option<i32> {
        let n = match &self.quantity {
            Value::Number(n) => n,
            _ => return None,
        };

        let whole = match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i,
            (None, Some(f)) if f.fract() == 0.0 && f.abs() <= i32::MAX as f64 => f as i64,
            _ => return None,
        };

        i32::try_from(whole).ok().filter(|q| *q > 0)
    }
}

impl Product {
    pub fn new(input: CreateProduct, product_code: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            price: input.price,
            stock: input.stock,
            product_code,
            status: input.status,
            category_id: input.category_id,
            created_at: Utc::now(),
            category: None,
        }
    }

    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }
    }

    pub fn stock_status(&self) -> StockStatus {
        StockStatus::of(self.stock)
    }
}
