//! Typed product filters.
//!
//! A listing request is turned into a list of [`ProductPredicate`]s once, and
//! both repositories consume the same list: Postgres through
//! [`build_condition`], the in-memory store through [`matches_all`].

use database::PageRequest;
use sea_orm::{ColumnTrait, Condition};
use uuid::Uuid;

use crate::entity::Column;
use crate::models::{LOW_STOCK_CEILING, Product, ProductFilter, ProductStatus, SortOrder, StockStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum ProductPredicate {
    /// Case-insensitive substring of the name
    NameContains(String),
    CategoryEquals(Uuid),
    StatusEquals(ProductStatus),
    StockBucket(StockStatus),
}

impl ProductPredicate {
    /// Predicates implied by a filter. Blank search and unknown status or
    /// stock bucket values contribute nothing.
    pub fn from_filter(filter: &ProductFilter) -> Vec<Self> {
        let mut predicates = Vec::new();

        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            predicates.push(Self::NameContains(search.to_string()));
        }
        if let Some(category_id) = filter.category_id {
            predicates.push(Self::CategoryEquals(category_id));
        }
        if let Some(status) = filter.status.as_deref().and_then(|s| s.parse().ok()) {
            predicates.push(Self::StatusEquals(status));
        }
        if let Some(bucket) = filter.stock_status.as_deref().and_then(|s| s.parse().ok()) {
            predicates.push(Self::StockBucket(bucket));
        }

        predicates
    }

    pub fn condition(&self) -> Condition {
        match self {
            Self::NameContains(needle) => Condition::all().add(
                database::postgres::contains_ignore_case(Column::Name, needle),
            ),
            Self::CategoryEquals(id) => Condition::all().add(Column::CategoryId.eq(*id)),
            Self::StatusEquals(status) => Condition::all().add(Column::Status.eq(*status)),
            Self::StockBucket(StockStatus::Normal) => {
                Condition::all().add(Column::Stock.gt(LOW_STOCK_CEILING))
            }
            Self::StockBucket(StockStatus::Low) => Condition::all()
                .add(Column::Stock.gt(0))
                .add(Column::Stock.lte(LOW_STOCK_CEILING)),
            Self::StockBucket(StockStatus::Out) => Condition::all().add(Column::Stock.eq(0)),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::NameContains(needle) => product
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Self::CategoryEquals(id) => product.category_id == *id,
            Self::StatusEquals(status) => product.status == *status,
            Self::StockBucket(bucket) => product.stock_status() == *bucket,
        }
    }
}

/// Conjunction of all predicates; empty means "match everything"
pub fn build_condition(predicates: &[ProductPredicate]) -> Condition {
    predicates
        .iter()
        .fold(Condition::all(), |condition, p| condition.add(p.condition()))
}

pub fn matches_all(predicates: &[ProductPredicate], product: &Product) -> bool {
    predicates.iter().all(|p| p.matches(product))
}

/// Everything a repository needs to answer a listing request
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub predicates: Vec<ProductPredicate>,
    pub order: SortOrder,
    pub page: PageRequest,
}

impl From<&ProductFilter> for ProductQuery {
    fn from(filter: &ProductFilter) -> Self {
        Self {
            predicates: ProductPredicate::from_filter(filter),
            order: filter.sort_order(),
            page: PageRequest::new(filter.page, filter.limit),
        }
    }
}
