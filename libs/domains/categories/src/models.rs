use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// A product category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// DTO for creating a category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// DTO for updating a category; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
}

/// Query parameters for listing categories
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryFilter {
    /// Case-insensitive substring of the name
    pub search: Option<String>,
    /// 1-based page number (default 1)
    pub page: Option<u64>,
    /// Page size (default 10)
    pub limit: Option<u64>,
}

impl Category {
    pub fn new(input: CreateCategory) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            created_at: Utc::now(),
        }
    }

    pub fn apply_update(&mut self, update: UpdateCategory) {
        if let Some(name) = update.name {
            self.name = name;
        }
    }

    /// Case-insensitive substring match used by the in-memory repository
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_category_rejects_empty_name() {
        let input = CreateCategory {
            name: String::new(),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_update_category_allows_absent_name() {
        assert!(UpdateCategory::default().validate().is_ok());
    }

    #[test]
    fn test_name_contains_ignores_case() {
        let category = Category::new(CreateCategory {
            name: "Garden Tools".to_string(),
        });
        assert!(category.name_contains("garden"));
        assert!(category.name_contains("TOOLS"));
        assert!(!category.name_contains("kitchen"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let category = Category::new(CreateCategory {
            name: "Hardware".to_string(),
        });
        let json = serde_json::to_value(&category).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }
}
