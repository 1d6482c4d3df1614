use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ServiceError, ServiceResult};
use crate::pagination::Paginated;
use crate::storage::{new_object_id, Document};
use crate::validation::required;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    #[schema(example = "65f1c2a9b3e4d5f6a7b8c9d0")]
    pub id: String,
    #[schema(example = "fragile")]
    pub name: String,
    #[schema(example = "Category for fragile items")]
    pub description: String,
    pub is_active: bool,
    #[schema(example = 1)]
    pub priority: u32,
}

impl Category {
    pub fn new(fields: CategoryFields) -> Self {
        Self {
            id: new_object_id(),
            name: fields.name,
            description: fields.description,
            is_active: fields.is_active,
            priority: fields.priority,
        }
    }

    /// Overwrites every field except the id.
    pub fn replace(&mut self, fields: CategoryFields) {
        self.name = fields.name;
        self.description = fields.description;
        self.is_active = fields.is_active;
        self.priority = fields.priority;
    }
}

impl Document for Category {
    const COLLECTION: &'static str = "categories";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Body of both create and replace requests.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    #[schema(example = "fragile")]
    pub name: Option<String>,
    #[schema(example = "Category for fragile items")]
    pub description: Option<String>,
    /// Defaults to `true`
    pub is_active: Option<bool>,
    #[schema(minimum = 0, example = 1)]
    pub priority: Option<i64>,
}

/// A validated [`CategoryRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFields {
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub priority: u32,
}

impl CategoryRequest {
    pub fn validate(self) -> ServiceResult<CategoryFields> {
        let name = required(self.name, "Category", "name")?;
        let description = required(self.description, "Category", "description")?;

        let priority = match self.priority {
            None => {
                return Err(ServiceError::Validation(
                    "Category validation failed: priority is required".to_string(),
                ))
            }
            Some(p) => u32::try_from(p).map_err(|_| {
                ServiceError::Validation(format!(
                    "Category validation failed: priority ({}) must be a non-negative integer",
                    p
                ))
            })?,
        };

        Ok(CategoryFields {
            name,
            description,
            is_active: self.is_active.unwrap_or(true),
            priority,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPage {
    pub total_categories: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub data: Vec<Category>,
}

impl From<Paginated<Category>> for CategoryPage {
    fn from(page: Paginated<Category>) -> Self {
        Self {
            total_categories: page.total,
            total_pages: page.total_pages,
            current_page: page.current_page,
            data: page.data,
        }
    }
}
