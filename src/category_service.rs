use std::sync::Arc;

use crate::category_models::{Category, CategoryRequest};
use crate::error::{ServiceError, ServiceResult};
use crate::pagination::{PageRequest, Paginated};
use crate::storage::Database;
use crate::validation::object_id;

/// Category CRUD. Links between categories and packets are owned by
/// [`crate::packet_service::PacketService`].
#[derive(Clone)]
pub struct CategoryService {
    db: Arc<Database>,
}

impl CategoryService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, request: CategoryRequest) -> ServiceResult<Category> {
        let category = Category::new(request.validate()?);
        let saved = self.db.categories.insert(category).await?;
        tracing::info!(id = %saved.id, name = %saved.name, "category created");
        Ok(saved)
    }

    pub async fn list(&self, page: PageRequest) -> ServiceResult<Paginated<Category>> {
        let total = self.db.categories.count(|_| true).await?;
        let data = self
            .db
            .categories
            .find_page(|_| true, page.skip(), page.take())
            .await?;
        Ok(page.paginate(total, data))
    }

    pub async fn get_by_id(&self, id: &str) -> ServiceResult<Category> {
        object_id(id, "category")?;
        self.db
            .categories
            .find_by_id(id)
            .await?
            .ok_or_else(not_found)
    }

    /// Replaces every field; an omitted `isActive` goes back to `true`.
    pub async fn update(&self, id: &str, request: CategoryRequest) -> ServiceResult<Category> {
        object_id(id, "category")?;
        let fields = request.validate()?;

        self.db
            .categories
            .update_one(|c| c.id == id, |c| c.replace(fields))
            .await?
            .ok_or_else(not_found)
    }

    /// Physical delete. Packets referencing the category keep the id.
    pub async fn delete(&self, id: &str) -> ServiceResult<Category> {
        object_id(id, "category")?;
        let deleted = self
            .db
            .categories
            .delete_one(|c| c.id == id)
            .await?
            .ok_or_else(not_found)?;
        tracing::info!(id = %deleted.id, "category deleted");
        Ok(deleted)
    }
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("Category not found".to_string())
}
