use anyhow::Context;
use std::sync::Arc;

use crate::error::{ServiceError, ServiceResult};
use crate::pagination::{PageRequest, Paginated};
use crate::packet_models::Packet;
use crate::storage::Database;
use crate::user_models::{CreateUserRequest, UpdateUserRequest, User};
use crate::validation::object_id;

/// User CRUD with soft delete. Only available users can be looked up or
/// updated; `delete` and `deactivate` ignore availability.
#[derive(Clone)]
pub struct UserService {
    db: Arc<Database>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(db: Arc<Database>) -> Self {
        Self::with_cost(db, bcrypt::DEFAULT_COST)
    }

    pub fn with_cost(db: Arc<Database>, bcrypt_cost: u32) -> Self {
        Self { db, bcrypt_cost }
    }

    pub async fn create(&self, request: CreateUserRequest) -> ServiceResult<User> {
        let fields = request.validate()?;
        let password_hash = self.hash_password(fields.password.clone()).await?;

        let user = self.db.users.insert(User::new(fields, password_hash)).await?;
        tracing::info!(id = %user.id, name = %user.name, "user created");
        Ok(user)
    }

    pub async fn list(&self, page: PageRequest) -> ServiceResult<Paginated<User>> {
        let total = self.db.users.count(|u| u.available).await?;
        let data = self
            .db
            .users
            .find_page(|u| u.available, page.skip(), page.take())
            .await?;
        Ok(page.paginate(total, data))
    }

    pub async fn get_by_id(&self, id: &str) -> ServiceResult<User> {
        object_id(id, "user")?;
        self.db
            .users
            .find_one(|u| u.id == id && u.available)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn update(&self, id: &str, request: UpdateUserRequest) -> ServiceResult<User> {
        object_id(id, "user")?;
        let changes = request.validate()?;

        let password_hash = match &changes.password {
            Some(password) => Some(self.hash_password(password.clone()).await?),
            None => None,
        };

        self.db
            .users
            .update_one(
                |u| u.id == id && u.available,
                |u| u.apply(changes, password_hash),
            )
            .await?
            .ok_or_else(not_found)
    }

    /// Removes the record, available or not.
    pub async fn delete(&self, id: &str) -> ServiceResult<User> {
        object_id(id, "user")?;
        let deleted = self
            .db
            .users
            .delete_one(|u| u.id == id)
            .await?
            .ok_or_else(not_found)?;
        tracing::info!(id = %deleted.id, "user deleted");
        Ok(deleted)
    }

    pub async fn deactivate(&self, id: &str) -> ServiceResult<User> {
        object_id(id, "user")?;
        let user = self
            .db
            .users
            .update_one(|u| u.id == id, |u| u.available = false)
            .await?
            .ok_or_else(not_found)?;
        tracing::info!(id = %user.id, "user deactivated");
        Ok(user)
    }

    /// The packets an available user owns. References to deleted packets are
    /// skipped.
    pub async fn list_packets(&self, user_id: &str) -> ServiceResult<Vec<Packet>> {
        let user = self.get_by_id(user_id).await?;
        let packets = self.db.packets.find_by_ids(&user.packets).await?;
        Ok(packets.into_iter().flatten().collect())
    }

    /// Appends the packet to the user's list unless it is already there.
    ///
    /// The packet lookup and the user update are separate store operations,
    /// so a packet deleted in between leaves a dangling reference.
    pub async fn add_packet(&self, user_id: &str, packet_id: &str) -> ServiceResult<User> {
        object_id(user_id, "user")?;
        object_id(packet_id, "packet")?;

        if self.db.packets.find_by_id(packet_id).await?.is_none() {
            return Err(ServiceError::NotFound("Packet not found".to_string()));
        }

        self.db
            .users
            .update_one(
                |u| u.id == user_id && u.available,
                |u| u.add_packet(packet_id),
            )
            .await?
            .ok_or_else(not_found)
    }

    async fn hash_password(&self, password: String) -> ServiceResult<String> {
        let cost = self.bcrypt_cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .context("Password hashing task failed")?
            .context("Failed to hash password")?;
        Ok(hash)
    }
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("User not found".to_string())
}

/// bcrypt's lowest accepted cost, keeps hashing fast in tests.
#[cfg(test)]
pub(crate) const TEST_BCRYPT_COST: u32 = 4;
