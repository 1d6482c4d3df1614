use std::sync::Arc;

use crate::error::{ServiceError, ServiceResult};
use crate::pagination::{PageRequest, Paginated};
use crate::packet_models::{Packet, PacketRequest, PacketView};
use crate::storage::Database;
use crate::validation::object_id;

/// Packet CRUD plus the packet → category links. Every packet handed back
/// has its categories populated.
#[derive(Clone)]
pub struct PacketService {
    db: Arc<Database>,
}

impl PacketService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, request: PacketRequest) -> ServiceResult<PacketView> {
        let packet = Packet::new(request.validate_new()?);
        let saved = self.db.packets.insert(packet).await?;
        tracing::info!(id = %saved.id, name = %saved.name, "packet created");
        self.populate(saved).await
    }

    pub async fn list(&self, page: PageRequest) -> ServiceResult<Paginated<PacketView>> {
        self.find_paginated(|_| true, page).await
    }

    pub async fn get_by_id(&self, id: &str) -> ServiceResult<PacketView> {
        object_id(id, "packet")?;
        let packet = self
            .db
            .packets
            .find_by_id(id)
            .await?
            .ok_or_else(not_found)?;
        self.populate(packet).await
    }

    pub async fn update(&self, id: &str, request: PacketRequest) -> ServiceResult<PacketView> {
        object_id(id, "packet")?;
        let changes = request.validate_changes()?;

        let packet = self
            .db
            .packets
            .update_one(|p| p.id == id, |p| p.apply(changes))
            .await?
            .ok_or_else(not_found)?;
        self.populate(packet).await
    }

    /// Hard delete. Users holding the id keep it.
    pub async fn delete(&self, id: &str) -> ServiceResult<Packet> {
        object_id(id, "packet")?;
        let deleted = self
            .db
            .packets
            .delete_one(|p| p.id == id)
            .await?
            .ok_or_else(not_found)?;
        tracing::info!(id = %deleted.id, "packet deleted");
        Ok(deleted)
    }

    /// Adds the category to the packet's set. Attaching twice is a no-op.
    pub async fn add_category(
        &self,
        packet_id: &str,
        category_id: &str,
    ) -> ServiceResult<PacketView> {
        object_id(packet_id, "packet")?;
        object_id(category_id, "category")?;

        if self.db.categories.find_by_id(category_id).await?.is_none() {
            return Err(ServiceError::NotFound("Category not found".to_string()));
        }

        let packet = self
            .db
            .packets
            .update_one(
                |p| p.id == packet_id,
                |p| {
                    if p.add_category(category_id) {
                        tracing::debug!(
                            packet = %p.id,
                            category = category_id,
                            "category attached"
                        );
                    }
                },
            )
            .await?
            .ok_or_else(not_found)?;
        self.populate(packet).await
    }

    /// Removes the category from the packet's set, if it is there.
    pub async fn remove_category(
        &self,
        packet_id: &str,
        category_id: &str,
    ) -> ServiceResult<PacketView> {
        object_id(packet_id, "packet")?;
        object_id(category_id, "category")?;

        let packet = self
            .db
            .packets
            .update_one(|p| p.id == packet_id, |p| p.remove_category(category_id))
            .await?
            .ok_or_else(not_found)?;
        self.populate(packet).await
    }

    pub async fn search_by_category(
        &self,
        category_id: &str,
        page: PageRequest,
    ) -> ServiceResult<Paginated<PacketView>> {
        object_id(category_id, "category")?;
        self.find_paginated(|p| p.has_category(category_id), page)
            .await
    }

    async fn find_paginated<F>(
        &self,
        filter: F,
        page: PageRequest,
    ) -> ServiceResult<Paginated<PacketView>>
    where
        F: Fn(&Packet) -> bool,
    {
        let total = self.db.packets.count(&filter).await?;
        let packets = self
            .db
            .packets
            .find_page(&filter, page.skip(), page.take())
            .await?;

        let mut data = Vec::with_capacity(packets.len());
        for packet in packets {
            data.push(self.populate(packet).await?);
        }
        Ok(page.paginate(total, data))
    }

    async fn populate(&self, packet: Packet) -> ServiceResult<PacketView> {
        let resolved = self.db.categories.find_by_ids(&packet.categories).await?;
        Ok(PacketView::populate(packet, resolved))
    }
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("Packet not found".to_string())
}
