use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::category_models::Category;
use crate::error::ServiceResult;
use crate::pagination::Paginated;
use crate::storage::{new_object_id, Document};
use crate::validation::{not_blank, required};

/// A packet as stored: categories are held as ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Packet {
    #[serde(rename = "_id")]
    #[schema(example = "65f1c2a9b3e4d5f6a7b8c9d1")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Packet {
    pub fn new(fields: PacketFields) -> Self {
        Self {
            id: new_object_id(),
            name: fields.name,
            description: fields.description,
            status: fields.status,
            categories: Vec::new(),
        }
    }

    pub fn apply(&mut self, changes: PacketChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
    }

    /// Set insert; returns whether the category was added.
    pub fn add_category(&mut self, category_id: &str) -> bool {
        if self.categories.iter().any(|c| c == category_id) {
            return false;
        }
        self.categories.push(category_id.to_string());
        true
    }

    pub fn remove_category(&mut self, category_id: &str) {
        self.categories.retain(|c| c != category_id);
    }

    pub fn has_category(&self, category_id: &str) -> bool {
        self.categories.iter().any(|c| c == category_id)
    }
}

impl Document for Packet {
    const COLLECTION: &'static str = "packets";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Body of create and update requests. Every field is required on create and
/// optional on update.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct PacketRequest {
    #[schema(example = "box")]
    pub name: Option<String>,
    #[schema(example = "Cardboard box")]
    pub description: Option<String>,
    #[schema(example = "open")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PacketFields {
    pub name: String,
    pub description: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PacketChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl PacketRequest {
    pub fn validate_new(self) -> ServiceResult<PacketFields> {
        Ok(PacketFields {
            name: required(self.name, "Packet", "name")?,
            description: required(self.description, "Packet", "description")?,
            status: required(self.status, "Packet", "status")?,
        })
    }

    pub fn validate_changes(self) -> ServiceResult<PacketChanges> {
        Ok(PacketChanges {
            name: not_blank(self.name, "Packet", "name")?,
            description: not_blank(self.description, "Packet", "description")?,
            status: not_blank(self.status, "Packet", "status")?,
        })
    }
}

/// A category reference after population. References to deleted categories
/// are kept as the bare id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum CategoryRef {
    Resolved(Category),
    Dangling(String),
}

/// A packet with its categories populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PacketView {
    #[serde(rename = "_id")]
    #[schema(example = "65f1c2a9b3e4d5f6a7b8c9d1")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: String,
    pub categories: Vec<CategoryRef>,
}

impl PacketView {
    /// `resolved` must line up with `packet.categories`.
    pub fn populate(packet: Packet, resolved: Vec<Option<Category>>) -> Self {
        let categories = packet
            .categories
            .into_iter()
            .zip(resolved)
            .map(|(id, category)| match category {
                Some(category) => CategoryRef::Resolved(category),
                None => CategoryRef::Dangling(id),
            })
            .collect();

        Self {
            id: packet.id,
            name: packet.name,
            description: packet.description,
            status: packet.status,
            categories,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PacketPage {
    pub total_packets: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub data: Vec<PacketView>,
}

impl From<Paginated<PacketView>> for PacketPage {
    fn from(page: Paginated<PacketView>) -> Self {
        Self {
            total_packets: page.total,
            total_pages: page.total_pages,
            current_page: page.current_page,
            data: page.data,
        }
    }
}
