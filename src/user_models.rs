use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ServiceResult;
use crate::pagination::Paginated;
use crate::storage::{new_object_id, Document};
use crate::validation::{email, not_blank, object_id, required};

/// A user as stored. The password is only ever held as a bcrypt hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub available: bool,
    #[serde(default)]
    pub packets: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(fields: UserFields, password_hash: String) -> Self {
        Self {
            id: new_object_id(),
            name: fields.name,
            email: fields.email,
            password_hash,
            phone: fields.phone,
            available: true,
            packets: fields.packets,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, changes: UserChanges, password_hash: Option<String>) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(phone) = changes.phone {
            self.phone = phone;
        }
        if let Some(hash) = password_hash {
            self.password_hash = hash;
        }
    }

    pub fn add_packet(&mut self, packet_id: &str) {
        if !self.packets.iter().any(|p| p == packet_id) {
            self.packets.push(packet_id.to_string());
        }
    }
}

impl Document for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "Ana")]
    pub name: Option<String>,
    #[schema(example = "ana@example.com")]
    pub email: Option<String>,
    pub password: Option<String>,
    #[schema(example = "600123123")]
    pub phone: Option<String>,
    /// Packet ids owned by the user
    pub packets: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserFields {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub packets: Vec<String>,
}

impl CreateUserRequest {
    pub fn validate(self) -> ServiceResult<UserFields> {
        let name = required(self.name, "User", "name")?;
        let email_address = required(self.email, "User", "email")?;
        email(&email_address)?;
        let password = required(self.password, "User", "password")?;
        let phone = required(self.phone, "User", "phone")?;

        let mut packets: Vec<String> = Vec::new();
        for id in self.packets.unwrap_or_default() {
            object_id(&id, "packet")?;
            if !packets.contains(&id) {
                packets.push(id);
            }
        }

        Ok(UserFields {
            name,
            email: email_address,
            password,
            phone,
            packets,
        })
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(self) -> ServiceResult<UserChanges> {
        let email_address = not_blank(self.email, "User", "email")?;
        if let Some(address) = &email_address {
            email(address)?;
        }

        Ok(UserChanges {
            name: not_blank(self.name, "User", "name")?,
            email: email_address,
            password: not_blank(self.password, "User", "password")?,
            phone: not_blank(self.phone, "User", "phone")?,
        })
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPacketRequest {
    #[schema(example = "65f1c2a9b3e4d5f6a7b8c9d1")]
    pub packet_id: Option<String>,
}

/// What clients see of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    #[serde(rename = "_id")]
    #[schema(example = "65f1c2a9b3e4d5f6a7b8c9d2")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub available: bool,
    pub packets: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            available: user.available,
            packets: user.packets,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    pub total_users: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub data: Vec<UserView>,
}

impl From<Paginated<UserView>> for UserPage {
    fn from(page: Paginated<UserView>) -> Self {
        Self {
            total_users: page.total,
            total_pages: page.total_pages,
            current_page: page.current_page,
            data: page.data,
        }
    }
}
