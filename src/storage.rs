use anyhow::{Context, Result};
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::category_models::Category;
use crate::packet_models::Packet;
use crate::user_models::User;

/// A record that lives in a [`Collection`].
pub trait Document: Clone + Serialize + DeserializeOwned + Send + Sync {
    /// Collection name, also the stem of the JSON file it is persisted to.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}

/// Generates a 24 character hex identifier: 4 bytes of unix time followed by
/// 8 random bytes, the same shape as a document-store ObjectId.
pub fn new_object_id() -> String {
    let seconds = Utc::now().timestamp() as u32;
    let random = Uuid::new_v4().simple().to_string();
    format!("{:08x}{}", seconds, &random[..16])
}

pub fn is_object_id(value: &str) -> bool {
    value.len() == 24 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// An ordered set of documents kept in memory and, when backed by a file,
/// written out after every mutation.
pub struct Collection<T> {
    documents: RwLock<Vec<T>>,
    file: Option<PathBuf>,
}

impl<T: Document> Collection<T> {
    pub fn in_memory() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
            file: None,
        }
    }

    pub fn open(dir: &Path) -> Result<Self> {
        let file = dir.join(format!("{}.json", T::COLLECTION));

        let documents = if file.exists() {
            let data = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {} file", T::COLLECTION))?;
            serde_json::from_str(&data)
                .with_context(|| format!("Failed to parse {} file", T::COLLECTION))?
        } else {
            Vec::new()
        };

        Ok(Self {
            documents: RwLock::new(documents),
            file: Some(file),
        })
    }

    pub async fn insert(&self, document: T) -> Result<T> {
        let mut documents = self.documents.write().await;

        let mut next = documents.clone();
        next.push(document.clone());
        self.commit(&mut documents, next)?;
        Ok(document)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<T>> {
        self.find_one(|d| d.id() == id).await
    }

    pub async fn find_one<F>(&self, filter: F) -> Result<Option<T>>
    where
        F: Fn(&T) -> bool,
    {
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|d| filter(d)).cloned())
    }

    /// Looks up every id in order; missing documents come back as `None`.
    pub async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Option<T>>> {
        let documents = self.documents.read().await;
        Ok(ids
            .iter()
            .map(|id| documents.iter().find(|d| d.id() == id).cloned())
            .collect())
    }

    pub async fn count<F>(&self, filter: F) -> Result<u64>
    where
        F: Fn(&T) -> bool,
    {
        let documents = self.documents.read().await;
        Ok(documents.iter().filter(|d| filter(d)).count() as u64)
    }

    /// Matching documents in store order, after skipping `skip` of them and
    /// keeping at most `limit`.
    pub async fn find_page<F>(&self, filter: F, skip: usize, limit: usize) -> Result<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|d| filter(d))
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    /// Applies `update` to the first matching document and returns the
    /// document as it is after the update.
    pub async fn update_one<F, U>(&self, filter: F, update: U) -> Result<Option<T>>
    where
        F: Fn(&T) -> bool,
        U: FnOnce(&mut T),
    {
        let mut documents = self.documents.write().await;

        let Some(position) = documents.iter().position(|d| filter(d)) else {
            return Ok(None);
        };

        let mut next = documents.clone();
        update(&mut next[position]);
        let updated = next[position].clone();

        self.commit(&mut documents, next)?;
        Ok(Some(updated))
    }

    pub async fn delete_one<F>(&self, filter: F) -> Result<Option<T>>
    where
        F: Fn(&T) -> bool,
    {
        let mut documents = self.documents.write().await;

        let Some(position) = documents.iter().position(|d| filter(d)) else {
            return Ok(None);
        };

        let mut next = documents.clone();
        let removed = next.remove(position);

        self.commit(&mut documents, next)?;
        Ok(Some(removed))
    }

    /// Persists `next` and only then makes it the live state, so a failed
    /// write leaves the collection as it was.
    fn commit(&self, documents: &mut Vec<T>, next: Vec<T>) -> Result<()> {
        self.save_to_disk(&next)?;
        *documents = next;
        Ok(())
    }

    fn save_to_disk(&self, documents: &[T]) -> Result<()> {
        let Some(file) = &self.file else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(documents)
            .with_context(|| format!("Failed to serialize {}", T::COLLECTION))?;
        fs::write(file, json)
            .with_context(|| format!("Failed to write to {} file", T::COLLECTION))?;
        Ok(())
    }
}

/// The three collections backing the service.
pub struct Database {
    pub users: Collection<User>,
    pub packets: Collection<Packet>,
    pub categories: Collection<Category>,
}

impl Database {
    pub fn in_memory() -> Self {
        Self {
            users: Collection::in_memory(),
            packets: Collection::in_memory(),
            categories: Collection::in_memory(),
        }
    }

    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;

        Ok(Self {
            users: Collection::open(dir)?,
            packets: Collection::open(dir)?,
            categories: Collection::open(dir)?,
        })
    }
}
