//! Record Store Module
//!
//! Source of truth for property records and the post-commit write
//! notification contract.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::properties::model::{
    validate_fields, NewProperty, Property, PropertyChanges, PropertyRecord,
};

// == Read Contract ==
/// Full-scan read capability consumed by the cache-aside accessor.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record, projected, in store-native order.
    async fn list_all(&self) -> Result<Vec<PropertyRecord>>;
}

// == Write Notifications ==
/// Kind of mutation applied to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Created,
    Updated,
    Deleted,
}

impl WriteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteKind::Created => "created",
            WriteKind::Updated => "updated",
            WriteKind::Deleted => "deleted",
        }
    }
}

/// A committed mutation of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteEvent {
    pub kind: WriteKind,
    pub id: u64,
}

/// Receives every committed write.
///
/// The store calls `on_write` after the mutation is applied and its lock
/// released, for every create, update and delete.
#[async_trait]
pub trait WriteObserver: Send + Sync {
    async fn on_write(&self, event: &WriteEvent);
}

// == Memory Record Store ==
#[derive(Debug, Default)]
struct Records {
    rows: BTreeMap<u64, Property>,
    last_id: u64,
}

/// In-process record store ordered by id.
///
/// Ids are assigned from 1 upwards and never reused.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<Records>,
    observers: RwLock<Vec<Arc<dyn WriteObserver>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer for every subsequent write.
    pub async fn subscribe(&self, observer: Arc<dyn WriteObserver>) {
        self.observers.write().await.push(observer);
    }

    // == Create ==
    pub async fn create(&self, new: NewProperty) -> Result<Property> {
        if let Some(msg) = validate_fields(&new.title, new.price, &new.location) {
            return Err(AppError::InvalidRequest(msg));
        }

        let property = {
            let mut records = self.records.write().await;
            records.last_id += 1;
            let property = Property {
                id: records.last_id,
                title: new.title,
                description: new.description,
                price: new.price,
                location: new.location,
                created_at: Utc::now(),
            };
            records.rows.insert(property.id, property.clone());
            property
        };

        self.notify(WriteKind::Created, property.id).await;
        Ok(property)
    }

    // == Update ==
    /// Applies the provided fields; `created_at` is never changed.
    pub async fn update(&self, id: u64, changes: PropertyChanges) -> Result<Property> {
        let property = {
            let mut records = self.records.write().await;
            let current = records
                .rows
                .get_mut(&id)
                .ok_or_else(|| AppError::NotFound(format!("Property {} does not exist", id)))?;

            let mut next = current.clone();
            if let Some(title) = changes.title {
                next.title = title;
            }
            if let Some(description) = changes.description {
                next.description = description;
            }
            if let Some(price) = changes.price {
                next.price = price;
            }
            if let Some(location) = changes.location {
                next.location = location;
            }

            if let Some(msg) = validate_fields(&next.title, next.price, &next.location) {
                return Err(AppError::InvalidRequest(msg));
            }

            *current = next.clone();
            next
        };

        self.notify(WriteKind::Updated, id).await;
        Ok(property)
    }

    // == Delete ==
    pub async fn delete(&self, id: u64) -> Result<Property> {
        let removed = self
            .records
            .write()
            .await
            .rows
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Property {} does not exist", id)))?;

        self.notify(WriteKind::Deleted, id).await;
        Ok(removed)
    }

    // == Get ==
    pub async fn get(&self, id: u64) -> Option<Property> {
        self.records.read().await.rows.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.rows.is_empty()
    }

    // == Seed ==
    /// Loads a JSON array of new properties through the regular create path.
    ///
    /// Returns the number of records created.
    pub async fn load_seed(&self, path: &Path) -> Result<usize> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::StoreUnavailable(format!("cannot read seed {}: {}", path.display(), e))
        })?;
        let seed: Vec<NewProperty> = serde_json::from_str(&raw)?;

        let count = seed.len();
        for new in seed {
            self.create(new).await?;
        }

        info!(path = %path.display(), count, "Loaded property seed");
        Ok(count)
    }

    async fn notify(&self, kind: WriteKind, id: u64) {
        let event = WriteEvent { kind, id };
        let observers = self.observers.read().await.clone();

        debug!(id, kind = kind.as_str(), observers = observers.len(), "Dispatching write");
        for observer in observers {
            observer.on_write(&event).await;
        }
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list_all(&self) -> Result<Vec<PropertyRecord>> {
        Ok(self
            .records
            .read()
            .await
            .rows
            .values()
            .map(Property::project)
            .collect())
    }
}
