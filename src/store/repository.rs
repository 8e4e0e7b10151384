//! Storage abstraction of the stores

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{AccountRecord, Event, FriendEdge};

/// Something that can be kept in a [Repository]
pub trait Entity: Clone + Send + Sync + 'static {
    /// The primary key
    fn uuid(&self) -> Uuid;
}

impl Entity for AccountRecord {
    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

impl Entity for FriendEdge {
    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

impl Entity for Event {
    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

/// A collection of entities of one type.
///
/// `list` returns the entities in insertion order.
/// `update` and `delete` return `false` if no entity has the given uuid.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// All entities
    async fn list(&self) -> Vec<T>;
    /// The entity with the given uuid
    async fn find(&self, uuid: Uuid) -> Option<T>;
    /// Append a new entity
    async fn insert(&self, entity: T);
    /// Replace the entity with the same uuid
    async fn update(&self, entity: T) -> bool;
    /// Remove the entity with the given uuid
    async fn delete(&self, uuid: Uuid) -> bool;
}

/// Shared handle to a repository
pub type SharedRepository<T> = Arc<dyn Repository<T>>;

/// A [Repository] that lives in memory for the lifetime of the process
pub struct MemoryRepository<T> {
    entities: RwLock<Vec<T>>,
}

impl<T: Entity> MemoryRepository<T> {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(Vec::new()),
        }
    }

    /// Create an empty repository behind a [SharedRepository]
    pub fn shared() -> SharedRepository<T> {
        Arc::new(Self::new())
    }
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn list(&self) -> Vec<T> {
        self.entities.read().await.clone()
    }

    async fn find(&self, uuid: Uuid) -> Option<T> {
        self.entities
            .read()
            .await
            .iter()
            .find(|e| e.uuid() == uuid)
            .cloned()
    }

    async fn insert(&self, entity: T) {
        self.entities.write().await.push(entity);
    }

    async fn update(&self, entity: T) -> bool {
        let mut entities = self.entities.write().await;
        match entities.iter_mut().find(|e| e.uuid() == entity.uuid()) {
            Some(existing) => {
                *existing = entity;
                true
            }
            None => false,
        }
    }

    async fn delete(&self, uuid: Uuid) -> bool {
        let mut entities = self.entities.write().await;
        let before = entities.len();
        entities.retain(|e| e.uuid() != uuid);
        entities.len() != before
    }
}
