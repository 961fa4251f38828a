//! In-memory collection of one entity type.
//!
//! The store is the only owner of a screen's records. Ids come from a
//! monotonic counter that starts above the highest seeded id and never goes
//! back, so ids stay unique across deletions and seed reloads. Once the
//! counter passes `EntityId::MAX` inserts fail instead of wrapping.

use tracing::{debug, warn};

use crate::error::{ConsoleError, Result};
use crate::model::{Entity, EntityId};

#[derive(Clone, Debug)]
pub struct EntityStore<T: Entity> {
    items: Vec<T>,
    seed: Vec<T>,
    /// `None` once every id has been handed out.
    next_id: Option<EntityId>,
}

impl<T: Entity> EntityStore<T> {
    pub fn new(seed: Vec<T>) -> Self {
        let next_id = Self::first_free_id(&seed);
        Self { items: seed.clone(), seed, next_id }
    }

    fn first_free_id(items: &[T]) -> Option<EntityId> {
        match items.iter().map(Entity::id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        }
    }

    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.items.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Ids of every stored entity, in collection order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.items.iter().map(Entity::id).collect()
    }

    /// Build an entity from `draft` under a fresh id and append it.
    pub fn insert(&mut self, draft: T::Draft) -> Result<EntityId> {
        let Some(id) = self.next_id else {
            warn!(kind = %T::KIND, "id space exhausted");
            return Err(ConsoleError::IdsExhausted { kind: T::KIND });
        };
        self.next_id = id.checked_add(1);
        self.items.push(T::build(id, draft));
        debug!(kind = %T::KIND, id, "inserted");
        Ok(id)
    }

    /// Replace the entity carrying the same id. Returns false when no such entity exists.
    pub fn replace(&mut self, entity: T) -> bool {
        match self.items.iter_mut().find(|e| e.id() == entity.id()) {
            Some(slot) => {
                *slot = entity;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let idx = self.items.iter().position(|e| e.id() == id)?;
        Some(self.items.remove(idx))
    }

    /// Remove every entity whose id is in `ids`; returns how many were removed.
    pub fn remove_many(&mut self, ids: &[EntityId]) -> usize {
        let before = self.items.len();
        self.items.retain(|e| !ids.contains(&e.id()));
        before - self.items.len()
    }

    /// Drop all changes and go back to the seeded collection. The id counter
    /// already sits above every seeded id and keeps its value.
    pub fn reset(&mut self) {
        self.items = self.seed.clone();
        debug!(kind = %T::KIND, len = self.items.len(), "reset to seed");
    }
}
