//! In-memory repository

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{ChoiceSource, ListQuery, Repository};
use crate::error::CrudError;
use crate::model::{Entity, Value};
use crate::sort::compare_by;

type DependentCounter = Arc<dyn Fn(i64) -> usize + Send + Sync>;

struct Restriction {
    name: String,
    count: DependentCounter,
}

struct Store<E> {
    rows: BTreeMap<i64, E>,
    next_id: i64,
}

impl<E> Default for Store<E> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// Thread-safe [`Repository`] keeping entities in a map
///
/// Cloning is cheap; clones share the same storage. Deletion can be
/// restricted by dependents living in other repositories:
///
/// ```rust,ignore
/// let countries = InMemoryRepository::<Country>::new();
/// let cities = InMemoryRepository::<City>::new();
/// let lookup = cities.clone();
/// countries.restrict_dependents("cities", move |id| lookup.count_where("country_id", id));
/// ```
pub struct InMemoryRepository<E> {
    store: Arc<RwLock<Store<E>>>,
    restrictions: Arc<RwLock<Vec<Restriction>>>,
}

impl<E> Clone for InMemoryRepository<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            restrictions: Arc::clone(&self.restrictions),
        }
    }
}

impl<E> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self {
            store: Arc::default(),
            restrictions: Arc::default(),
        }
    }
}

impl<E> std::fmt::Debug for InMemoryRepository<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRepository")
            .field("rows", &self.store.read().rows.len())
            .field("restrictions", &self.restrictions.read().len())
            .finish()
    }
}

impl<E: Entity> InMemoryRepository<E> {
    /// Empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository seeded with `entries`, without validation
    #[must_use]
    pub fn with_entries(entries: impl IntoIterator<Item = E>) -> Self {
        let repo = Self::new();
        for entry in entries {
            repo.insert(entry);
        }
        repo
    }

    /// Store an entity without validation, assigning an id when it has none
    pub fn insert(&self, mut entity: E) -> E {
        let mut store = self.store.write();
        let id = match entity.id() {
            Some(id) => id,
            None => {
                let id = store.next_id;
                entity.set_id(id);
                id
            }
        };
        store.next_id = store.next_id.max(id + 1);
        store.rows.insert(id, entity.clone());
        entity
    }

    /// Refuse deletion while `count` reports dependents of the entity
    ///
    /// `count` runs without any lock of this repository held, so it may read
    /// this repository itself. A dependent inserted after the count and
    /// before the removal is not seen.
    pub fn restrict_dependents<F>(&self, name: impl Into<String>, count: F)
    where
        F: Fn(i64) -> usize + Send + Sync + 'static,
    {
        self.restrictions.write().push(Restriction {
            name: name.into(),
            count: Arc::new(count),
        });
    }

    /// Number of entities whose `field` holds `value`
    #[must_use]
    pub fn count_where(&self, field: &str, value: impl Into<Value>) -> usize {
        let value = value.into();
        self.store
            .read()
            .rows
            .values()
            .filter(|e| e.get(field) == value)
            .count()
    }

    /// Snapshot of all entities in id order
    #[must_use]
    pub fn all(&self) -> Vec<E> {
        self.store.read().rows.values().cloned().collect()
    }

    fn check_valid(entity: &E) -> Result<(), CrudError> {
        let errors = entity.validate();
        if errors.has_errors() {
            tracing::debug!(resource = E::RESOURCE, errors = %errors, "validation failed");
            return Err(CrudError::Validation(errors));
        }
        Ok(())
    }

    fn not_found(id: i64) -> CrudError {
        CrudError::NotFound {
            resource: E::RESOURCE.to_string(),
            id,
        }
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn list(&self, query: &ListQuery) -> Result<Vec<E>, CrudError> {
        let mut entries: Vec<E> = self
            .store
            .read()
            .rows
            .values()
            .filter(|e| query.matches(*e))
            .cloned()
            .collect();
        if !query.order.is_empty() {
            entries.sort_by(|a, b| compare_by(a, b, &query.order));
        }
        Ok(entries)
    }

    async fn find(&self, id: i64) -> Result<Option<E>, CrudError> {
        Ok(self.store.read().rows.get(&id).cloned())
    }

    async fn create(&self, entity: E) -> Result<E, CrudError> {
        Self::check_valid(&entity)?;
        let mut store = self.store.write();
        let mut entity = entity;
        let id = store.next_id;
        store.next_id += 1;
        entity.set_id(id);
        store.rows.insert(id, entity.clone());
        tracing::debug!(resource = E::RESOURCE, id, "entity created");
        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, CrudError> {
        let id = entity
            .id()
            .ok_or_else(|| CrudError::Persistence(format!("cannot update unsaved {}", E::RESOURCE)))?;
        Self::check_valid(&entity)?;
        let mut store = self.store.write();
        let slot = store.rows.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        *slot = entity.clone();
        tracing::debug!(resource = E::RESOURCE, id, "entity updated");
        Ok(entity)
    }

    async fn destroy(&self, id: i64) -> Result<(), CrudError> {
        if !self.store.read().rows.contains_key(&id) {
            return Err(Self::not_found(id));
        }

        let restrictions: Vec<(String, DependentCounter)> = self
            .restrictions
            .read()
            .iter()
            .map(|r| (r.name.clone(), Arc::clone(&r.count)))
            .collect();
        for (name, count) in restrictions {
            let count = count(id);
            if count > 0 {
                tracing::debug!(resource = E::RESOURCE, id, dependents = %name, count, "deletion restricted");
                return Err(CrudError::HasDependents {
                    resource: E::RESOURCE.to_string(),
                    id,
                    count,
                });
            }
        }

        // counters may read this store, so it is only locked for the removal
        if self.store.write().rows.remove(&id).is_none() {
            return Err(Self::not_found(id));
        }
        tracing::debug!(resource = E::RESOURCE, id, "entity destroyed");
        Ok(())
    }

    async fn count(&self) -> Result<usize, CrudError> {
        Ok(self.store.read().rows.len())
    }
}

#[async_trait]
impl<E: Entity> ChoiceSource for InMemoryRepository<E> {
    async fn choices(&self) -> Result<Vec<(i64, String)>, CrudError> {
        let mut choices: Vec<(i64, String)> = self
            .store
            .read()
            .rows
            .iter()
            .map(|(id, e)| (*id, e.label()))
            .collect();
        choices.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(choices)
    }

    async fn related(
        &self,
        foreign_key: &str,
        owner_id: i64,
    ) -> Result<Vec<(i64, String)>, CrudError> {
        let owner = Value::Integer(owner_id);
        let mut related: Vec<(i64, String)> = self
            .store
            .read()
            .rows
            .iter()
            .filter(|(_, e)| e.get(foreign_key) == owner)
            .map(|(id, e)| (*id, e.label()))
            .collect();
        related.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(related)
    }
}
