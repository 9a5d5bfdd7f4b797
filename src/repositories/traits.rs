//! Common repository traits
//!
//! This module defines the generic persistence contract shared by every
//! entity repository, plus the entity-specific update operation.

use crate::store::{Entity, EntitySet, Filter, StoreError, Tracked};

/// Generic repository over an entity type.
///
/// Implementors only expose their [`EntitySet`]; every operation is provided.
pub trait Repository<E: Entity> {
    fn entities(&self) -> &EntitySet<E>;

    /// Inserts the entity and persists it immediately
    ///
    /// # Arguments
    /// * `entity` - Entity to insert. Store-generated keys are written back into it
    ///
    /// # Returns
    /// * `Ok(())` - Row persisted
    /// * `Err(StoreError)` - Constraint violation or connectivity error
    async fn create(&self, entity: &mut E) -> Result<(), StoreError> {
        self.entities().insert(entity).await
    }

    /// Reads every entity matching the filter (all of them if `None`)
    ///
    /// # Returns
    /// * `Ok(Vec<E>)` - Matching entities in primary key order (can be empty)
    /// * `Err(StoreError)` - Error during reading
    async fn fetch_all(&self, filter: Option<Filter<'_, E>>) -> Result<Vec<E>, StoreError> {
        self.entities().query(filter).await
    }

    /// Reads the first entity matching the filter and attaches it to the
    /// working set
    ///
    /// # Returns
    /// * `Ok(Some(Tracked<E>))` - Handle whose mutations are written by [`Repository::persist_changes`]
    /// * `Ok(None)` - No entity matches
    /// * `Err(StoreError)` - Error during reading
    async fn fetch_one(&self, filter: Option<Filter<'_, E>>) -> Result<Option<Tracked<E>>, StoreError> {
        let found = self.entities().first(filter).await?;
        Ok(found.map(|entity| self.entities().attach(entity)))
    }

    /// Like [`Repository::fetch_one`], but returns an independent copy that is
    /// never written back implicitly
    async fn fetch_one_detached(&self, filter: Option<Filter<'_, E>>) -> Result<Option<E>, StoreError> {
        self.entities().first(filter).await
    }

    /// Deletes the entity and persists the change. Removing a row that no
    /// longer exists is a no-op.
    async fn remove(&self, entity: &E) -> Result<(), StoreError> {
        self.entities().delete(entity).await?;
        Ok(())
    }

    /// Writes every modified tracked entity
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows written
    /// * `Err(StoreError)` - Error during writing, nothing is committed
    async fn persist_changes(&self) -> Result<usize, StoreError> {
        self.entities().save_changes().await
    }
}

/// Trait for replacing an existing entity
///
/// # Type Parameters
/// * `Entity` - Type of the updated entity
pub trait Update<E: Entity> {
    /// Replaces the stored row with the same key and refreshes its update
    /// timestamp
    ///
    /// # Returns
    /// * `Ok(E)` - Row as stored after the update
    /// * `Err(StoreError::StaleEntity)` - No row with that key
    /// * `Err(StoreError)` - Error during update
    async fn update(&self, entity: E) -> Result<E, StoreError>;
}
