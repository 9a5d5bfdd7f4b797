//! Working set delle entità tracciate.
//!
//! Un fetch tracciato registra la riga qui: il chiamante riceve un handle
//! [`Tracked`] che modifica la copia "corrente", mentre la copia "originale"
//! resta lo snapshot letto dal database. Le righe in cui le due copie
//! differiscono sono quelle che `save_changes` deve scrivere.

use super::Entity;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

struct Entry<E> {
    original: E,
    current: E,
}

pub(crate) struct WorkingSet<E: Entity> {
    entries: Arc<DashMap<E::Key, Entry<E>>>,
}

impl<E: Entity> WorkingSet<E> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Attacca l'entità; se la chiave è già tracciata restituisce l'handle
    /// esistente senza sovrascrivere le modifiche pendenti.
    pub(crate) fn attach(&self, entity: E) -> Tracked<E> {
        let key = entity.key();
        self.entries.entry(key).or_insert_with(|| Entry {
            original: entity.clone(),
            current: entity,
        });
        Tracked {
            key,
            entries: Arc::clone(&self.entries),
        }
    }

    pub(crate) fn detach(&self, key: &E::Key) {
        self.entries.remove(key);
    }

    /// Copie correnti delle entità modificate, con la chiave sotto cui sono
    /// tracciate
    pub(crate) fn dirty(&self) -> Vec<(E::Key, E)> {
        self.entries
            .iter()
            .filter(|entry| entry.original != entry.current)
            .map(|entry| (*entry.key(), entry.current.clone()))
            .collect()
    }

    /// Segna come persistito: originale e corrente diventano `entity`.
    /// No-op se la chiave non è tracciata.
    pub(crate) fn accept(&self, entity: &E) {
        if let Some(mut entry) = self.entries.get_mut(&entity.key()) {
            entry.original = entity.clone();
            entry.current = entity.clone();
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Handle to an entity living in a repository's working set.
///
/// Mutations made through [`Tracked::modify`] are written by the next
/// `persist_changes` call. Once the entity is removed the handle is detached
/// and every accessor returns `None`/`false`.
pub struct Tracked<E: Entity> {
    key: E::Key,
    entries: Arc<DashMap<E::Key, Entry<E>>>,
}

impl<E: Entity> Tracked<E> {
    pub fn key(&self) -> E::Key {
        self.key
    }

    /// Copy of the current (possibly modified) value
    pub fn get(&self) -> Option<E> {
        self.entries.get(&self.key).map(|entry| entry.current.clone())
    }

    pub fn modify(&self, f: impl FnOnce(&mut E)) -> bool {
        match self.entries.get_mut(&self.key) {
            Some(mut entry) => {
                f(&mut entry.current);
                true
            }
            None => false,
        }
    }

    pub fn is_modified(&self) -> bool {
        self.entries
            .get(&self.key)
            .is_some_and(|entry| entry.original != entry.current)
    }

    pub fn is_attached(&self) -> bool {
        self.entries.contains_key(&self.key)
    }
}

impl<E: Entity> Clone for Tracked<E> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<E: Entity> fmt::Debug for Tracked<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracked")
            .field("table", &E::TABLE)
            .field("key", &self.key)
            .field("attached", &self.is_attached())
            .finish()
    }
}
