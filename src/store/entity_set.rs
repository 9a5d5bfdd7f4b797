//! EntitySet - Collezione di righe di una tabella
//!
//! Tutte le query sono costruite a runtime con `QueryBuilder` a partire dai
//! metadati del trait [`Entity`], così lo stesso codice serve sia `Villa`
//! sia `NumeroVilla`.

use super::tracking::WorkingSet;
use super::{Entity, StoreError, Tracked, refreshed_timestamp};
use futures::TryStreamExt;
use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info, instrument, warn};

/// Predicate evaluated against each row, in primary-key order
pub type Filter<'a, E> = &'a (dyn Fn(&E) -> bool + Send + Sync);

pub struct EntitySet<E: Entity> {
    connection_pool: SqlitePool,
    working_set: WorkingSet<E>,
}

impl<E: Entity> EntitySet<E> {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self {
            connection_pool,
            working_set: WorkingSet::new(),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.connection_pool
    }

    fn select_all() -> String {
        format!("SELECT * FROM {} ORDER BY {}", E::TABLE, E::KEY_COLUMN)
    }

    /// Inserisce la riga e, se la chiave è generata dal db, la riscrive
    /// nell'entità.
    #[instrument(skip(self, entity), fields(table = E::TABLE))]
    pub async fn insert(&self, entity: &mut E) -> Result<(), StoreError> {
        let mut columns: Vec<&str> = Vec::with_capacity(E::INSERT_COLUMNS.len() + 1);
        if !E::GENERATED_KEY {
            columns.push(E::KEY_COLUMN);
        }
        columns.extend_from_slice(E::INSERT_COLUMNS);

        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "INSERT INTO {} ({}) ",
            E::TABLE,
            columns.join(", ")
        ));
        query.push_values(std::iter::once(&*entity), |mut row, entity| {
            if !E::GENERATED_KEY {
                row.push_bind(entity.key());
            }
            entity.push_insert_values(&mut row);
        });

        let result = query.build().execute(&self.connection_pool).await?;

        if E::GENERATED_KEY {
            entity.assign_key(result.last_insert_rowid())?;
        }

        info!("Inserted {} row with key {}", E::TABLE, entity.key());
        Ok(())
    }

    /// Tutte le righe che soddisfano il filtro (tutte se `None`)
    #[instrument(skip(self, filter), fields(table = E::TABLE, filtered = filter.is_some()))]
    pub async fn query(&self, filter: Option<Filter<'_, E>>) -> Result<Vec<E>, StoreError> {
        let sql = Self::select_all();
        let mut rows = sqlx::query_as::<_, E>(&sql).fetch(&self.connection_pool);

        let mut matching = Vec::new();
        while let Some(entity) = rows.try_next().await? {
            if filter.is_none_or(|f| f(&entity)) {
                matching.push(entity);
            }
        }

        debug!("{} rows matched", matching.len());
        Ok(matching)
    }

    /// Prima riga (in ordine di chiave) che soddisfa il filtro
    #[instrument(skip(self, filter), fields(table = E::TABLE, filtered = filter.is_some()))]
    pub async fn first(&self, filter: Option<Filter<'_, E>>) -> Result<Option<E>, StoreError> {
        let sql = Self::select_all();
        let mut rows = sqlx::query_as::<_, E>(&sql).fetch(&self.connection_pool);

        while let Some(entity) = rows.try_next().await? {
            if filter.is_none_or(|f| f(&entity)) {
                debug!("Found {} row with key {}", E::TABLE, entity.key());
                return Ok(Some(entity));
            }
        }

        debug!("No {} row matched", E::TABLE);
        Ok(None)
    }

    /// Lookup per chiave primaria
    pub async fn find(&self, key: &E::Key) -> Result<Option<E>, StoreError> {
        let sql = format!("SELECT * FROM {} WHERE {} = ?", E::TABLE, E::KEY_COLUMN);
        let entity = sqlx::query_as::<_, E>(&sql)
            .bind(*key)
            .fetch_optional(&self.connection_pool)
            .await?;

        Ok(entity)
    }

    pub fn attach(&self, entity: E) -> Tracked<E> {
        self.working_set.attach(entity)
    }

    /// Elimina la riga; `false` se non esisteva già più.
    #[instrument(skip(self, entity), fields(table = E::TABLE, key = %entity.key()))]
    pub async fn delete(&self, entity: &E) -> Result<bool, StoreError> {
        let key = entity.key();
        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "DELETE FROM {} WHERE {} = ",
            E::TABLE,
            E::KEY_COLUMN
        ));
        query.push_bind(key);

        let result = query.build().execute(&self.connection_pool).await?;
        self.working_set.detach(&key);

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Row deleted");
        } else {
            debug!("Row already absent, nothing to delete");
        }
        Ok(deleted)
    }

    /// Sostituisce le colonne aggiornabili della riga con la stessa chiave.
    /// Se la chiave è tracciata, lo snapshot viene riallineato.
    #[instrument(skip(self, entity), fields(table = E::TABLE, key = %entity.key()))]
    pub async fn replace(&self, entity: &E) -> Result<(), StoreError> {
        Self::replace_row(&self.connection_pool, entity).await?;
        self.working_set.accept(entity);
        Ok(())
    }

    async fn replace_row<'c, X>(executor: X, entity: &E) -> Result<(), StoreError>
    where
        X: Executor<'c, Database = Sqlite>,
    {
        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "UPDATE {} SET ({}) = (",
            E::TABLE,
            E::UPDATE_COLUMNS.join(", ")
        ));
        {
            let mut row = query.separated(", ");
            entity.push_update_values(&mut row);
        }
        query.push(format!(") WHERE {} = ", E::KEY_COLUMN));
        query.push_bind(entity.key());

        let result = query.build().execute(executor).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::stale::<E>(entity.key()));
        }
        Ok(())
    }

    /// Scrive tutte le entità tracciate modificate in un'unica transazione,
    /// aggiornando il loro timestamp. Ritorna il numero di righe scritte.
    #[instrument(skip(self), fields(table = E::TABLE))]
    pub async fn save_changes(&self) -> Result<usize, StoreError> {
        let dirty = self.working_set.dirty();
        debug!(
            "{} tracked rows, {} modified",
            self.working_set.len(),
            dirty.len()
        );
        if dirty.is_empty() {
            debug!("No pending changes");
            return Ok(0);
        }

        // La chiave di una riga tracciata non può cambiare
        if let Some((tracked, entity)) = dirty
            .iter()
            .find(|(key, entity)| entity.key() != *key)
        {
            warn!("Tracked key {} was changed to {}", tracked, entity.key());
            return Err(StoreError::key_changed::<E>(*tracked, entity.key()));
        }

        let mut tx = self.connection_pool.begin().await?;
        let mut flushed = Vec::with_capacity(dirty.len());
        for (_, mut entity) in dirty {
            let at = refreshed_timestamp(entity.updated_at());
            entity.touch(at);
            Self::replace_row(&mut *tx, &entity).await?;
            flushed.push(entity);
        }
        tx.commit().await?;

        for entity in &flushed {
            self.working_set.accept(entity);
        }

        info!("Persisted {} tracked rows", flushed.len());
        Ok(flushed.len())
    }
}
