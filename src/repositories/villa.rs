//! VillaRepository - Repository per la gestione delle ville

use super::{Repository, Update};
use crate::entities::Villa;
use crate::store::{EntitySet, StoreError, refreshed_timestamp};
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

// VILLA REPOSITORY
pub struct VillaRepository {
    villas: EntitySet<Villa>,
}

impl VillaRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self {
            villas: EntitySet::new(connection_pool),
        }
    }

    /// Cerca una villa per nome, ignorando maiuscole/minuscole
    #[instrument(skip(self))]
    pub async fn find_by_nombre(&self, nombre: &str) -> Result<Option<Villa>, StoreError> {
        debug!("Looking up villa by name");
        let same_name = |v: &Villa| v.has_nombre(nombre);
        self.fetch_one_detached(Some(&same_name)).await
    }
}

impl Repository<Villa> for VillaRepository {
    fn entities(&self) -> &EntitySet<Villa> {
        &self.villas
    }
}

impl Update<Villa> for VillaRepository {
    #[instrument(skip(self, entity), fields(villa_id = %entity.id))]
    async fn update(&self, mut entity: Villa) -> Result<Villa, StoreError> {
        debug!("Updating villa");
        // First, get the current villa to ensure it exists
        let current = self
            .villas
            .find(&entity.id)
            .await?
            .ok_or_else(|| StoreError::stale::<Villa>(entity.id))?;

        entity.fecha_creacion = current.fecha_creacion;
        entity.fecha_actualizacion = refreshed_timestamp(current.fecha_actualizacion);

        self.villas.replace(&entity).await?;

        info!("Villa updated successfully");

        // Fetch and return the updated villa
        self.villas
            .find(&entity.id)
            .await?
            .ok_or_else(|| StoreError::stale::<Villa>(entity.id))
    }
}
