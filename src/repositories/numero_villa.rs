//! NumeroVillaRepository - Repository per la gestione dei numeri di villa

use super::{Repository, Update};
use crate::entities::NumeroVilla;
use crate::store::{EntitySet, StoreError, refreshed_timestamp};
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

// NUMEROVILLA REPOSITORY
pub struct NumeroVillaRepository {
    numeros: EntitySet<NumeroVilla>,
}

impl NumeroVillaRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self {
            numeros: EntitySet::new(connection_pool),
        }
    }

    /// Quanti numeri fanno riferimento alla villa
    #[instrument(skip(self))]
    pub async fn count_by_villa(&self, villa_id: i32) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM NumeroVilla WHERE VillaId = ?")
            .bind(villa_id)
            .fetch_one(self.numeros.pool())
            .await?;

        debug!("Villa has {} numbers", count);
        Ok(count)
    }
}

impl Repository<NumeroVilla> for NumeroVillaRepository {
    fn entities(&self) -> &EntitySet<NumeroVilla> {
        &self.numeros
    }
}

impl Update<NumeroVilla> for NumeroVillaRepository {
    /// VillaNo è la chiave: si possono cambiare solo villa di appartenenza e dettaglio
    #[instrument(skip(self, entity), fields(villa_no = %entity.villa_no, villa_id = %entity.villa_id))]
    async fn update(&self, mut entity: NumeroVilla) -> Result<NumeroVilla, StoreError> {
        debug!("Updating villa number");
        let current = self
            .numeros
            .find(&entity.villa_no)
            .await?
            .ok_or_else(|| StoreError::stale::<NumeroVilla>(entity.villa_no))?;

        entity.fecha_creacion = current.fecha_creacion;
        entity.fecha_actualizacion = refreshed_timestamp(current.fecha_actualizacion);

        self.numeros.replace(&entity).await?;

        info!("Villa number updated successfully");

        self.numeros
            .find(&entity.villa_no)
            .await?
            .ok_or_else(|| StoreError::stale::<NumeroVilla>(entity.villa_no))
    }
}
