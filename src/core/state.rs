//! Application State - Stato globale dell'applicazione
//!
//! Contiene solo il pool: i repository (e i loro working set) vengono creati
//! per ogni richiesta e scartati alla fine.

use crate::repositories::{NumeroVillaRepository, VillaRepository};
use sqlx::SqlitePool;

/// Stato globale dell'applicazione condiviso tra tutte le route
pub struct AppState {
    /// Pool di connessioni SQLite condiviso
    pool: SqlitePool,
}

impl AppState {
    /// Crea una nuova istanza di AppState con il pool di connessioni fornito.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Repository delle ville con working set nuovo
    pub fn villas(&self) -> VillaRepository {
        VillaRepository::new(self.pool.clone())
    }

    /// Repository dei numeri di villa con working set nuovo
    pub fn numero_villas(&self) -> NumeroVillaRepository {
        NumeroVillaRepository::new(self.pool.clone())
    }
}
