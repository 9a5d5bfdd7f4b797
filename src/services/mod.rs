//! Services module - Coordinatore per tutti i service handler HTTP
//!
//! Questo modulo organizza i service handlers in sotto-moduli separati per una migliore manutenibilità.
//! Ogni modulo gestisce gli endpoint HTTP per una specifica risorsa e risponde
//! sempre con un [`ApiResponse`](crate::core::ApiResponse).

pub mod numero_villa;
pub mod villa;

// Re-exports per facilitare l'import
pub use numero_villa::{
    create_numero_villa, delete_numero_villa, get_numero_villa, get_numero_villas,
    patch_numero_villa, update_numero_villa,
};
pub use villa::{create_villa, delete_villa, get_villa, get_villas, patch_villa, update_villa};

use crate::core::{AppError, AppState};
use axum::extract::Path;
use axum::extract::rejection::PathRejection;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;
use tracing::warn;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}

/// Estrae l'id dal path: deve essere un intero positivo
pub(crate) fn require_id(id: Result<Path<i32>, PathRejection>) -> Result<i32, AppError> {
    let Path(id) = id?;
    if id <= 0 {
        warn!("Rejected non-positive id {}", id);
        return Err(AppError::bad_request("Id must be a positive number"));
    }
    Ok(id)
}
