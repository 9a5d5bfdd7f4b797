//! MagicVilla library - espone i moduli principali per i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;
pub mod store;

// Re-export dei tipi principali per facilitare l'import
pub use crate::core::{ApiResponse, AppError, AppState, config};
pub use services::root;

use axum::{Router, routing::get};
use std::sync::Arc;

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/api/Villa", configure_villa_routes())
        .nest("/api/NumeroVilla", configure_numero_villa_routes())
        .with_state(state)
}

/// Configura le routes per la gestione delle ville
fn configure_villa_routes() -> Router<Arc<AppState>> {
    use services::*;

    Router::new()
        .route("/", get(get_villas).post(create_villa))
        .route(
            "/{id}",
            get(get_villa)
                .put(update_villa)
                .patch(patch_villa)
                .delete(delete_villa),
        )
}

/// Configura le routes per la gestione dei numeri di villa
fn configure_numero_villa_routes() -> Router<Arc<AppState>> {
    use services::*;

    Router::new()
        .route("/", get(get_numero_villas).post(create_numero_villa))
        .route(
            "/{id}",
            get(get_numero_villa)
                .put(update_numero_villa)
                .patch(patch_numero_villa)
                .delete(delete_numero_villa),
        )
}
