//! Villa services - Gestione operazioni sulle ville

use super::require_id;
use crate::core::{ApiResponse, AppError, AppState};
use crate::dtos::{PatchOperation, VillaCreateDTO, VillaDTO, VillaUpdateDTO, apply_patch};
use crate::entities::Villa;
use crate::repositories::{Repository, Update};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Json, Path, State};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state))]
pub async fn get_villas(State(state): State<Arc<AppState>>) -> Result<ApiResponse, AppError> {
    debug!("Listing villas");
    let villas: Vec<VillaDTO> = state
        .villas()
        .fetch_all(None)
        .await?
        .into_iter()
        .map(VillaDTO::from)
        .collect();

    info!("Successfully retrieved {} villas", villas.len());
    Ok(ApiResponse::ok(villas)?)
}

#[instrument(skip_all)]
pub async fn get_villa(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<ApiResponse, AppError> {
    let id = require_id(id)?;
    debug!("Fetching villa {}", id);

    let same_id = |v: &Villa| v.id == id;
    let villa = state
        .villas()
        .fetch_one_detached(Some(&same_id))
        .await?
        .ok_or_else(|| {
            warn!("Villa {} not found", id);
            AppError::not_found("Villa not found")
        })?;

    Ok(ApiResponse::ok(VillaDTO::from(villa))?)
}

#[instrument(skip_all)]
pub async fn create_villa(
    State(state): State<Arc<AppState>>,
    body: Result<Json<VillaCreateDTO>, JsonRejection>,
) -> Result<ApiResponse, AppError> {
    // 1. Validare il body (nome 1..=30 caratteri, valori non negativi)
    // 2. Verificare che il nome non sia già usato, ignorando le maiuscole
    // 3. Creare l'entity con creazione == aggiornamento e salvarla
    // 4. Ritornare Created con la villa salvata e il Location della risorsa
    let Json(body) = body?;
    debug!("Creating villa '{}'", body.nombre);
    body.validate()?;

    let villas = state.villas();
    // Nomi unici ignorando le maiuscole, controllati solo alla creazione
    if let Some(existing) = villas.find_by_nombre(&body.nombre).await? {
        warn!("Villa name already used by villa {}", existing.id);
        return Err(AppError::bad_request("A villa with this name already exists"));
    }

    let mut villa = body.into_entity(Utc::now());
    villas.create(&mut villa).await?;

    info!("Villa {} created", villa.id);
    let location = format!("/api/Villa/{}", villa.id);
    Ok(ApiResponse::created(villa, location)?)
}

#[instrument(skip_all)]
pub async fn update_villa(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<VillaUpdateDTO>, JsonRejection>,
) -> Result<ApiResponse, AppError> {
    let id = require_id(id)?;
    let Json(body) = body?;
    debug!("Updating villa {}", id);

    if body.id != id {
        warn!("Path id {} does not match body id {}", id, body.id);
        return Err(AppError::bad_request("Villa id does not match the request path"));
    }
    body.validate()?;

    let villas = state.villas();
    let same_id = |v: &Villa| v.id == id;
    let current = villas
        .fetch_one_detached(Some(&same_id))
        .await?
        .ok_or_else(|| AppError::not_found("Villa not found"))?;

    villas.update(body.apply_to(current)).await?;

    info!("Villa {} updated", id);
    Ok(ApiResponse::no_content())
}

#[instrument(skip_all)]
pub async fn patch_villa(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<Vec<PatchOperation>>, JsonRejection>,
) -> Result<ApiResponse, AppError> {
    // 1. Leggere lo snapshot senza tracciarlo
    // 2. Convertirlo nella forma di update e applicare le operazioni
    // 3. Rifiutare il patch se cambia l'id o se il candidato non è valido
    // 4. Salvare con update (che rinfresca il timestamp)
    let id = require_id(id)?;
    let Json(operations) = body?;
    debug!("Patching villa {} with {} operations", id, operations.len());

    let villas = state.villas();
    let same_id = |v: &Villa| v.id == id;
    let current = villas
        .fetch_one_detached(Some(&same_id))
        .await?
        .ok_or_else(|| AppError::not_found("Villa not found"))?;

    let candidate = apply_patch(&VillaUpdateDTO::from(current.clone()), &operations)?;
    if candidate.id != id {
        warn!("Patch attempted to change villa id {} to {}", id, candidate.id);
        return Err(AppError::bad_request("Villa id cannot be changed"));
    }
    candidate.validate()?;

    villas.update(candidate.apply_to(current)).await?;

    info!("Villa {} patched", id);
    Ok(ApiResponse::no_content())
}

#[instrument(skip_all)]
pub async fn delete_villa(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<ApiResponse, AppError> {
    let id = require_id(id)?;
    debug!("Deleting villa {}", id);

    let villas = state.villas();
    let same_id = |v: &Villa| v.id == id;
    let villa = villas
        .fetch_one(Some(&same_id))
        .await?
        .and_then(|tracked| tracked.get())
        .ok_or_else(|| AppError::not_found("Villa not found"))?;

    // I numeri collegati bloccano l'eliminazione (anche la FK la rifiuta)
    let numbers = state.numero_villas().count_by_villa(id).await?;
    if numbers > 0 {
        warn!("Villa {} still has {} numbers", id, numbers);
        return Err(AppError::bad_request("Villa still has villa numbers assigned"));
    }

    villas.remove(&villa).await?;

    info!("Villa {} deleted", id);
    Ok(ApiResponse::no_content())
}
