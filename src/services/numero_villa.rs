//! NumeroVilla services - Gestione operazioni sui numeri di villa

use super::require_id;
use crate::core::{ApiResponse, AppError, AppState};
use crate::dtos::{
    NumeroVillaCreateDTO, NumeroVillaDTO, NumeroVillaUpdateDTO, PatchOperation, apply_patch,
};
use crate::entities::{NumeroVilla, Villa};
use crate::repositories::{Repository, Update};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Json, Path, State};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// La villa di riferimento deve esistere
async fn ensure_villa_exists(state: &AppState, villa_id: i32) -> Result<(), AppError> {
    let same_id = |v: &Villa| v.id == villa_id;
    if state.villas().fetch_one_detached(Some(&same_id)).await?.is_none() {
        warn!("Villa {} does not exist", villa_id);
        return Err(AppError::bad_request("Villa id does not exist"));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn get_numero_villas(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse, AppError> {
    debug!("Listing villa numbers");
    let numeros: Vec<NumeroVillaDTO> = state
        .numero_villas()
        .fetch_all(None)
        .await?
        .into_iter()
        .map(NumeroVillaDTO::from)
        .collect();

    info!("Successfully retrieved {} villa numbers", numeros.len());
    Ok(ApiResponse::ok(numeros)?)
}

#[instrument(skip_all)]
pub async fn get_numero_villa(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<ApiResponse, AppError> {
    let villa_no = require_id(id)?;
    debug!("Fetching villa number {}", villa_no);

    let same_no = |n: &NumeroVilla| n.villa_no == villa_no;
    let numero = state
        .numero_villas()
        .fetch_one_detached(Some(&same_no))
        .await?
        .ok_or_else(|| {
            warn!("Villa number {} not found", villa_no);
            AppError::not_found("Villa number not found")
        })?;

    Ok(ApiResponse::ok(NumeroVillaDTO::from(numero))?)
}

#[instrument(skip_all)]
pub async fn create_numero_villa(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NumeroVillaCreateDTO>, JsonRejection>,
) -> Result<ApiResponse, AppError> {
    // 1. Validare il body
    // 2. Controllare in parallelo che il numero sia libero e che la villa esista
    // 3. Salvare il numero (la chiave la sceglie il client)
    // 4. Ritornare Created con il numero salvato e il Location della risorsa
    let Json(body) = body?;
    debug!("Creating villa number {} for villa {}", body.villa_no, body.villa_id);
    body.validate()?;

    let numeros = state.numero_villas();
    let villas = state.villas();
    let (villa_no, villa_id) = (body.villa_no, body.villa_id);
    let same_no = |n: &NumeroVilla| n.villa_no == villa_no;
    let parent = |v: &Villa| v.id == villa_id;

    let (existing, villa) = futures::try_join!(
        numeros.fetch_one_detached(Some(&same_no)),
        villas.fetch_one_detached(Some(&parent))
    )?;

    if existing.is_some() {
        warn!("Villa number {} already exists", villa_no);
        return Err(AppError::bad_request("Villa number already exists"));
    }
    if villa.is_none() {
        warn!("Villa {} does not exist", villa_id);
        return Err(AppError::bad_request("Villa id does not exist"));
    }

    let mut numero = body.into_entity(Utc::now());
    numeros.create(&mut numero).await?;

    info!("Villa number {} created", numero.villa_no);
    let location = format!("/api/NumeroVilla/{}", numero.villa_no);
    Ok(ApiResponse::created(numero, location)?)
}

#[instrument(skip_all)]
pub async fn update_numero_villa(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<NumeroVillaUpdateDTO>, JsonRejection>,
) -> Result<ApiResponse, AppError> {
    let villa_no = require_id(id)?;
    let Json(body) = body?;
    debug!("Updating villa number {}", villa_no);

    if body.villa_no != villa_no {
        warn!("Path number {} does not match body number {}", villa_no, body.villa_no);
        return Err(AppError::bad_request("Villa number does not match the request path"));
    }
    body.validate()?;

    let numeros = state.numero_villas();
    let same_no = |n: &NumeroVilla| n.villa_no == villa_no;
    let current = numeros
        .fetch_one_detached(Some(&same_no))
        .await?
        .ok_or_else(|| AppError::not_found("Villa number not found"))?;

    ensure_villa_exists(&state, body.villa_id).await?;

    numeros.update(body.apply_to(current)).await?;

    info!("Villa number {} updated", villa_no);
    Ok(ApiResponse::no_content())
}

#[instrument(skip_all)]
pub async fn patch_numero_villa(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<Vec<PatchOperation>>, JsonRejection>,
) -> Result<ApiResponse, AppError> {
    let villa_no = require_id(id)?;
    let Json(operations) = body?;
    debug!("Patching villa number {} with {} operations", villa_no, operations.len());

    let numeros = state.numero_villas();
    let same_no = |n: &NumeroVilla| n.villa_no == villa_no;
    let current = numeros
        .fetch_one_detached(Some(&same_no))
        .await?
        .ok_or_else(|| AppError::not_found("Villa number not found"))?;

    let candidate = apply_patch(&NumeroVillaUpdateDTO::from(current.clone()), &operations)?;
    if candidate.villa_no != villa_no {
        warn!("Patch attempted to change villa number {} to {}", villa_no, candidate.villa_no);
        return Err(AppError::bad_request("Villa number cannot be changed"));
    }
    candidate.validate()?;

    if candidate.villa_id != current.villa_id {
        ensure_villa_exists(&state, candidate.villa_id).await?;
    }

    numeros.update(candidate.apply_to(current)).await?;

    info!("Villa number {} patched", villa_no);
    Ok(ApiResponse::no_content())
}

#[instrument(skip_all)]
pub async fn delete_numero_villa(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<ApiResponse, AppError> {
    let villa_no = require_id(id)?;
    debug!("Deleting villa number {}", villa_no);

    let numeros = state.numero_villas();
    let same_no = |n: &NumeroVilla| n.villa_no == villa_no;
    let numero = numeros
        .fetch_one(Some(&same_no))
        .await?
        .and_then(|tracked| tracked.get())
        .ok_or_else(|| AppError::not_found("Villa number not found"))?;

    numeros.remove(&numero).await?;

    info!("Villa number {} deleted", villa_no);
    Ok(ApiResponse::no_content())
}
