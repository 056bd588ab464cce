//! # Crop Season API
//!
//! Seasons are addressed under the producer; the body's `property_id`
//! must name one of that producer's properties.

use agro_core::{CropSeason, CropSeasonDraft, CropSeasonId, ProducerId};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::AppError;
use crate::extractors::{extract_json, extract_path, Caller};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/producers/{producer_id}/crop-seasons",
            get(list_crop_seasons).post(create_crop_season),
        )
        .route(
            "/v1/producers/{producer_id}/crop-seasons/{id}",
            get(get_crop_season)
                .put(update_crop_season)
                .delete(delete_crop_season),
        )
}

/// POST /v1/producers/{producer_id}/crop-seasons
async fn create_crop_season(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    path: Result<Path<ProducerId>, PathRejection>,
    body: Result<Json<CropSeasonDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<CropSeason>), AppError> {
    let producer_id = extract_path(path)?;
    let draft = extract_json(body)?;
    let season = state.crop_seasons.create(&ctx, producer_id, draft).await?;
    Ok((StatusCode::CREATED, Json(season)))
}

/// GET /v1/producers/{producer_id}/crop-seasons
async fn list_crop_seasons(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    path: Result<Path<ProducerId>, PathRejection>,
) -> Result<Json<Vec<CropSeason>>, AppError> {
    let producer_id = extract_path(path)?;
    Ok(Json(state.crop_seasons.list_for_producer(&ctx, producer_id).await?))
}

/// GET /v1/producers/{producer_id}/crop-seasons/{id}
async fn get_crop_season(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    path: Result<Path<(ProducerId, CropSeasonId)>, PathRejection>,
) -> Result<Json<CropSeason>, AppError> {
    let (producer_id, id) = extract_path(path)?;
    Ok(Json(state.crop_seasons.get(&ctx, producer_id, id).await?))
}

/// PUT /v1/producers/{producer_id}/crop-seasons/{id}
async fn update_crop_season(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    path: Result<Path<(ProducerId, CropSeasonId)>, PathRejection>,
    body: Result<Json<CropSeasonDraft>, JsonRejection>,
) -> Result<Json<CropSeason>, AppError> {
    let (producer_id, id) = extract_path(path)?;
    let draft = extract_json(body)?;
    Ok(Json(
        state.crop_seasons.update(&ctx, producer_id, id, draft).await?,
    ))
}

/// DELETE /v1/producers/{producer_id}/crop-seasons/{id}
async fn delete_crop_season(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    path: Result<Path<(ProducerId, CropSeasonId)>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let (producer_id, id) = extract_path(path)?;
    state.crop_seasons.delete(&ctx, producer_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
