//! # Property API
//!
//! Properties are addressed under their owning producer. A property of
//! another producer answers 404, exactly like a missing one.

use agro_core::{ProducerId, Property, PropertyDraft, PropertyId};
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
            "/v1/producers/{producer_id}/properties",
            get(list_properties).post(create_property),
        )
        .route(
            "/v1/producers/{producer_id}/properties/{id}",
            get(get_property).put(update_property).delete(delete_property),
        )
}

/// POST /v1/producers/{producer_id}/properties
async fn create_property(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    path: Result<Path<ProducerId>, PathRejection>,
    body: Result<Json<PropertyDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Property>), AppError> {
    let producer_id = extract_path(path)?;
    let draft = extract_json(body)?;
    let property = state.properties.create(&ctx, producer_id, draft).await?;
    Ok((StatusCode::CREATED, Json(property)))
}

/// GET /v1/producers/{producer_id}/properties
async fn list_properties(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    path: Result<Path<ProducerId>, PathRejection>,
) -> Result<Json<Vec<Property>>, AppError> {
    let producer_id = extract_path(path)?;
    Ok(Json(state.properties.list_for_producer(&ctx, producer_id).await?))
}

/// GET /v1/producers/{producer_id}/properties/{id}
async fn get_property(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    path: Result<Path<(ProducerId, PropertyId)>, PathRejection>,
) -> Result<Json<Property>, AppError> {
    let (producer_id, id) = extract_path(path)?;
    Ok(Json(state.properties.get(&ctx, producer_id, id).await?))
}

/// PUT /v1/producers/{producer_id}/properties/{id}
async fn update_property(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    path: Result<Path<(ProducerId, PropertyId)>, PathRejection>,
    body: Result<Json<PropertyDraft>, JsonRejection>,
) -> Result<Json<Property>, AppError> {
    let (producer_id, id) = extract_path(path)?;
    let draft = extract_json(body)?;
    Ok(Json(state.properties.update(&ctx, producer_id, id, draft).await?))
}

/// DELETE /v1/producers/{producer_id}/properties/{id}
async fn delete_property(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    path: Result<Path<(ProducerId, PropertyId)>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let (producer_id, id) = extract_path(path)?;
    state.properties.delete(&ctx, producer_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
