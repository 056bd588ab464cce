//! # Producer API
//!
//! CRUD for producers. Tax IDs are accepted punctuated or bare and always
//! returned punctuated.

use agro_core::{Producer, ProducerDraft, ProducerId};
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
        .route("/v1/producers", get(list_producers).post(create_producer))
        .route(
            "/v1/producers/{id}",
            get(get_producer).put(update_producer).delete(delete_producer),
        )
}

/// POST /v1/producers
async fn create_producer(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    body: Result<Json<ProducerDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Producer>), AppError> {
    let draft = extract_json(body)?;
    let producer = state.producers.create(&ctx, draft).await?;
    Ok((StatusCode::CREATED, Json(producer)))
}

/// GET /v1/producers
async fn list_producers(
    State(state): State<AppState>,
    Caller(ctx): Caller,
) -> Result<Json<Vec<Producer>>, AppError> {
    Ok(Json(state.producers.list(&ctx).await?))
}

/// GET /v1/producers/{id}
async fn get_producer(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    path: Result<Path<ProducerId>, PathRejection>,
) -> Result<Json<Producer>, AppError> {
    let id = extract_path(path)?;
    Ok(Json(state.producers.get(&ctx, id).await?))
}

/// PUT /v1/producers/{id}
async fn update_producer(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    path: Result<Path<ProducerId>, PathRejection>,
    body: Result<Json<ProducerDraft>, JsonRejection>,
) -> Result<Json<Producer>, AppError> {
    let id = extract_path(path)?;
    let draft = extract_json(body)?;
    Ok(Json(state.producers.update(&ctx, id, draft).await?))
}

/// DELETE /v1/producers/{id}
async fn delete_producer(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    path: Result<Path<ProducerId>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = extract_path(path)?;
    state.producers.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
