use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use crate::errors::GeographyError;
use crate::server::app::AppState;
use crate::services::GeographyService;

type LookupResponse<T> = Result<Json<Vec<T>>, (StatusCode, Json<Value>)>;

fn lookup_failed(err: GeographyError) -> (StatusCode, Json<Value>) {
    error!("Geography lookup failed: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": err.to_string() })),
    )
}

fn respond<T: Serialize>(rows: Result<Vec<T>, GeographyError>) -> LookupResponse<T> {
    rows.map(Json).map_err(lookup_failed)
}

pub async fn get_divisions(
    State(state): State<AppState>,
) -> LookupResponse<crate::database::entities::divisions::Model> {
    respond(GeographyService::list_divisions(&state.db).await)
}

pub async fn get_districts(
    State(state): State<AppState>,
    Path(division_id): Path<i32>,
) -> LookupResponse<crate::database::entities::districts::Model> {
    respond(GeographyService::list_districts(&state.db, division_id).await)
}

pub async fn get_blocks(
    State(state): State<AppState>,
    Path(district_id): Path<i32>,
) -> LookupResponse<crate::database::entities::blocks::Model> {
    respond(GeographyService::list_blocks(&state.db, district_id).await)
}

pub async fn get_grampanchayats(
    State(state): State<AppState>,
    Path(block_id): Path<i32>,
) -> LookupResponse<crate::database::entities::grampanchayats::Model> {
    respond(GeographyService::list_grampanchayats(&state.db, block_id).await)
}
