use axum::{
    extract::{rejection::FormRejection, Query, State},
    http::StatusCode,
    response::Json,
    Form,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::errors::RecordError;
use crate::server::app::AppState;
use crate::services::{RECORD_NOT_FOUND_MESSAGE, SUBMIT_SUCCESS_MESSAGE, UPDATE_SUCCESS_MESSAGE};
use crate::vle_types::FormFields;

type RecordResponse = (StatusCode, Json<Value>);

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub term: Option<String>,
}

fn success(message: &str) -> RecordResponse {
    (StatusCode::OK, Json(json!({ "success": true, "message": message })))
}

fn failure(err: RecordError) -> RecordResponse {
    if !err.is_client_error() {
        error!("Record operation failed: {}", err);
    }
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({ "success": false, "message": err.to_string() })),
    )
}

fn rejected(rejection: FormRejection) -> RecordResponse {
    warn!("Unreadable form body: {}", rejection.body_text());
    (
        rejection.status(),
        Json(json!({ "success": false, "message": rejection.body_text() })),
    )
}

type FormBody = Result<Form<Vec<(String, String)>>, FormRejection>;

/// Form fields arrive as ordered pairs so repeated `grampanchayat` keys survive.
pub async fn submit_form(State(state): State<AppState>, body: FormBody) -> RecordResponse {
    let Form(pairs) = match body {
        Ok(form) => form,
        Err(rejection) => return rejected(rejection),
    };

    match state.records.submit(&FormFields::new(pairs)).await {
        Ok(receipt) => {
            info!("Submission accepted for {}", receipt.record.csc_id);
            success(SUBMIT_SUCCESS_MESSAGE)
        }
        Err(err) => failure(err),
    }
}

pub async fn update_record(State(state): State<AppState>, body: FormBody) -> RecordResponse {
    let Form(pairs) = match body {
        Ok(form) => form,
        Err(rejection) => return rejected(rejection),
    };

    match state.records.update(&FormFields::new(pairs)).await {
        Ok(_) => success(UPDATE_SUCCESS_MESSAGE),
        Err(err) => failure(err),
    }
}

pub async fn search_record(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> RecordResponse {
    let term = params.term.unwrap_or_default();

    match state.records.search(&term).await {
        Ok(Some(hit)) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "record": hit.record,
                "location_ids": hit.location_ids,
                "grampanchayat_details": hit.grampanchayat_details,
            })),
        ),
        Ok(None) => (
            StatusCode::OK,
            Json(json!({ "success": false, "message": RECORD_NOT_FOUND_MESSAGE })),
        ),
        Err(err) => failure(err),
    }
}
