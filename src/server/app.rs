use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{geography, health, records};
use crate::services::{NotificationDispatcher, VleRecordService};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub records: VleRecordService,
}

pub async fn create_app(
    db: DatabaseConnection,
    notifier: Arc<NotificationDispatcher>,
    cors_origin: Option<&str>,
) -> Result<Router> {
    let state = AppState {
        records: VleRecordService::new(db.clone(), notifier),
        db,
    };

    let cors = match cors_origin.filter(|origin| *origin != "*") {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<axum::http::HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin: {}", origin))?,
            )
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(health::health_check))
        // Geography lookups for the cascading selects
        .route("/get_divisions", get(geography::get_divisions))
        .route("/get_districts/:division_id", get(geography::get_districts))
        .route("/get_blocks/:district_id", get(geography::get_blocks))
        .route("/get_grampanchayats/:block_id", get(geography::get_grampanchayats))
        // Record lifecycle
        .route("/submit_form", post(records::submit_form))
        .route("/search_record", get(records::search_record))
        .route("/update_record", post(records::update_record))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state);

    Ok(app)
}
