pub mod app;
pub mod handlers;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::config::ServeArgs;
use crate::database::{establish_connection, setup_database};
use crate::services::NotificationDispatcher;

pub async fn start_server(args: ServeArgs) -> Result<()> {
    let database_url = args.database.url()?;
    let db = establish_connection(&database_url, &args.database.pool_settings()).await?;

    if args.init_schema {
        setup_database(&db).await?;
        info!("Database schema ready");
    }

    let notifier = Arc::new(NotificationDispatcher::from_settings(
        args.mail.settings().as_ref(),
    ));
    let app = app::create_app(db, notifier, args.cors_origin.as_deref()).await?;

    log_routes();

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", args.port)).await?;
    info!("Server running on http://0.0.0.0:{}", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes() {
    info!("API Endpoints:");
    info!("  /health                          - Health check");
    info!("  /get_divisions                   - All divisions");
    info!("  /get_districts/:division_id      - Districts of a division");
    info!("  /get_blocks/:district_id         - Blocks of a district");
    info!("  /get_grampanchayats/:block_id    - Grampanchayats of a block");
    info!("  /submit_form                     - Register a VLE (POST)");
    info!("  /search_record?term=             - Find by CSC ID, Aadhar or contact number");
    info!("  /update_record                   - Overwrite a record by CSC ID (POST)");
}
