use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;

use super::migrations::Migrator;

/// Pool sizing and timeouts for the record store.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

pub async fn establish_connection(
    database_url: &str,
    settings: &PoolSettings,
) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url);

    // Every operation holds at most one connection, released when its
    // transaction or query completes.
    opt.max_connections(settings.max_connections)
        .min_connections(1)
        .connect_timeout(settings.connect_timeout)
        .acquire_timeout(settings.connect_timeout)
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(3600))
        .sqlx_logging(true)
        .sqlx_logging_level(tracing::log::LevelFilter::Debug);

    Database::connect(opt).await
}

/// Build a MySQL URL from discrete connection parameters.
pub fn build_mysql_url(
    host: &str,
    port: u16,
    user: &str,
    password: Option<&str>,
    database: &str,
    charset: &str,
) -> String {
    let credentials = match password {
        Some(password) if !password.is_empty() => format!(
            "{}:{}",
            urlencoding::encode(user),
            urlencoding::encode(password)
        ),
        _ => urlencoding::encode(user).into_owned(),
    };

    format!(
        "mysql://{}@{}:{}/{}?charset={}",
        credentials, host, port, database, charset
    )
}

/// Create the lookup and record tables when they are missing.
pub async fn setup_database(db: &DatabaseConnection) -> Result<(), DbErr> {
    Migrator::up(db, None).await
}
