use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;

use crate::database::{build_mysql_url, PoolSettings};
use crate::services::notification_service::{MailSettings, DEFAULT_SUBJECT};

/// Record store location and pool bounds
#[derive(Args, Debug, Clone, Default)]
pub struct DatabaseArgs {
    /// Full connection URL; takes precedence over the discrete settings
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
    #[clap(long, env = "DB_HOST")]
    pub db_host: Option<String>,
    #[clap(long, env = "DB_PORT", default_value = "3306")]
    pub db_port: u16,
    #[clap(long, env = "DB_USER")]
    pub db_user: Option<String>,
    #[clap(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,
    #[clap(long, env = "DB_NAME")]
    pub db_name: Option<String>,
    #[clap(long, env = "DB_CHARSET", default_value = "utf8mb4")]
    pub db_charset: String,
    #[clap(long, env = "DB_MAX_CONNECTIONS", default_value = "10")]
    pub db_max_connections: u32,
    #[clap(long, env = "DB_CONNECT_TIMEOUT_SECS", default_value = "5")]
    pub db_connect_timeout_secs: u64,
}

impl DatabaseArgs {
    pub fn url(&self) -> Result<String> {
        if let Some(url) = self.database_url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Ok(url.to_string());
        }

        let (Some(host), Some(user), Some(name)) = (
            self.db_host.as_deref(),
            self.db_user.as_deref(),
            self.db_name.as_deref(),
        ) else {
            bail!("Set DATABASE_URL or DB_HOST, DB_USER and DB_NAME");
        };

        Ok(build_mysql_url(
            host,
            self.db_port,
            user,
            self.db_password.as_deref(),
            name,
            &self.db_charset,
        ))
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.db_max_connections.max(1),
            connect_timeout: Duration::from_secs(self.db_connect_timeout_secs),
        }
    }
}

/// Outgoing mail; disabled unless a server and a from address are set
#[derive(Args, Debug, Clone, Default)]
pub struct MailArgs {
    #[clap(long, env = "SMTP_SERVER")]
    pub smtp_server: Option<String>,
    #[clap(long, env = "SMTP_PORT", default_value = "587")]
    pub smtp_port: u16,
    #[clap(long, env = "SMTP_USERNAME")]
    pub smtp_username: Option<String>,
    #[clap(long, env = "SMTP_PASSWORD", hide_env_values = true)]
    pub smtp_password: Option<String>,
    #[clap(long, env = "EMAIL_FROM")]
    pub email_from: Option<String>,
    /// Blind-copied on every confirmation
    #[clap(long, env = "EMAIL_ADMIN")]
    pub email_admin: Option<String>,
    #[clap(long, env = "EMAIL_SUBJECT", default_value = DEFAULT_SUBJECT)]
    pub email_subject: String,
    #[clap(long, env = "SMTP_TIMEOUT_SECS", default_value = "10")]
    pub smtp_timeout_secs: u64,
}

impl MailArgs {
    pub fn settings(&self) -> Option<MailSettings> {
        let smtp_server = non_blank(&self.smtp_server)?;
        let from = non_blank(&self.email_from)?;

        Some(MailSettings {
            smtp_server,
            smtp_port: self.smtp_port,
            username: non_blank(&self.smtp_username),
            password: self.smtp_password.clone(),
            from,
            admin_bcc: non_blank(&self.email_admin),
            subject: self.email_subject.clone(),
            timeout: Duration::from_secs(self.smtp_timeout_secs),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Everything `serve` needs
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[clap(short, long, env = "PORT", default_value = "5000")]
    pub port: u16,
    #[clap(long, env = "CORS_ORIGIN")]
    pub cors_origin: Option<String>,
    /// Create the schema before serving
    #[clap(long)]
    pub init_schema: bool,
    #[clap(flatten)]
    pub database: DatabaseArgs,
    #[clap(flatten)]
    pub mail: MailArgs,
}
