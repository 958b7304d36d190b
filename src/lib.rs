pub mod common;
pub mod config;
pub mod errors;
pub mod vle_types;

pub mod database;
#[cfg(feature = "server")]
pub mod server;
pub mod services;
