use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::IpAddr;
use tinylink_telemetry::LogFormat;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const FRONTEND_URL_ENV: &str = "FRONTEND_URL";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "TINYLINK_STORAGE_BACKEND";
pub const MAX_CONNECTIONS_ENV: &str = "TINYLINK_DB_MAX_CONNECTIONS";
pub const LOG_FORMAT_ENV: &str = "TINYLINK_LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "postgres")]
    Postgres,
    #[value(name = "in-memory")]
    InMemory,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::Postgres => write!(f, "postgres"),
            StorageBackendArg::InMemory => write!(f, "in-memory"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tinylink", version, about = "URL shortener HTTP server")]
pub struct Cli {
    #[arg(long, env = HOST_ENV, default_value = DEFAULT_HOST)]
    pub host: IpAddr,

    #[arg(long, env = PORT_ENV, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Origin allowed to call the API from a browser.
    #[arg(long, env = FRONTEND_URL_ENV, default_value = DEFAULT_FRONTEND_URL)]
    pub frontend_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Postgres
    )]
    pub storage: StorageBackendArg,

    /// Required when the storage backend is postgres.
    #[arg(long, env = DATABASE_URL_ENV)]
    pub database_url: Option<String>,

    #[arg(long, env = MAX_CONNECTIONS_ENV, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}
