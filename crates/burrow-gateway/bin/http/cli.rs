use burrow_telemetry::{LogFormat, TelemetryConfig};
use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::{IpAddr, SocketAddr};

pub const HOST_ENV: &str = "BURROW_HOST";
pub const PORT_ENV: &str = "PORT";
pub const STORAGE_BACKEND_ENV: &str = "BURROW_STORAGE_BACKEND";
pub const DATABASE_URL_ENV: &str = "BURROW_DATABASE_URL";
pub const DATABASE_MAX_CONNECTIONS_ENV: &str = "BURROW_DATABASE_MAX_CONNECTIONS";
pub const PUBLIC_BASE_URL_ENV: &str = "BURROW_PUBLIC_BASE_URL";
pub const ALLOCATOR_MAX_ATTEMPTS_ENV: &str = "BURROW_ALLOCATOR_MAX_ATTEMPTS";
pub const QR_SIZE_ENV: &str = "BURROW_QR_SIZE";
pub const LOG_FORMAT_ENV: &str = "BURROW_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "BURROW_OTLP_ENDPOINT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://burrow.db";
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_QR_SIZE: u32 = 256;

pub const SERVICE_NAME: &str = "burrow-gateway";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "sqlite")]
    Sqlite,
    #[value(name = "in-memory")]
    InMemory,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::Sqlite => write!(f, "sqlite"),
            StorageBackendArg::InMemory => write!(f, "in-memory"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "pretty")]
    Pretty,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormatArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormatArg::Pretty => write!(f, "pretty"),
            LogFormatArg::Json => write!(f, "json"),
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "burrow-gateway", about = "HTTP URL shortener with QR codes")]
pub struct Cli {
    #[arg(long, env = HOST_ENV, default_value = DEFAULT_HOST)]
    pub host: IpAddr,

    #[arg(long, env = PORT_ENV, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Sqlite
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = DATABASE_URL_ENV, default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    #[arg(
        long,
        env = DATABASE_MAX_CONNECTIONS_ENV,
        default_value_t = DEFAULT_DATABASE_MAX_CONNECTIONS
    )]
    pub max_connections: u32,

    /// Base of returned short URLs. Derived from the Host header when unset.
    #[arg(long, env = PUBLIC_BASE_URL_ENV)]
    pub public_base_url: Option<String>,

    #[arg(
        long,
        env = ALLOCATOR_MAX_ATTEMPTS_ENV,
        default_value_t = burrow_shortener::allocator::DEFAULT_MAX_ATTEMPTS
    )]
    pub max_attempts: usize,

    #[arg(long, env = QR_SIZE_ENV, default_value_t = DEFAULT_QR_SIZE)]
    pub qr_size: u32,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Pretty
    )]
    pub log_format: LogFormatArg,

    /// OTLP gRPC endpoint for span export, e.g. `http://localhost:4317`.
    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}

impl Cli {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn telemetry(&self) -> TelemetryConfig {
        let mut config = TelemetryConfig::new(SERVICE_NAME);
        config.format = self.log_format.into();
        config.otlp_endpoint = self.otlp_endpoint.clone();
        config
    }
}
