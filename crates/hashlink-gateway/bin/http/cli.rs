use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const LISTEN_ADDR_ENV: &str = "HASHLINK_LISTEN_ADDR";
pub const BASE_URL_ENV: &str = "HASHLINK_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "HASHLINK_STORAGE_BACKEND";
pub const STORE_FILE_ENV: &str = "HASHLINK_STORE_FILE";
pub const IO_TIMEOUT_MS_ENV: &str = "HASHLINK_IO_TIMEOUT_MS";
pub const LOG_FORMAT_ENV: &str = "HASHLINK_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/r";
pub const DEFAULT_STORE_FILE: &str = "hashlink.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "memory")]
    Memory,
    #[value(name = "file")]
    File,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::Memory => write!(f, "memory"),
            StorageBackendArg::File => write!(f, "file"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "hashlink-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Prefix joined with a code to form the public short URL.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::File
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = STORE_FILE_ENV, default_value = DEFAULT_STORE_FILE)]
    pub store_file: PathBuf,

    /// Upper bound for each store file read or write, in milliseconds.
    #[arg(long, env = IO_TIMEOUT_MS_ENV)]
    pub io_timeout_ms: Option<u64>,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,
}
