mod broadcast_config;
mod config;
mod error;
mod log_level;
mod logging_config;
mod peripherals_config;
mod reader_config;
mod server_config;

#[cfg(test)]
mod tests;

pub use broadcast_config::BroadcastConfig;
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use peripherals_config::PeripheralsConfig;
pub use reader_config::ReaderConfig;
pub use server_config::ServerConfig;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const MIN_PORT: u16 = 1024;

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";

pub const DEFAULT_CHANNEL: &str = "default channel";
pub const DEFAULT_MAX_CLIENTS: usize = 2;
pub const MIN_MAX_CLIENTS: usize = 1;
pub const MAX_MAX_CLIENTS: usize = 64;
pub const DEFAULT_QUEUE_CAPACITY: usize = 15;
pub const MAX_QUEUE_CAPACITY: usize = 10_000;
pub const DEFAULT_PULL_DELAY_MS: u64 = 100;
pub const MAX_PULL_DELAY_MS: u64 = 10_000;
pub const DEFAULT_DELIVERY_TIMEOUT_MS: u64 = 0;
