use crate::{
    BroadcastConfig, ConfigError, ConfigErrorResult, LoggingConfig, PeripheralsConfig,
    ReaderConfig, ServerConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

const CONFIG_DIR_ENV: &str = "RFID_CONFIG_DIR";
const CONFIG_DIR_NAME: &str = ".rfid";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub broadcast: BroadcastConfig,
    pub peripherals: PeripheralsConfig,
    pub reader: ReaderConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for RFID_CONFIG_DIR env var, else use ./.rfid/
    /// 2. Load config.toml if it exists, else use defaults
    /// 3. Apply RFID_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_path = Self::config_dir()?.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Priority: RFID_CONFIG_DIR env var > ./.rfid/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(CONFIG_DIR_NAME))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.broadcast.validate()?;
        self.peripherals.validate()?;
        self.reader.validate()?;

        if let Some(ref file) = self.logging.file
            && (Path::new(file).is_absolute() || file.contains(".."))
        {
            return Err(ConfigError::logging(
                "logging.file must be relative and cannot contain '..'",
            ));
        }

        Ok(())
    }

    /// Absolute log file path, if file logging is configured.
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        match self.logging.file {
            Some(ref filename) => {
                let dir = Self::config_dir()?.join(&self.logging.dir);
                Ok(Some(dir.join(filename)))
            }
            None => Ok(None),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  server: {}:{}", self.server.host, self.server.port);
        info!(
            "  broadcast: channel='{}', max_clients={}, queue={}, pull={}ms, delivery_timeout={}",
            self.broadcast.default_channel,
            self.broadcast.max_clients,
            self.broadcast.queue_capacity,
            self.broadcast.pull_delay_ms,
            match self.broadcast.delivery_timeout_ms {
                0 => String::from("none"),
                ms => format!("{ms}ms"),
            }
        );
        info!(
            "  peripherals: pulse={}ms, alert={}x{}ms/{}ms, read_beep={}ms",
            self.peripherals.indicator_pulse_ms,
            self.peripherals.alert_beeps,
            self.peripherals.alert_beep_ms,
            self.peripherals.alert_spacing_ms,
            self.peripherals.read_beep_ms
        );
        info!(
            "  reader: {} (poll={}ms, watchdog={}s)",
            if self.reader.enabled {
                "enabled"
            } else {
                "disabled"
            },
            self.reader.poll_interval_ms,
            self.reader.watchdog_timeout_secs
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("RFID_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("RFID_SERVER_PORT", &mut self.server.port);

        // Broadcast
        Self::apply_env_string(
            "RFID_BROADCAST_DEFAULT_CHANNEL",
            &mut self.broadcast.default_channel,
        );
        Self::apply_env_parse(
            "RFID_BROADCAST_MAX_CLIENTS",
            &mut self.broadcast.max_clients,
        );
        Self::apply_env_parse(
            "RFID_BROADCAST_QUEUE_CAPACITY",
            &mut self.broadcast.queue_capacity,
        );
        Self::apply_env_parse(
            "RFID_BROADCAST_PULL_DELAY_MS",
            &mut self.broadcast.pull_delay_ms,
        );
        Self::apply_env_parse(
            "RFID_BROADCAST_DELIVERY_TIMEOUT_MS",
            &mut self.broadcast.delivery_timeout_ms,
        );

        // Peripherals
        Self::apply_env_parse(
            "RFID_INDICATOR_PULSE_MS",
            &mut self.peripherals.indicator_pulse_ms,
        );
        Self::apply_env_parse("RFID_ALERT_BEEPS", &mut self.peripherals.alert_beeps);
        Self::apply_env_parse("RFID_ALERT_BEEP_MS", &mut self.peripherals.alert_beep_ms);
        Self::apply_env_parse(
            "RFID_ALERT_SPACING_MS",
            &mut self.peripherals.alert_spacing_ms,
        );
        Self::apply_env_parse("RFID_READ_BEEP_MS", &mut self.peripherals.read_beep_ms);

        // Reader
        Self::apply_env_bool("RFID_READER_ENABLED", &mut self.reader.enabled);
        Self::apply_env_parse(
            "RFID_READER_POLL_INTERVAL_MS",
            &mut self.reader.poll_interval_ms,
        );
        Self::apply_env_parse(
            "RFID_WATCHDOG_TIMEOUT_SECS",
            &mut self.reader.watchdog_timeout_secs,
        );

        // Logging
        Self::apply_env_parse("RFID_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("RFID_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("RFID_LOG_FILE", &mut self.logging.file);
    }

    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Accepts "true"/"1"
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
