use std::{path::PathBuf, time::Duration};

use config::ConfigError;
use serde::Deserialize;

use crate::{core::notification::QueueConfig, integration::renderer::OutputFormat, utils};

const CONFIG: &str = include_str!("../../.config/config.json5");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub _data_dir: PathBuf,
    #[serde(default)]
    pub _config_dir: PathBuf,
}

/// Settings of the headless runner
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RuntimeConfig {
    /// Frames per second driving the notification timers
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_frame_rate() -> f64 {
    60.0
}

impl RuntimeConfig {
    /// Time between two frames; zero, non-finite or sub-nanosecond periods are rejected
    pub fn frame_period(&self) -> Result<Duration, ConfigError> {
        let invalid = || {
            ConfigError::Message(format!(
                "runtime.frame_rate must be positive with a non-zero frame period, got {}",
                self.frame_rate
            ))
        };
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(invalid());
        }
        let period = Duration::try_from_secs_f64(1.0 / self.frame_rate).map_err(|_| invalid())?;
        if period.is_zero() {
            return Err(invalid());
        }
        Ok(period)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            format: OutputFormat::default(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

impl Config {
    /// Built-in defaults shipped in `.config/config.json5`
    pub fn embedded() -> Result<Self, ConfigError> {
        json5::from_str(CONFIG)
            .map_err(|e| ConfigError::Message(format!("Failed to load default config: {e}")))
    }

    /// Layer the embedded defaults, any user config file and `TOASTER__*` variables
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_from(&utils::get_config_dir())
    }

    pub fn load_from(config_dir: &std::path::Path) -> Result<Self, ConfigError> {
        let data_dir = utils::get_data_dir();
        let mut builder = config::Config::builder()
            .set_default("_data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("_config_dir", config_dir.to_string_lossy().to_string())?
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5));

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.json", config::FileFormat::Json),
            ("config.yaml", config::FileFormat::Yaml),
            ("config.toml", config::FileFormat::Toml),
            ("config.ini", config::FileFormat::Ini),
        ];
        for (file, format) in &config_files {
            let path = config_dir.join(file);
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
            }
            builder = builder.add_source(config::File::from(path).format(*format).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("TOASTER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check values the loaders cannot; run again after command line overrides
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.runtime.frame_period()?;
        Ok(())
    }
}
