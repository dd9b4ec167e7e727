//! Configuration loading and validation.
//!
//! Every value has a default, so the config file is optional. Values set
//! here are defaults for the CLI; command-line flags win.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

use crate::domain::{Commission, CommissionModel, OddsFormat, RiskConfig};
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub risk: RiskSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Calculator defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Notation odds are entered in.
    #[serde(default)]
    pub odds_format: OddsFormat,
    /// Exchange commission rate (e.g., 0.02 = 2%).
    #[serde(default = "default_commission")]
    pub commission: f64,
    /// How commission reduces a leg's return.
    #[serde(default)]
    pub commission_model: CommissionModel,
}

fn default_commission() -> f64 {
    0.02
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            odds_format: OddsFormat::default(),
            commission: default_commission(),
            commission_model: CommissionModel::default(),
        }
    }
}

/// Risk summary and stake sizing limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSettings {
    /// Worst-case loss still reported as risk-free.
    #[serde(default)]
    pub risk_free_tolerance: f64,
    /// Cap on the Kelly stake fraction.
    #[serde(default = "default_kelly_max_fraction")]
    pub kelly_max_fraction: f64,
}

fn default_kelly_max_fraction() -> f64 {
    0.25
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            risk_free_tolerance: 0.0,
            kelly_max_fraction: default_kelly_max_fraction(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber. Logs go to stderr.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt()
                    .json()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
            _ => {
                fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse(&content)
    }

    /// Load `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse and validate TOML content.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let commission = self.defaults.commission;
        if Commission::new(commission).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "commission",
                reason: format!("must be in [0, 1), got {commission}"),
            }
            .into());
        }

        let tolerance = self.risk.risk_free_tolerance;
        if RiskConfig::new(tolerance).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "risk_free_tolerance",
                reason: format!("must be non-negative, got {tolerance}"),
            }
            .into());
        }

        let cap = self.risk.kelly_max_fraction;
        if !(cap > 0.0 && cap <= 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "kelly_max_fraction",
                reason: format!("must be in (0, 1], got {cap}"),
            }
            .into());
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "level" }.into());
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: format!("expected pretty or json, got '{}'", self.logging.format),
            }
            .into());
        }

        Ok(())
    }

    /// Default commission as a validated rate.
    pub fn commission(&self) -> Commission {
        Commission::new(self.defaults.commission).unwrap_or_default()
    }

    pub fn risk_config(&self) -> RiskConfig {
        RiskConfig::new(self.risk.risk_free_tolerance).unwrap_or_default()
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Other(e.to_string()).into())
    }

    pub fn init_logging(&self) {
        self.logging.init();
    }
}
