//! Tax settings and their process-wide publication
//!
//! Load order (later overrides earlier):
//! 1. Defaults (12% VAT, half-even rounding to 2 decimals)
//! 2. TOML config file
//! 3. Environment variables (`VAT_RATE`, `VAT_ROUNDING`, `VAT_CURRENCY_DECIMALS`)
//!
//! ```toml
//! [tax]
//! rate = "0.12"
//! rounding = "half-even"
//! currency_decimals = 2
//! ```

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

use crate::tax::rounding::{RoundingPolicy, RoundingRule};
use crate::types::{VatError, VatResult};
use crate::utils::validation::{validate_rate, validate_scale};

/// Default VAT rate (12%)
pub const DEFAULT_VAT_RATE: &str = "0.12";

/// Settings every calculation reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxSettings {
    /// VAT rate as a fraction (0.12 = 12%)
    pub rate: BigDecimal,
    /// Rounding rule for finalized amounts
    pub rounding: RoundingRule,
    /// Decimal places of the currency's minor unit
    pub currency_decimals: i64,
}

impl TaxSettings {
    /// Rounding policy derived from these settings
    pub fn rounding_policy(&self) -> RoundingPolicy {
        RoundingPolicy::new(self.currency_decimals, self.rounding)
    }

    /// Validate the settings
    pub fn validate(&self) -> VatResult<()> {
        validate_rate(&self.rate).map_err(|e| VatError::Config(e.to_string()))?;

        validate_scale(self.currency_decimals).map_err(|e| VatError::Config(e.to_string()))
    }
}

impl Default for TaxSettings {
    fn default() -> Self {
        Self {
            rate: default_rate(),
            rounding: RoundingRule::default(),
            currency_decimals: 2,
        }
    }
}

fn default_rate() -> BigDecimal {
    BigDecimal::new(12.into(), 2)
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VatConfig {
    #[serde(default)]
    pub tax: TaxSettings,
}

impl VatConfig {
    /// Load configuration from an optional file, then the environment
    pub fn load(config_path: Option<&Path>) -> VatResult<Self> {
        let mut config = match config_path {
            Some(path) if path.exists() => {
                info!(?path, "Loading VAT config from file");
                let contents = std::fs::read_to_string(path).map_err(|e| {
                    VatError::Config(format!("Cannot read {}: {}", path.display(), e))
                })?;
                Self::from_toml(&contents)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration, falling back to defaults on any error
    pub fn load_or_default(config_path: Option<&Path>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load VAT config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> VatResult<Self> {
        toml::from_str(contents).map_err(|e| VatError::Config(e.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> VatResult<()> {
        self.tax.validate()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rate) = lookup("VAT_RATE") {
            match rate.parse::<BigDecimal>() {
                Ok(parsed) => {
                    debug!(rate = %parsed, "Overriding VAT rate from environment");
                    self.tax.rate = parsed;
                }
                Err(_) => warn!(rate = %rate, "Ignoring unparseable VAT_RATE"),
            }
        }

        if let Some(rule) = lookup("VAT_ROUNDING") {
            match rule.parse::<RoundingRule>() {
                Ok(parsed) => self.tax.rounding = parsed,
                Err(_) => warn!(rule = %rule, "Ignoring unknown VAT_ROUNDING"),
            }
        }

        if let Some(decimals) = lookup("VAT_CURRENCY_DECIMALS") {
            match decimals.parse::<i64>() {
                Ok(parsed) => self.tax.currency_decimals = parsed,
                Err(_) => warn!(decimals = %decimals, "Ignoring unparseable VAT_CURRENCY_DECIMALS"),
            }
        }
    }
}

/// Shared handle publishing the current tax settings
///
/// Readers get an `Arc` snapshot; the lock is only held long enough to clone
/// the pointer. A snapshot never changes after it is handed out.
#[derive(Debug, Clone)]
pub struct SettingsHandle {
    current: Arc<RwLock<Arc<TaxSettings>>>,
}

impl SettingsHandle {
    /// Publish an initial settings value
    pub fn new(settings: TaxSettings) -> VatResult<Self> {
        settings.validate()?;
        Ok(Self {
            current: Arc::new(RwLock::new(Arc::new(settings))),
        })
    }

    /// Current settings snapshot
    pub fn snapshot(&self) -> Arc<TaxSettings> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Validate and publish new settings
    pub fn update(&self, settings: TaxSettings) -> VatResult<()> {
        settings.validate()?;
        info!(
            rate = %settings.rate,
            rounding = %settings.rounding,
            "Publishing new tax settings"
        );
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(settings);
        Ok(())
    }

    /// Publish a new rate, keeping the other settings
    pub fn set_rate(&self, rate: BigDecimal) -> VatResult<()> {
        let mut settings = (*self.snapshot()).clone();
        settings.rate = rate;
        self.update(settings)
    }
}

impl Default for SettingsHandle {
    fn default() -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(TaxSettings::default()))),
        }
    }
}

impl TryFrom<&VatConfig> for SettingsHandle {
    type Error = VatError;

    fn try_from(config: &VatConfig) -> VatResult<Self> {
        Self::new(config.tax.clone())
    }
}
