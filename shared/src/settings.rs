//! Settings for profile validation
//!
//! Settings are loaded hierarchically on native targets:
//! 1. Default values (in code)
//! 2. TOML config file (config/{RUST_ENV}.toml, optional)
//! 3. Environment variables (prefix: FT__)
//!
//! The WASM module always uses the defaults.

use serde::{Deserialize, Serialize};

use crate::age::{AgeWindow, MAX_AGE_YEARS};
use crate::errors::{CoreError, CoreResult};

/// Inclusive numeric range for a body measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementLimits {
    pub min: f64,
    pub max: f64,
}

/// Core settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreSettings {
    #[serde(default)]
    pub age: AgeWindow,
    pub weight_kg: MeasurementLimits,
    pub height_cm: MeasurementLimits,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            age: AgeWindow::default(),
            weight_kg: MeasurementLimits {
                min: 20.0,
                max: 500.0,
            },
            height_cm: MeasurementLimits {
                min: 50.0,
                max: 300.0,
            },
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod loader {
    use std::env;

    use tracing::info;

    use super::CoreSettings;
    use crate::errors::{CoreError, CoreResult};

    impl From<config::ConfigError> for CoreError {
        fn from(err: config::ConfigError) -> Self {
            CoreError::Settings(err.to_string())
        }
    }

    impl CoreSettings {
        /// Load settings from files and environment
        ///
        /// Loading order (later sources override earlier):
        /// 1. Default values
        /// 2. Config file based on RUST_ENV (development.toml or production.toml)
        /// 3. Environment variables with FT__ prefix
        pub fn load() -> CoreResult<Self> {
            let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
            Self::load_from(&format!("config/{}", env))
        }

        /// Load settings using `file` (extension optional) as the config file
        pub fn load_from(file: &str) -> CoreResult<Self> {
            let config = config::Config::builder()
                .add_source(config::Config::try_from(&CoreSettings::default())?)
                .add_source(config::File::with_name(file).required(false))
                // e.g., FT__AGE__MIN_YEARS=16 sets age.min_years
                .add_source(config::Environment::with_prefix("FT").separator("__"))
                .build()?;

            let settings: CoreSettings = config.try_deserialize()?;
            settings.check()?;

            info!(
                min_age = settings.age.min_years,
                max_age = settings.age.max_years,
                "Settings loaded"
            );
            Ok(settings)
        }
    }
}

impl CoreSettings {
    /// Reject settings whose ranges are inverted or out of bounds
    pub fn check(&self) -> CoreResult<()> {
        if self.age.max_years > MAX_AGE_YEARS {
            return Err(CoreError::Settings(format!(
                "age.max_years ({}) exceeds {}",
                self.age.max_years, MAX_AGE_YEARS
            )));
        }
        if self.age.min_years > self.age.max_years {
            return Err(CoreError::Settings(format!(
                "age.min_years ({}) exceeds age.max_years ({})",
                self.age.min_years, self.age.max_years
            )));
        }
        for (name, limits) in [("weight_kg", &self.weight_kg), ("height_cm", &self.height_cm)] {
            if limits.min.is_nan() || limits.max.is_nan() || limits.min > limits.max {
                return Err(CoreError::Settings(format!(
                    "{}.min ({}) exceeds {}.max ({})",
                    name, limits.min, name, limits.max
                )));
            }
        }
        Ok(())
    }
}
