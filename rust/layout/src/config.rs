// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Analysis configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::floor::checked_floor_of;
use crate::types::MAX_PRECISION;

/// Parameters for floor partitioning and wall projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Elevation of the ground floor's walls (world units)
    pub base_z: f64,
    /// Height of one floor (world units)
    pub floor_height: f64,
    /// Half-length of a wall along its extension direction. Must match the
    /// typical wall half-length for neighbouring endpoints to coincide.
    pub extend: f64,
    /// Decimal places kept when quantizing endpoints (0 = whole units)
    pub precision: u32,
}

impl AnalysisConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparseable variables fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_z: env_or("LAYOUT_BASE_Z", defaults.base_z),
            floor_height: env_or("LAYOUT_FLOOR_HEIGHT", defaults.floor_height),
            extend: env_or("LAYOUT_EXTEND", defaults.extend),
            precision: env_or("LAYOUT_PRECISION", defaults.precision),
        }
    }

    /// Checks that the parameters describe a usable partition.
    pub fn validate(&self) -> Result<()> {
        if !self.base_z.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "base_z must be finite, got {}",
                self.base_z
            )));
        }
        if !self.floor_height.is_finite() || self.floor_height <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "floor_height must be positive, got {}",
                self.floor_height
            )));
        }
        if !self.extend.is_finite() || self.extend <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "extend must be positive, got {}",
                self.extend
            )));
        }
        if self.precision > MAX_PRECISION {
            return Err(Error::InvalidConfig(format!(
                "precision must be at most {MAX_PRECISION} decimals, got {}",
                self.precision
            )));
        }
        Ok(())
    }

    /// Floor index for an elevation, or `None` when it cannot be placed.
    pub fn checked_floor_of(&self, z: f64) -> Option<i32> {
        checked_floor_of(z, self.base_z, self.floor_height)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_z: 10.0,
            floor_height: 300.0,
            extend: 50.0,
            precision: 0,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_deployment() {
        let config = AnalysisConfig::default();
        assert_eq!(config.base_z, 10.0);
        assert_eq!(config.floor_height, 300.0);
        assert_eq!(config.extend, 50.0);
        assert_eq!(config.precision, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_floor_height() {
        let config = AnalysisConfig {
            floor_height: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = AnalysisConfig {
            floor_height: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_extend_and_precision() {
        let config = AnalysisConfig {
            extend: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AnalysisConfig {
            precision: MAX_PRECISION + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn floor_of_uses_configured_partition() {
        let config = AnalysisConfig {
            base_z: 0.0,
            floor_height: 100.0,
            ..Default::default()
        };
        assert_eq!(config.checked_floor_of(250.0), Some(2));
        assert_eq!(config.checked_floor_of(-0.5), Some(-1));
    }
}
