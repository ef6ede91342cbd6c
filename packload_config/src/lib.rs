#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the backpack load service.
//!
//! `Config` and sub-structs are deserialized from TOML and validated before
//! anything downstream runs. Every section has sensible defaults so an empty
//! file is a valid config.
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct LimitsCfg {
    /// Personal carrying limit as a percentage of body mass, applied when a
    /// user has no limit of their own.
    pub default_user_percent: f64,
}

impl Default for LimitsCfg {
    fn default() -> Self {
        Self {
            default_user_percent: 10.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ForecastCfg {
    /// Absolute skewness above which a same-weekday forecast is withheld.
    pub skew_threshold: f64,
    /// Minimum same-weekday observations required before predicting.
    pub min_samples: usize,
}

impl Default for ForecastCfg {
    fn default() -> Self {
        Self {
            skew_threshold: 1.0,
            min_samples: 2,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct TimeCfg {
    /// Fixed offset from UTC, in whole hours, used for calendar bucketing
    /// (daily totals, weekday profiles, report windows).
    pub utc_offset_hours: i32,
}

impl Default for TimeCfg {
    fn default() -> Self {
        Self {
            utc_offset_hours: -3,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub limits: LimitsCfg,
    pub forecast: ForecastCfg,
    pub time: TimeCfg,
    pub logging: Logging,
}

impl Config {
    /// Parse a TOML string into a validated config.
    pub fn from_toml_str(s: &str) -> eyre::Result<Self> {
        let cfg: Config = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a config file.
    pub fn load(path: &std::path::Path) -> eyre::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Reject values that would silently break downstream math.
    pub fn validate(&self) -> eyre::Result<()> {
        if !self.limits.default_user_percent.is_finite()
            || self.limits.default_user_percent <= 0.0
            || self.limits.default_user_percent > 100.0
        {
            eyre::bail!(
                "limits.default_user_percent must be in (0, 100], got {}",
                self.limits.default_user_percent
            );
        }
        if !self.forecast.skew_threshold.is_finite() || self.forecast.skew_threshold <= 0.0 {
            eyre::bail!(
                "forecast.skew_threshold must be positive, got {}",
                self.forecast.skew_threshold
            );
        }
        if self.forecast.min_samples < 2 {
            eyre::bail!(
                "forecast.min_samples must be at least 2, got {}",
                self.forecast.min_samples
            );
        }
        if !(-12..=14).contains(&self.time.utc_offset_hours) {
            eyre::bail!(
                "time.utc_offset_hours must be in [-12, 14], got {}",
                self.time.utc_offset_hours
            );
        }
        if let Some(rotation) = self.logging.rotation.as_deref() {
            match rotation {
                "never" | "daily" | "hourly" => {}
                other => eyre::bail!(
                    "logging.rotation must be one of never|daily|hourly, got '{other}'"
                ),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = Config::from_toml_str("").unwrap();
        assert_eq!(cfg.limits.default_user_percent, 10.0);
        assert_eq!(cfg.forecast.skew_threshold, 1.0);
        assert_eq!(cfg.forecast.min_samples, 2);
        assert_eq!(cfg.time.utc_offset_hours, -3);
    }

    #[test]
    fn sections_override_defaults() {
        let cfg = Config::from_toml_str(
            r#"
            [limits]
            default_user_percent = 12.5

            [forecast]
            skew_threshold = 0.8
            min_samples = 4

            [time]
            utc_offset_hours = 0

            [logging]
            level = "debug"
            rotation = "daily"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.limits.default_user_percent, 12.5);
        assert_eq!(cfg.forecast.skew_threshold, 0.8);
        assert_eq!(cfg.forecast.min_samples, 4);
        assert_eq!(cfg.time.utc_offset_hours, 0);
        assert_eq!(cfg.logging.level.as_deref(), Some("debug"));
    }

    #[rstest]
    #[case("[limits]\ndefault_user_percent = 0.0")]
    #[case("[limits]\ndefault_user_percent = 150.0")]
    #[case("[limits]\ndefault_user_percent = -3.0")]
    #[case("[forecast]\nskew_threshold = 0.0")]
    #[case("[forecast]\nmin_samples = 1")]
    #[case("[time]\nutc_offset_hours = 20")]
    #[case("[logging]\nrotation = \"weekly\"")]
    fn invalid_values_are_rejected(#[case] toml: &str) {
        assert!(Config::from_toml_str(toml).is_err());
    }

    #[test]
    fn load_reads_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("packload.toml");
        std::fs::write(&path, "[time]\nutc_offset_hours = 1\n").unwrap();
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.time.utc_offset_hours, 1);
    }
}
