//! Bridges from the TOML config schema to the core's own types. Configs are
//! validated before they get here, so the mappings are infallible.

use chrono::{FixedOffset, Offset, Utc};

use crate::forecast::ForecastCfg;

impl From<&packload_config::ForecastCfg> for ForecastCfg {
    fn from(cfg: &packload_config::ForecastCfg) -> Self {
        Self {
            skew_threshold: cfg.skew_threshold,
            min_samples: cfg.min_samples,
        }
    }
}

/// The reference offset as a chrono `FixedOffset`. Falls back to UTC if the
/// configured hour count is somehow out of range, which validation prevents.
#[must_use]
pub fn reference_offset(cfg: &packload_config::TimeCfg) -> FixedOffset {
    FixedOffset::east_opt(cfg.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
}
