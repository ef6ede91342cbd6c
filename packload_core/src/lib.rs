#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core logic for the shared weight-sensing backpack service
//! (store-agnostic).
//!
//! Everything stateful goes through the `packload_traits::Store` seam; this
//! crate holds the decisions.
//!
//! ## Architecture
//!
//! - **Arbiter**: single-holder device ownership with race-free claims
//!   (`arbiter` module)
//! - **Limits**: pure classification of readings against the two safety
//!   ceilings (`limits`)
//! - **Ingestion**: the per-sample pipeline tying arbiter, limits, and alert
//!   emission together (`ingest`)
//! - **Numerics**: descriptive statistics, OLS trend fitting, weekday
//!   aggregation, and same-weekday forecasting (`stats`, `regress`,
//!   `weekday`, `forecast`)
//! - **Reports**: calendar-windowed history selectors (`reports`)

pub mod alert;
pub mod arbiter;
pub mod convert;
pub mod error;
pub mod forecast;
pub mod ingest;
pub mod limits;
pub mod links;
pub mod regress;
pub mod reports;
pub mod stats;
pub mod util;
pub mod weekday;

pub use arbiter::{claim, release_by_device, release_by_user, ClaimOutcome};
pub use error::{CoreError, Result};
pub use forecast::{forecast, Forecast, ForecastCfg, Prediction};
pub use ingest::{ingest, IngestOutcome, Sample};
pub use limits::{evaluate, user_ceiling_kg, Evaluation, DEFAULT_LIMIT_PERCENT};
pub use regress::{fit, LineFit};
pub use reports::Report;
pub use stats::{describe, Summary};
pub use weekday::{day_loads, weekly_profile, DayLoad};
