//! Measurement ingestion: the entry point invoked once per physical sample.
//!
//! Resolves who currently holds the device, classifies the reading, persists
//! it, emits an alert for over-limit readings, and restores a grace-window
//! holder to `Using` when their device resumes reporting. The measurement
//! insert and the promotion are one atomic store operation.

use chrono::{DateTime, Utc};
use packload_traits::model::{
    Alert, Classification, DeviceStatus, Measurement, NewMeasurement, Side, UsageState,
};
use packload_traits::Store;
use tracing::{info, warn};

use crate::alert::over_limit_alert;
use crate::error::{map_store_error_dyn, CoreError};
use crate::limits::{evaluate, user_ceiling_kg};
use crate::util::round2;

/// One raw sample as reported by a device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub weight_kg: f64,
    pub side: Side,
}

/// What one ingested sample produced.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutcome {
    pub measurement: Measurement,
    pub alert: Option<Alert>,
    /// True when this sample ended a grace window and restored the previous
    /// holder to `Using`.
    pub resumed: bool,
}

/// Ingest one sample reported by the device identified by `code`.
pub fn ingest<S: Store + ?Sized>(
    store: &S,
    code: &str,
    sample: Sample,
    default_limit_percent: f64,
    now: DateTime<Utc>,
) -> Result<IngestOutcome, CoreError> {
    let device = store
        .device_by_code(code)
        .map_err(map_store_error_dyn)?
        .ok_or(CoreError::NotFound("device"))?;
    if device.status != DeviceStatus::Active {
        return Err(CoreError::Conflict("device is not active"));
    }

    let link = store
        .active_link(device.id)
        .map_err(map_store_error_dyn)?
        .ok_or(CoreError::NoActiveUser)?;
    let user = store
        .user(link.user_id)
        .map_err(map_store_error_dyn)?
        .ok_or(CoreError::NotFound("user"))?;

    let eval = evaluate(
        sample.weight_kg,
        device.max_load_kg,
        user_ceiling_kg(&user, default_limit_percent),
        sample.side,
    )?;

    let resumed = link.state == UsageState::LastToUse;
    let measurement = store
        .record_measurement(
            NewMeasurement {
                device_id: device.id,
                user_id: user.id,
                weight_kg: round2(sample.weight_kg),
                taken_at: now,
                side: sample.side,
                classification: eval.classification,
                percent_of_limit: eval.percent_of_limit,
                margin_kg: eval.margin_kg,
            },
            resumed,
        )
        .map_err(map_store_error_dyn)?;
    if resumed {
        info!(user = user.id, device = device.id, "grace window resumed");
    }

    let alert = match over_limit_alert(&measurement, &eval, now) {
        Some(new_alert) => {
            warn!(
                user = user.id,
                device = device.id,
                weight_kg = measurement.weight_kg,
                classification = ?eval.classification,
                "over-limit reading"
            );
            Some(store.create_alert(new_alert).map_err(map_store_error_dyn)?)
        }
        None => None,
    };

    debug_assert!(
        alert.is_none() || measurement.classification != Classification::WithinLimit
    );
    Ok(IngestOutcome {
        measurement,
        alert,
        resumed,
    })
}
