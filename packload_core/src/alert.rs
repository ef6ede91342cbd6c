//! Alert emitter: turns an over-limit evaluation into a durable alert record
//! addressed to the affected user. Delivery (ToSend -> Sent -> Read) happens
//! outside the core.

use chrono::{DateTime, Utc};
use packload_traits::model::{
    AlertStatus, Classification, Measurement, NewAlert, Severity,
};

use crate::limits::Evaluation;

/// Build the alert for a measurement whose classification is not
/// `WithinLimit`. Returns `None` for within-limit readings.
#[must_use]
pub fn over_limit_alert(
    measurement: &Measurement,
    eval: &Evaluation,
    now: DateTime<Utc>,
) -> Option<NewAlert> {
    let title = match eval.classification {
        Classification::WithinLimit => return None,
        Classification::AboveUserLimit => "Load above your recommended limit",
        Classification::AboveDeviceLimit => "Load above the backpack's structural limit",
    };
    let description = format!(
        "Measured {:.2} kg, {:.2}% over the limit ({:.2} kg above).",
        measurement.weight_kg, eval.percent_of_limit, eval.margin_kg
    );
    Some(NewAlert {
        measurement_id: measurement.id,
        user_id: measurement.user_id,
        title: title.to_owned(),
        description,
        severity: Severity::Critical,
        status: AlertStatus::ToSend,
        created_at: now,
    })
}
