//! Shared domain types used by the store seam and the core engines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type DeviceId = i64;
pub type MeasurementId = i64;
pub type AlertId = i64;

/// Lifecycle state of a registered device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    /// Registered but not yet commissioned.
    Pending,
    /// In service; may be claimed and may ingest measurements.
    Active,
    /// Decommissioned; history is kept but no new activity is accepted.
    Retired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    /// Human-facing pairing code, unique per device.
    pub code: String,
    /// Manufacturer-rated maximum load in kilograms.
    pub max_load_kg: f64,
    pub status: DeviceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub body_mass_kg: f64,
    /// Personal carrying limit as a percentage of body mass.
    /// `None` falls back to the configured default.
    pub limit_percent: Option<f64>,
}

/// Ownership state of a user/device link.
///
/// At most one link per device may be `Using` at any instant; the store
/// enforces this when granting a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UsageState {
    NotUsing,
    Using,
    /// The most recent holder after release; promoted back to `Using`
    /// when one of their measurements arrives.
    LastToUse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipLink {
    pub user_id: UserId,
    pub device_id: DeviceId,
    pub nickname: Option<String>,
    pub state: UsageState,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Which load cell(s) a reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Centre,
    Both,
}

/// Outcome of comparing a reading against the binding ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    WithinLimit,
    AboveUserLimit,
    AboveDeviceLimit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: MeasurementId,
    pub device_id: DeviceId,
    pub user_id: UserId,
    pub weight_kg: f64,
    pub taken_at: DateTime<Utc>,
    pub side: Side,
    pub classification: Classification,
    /// Reading as a percentage of the binding ceiling, rounded to 2 dp.
    pub percent_of_limit: f64,
    /// Headroom below the binding ceiling when within limit; kilograms of
    /// overage when above it. Rounded to 2 dp.
    pub margin_kg: f64,
}

/// A measurement ready to persist; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMeasurement {
    pub device_id: DeviceId,
    pub user_id: UserId,
    pub weight_kg: f64,
    pub taken_at: DateTime<Utc>,
    pub side: Side,
    pub classification: Classification,
    pub percent_of_limit: f64,
    pub margin_kg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Delivery state of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertStatus {
    ToSend,
    Sent,
    Read,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub measurement_id: MeasurementId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
}

/// An alert ready to persist; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlert {
    pub measurement_id: MeasurementId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
}
