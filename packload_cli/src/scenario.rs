//! Scenario files: a JSON description of seed data plus a timeline of claim,
//! release, and sample events. Replaying one drives the whole pipeline
//! against the in-memory store, with the clock pinned to each event's own
//! timestamp.

use chrono::{DateTime, Utc};
use eyre::WrapErr;
use packload_core::{claim, ingest, release_by_device, release_by_user, ClaimOutcome, Sample};
use packload_store::MemStore;
use packload_traits::model::{Device, DeviceStatus, Side, User};
use packload_traits::Store;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub devices: Vec<DeviceSeed>,
    pub users: Vec<UserSeed>,
    #[serde(default)]
    pub links: Vec<LinkSeed>,
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
pub struct DeviceSeed {
    pub id: i64,
    pub code: String,
    pub max_load_kg: f64,
    #[serde(default = "default_status")]
    pub status: DeviceStatus,
}

fn default_status() -> DeviceStatus {
    DeviceStatus::Active
}

#[derive(Debug, Deserialize)]
pub struct UserSeed {
    pub id: i64,
    pub name: String,
    pub body_mass_kg: f64,
    #[serde(default)]
    pub limit_percent: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct LinkSeed {
    pub user: i64,
    pub device: String,
    #[serde(default = "default_nickname")]
    pub nickname: String,
}

fn default_nickname() -> String {
    "backpack".to_owned()
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Event {
    Claim {
        at: DateTime<Utc>,
        user: i64,
        device: String,
    },
    ReleaseUser {
        at: DateTime<Utc>,
        user: i64,
        device: String,
    },
    ReleaseDevice {
        at: DateTime<Utc>,
        device: String,
    },
    Sample {
        at: DateTime<Utc>,
        device: String,
        weight_kg: f64,
        #[serde(default = "default_side")]
        side: Side,
    },
}

fn default_side() -> Side {
    Side::Centre
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::Claim { at, .. }
            | Event::ReleaseUser { at, .. }
            | Event::ReleaseDevice { at, .. }
            | Event::Sample { at, .. } => *at,
        }
    }
}

/// Tally of what a replay did.
#[derive(Debug, Default, serde::Serialize)]
pub struct ReplaySummary {
    pub claims_assumed: usize,
    pub claims_held_by_other: usize,
    pub claims_idempotent: usize,
    pub releases: u64,
    pub measurements: usize,
    pub alerts: usize,
    pub resumptions: usize,
}

impl Scenario {
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read scenario {}", path.display()))?;
        let scenario: Scenario =
            serde_json::from_str(&raw).wrap_err("scenario file is not valid JSON")?;
        Ok(scenario)
    }

    /// Seed the store and apply every event in timestamp order.
    pub fn replay(
        &self,
        store: &MemStore,
        default_limit_percent: f64,
    ) -> eyre::Result<ReplaySummary> {
        for d in &self.devices {
            store.add_device(Device {
                id: d.id,
                code: d.code.clone(),
                max_load_kg: d.max_load_kg,
                status: d.status,
            })?;
        }
        for u in &self.users {
            store.add_user(User {
                id: u.id,
                name: u.name.clone(),
                body_mass_kg: u.body_mass_kg,
                limit_percent: u.limit_percent,
            })?;
        }
        for l in &self.links {
            let device = device_id(store, &l.device)?;
            store
                .create_link(l.user, device, &l.nickname)
                .map_err(|e| eyre::eyre!("seeding link failed: {e}"))?;
        }

        let mut ordered: Vec<&Event> = self.events.iter().collect();
        ordered.sort_by_key(|e| e.at());

        let mut summary = ReplaySummary::default();
        for event in ordered {
            match event {
                Event::Claim { at, user, device } => {
                    let device = device_id(store, device)?;
                    match claim(store, *user, device, *at)? {
                        ClaimOutcome::Assumed => summary.claims_assumed += 1,
                        ClaimOutcome::AlreadyHeldBySelf => summary.claims_idempotent += 1,
                        ClaimOutcome::HeldByOther => summary.claims_held_by_other += 1,
                    }
                }
                Event::ReleaseUser { at, user, device } => {
                    let device = device_id(store, device)?;
                    summary.releases += release_by_user(store, *user, device, *at)?;
                }
                Event::ReleaseDevice { at, device } => {
                    let device = device_id(store, device)?;
                    summary.releases += release_by_device(store, device, *at)?;
                }
                Event::Sample {
                    at,
                    device,
                    weight_kg,
                    side,
                } => {
                    let outcome = ingest(
                        store,
                        device,
                        Sample {
                            weight_kg: *weight_kg,
                            side: *side,
                        },
                        default_limit_percent,
                        *at,
                    )?;
                    summary.measurements += 1;
                    if outcome.alert.is_some() {
                        summary.alerts += 1;
                    }
                    if outcome.resumed {
                        summary.resumptions += 1;
                    }
                }
            }
        }
        info!(
            measurements = summary.measurements,
            alerts = summary.alerts,
            "scenario replayed"
        );
        Ok(summary)
    }

    /// Timestamp of the last event, for "trailing week" style reports.
    pub fn last_event_at(&self) -> Option<DateTime<Utc>> {
        self.events.iter().map(Event::at).max()
    }
}

pub fn device_id(store: &MemStore, code: &str) -> eyre::Result<i64> {
    let device = store
        .device_by_code(code)
        .map_err(|e| eyre::eyre!("store error: {e}"))?
        .ok_or_else(|| eyre::eyre!("unknown device code '{code}'"))?;
    Ok(device.id)
}
