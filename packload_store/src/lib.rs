//! In-memory implementation of the persistence seam.
//!
//! `MemStore` keeps everything behind a single `Mutex`, so the conditional
//! claim and the measurement-plus-promotion write are atomic by construction.
//! It backs the scenario runner and the integration tests; a database-backed
//! store would implement the same trait with the claim guard expressed as a
//! conditional UPDATE.

#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    not(test),
    deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)
)]

pub mod error;

pub use error::StoreError;

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use packload_traits::model::{
    Alert, AlertId, AlertStatus, Device, DeviceId, Measurement, MeasurementId, NewAlert,
    NewMeasurement, OwnershipLink, UsageState, User, UserId,
};
use packload_traits::{BoxedError, Store};

#[derive(Debug, Default)]
struct Inner {
    devices: BTreeMap<DeviceId, Device>,
    users: BTreeMap<UserId, User>,
    links: BTreeMap<(UserId, DeviceId), OwnershipLink>,
    measurements: Vec<Measurement>,
    alerts: Vec<Alert>,
    next_measurement_id: MeasurementId,
    next_alert_id: AlertId,
}

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Seed a device. Existing entries with the same id are replaced.
    pub fn add_device(&self, device: Device) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.devices.insert(device.id, device);
        Ok(())
    }

    /// Seed a user. Existing entries with the same id are replaced.
    pub fn add_user(&self, user: User) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.users.insert(user.id, user);
        Ok(())
    }
}

impl Store for MemStore {
    fn device_by_code(&self, code: &str) -> Result<Option<Device>, BoxedError> {
        let inner = self.lock()?;
        Ok(inner.devices.values().find(|d| d.code == code).cloned())
    }

    fn user(&self, id: UserId) -> Result<Option<User>, BoxedError> {
        let inner = self.lock()?;
        Ok(inner.users.get(&id).cloned())
    }

    fn link(&self, user: UserId, device: DeviceId) -> Result<Option<OwnershipLink>, BoxedError> {
        let inner = self.lock()?;
        Ok(inner.links.get(&(user, device)).cloned())
    }

    fn links_for_user(&self, user: UserId) -> Result<Vec<OwnershipLink>, BoxedError> {
        let inner = self.lock()?;
        let mut out: Vec<OwnershipLink> = inner
            .links
            .values()
            .filter(|l| l.user_id == user)
            .cloned()
            .collect();
        // Most recently ended first; never-ended links sort last.
        out.sort_by(|a, b| b.ended_at.cmp(&a.ended_at));
        Ok(out)
    }

    fn active_link(&self, device: DeviceId) -> Result<Option<OwnershipLink>, BoxedError> {
        let inner = self.lock()?;
        // A Using holder always outranks a lingering grace window.
        Ok(inner
            .links
            .values()
            .find(|l| l.device_id == device && l.state == UsageState::Using)
            .or_else(|| {
                inner
                    .links
                    .values()
                    .find(|l| l.device_id == device && l.state == UsageState::LastToUse)
            })
            .cloned())
    }

    fn create_link(
        &self,
        user: UserId,
        device: DeviceId,
        nickname: &str,
    ) -> Result<OwnershipLink, BoxedError> {
        let mut inner = self.lock()?;
        if inner.links.contains_key(&(user, device)) {
            return Err(StoreError::DuplicateLink.into());
        }
        let link = OwnershipLink {
            user_id: user,
            device_id: device,
            nickname: Some(nickname.to_owned()),
            state: UsageState::NotUsing,
            started_at: None,
            ended_at: None,
        };
        inner.links.insert((user, device), link.clone());
        tracing::debug!(user, device, "link created");
        Ok(link)
    }

    fn remove_link(&self, user: UserId, device: DeviceId) -> Result<bool, BoxedError> {
        let mut inner = self.lock()?;
        Ok(inner.links.remove(&(user, device)).is_some())
    }

    fn rename_link(
        &self,
        user: UserId,
        device: DeviceId,
        nickname: &str,
    ) -> Result<(), BoxedError> {
        let mut inner = self.lock()?;
        let link = inner
            .links
            .get_mut(&(user, device))
            .ok_or(StoreError::NotFound("ownership link"))?;
        link.nickname = Some(nickname.to_owned());
        Ok(())
    }

    fn try_claim(
        &self,
        user: UserId,
        device: DeviceId,
        now: DateTime<Utc>,
    ) -> Result<bool, BoxedError> {
        let mut inner = self.lock()?;
        // Check and set under one lock: the whole point of this method.
        let taken = inner
            .links
            .values()
            .any(|l| l.device_id == device && l.user_id != user && l.state == UsageState::Using);
        if taken {
            return Ok(false);
        }
        let link = inner
            .links
            .get_mut(&(user, device))
            .ok_or(StoreError::NotFound("ownership link"))?;
        link.state = UsageState::Using;
        link.started_at = Some(now);
        link.ended_at = None;
        tracing::debug!(user, device, "claim granted");
        Ok(true)
    }

    fn demote_stale_grace(&self, device: DeviceId, winner: UserId) -> Result<u64, BoxedError> {
        let mut inner = self.lock()?;
        let mut changed = 0;
        for link in inner.links.values_mut() {
            if link.device_id == device
                && link.user_id != winner
                && link.state == UsageState::LastToUse
            {
                link.state = UsageState::NotUsing;
                changed += 1;
            }
        }
        Ok(changed)
    }

    fn close_active_elsewhere(
        &self,
        user: UserId,
        except_device: DeviceId,
        now: DateTime<Utc>,
    ) -> Result<u64, BoxedError> {
        let mut inner = self.lock()?;
        let mut changed = 0;
        for link in inner.links.values_mut() {
            if link.user_id == user
                && link.device_id != except_device
                && matches!(link.state, UsageState::Using | UsageState::LastToUse)
            {
                link.state = UsageState::NotUsing;
                link.ended_at = Some(now);
                changed += 1;
            }
        }
        Ok(changed)
    }

    fn release_by_user(
        &self,
        user: UserId,
        device: DeviceId,
        now: DateTime<Utc>,
    ) -> Result<u64, BoxedError> {
        let mut inner = self.lock()?;
        let Some(link) = inner.links.get_mut(&(user, device)) else {
            return Ok(0);
        };
        if !matches!(link.state, UsageState::Using | UsageState::LastToUse) {
            return Ok(0);
        }
        link.state = UsageState::NotUsing;
        link.ended_at = Some(now);
        Ok(1)
    }

    fn release_by_device(&self, device: DeviceId, now: DateTime<Utc>) -> Result<u64, BoxedError> {
        let mut inner = self.lock()?;
        let mut changed = 0;
        for link in inner.links.values_mut() {
            if link.device_id == device && link.state == UsageState::Using {
                link.state = UsageState::LastToUse;
                link.ended_at = Some(now);
                changed += 1;
            }
        }
        Ok(changed)
    }

    fn record_measurement(
        &self,
        measurement: NewMeasurement,
        promote: bool,
    ) -> Result<Measurement, BoxedError> {
        let mut inner = self.lock()?;
        if promote {
            let key = (measurement.user_id, measurement.device_id);
            // Same guard as try_claim: a grace window that lost the device to
            // a new holder must not be promoted into a second Using link.
            let taken = inner.links.values().any(|l| {
                l.device_id == measurement.device_id
                    && l.user_id != measurement.user_id
                    && l.state == UsageState::Using
            });
            let link = inner
                .links
                .get_mut(&key)
                .ok_or(StoreError::NotFound("ownership link"))?;
            if !taken && link.state == UsageState::LastToUse {
                link.state = UsageState::Using;
                link.started_at = Some(measurement.taken_at);
                link.ended_at = None;
            }
        }
        inner.next_measurement_id += 1;
        let stored = Measurement {
            id: inner.next_measurement_id,
            device_id: measurement.device_id,
            user_id: measurement.user_id,
            weight_kg: measurement.weight_kg,
            taken_at: measurement.taken_at,
            side: measurement.side,
            classification: measurement.classification,
            percent_of_limit: measurement.percent_of_limit,
            margin_kg: measurement.margin_kg,
        };
        inner.measurements.push(stored.clone());
        Ok(stored)
    }

    fn create_alert(&self, alert: NewAlert) -> Result<Alert, BoxedError> {
        let mut inner = self.lock()?;
        inner.next_alert_id += 1;
        let stored = Alert {
            id: inner.next_alert_id,
            measurement_id: alert.measurement_id,
            user_id: alert.user_id,
            title: alert.title,
            description: alert.description,
            severity: alert.severity,
            status: alert.status,
            created_at: alert.created_at,
        };
        inner.alerts.push(stored.clone());
        Ok(stored)
    }

    fn measurements_for(
        &self,
        user: UserId,
        device: DeviceId,
    ) -> Result<Vec<Measurement>, BoxedError> {
        let inner = self.lock()?;
        let mut out: Vec<Measurement> = inner
            .measurements
            .iter()
            .filter(|m| m.user_id == user && m.device_id == device)
            .cloned()
            .collect();
        out.sort_by_key(|m| m.taken_at);
        Ok(out)
    }

    fn measurements_between(
        &self,
        user: UserId,
        device: DeviceId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Measurement>, BoxedError> {
        let inner = self.lock()?;
        let mut out: Vec<Measurement> = inner
            .measurements
            .iter()
            .filter(|m| {
                m.user_id == user
                    && m.device_id == device
                    && m.taken_at >= from
                    && m.taken_at < to
            })
            .cloned()
            .collect();
        out.sort_by_key(|m| m.taken_at);
        Ok(out)
    }

    fn extreme_measurements(
        &self,
        user: UserId,
        device: DeviceId,
    ) -> Result<Option<(Measurement, Measurement)>, BoxedError> {
        let inner = self.lock()?;
        let mut heaviest: Option<&Measurement> = None;
        let mut lightest: Option<&Measurement> = None;
        for m in inner
            .measurements
            .iter()
            .filter(|m| m.user_id == user && m.device_id == device)
        {
            match heaviest {
                Some(h) if h.weight_kg.total_cmp(&m.weight_kg).is_ge() => {}
                _ => heaviest = Some(m),
            }
            match lightest {
                Some(l) if l.weight_kg.total_cmp(&m.weight_kg).is_le() => {}
                _ => lightest = Some(m),
            }
        }
        Ok(heaviest.zip(lightest).map(|(h, l)| (h.clone(), l.clone())))
    }

    fn alerts_for_user(
        &self,
        user: UserId,
        status: Option<AlertStatus>,
    ) -> Result<Vec<Alert>, BoxedError> {
        let inner = self.lock()?;
        Ok(inner
            .alerts
            .iter()
            .rev()
            .filter(|a| a.user_id == user && status.is_none_or(|s| a.status == s))
            .cloned()
            .collect())
    }
}
