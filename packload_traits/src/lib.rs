pub mod clock;
pub mod model;

pub use clock::{SystemClock, WallClock};

use chrono::{DateTime, Utc};

use crate::model::{
    Alert, AlertStatus, Device, DeviceId, Measurement, NewAlert, NewMeasurement, OwnershipLink,
    User, UserId,
};

/// Boxed error type crossing the collaborator boundary. Implementations keep
/// their own typed errors underneath; callers may downcast.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Persistence collaborator contract.
///
/// The core owns the ownership-link state transitions and the creation of
/// measurements and alerts; devices and users are read-only here. The single
/// synchronization primitive the core relies on is `try_claim`: a conditional
/// update that must be atomic with respect to concurrent claims on the same
/// device. `record_measurement` must apply the measurement insert and the
/// optional grace-window promotion as one unit (all or nothing).
pub trait Store {
    fn device_by_code(&self, code: &str) -> Result<Option<Device>, BoxedError>;

    fn user(&self, id: UserId) -> Result<Option<User>, BoxedError>;

    /// Ownership link for one (user, device) pair.
    fn link(&self, user: UserId, device: DeviceId) -> Result<Option<OwnershipLink>, BoxedError>;

    /// All links a user has registered, most recently ended first.
    fn links_for_user(&self, user: UserId) -> Result<Vec<OwnershipLink>, BoxedError>;

    /// The link currently in `Using` or `LastToUse` for a device, if any.
    /// When both exist (a new holder plus a not-yet-demoted grace window),
    /// the `Using` link wins.
    fn active_link(&self, device: DeviceId) -> Result<Option<OwnershipLink>, BoxedError>;

    /// Register a link in `NotUsing`. Fails if the pair is already linked.
    fn create_link(
        &self,
        user: UserId,
        device: DeviceId,
        nickname: &str,
    ) -> Result<OwnershipLink, BoxedError>;

    /// Remove a link. Returns false when no such link existed.
    fn remove_link(&self, user: UserId, device: DeviceId) -> Result<bool, BoxedError>;

    /// Change the user-facing nickname of an existing link.
    fn rename_link(
        &self,
        user: UserId,
        device: DeviceId,
        nickname: &str,
    ) -> Result<(), BoxedError>;

    /// Atomic conditional claim: transition the (user, device) link to `Using`
    /// (setting `started_at := now`, clearing `ended_at`) only if no other
    /// link for the device is `Using` at that instant. Returns whether the
    /// claim won. Check and set must be one atomic operation.
    fn try_claim(
        &self,
        user: UserId,
        device: DeviceId,
        now: DateTime<Utc>,
    ) -> Result<bool, BoxedError>;

    /// Demote every `LastToUse` link for the device, except the winner's, to
    /// `NotUsing` (they lost the grace window). Returns rows changed.
    fn demote_stale_grace(&self, device: DeviceId, winner: UserId) -> Result<u64, BoxedError>;

    /// Close the user's `Using`/`LastToUse` link on any *other* device
    /// (`ended_at := now`, state `NotUsing`). Returns rows changed.
    fn close_active_elsewhere(
        &self,
        user: UserId,
        except_device: DeviceId,
        now: DateTime<Utc>,
    ) -> Result<u64, BoxedError>;

    /// User-initiated release: `Using|LastToUse -> NotUsing` for the pair,
    /// `ended_at := now`. Returns rows changed (0 = no active session).
    fn release_by_user(
        &self,
        user: UserId,
        device: DeviceId,
        now: DateTime<Utc>,
    ) -> Result<u64, BoxedError>;

    /// Device-initiated release: `Using -> LastToUse` (the holder keeps resume
    /// priority), `ended_at := now`. Returns rows changed.
    fn release_by_device(&self, device: DeviceId, now: DateTime<Utc>) -> Result<u64, BoxedError>;

    /// Persist a measurement; when `promote` is set, also restore the owning
    /// link from `LastToUse` to `Using` in the same atomic unit.
    fn record_measurement(
        &self,
        measurement: NewMeasurement,
        promote: bool,
    ) -> Result<Measurement, BoxedError>;

    /// Append an alert row.
    fn create_alert(&self, alert: NewAlert) -> Result<Alert, BoxedError>;

    /// Measurement history for a pair, oldest first.
    fn measurements_for(
        &self,
        user: UserId,
        device: DeviceId,
    ) -> Result<Vec<Measurement>, BoxedError>;

    /// Measurement history restricted to `from <= taken_at < to`, oldest first.
    fn measurements_between(
        &self,
        user: UserId,
        device: DeviceId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Measurement>, BoxedError>;

    /// Heaviest and lightest measurement for a pair, if any exist.
    fn extreme_measurements(
        &self,
        user: UserId,
        device: DeviceId,
    ) -> Result<Option<(Measurement, Measurement)>, BoxedError>;

    /// Alerts addressed to a user, newest first, optionally filtered by
    /// delivery status.
    fn alerts_for_user(
        &self,
        user: UserId,
        status: Option<AlertStatus>,
    ) -> Result<Vec<Alert>, BoxedError>;
}
