//! Ownership arbiter.
//!
//! Maintains the one invariant everything else leans on: per device, at most
//! one linked user is in `Using` at any instant. The race between concurrent
//! claims is settled entirely by the store's conditional update; the arbiter
//! never does a read-then-write pair around the contended state.

use chrono::{DateTime, Utc};
use packload_traits::model::{DeviceId, UsageState, UserId};
use packload_traits::Store;
use tracing::{debug, info};

use crate::error::{map_store_error_dyn, CoreError};

/// Result of a claim attempt. Losing the race is an ordinary outcome, not an
/// error; retry policy belongs to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    Assumed,
    AlreadyHeldBySelf,
    HeldByOther,
}

/// Attempt to make `user` the current holder of `device`.
///
/// Requires an existing ownership link for the pair. On success the claim is
/// stamped with `now`, any other link still inside its grace window is
/// demoted, and the user's active claim on any other device is closed out; a
/// user holds at most one device at a time.
pub fn claim<S: Store + ?Sized>(
    store: &S,
    user: UserId,
    device: DeviceId,
    now: DateTime<Utc>,
) -> Result<ClaimOutcome, CoreError> {
    let link = store
        .link(user, device)
        .map_err(map_store_error_dyn)?
        .ok_or(CoreError::NotFound("ownership link"))?;

    // Fast paths that need no write at all.
    if link.state == UsageState::Using {
        debug!(user, device, "claim is idempotent, already held");
        return Ok(ClaimOutcome::AlreadyHeldBySelf);
    }
    if let Some(holder) = store.active_link(device).map_err(map_store_error_dyn)? {
        if holder.user_id != user && holder.state == UsageState::Using {
            return Ok(ClaimOutcome::HeldByOther);
        }
    }

    // The conditional update settles the race; a stale fast path above only
    // costs us a failed attempt here, never a double holder.
    if !store
        .try_claim(user, device, now)
        .map_err(map_store_error_dyn)?
    {
        return Ok(ClaimOutcome::HeldByOther);
    }

    let demoted = store
        .demote_stale_grace(device, user)
        .map_err(map_store_error_dyn)?;
    let closed = store
        .close_active_elsewhere(user, device, now)
        .map_err(map_store_error_dyn)?;
    info!(user, device, demoted, closed, "claim assumed");
    Ok(ClaimOutcome::Assumed)
}

/// User-initiated release. Returns the number of links closed; zero means
/// there was no active session, which is not an error.
pub fn release_by_user<S: Store + ?Sized>(
    store: &S,
    user: UserId,
    device: DeviceId,
    now: DateTime<Utc>,
) -> Result<u64, CoreError> {
    let closed = store
        .release_by_user(user, device, now)
        .map_err(map_store_error_dyn)?;
    if closed == 0 {
        debug!(user, device, "no active session to close");
    }
    Ok(closed)
}

/// Device-initiated release (the device itself reported end-of-session). The
/// holder moves to `LastToUse`, keeping priority to resume on their next
/// sample.
pub fn release_by_device<S: Store + ?Sized>(
    store: &S,
    device: DeviceId,
    now: DateTime<Utc>,
) -> Result<u64, CoreError> {
    let closed = store
        .release_by_device(device, now)
        .map_err(map_store_error_dyn)?;
    info!(device, closed, "device reported end of session");
    Ok(closed)
}
