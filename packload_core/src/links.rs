//! Registry operations on ownership links: pairing a user with a device by
//! its code, unpairing, renaming, and listing.

use packload_traits::model::{DeviceStatus, OwnershipLink, UserId};
use packload_traits::Store;
use tracing::info;

use crate::error::{map_store_error_dyn, CoreError};

/// Pair `user` with the device identified by `code`, under a nickname.
///
/// Only active devices accept new links; a pending or retired device is
/// reported as a conflict.
pub fn link_device<S: Store + ?Sized>(
    store: &S,
    user: UserId,
    code: &str,
    nickname: &str,
) -> Result<OwnershipLink, CoreError> {
    if nickname.trim().is_empty() {
        return Err(CoreError::Validation("nickname must not be empty".into()));
    }
    let device = store
        .device_by_code(code)
        .map_err(map_store_error_dyn)?
        .ok_or(CoreError::NotFound("device"))?;
    if device.status != DeviceStatus::Active {
        return Err(CoreError::Conflict("device is not active"));
    }
    store
        .user(user)
        .map_err(map_store_error_dyn)?
        .ok_or(CoreError::NotFound("user"))?;
    let link = store
        .create_link(user, device.id, nickname)
        .map_err(map_store_error_dyn)?;
    info!(user, device = device.id, "device linked");
    Ok(link)
}

/// Remove the pairing. Unknown pairs are reported as not found.
pub fn unlink_device<S: Store + ?Sized>(
    store: &S,
    user: UserId,
    code: &str,
) -> Result<(), CoreError> {
    let device = store
        .device_by_code(code)
        .map_err(map_store_error_dyn)?
        .ok_or(CoreError::NotFound("device"))?;
    if !store
        .remove_link(user, device.id)
        .map_err(map_store_error_dyn)?
    {
        return Err(CoreError::NotFound("ownership link"));
    }
    info!(user, device = device.id, "device unlinked");
    Ok(())
}

/// Change the nickname on an existing pairing. Like linking, this only
/// applies to active devices.
pub fn rename_link<S: Store + ?Sized>(
    store: &S,
    user: UserId,
    code: &str,
    nickname: &str,
) -> Result<(), CoreError> {
    if nickname.trim().is_empty() {
        return Err(CoreError::Validation("nickname must not be empty".into()));
    }
    let device = store
        .device_by_code(code)
        .map_err(map_store_error_dyn)?
        .ok_or(CoreError::NotFound("device"))?;
    if device.status != DeviceStatus::Active {
        return Err(CoreError::Conflict("device is not active"));
    }
    store
        .rename_link(user, device.id, nickname)
        .map_err(map_store_error_dyn)
}

/// All pairings a user has registered, most recently ended first.
pub fn list_links<S: Store + ?Sized>(
    store: &S,
    user: UserId,
) -> Result<Vec<OwnershipLink>, CoreError> {
    store.links_for_user(user).map_err(map_store_error_dyn)
}
