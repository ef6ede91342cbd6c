use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum CoreError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(&'static str),
    #[error("conflict: {0}")]
    Conflict(&'static str),
    #[error("no active user holds this device")]
    NoActiveUser,
    #[error("storage error: {0}")]
    Storage(String),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;

/// Map a boxed store error into a typed `CoreError`, preserving the message.
///
/// With the `store-errors` feature enabled, known `StoreError` variants are
/// downcast and mapped precisely; anything else falls back to `Storage`.
pub fn map_store_error_dyn(e: packload_traits::BoxedError) -> CoreError {
    #[cfg(feature = "store-errors")]
    {
        if let Some(se) = e.downcast_ref::<packload_store::StoreError>() {
            return match se {
                packload_store::StoreError::NotFound(what) => CoreError::NotFound(what),
                packload_store::StoreError::DuplicateLink => {
                    CoreError::Conflict("link already exists for this user and device")
                }
                packload_store::StoreError::Poisoned => CoreError::Storage(se.to_string()),
            };
        }
    }
    CoreError::Storage(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_errors_map_to_storage() {
        let e: packload_traits::BoxedError = "disk on fire".into();
        assert!(matches!(map_store_error_dyn(e), CoreError::Storage(_)));
    }

    #[cfg(feature = "store-errors")]
    #[test]
    fn store_not_found_keeps_its_label() {
        let e: packload_traits::BoxedError =
            Box::new(packload_store::StoreError::NotFound("ownership link"));
        assert!(matches!(
            map_store_error_dyn(e),
            CoreError::NotFound("ownership link")
        ));
    }
}
