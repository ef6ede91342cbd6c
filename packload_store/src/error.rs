use thiserror::Error;

/// Typed store failures. Crossing the collaborator boundary these are boxed;
/// callers that care can downcast back to this type.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(&'static str),

    #[error("link already exists for this user and device")]
    DuplicateLink,

    #[error("store lock poisoned")]
    Poisoned,
}
