//! Human-readable error descriptions and structured JSON error formatting.

use packload_core::CoreError;

/// Map an eyre::Report to a human-readable explanation with likely causes
/// and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(ce) = err.downcast_ref::<CoreError>() {
        return match ce {
            CoreError::NoActiveUser => {
                "What happened: A sample arrived but nobody currently holds the device.\nLikely causes: The holder released the backpack, or no claim was ever made.\nHow to fix: Claim the device before sampling, or check the event order in the scenario.".to_string()
            }
            CoreError::NotFound(what) => format!(
                "What happened: A referenced {what} does not exist.\nLikely causes: Typo in an id or device code, or missing seed data.\nHow to fix: Check the scenario's devices/users/links sections."
            ),
            CoreError::Conflict(msg) => format!(
                "What happened: The operation conflicts with current state ({msg}).\nLikely causes: Duplicate pairing, or a retired/pending device.\nHow to fix: Adjust the scenario or pick a different device."
            ),
            CoreError::Validation(msg) => format!(
                "What happened: Invalid input ({msg}).\nLikely causes: Out-of-range weight or malformed value in the scenario.\nHow to fix: Correct the offending field and rerun."
            ),
            CoreError::Storage(msg) => format!(
                "What happened: The store failed ({msg}).\nHow to fix: Re-run with --log-level=debug for details."
            ),
        };
    }

    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();
    if lower.contains("scenario") && lower.contains("json") {
        return "What happened: The scenario file could not be parsed.\nLikely causes: Malformed JSON or an unknown event kind.\nHow to fix: Validate the file; event kinds are claim, release-user, release-device, sample.".to_string();
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes per error class; unknown errors return 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if let Some(ce) = err.downcast_ref::<CoreError>() {
        return match ce {
            CoreError::Validation(_) => 2,
            CoreError::NotFound(_) => 3,
            CoreError::Conflict(_) => 4,
            CoreError::NoActiveUser => 5,
            CoreError::Storage(_) => 6,
        };
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let reason = match err.downcast_ref::<CoreError>() {
        Some(CoreError::Validation(_)) => "Validation",
        Some(CoreError::NotFound(_)) => "NotFound",
        Some(CoreError::Conflict(_)) => "Conflict",
        Some(CoreError::NoActiveUser) => "NoActiveUser",
        Some(CoreError::Storage(_)) => "Storage",
        None => "Error",
    };
    json!({ "reason": reason, "message": humanize(err) }).to_string()
}
