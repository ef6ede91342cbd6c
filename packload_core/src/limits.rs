//! Weight limit calculator.
//!
//! Pure classification of one reading against the two safety ceilings: the
//! device's structural maximum and the user's recommended personal load. No
//! state, no clock, no store.

use packload_traits::model::{Classification, Side, User};

use crate::error::CoreError;
use crate::util::round2;

/// Fallback personal limit: percentage of body mass applied when the user has
/// not set one of their own.
pub const DEFAULT_LIMIT_PERCENT: f64 = 10.0;

/// The user's personal ceiling in kg, derived from body mass and their limit
/// percentage (or `default_percent` when unset).
#[must_use]
pub fn user_ceiling_kg(user: &User, default_percent: f64) -> f64 {
    let percent = user.limit_percent.unwrap_or(default_percent);
    user.body_mass_kg * percent / 100.0
}

/// Outcome of evaluating one reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub classification: Classification,
    /// Fullness of the binding ceiling when within limit (0..=100); percent
    /// *over* the ceiling when above it. Rounded to 2 dp.
    pub percent_of_limit: f64,
    /// Headroom left when within limit; overage when above. Rounded to 2 dp.
    pub margin_kg: f64,
}

/// Classify one reading against the device and user ceilings.
///
/// Left and right strap readings are compared against half of each ceiling,
/// since each strap carries half the budget. The smaller post-halving ceiling
/// binds; a reading exactly equal to it is still within limit. When the two
/// ceilings are equal the device's is taken as binding.
pub fn evaluate(
    measured_kg: f64,
    device_ceiling_kg: f64,
    user_ceiling_kg: f64,
    side: Side,
) -> Result<Evaluation, CoreError> {
    if !measured_kg.is_finite() || measured_kg < 0.0 {
        return Err(CoreError::Validation(format!(
            "measured weight must be finite and non-negative, got {measured_kg}"
        )));
    }
    for (label, ceiling) in [
        ("device ceiling", device_ceiling_kg),
        ("user ceiling", user_ceiling_kg),
    ] {
        if !ceiling.is_finite() || ceiling <= 0.0 {
            return Err(CoreError::Validation(format!(
                "{label} must be finite and strictly positive, got {ceiling}"
            )));
        }
    }

    let halve = matches!(side, Side::Left | Side::Right);
    let device_c = if halve {
        device_ceiling_kg / 2.0
    } else {
        device_ceiling_kg
    };
    let user_c = if halve {
        user_ceiling_kg / 2.0
    } else {
        user_ceiling_kg
    };

    let (binding, over_class) = if user_c < device_c {
        (user_c, Classification::AboveUserLimit)
    } else {
        (device_c, Classification::AboveDeviceLimit)
    };

    let eval = if measured_kg > binding {
        Evaluation {
            classification: over_class,
            percent_of_limit: round2(measured_kg / binding * 100.0 - 100.0),
            margin_kg: round2(measured_kg - binding),
        }
    } else {
        Evaluation {
            classification: Classification::WithinLimit,
            percent_of_limit: round2(measured_kg / binding * 100.0),
            margin_kg: round2(binding - measured_kg),
        }
    };
    Ok(eval)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_at_binding_ceiling_is_within_limit() {
        let e = evaluate(6.0, 10.0, 6.0, Side::Centre).unwrap();
        assert_eq!(e.classification, Classification::WithinLimit);
        assert_eq!(e.percent_of_limit, 100.0);
        assert_eq!(e.margin_kg, 0.0);
    }

    #[test]
    fn user_ceiling_binds_when_smaller() {
        let e = evaluate(7.0, 10.0, 6.0, Side::Centre).unwrap();
        assert_eq!(e.classification, Classification::AboveUserLimit);
        assert_eq!(e.percent_of_limit, 16.67);
        assert_eq!(e.margin_kg, 1.0);
    }

    #[test]
    fn device_ceiling_binds_when_smaller_or_equal() {
        let e = evaluate(11.0, 10.0, 12.0, Side::Centre).unwrap();
        assert_eq!(e.classification, Classification::AboveDeviceLimit);

        // Equal ceilings: device wins the tie.
        let e = evaluate(9.0, 8.0, 8.0, Side::Centre).unwrap();
        assert_eq!(e.classification, Classification::AboveDeviceLimit);
    }

    #[test]
    fn strap_side_halves_both_ceilings() {
        let centre = evaluate(4.0, 10.0, 8.0, Side::Centre).unwrap();
        assert_eq!(centre.classification, Classification::WithinLimit);

        let left = evaluate(4.0, 10.0, 8.0, Side::Left).unwrap();
        assert_eq!(left.classification, Classification::WithinLimit);
        assert_eq!(left.percent_of_limit, 100.0); // 4.0 against 8.0 / 2

        let left_over = evaluate(4.5, 10.0, 8.0, Side::Left).unwrap();
        assert_eq!(left_over.classification, Classification::AboveUserLimit);
    }

    #[test]
    fn within_limit_reports_headroom() {
        let e = evaluate(4.5, 10.0, 6.0, Side::Centre).unwrap();
        assert_eq!(e.classification, Classification::WithinLimit);
        assert_eq!(e.percent_of_limit, 75.0);
        assert_eq!(e.margin_kg, 1.5);
    }

    #[test]
    fn bad_inputs_are_validation_errors() {
        assert!(evaluate(-1.0, 10.0, 6.0, Side::Centre).is_err());
        assert!(evaluate(f64::NAN, 10.0, 6.0, Side::Centre).is_err());
        assert!(evaluate(5.0, 0.0, 6.0, Side::Centre).is_err());
        assert!(evaluate(5.0, 10.0, f64::INFINITY, Side::Centre).is_err());
    }

    #[test]
    fn user_ceiling_defaults_to_ten_percent_of_body_mass() {
        let user = User {
            id: 1,
            name: "ana".into(),
            body_mass_kg: 60.0,
            limit_percent: None,
        };
        assert_eq!(user_ceiling_kg(&user, DEFAULT_LIMIT_PERCENT), 6.0);

        let user = User {
            limit_percent: Some(15.0),
            ..user
        };
        assert_eq!(user_ceiling_kg(&user, DEFAULT_LIMIT_PERCENT), 9.0);
    }
}
