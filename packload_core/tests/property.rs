//! Property tests for the pure engines plus a threaded mutual-exclusion
//! check on the arbiter.

use std::sync::Arc;
use std::thread;

use chrono::{TimeZone, Utc};
use packload_core::{claim, describe, evaluate, fit, ClaimOutcome};
use packload_store::MemStore;
use packload_traits::model::{Classification, Device, DeviceStatus, Side, User};
use packload_traits::Store;
use proptest::prelude::*;

proptest! {
    #[test]
    fn classification_agrees_with_margin_sign(
        measured in 0.0f64..50.0,
        device_c in 0.5f64..50.0,
        user_c in 0.5f64..50.0,
    ) {
        let e = evaluate(measured, device_c, user_c, Side::Centre).unwrap();
        // Margins are rounded to 2 dp, so a hair over the ceiling may still
        // report 0.00; the sign never flips.
        prop_assert!(e.margin_kg >= 0.0);
        match e.classification {
            Classification::WithinLimit => prop_assert!(e.percent_of_limit <= 100.0),
            _ => prop_assert!(e.percent_of_limit >= 0.0),
        }
    }

    #[test]
    fn binding_ceiling_is_never_the_larger_one(
        measured in 0.0f64..50.0,
        device_c in 0.5f64..50.0,
        user_c in 0.5f64..50.0,
    ) {
        let e = evaluate(measured, device_c, user_c, Side::Centre).unwrap();
        if e.classification == Classification::AboveUserLimit {
            prop_assert!(user_c < device_c);
        }
        if e.classification == Classification::AboveDeviceLimit {
            prop_assert!(device_c <= user_c || measured > device_c);
        }
    }

    #[test]
    fn halving_never_relaxes_the_verdict(
        measured in 0.0f64..50.0,
        device_c in 0.5f64..50.0,
        user_c in 0.5f64..50.0,
    ) {
        let centre = evaluate(measured, device_c, user_c, Side::Centre).unwrap();
        let left = evaluate(measured, device_c, user_c, Side::Left).unwrap();
        // A reading within the halved ceiling is within the full one too.
        if left.classification == Classification::WithinLimit {
            prop_assert_eq!(centre.classification, Classification::WithinLimit);
        }
    }

    #[test]
    fn describe_mean_sits_between_min_and_max(
        series in prop::collection::vec(0.0f64..100.0, 1..50)
    ) {
        let s = describe(&series).unwrap();
        let min = series.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = series.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(s.mean >= min - 0.01 && s.mean <= max + 0.01);
        prop_assert!(s.median >= min - 0.01 && s.median <= max + 0.01);
        prop_assert!(s.std_dev >= 0.0);
    }

    #[test]
    fn fit_on_constant_series_is_flat(
        value in -100.0f64..100.0,
        len in 2usize..30,
    ) {
        let series = vec![value; len];
        let f = fit(&series).unwrap();
        prop_assert_eq!(f.slope, 0.0);
        prop_assert!((f.intercept - (value * 100.0).round() / 100.0).abs() < 1e-9);
    }
}

#[test]
fn n_concurrent_claims_admit_exactly_one() {
    const CLAIMANTS: i64 = 12;
    let store = Arc::new(MemStore::new());
    store
        .add_device(Device {
            id: 1,
            code: "PK-001".into(),
            max_load_kg: 10.0,
            status: DeviceStatus::Active,
        })
        .unwrap();
    for id in 1..=CLAIMANTS {
        store
            .add_user(User {
                id,
                name: format!("user-{id}"),
                body_mass_kg: 60.0,
                limit_percent: None,
            })
            .unwrap();
        store.create_link(id, 1, "bag").unwrap();
    }

    let now = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
    let outcomes: Vec<ClaimOutcome> = (1..=CLAIMANTS)
        .map(|user| {
            let store = Arc::clone(&store);
            thread::spawn(move || claim(&*store, user, 1, now).unwrap())
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect();

    let assumed = outcomes
        .iter()
        .filter(|o| **o == ClaimOutcome::Assumed)
        .count();
    let held = outcomes
        .iter()
        .filter(|o| **o == ClaimOutcome::HeldByOther)
        .count();
    assert_eq!(assumed, 1);
    assert_eq!(held, CLAIMANTS as usize - 1);
}
