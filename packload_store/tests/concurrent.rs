//! Concurrency checks for the in-memory store: the conditional claim must
//! admit exactly one winner no matter how many threads race for the device.

use std::sync::Arc;
use std::thread;

use chrono::{TimeZone, Utc};
use packload_store::MemStore;
use packload_traits::Store;
use packload_traits::model::{Device, DeviceStatus, UsageState, User};

fn seeded(users: i64) -> MemStore {
    let store = MemStore::new();
    store
        .add_device(Device {
            id: 1,
            code: "PK-001".into(),
            max_load_kg: 12.0,
            status: DeviceStatus::Active,
        })
        .unwrap();
    for id in 1..=users {
        store
            .add_user(User {
                id,
                name: format!("user-{id}"),
                body_mass_kg: 55.0,
                limit_percent: None,
            })
            .unwrap();
        store.create_link(id, 1, "bag").unwrap();
    }
    store
}

#[test]
fn racing_claims_admit_exactly_one_winner() {
    let store = Arc::new(seeded(16));
    let now = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();

    let handles: Vec<_> = (1..=16)
        .map(|user| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.try_claim(user, 1, now).unwrap())
        })
        .collect();
    let wins = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();
    assert_eq!(wins, 1);

    let using = (1..=16)
        .filter(|&user| {
            store.link(user, 1).unwrap().unwrap().state == UsageState::Using
        })
        .count();
    assert_eq!(using, 1);
}

#[test]
fn claim_release_claim_cycles_never_overlap() {
    let store = Arc::new(seeded(4));
    let now = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();

    let handles: Vec<_> = (1..=4)
        .map(|user| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut wins = 0u32;
                for _ in 0..200 {
                    if store.try_claim(user, 1, now).unwrap() {
                        wins += 1;
                        // While held, nobody else may be Using.
                        let holders = (1..=4)
                            .filter(|&u| {
                                store.link(u, 1).unwrap().unwrap().state == UsageState::Using
                            })
                            .count();
                        assert_eq!(holders, 1);
                        store.release_by_user(user, 1, now).unwrap();
                    }
                }
                wins
            })
        })
        .collect();
    let total: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert!(total > 0);
}
