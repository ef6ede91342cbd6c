use chrono::{Duration, TimeZone, Utc};
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use packload_core::{describe, fit, weekday::day_loads};
use packload_traits::model::{Classification, Measurement, Side};

// Generate a synthetic strap history: a slow weekly cycle with white noise,
// one left/right pair every school-day morning.
fn synth_history(days: usize, noise_amp: f64, seed: u32) -> Vec<Measurement> {
    // tiny PRNG
    let mut state = seed.max(1);
    let mut next_f64 = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        f64::from(x) / (f64::from(u32::MAX) + 1.0)
    };
    let start = Utc.with_ymd_and_hms(2026, 3, 2, 11, 0, 0).unwrap();
    let mut out = Vec::with_capacity(days * 2);
    for day in 0..days {
        let t = day as f64 / 7.0;
        let base = 2.5 + (t * std::f64::consts::TAU).sin();
        for side in [Side::Left, Side::Right] {
            let noise = (next_f64() * 2.0 - 1.0) * noise_amp;
            out.push(Measurement {
                id: (day * 2) as i64,
                device_id: 1,
                user_id: 1,
                weight_kg: (base + noise).max(0.0),
                taken_at: start + Duration::days(day as i64),
                side,
                classification: Classification::WithinLimit,
                percent_of_limit: 0.0,
                margin_kg: 0.0,
            });
        }
    }
    out
}

pub fn bench_report_pipeline(c: &mut Criterion) {
    let mut g = c.benchmark_group("report_pipeline");
    // Allow quick tweaking without CLI flags (Criterion 0.5):
    //   BENCH_SAMPLE_SIZE=10 cargo bench -p packload_core --bench pipeline
    if let Ok(ss) = std::env::var("BENCH_SAMPLE_SIZE") {
        if let Ok(n) = ss.parse::<usize>() {
            g.sample_size(n.max(1));
        }
    } else {
        g.sample_size(50);
    }

    let tz = chrono::FixedOffset::west_opt(3 * 3600).unwrap();
    for &days in &[30usize, 365, 1825] {
        let history = synth_history(days, 0.4, 0xC0FFEE);
        g.bench_function(format!("day_loads_{days}d"), |b| {
            b.iter(|| black_box(day_loads(black_box(&history), tz)))
        });
        g.bench_function(format!("describe_fit_{days}d"), |b| {
            b.iter_batched(
                || {
                    day_loads(&history, tz)
                        .into_iter()
                        .map(|d| d.combined_kg)
                        .collect::<Vec<_>>()
                },
                |series| {
                    black_box(describe(black_box(&series)));
                    black_box(fit(black_box(&series)));
                },
                BatchSize::SmallInput,
            )
        });
    }
    g.finish();
}

criterion_group!(pipeline, bench_report_pipeline);
criterion_main!(pipeline);
