//! Command execution: scenario replay, report rendering, forecasting.

use chrono::NaiveDate;
use packload_core::convert::reference_offset;
use packload_traits::{SystemClock, WallClock};
use packload_core::{forecast, reports, Report};
use packload_store::MemStore;
use serde_json::json;

use crate::cli::{ReportWindow, JSON_MODE};
use crate::scenario::{device_id, Scenario};

fn json_mode() -> bool {
    JSON_MODE.get().copied().unwrap_or(false)
}

pub fn run_scenario(cfg: &packload_config::Config, scenario: &Scenario) -> eyre::Result<()> {
    let store = MemStore::new();
    let summary = scenario.replay(&store, cfg.limits.default_user_percent)?;
    if json_mode() {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!(
            "replayed {} events: {} claims assumed, {} lost, {} idempotent",
            scenario.events.len(),
            summary.claims_assumed,
            summary.claims_held_by_other,
            summary.claims_idempotent
        );
        println!(
            "{} measurements recorded ({} alerts, {} grace resumptions), {} links released",
            summary.measurements, summary.alerts, summary.resumptions, summary.releases
        );
    }
    Ok(())
}

pub fn run_report(
    cfg: &packload_config::Config,
    scenario: &Scenario,
    user: i64,
    device_code: &str,
    window: &ReportWindow,
) -> eyre::Result<()> {
    let store = MemStore::new();
    scenario.replay(&store, cfg.limits.default_user_percent)?;
    let device = device_id(&store, device_code)?;
    let tz = reference_offset(&cfg.time);

    if let ReportWindow::Extremes = window {
        match reports::extremes(&store, user, device)? {
            Some((heaviest, lightest)) if json_mode() => {
                println!(
                    "{}",
                    json!({ "heaviest": heaviest, "lightest": lightest })
                );
            }
            Some((heaviest, lightest)) => {
                println!(
                    "heaviest: {:.2} kg at {}",
                    heaviest.weight_kg, heaviest.taken_at
                );
                println!(
                    "lightest: {:.2} kg at {}",
                    lightest.weight_kg, lightest.taken_at
                );
            }
            None => println!("no measurements on record"),
        }
        return Ok(());
    }

    let report = match window {
        ReportWindow::Week => {
            let now = scenario
                .last_event_at()
                .unwrap_or_else(|| SystemClock.now());
            reports::last_seven_days(&store, user, device, now, tz)?
        }
        ReportWindow::Day { date } => reports::day_report(&store, user, device, *date, tz)?,
        ReportWindow::Month { year, month } => {
            reports::month_report(&store, user, device, *year, *month, tz)?
        }
        ReportWindow::Year { year } => reports::year_report(&store, user, device, *year, tz)?,
        ReportWindow::Range { from, to } => {
            reports::range_report(&store, user, device, *from, *to, tz)?
        }
        ReportWindow::Extremes => unreachable!("handled above"),
    };
    print_report(&report);
    Ok(())
}

fn print_report(report: &Report) {
    if json_mode() {
        println!(
            "{}",
            json!({
                "measurements": &report.measurements,
                "summary": report.summary.as_ref(),
                "trend": report.trend,
            })
        );
        return;
    }
    println!("{} measurements in window", report.measurements.len());
    if let Some(s) = &report.summary {
        println!(
            "mean {:.2} kg, median {:.2} kg, std dev {:.2} kg",
            s.mean, s.median, s.std_dev
        );
        println!("skewness {:.2}, excess kurtosis {:.2}", s.skewness, s.kurtosis);
        if s.modes.is_empty() {
            println!("no mode");
        } else {
            let modes: Vec<String> = s.modes.iter().map(|m| format!("{m:.2}")).collect();
            println!("mode(s): {} kg", modes.join(", "));
        }
    }
    if let Some(t) = &report.trend {
        println!("trend: {:+.2} kg per sample (intercept {:.2})", t.slope, t.intercept);
    }
}

pub fn run_forecast(
    cfg: &packload_config::Config,
    scenario: &Scenario,
    user: i64,
    device_code: &str,
    date: NaiveDate,
) -> eyre::Result<()> {
    let store = MemStore::new();
    scenario.replay(&store, cfg.limits.default_user_percent)?;
    let device = device_id(&store, device_code)?;
    let tz = reference_offset(&cfg.time);

    use packload_traits::Store;
    let history = store
        .measurements_for(user, device)
        .map_err(|e| eyre::eyre!("store error: {e}"))?;
    let result = forecast(&history, date, tz, &(&cfg.forecast).into());

    if json_mode() {
        println!(
            "{}",
            json!({
                "prediction": result.prediction.map(|p| json!({
                    "predicted_kg": p.predicted_kg,
                    "sample_size": p.sample_size,
                    "target_weekday": p.target_weekday.to_string(),
                })),
                "reason": result.reason,
                "stats": result.stats.as_ref(),
            })
        );
        return Ok(());
    }
    match &result.prediction {
        Some(p) => println!(
            "predicted load for {date} ({}): {:.2} kg from {} prior {}s",
            p.target_weekday, p.predicted_kg, p.sample_size, p.target_weekday
        ),
        None => println!(
            "no prediction for {date}: {}",
            result.reason.unwrap_or("no qualifying history")
        ),
    }
    if let Some(s) = &result.stats {
        println!(
            "same-weekday stats: mean {:.2} kg, std dev {:.2}, skewness {:.2}",
            s.mean, s.std_dev, s.skewness
        );
    }
    Ok(())
}
