//! `packload` binary: config loading, logging setup, command dispatch.

mod cli;
mod error_fmt;
mod run;
mod scenario;

use clap::Parser;
use cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use error_fmt::{exit_code_for_error, format_error_json, humanize};
use eyre::WrapErr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging(args: &Cli, logging: &packload_config::Logging) {
    let level = logging.level.as_deref().unwrap_or(&args.log_level);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = logging.file.as_deref().map(|path| {
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(".", path),
            Some("hourly") => tracing_appender::rolling::hourly(".", path),
            _ => tracing_appender::rolling::never(".", path),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .with_ansi(false)
    });

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    if args.json {
        let _ = registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init();
    } else {
        let _ = registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init();
    }
}

fn main() {
    let args = Cli::parse();
    let _ = JSON_MODE.set(args.json);
    if color_eyre::install().is_err() {
        tracing::debug!("error report hook already installed");
    }

    match try_main(&args) {
        Ok(()) => {}
        Err(err) => {
            if args.json {
                eprintln!("{}", format_error_json(&err));
            } else {
                eprintln!("{}", humanize(&err));
            }
            std::process::exit(exit_code_for_error(&err));
        }
    }
}

fn try_main(args: &Cli) -> eyre::Result<()> {
    let cfg = if args.config.exists() {
        packload_config::Config::load(&args.config)
            .wrap_err_with(|| format!("invalid config {}", args.config.display()))?
    } else {
        packload_config::Config::default()
    };
    init_logging(args, &cfg.logging);

    match &args.cmd {
        Commands::Run { scenario } => {
            let scenario = scenario::Scenario::load(scenario)?;
            run::run_scenario(&cfg, &scenario)
        }
        Commands::Report {
            scenario,
            user,
            device,
            window,
        } => {
            let scenario = scenario::Scenario::load(scenario)?;
            run::run_report(&cfg, &scenario, *user, device, window)
        }
        Commands::Forecast {
            scenario,
            user,
            device,
            date,
        } => {
            let scenario = scenario::Scenario::load(scenario)?;
            run::run_forecast(&cfg, &scenario, *user, device, *date)
        }
        Commands::SelfCheck => {
            cfg.validate()?;
            if args.json {
                println!("{}", serde_json::json!({ "status": "ok" }));
            } else {
                println!("config ok");
            }
            Ok(())
        }
    }
}
