//! Boxes CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use boxes::BoxesError;
use boxes_cli::{Args, error_adapter::to_reportable};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting Boxes");
    debug!(args:?; "Parsed arguments");

    match boxes_cli::run(&args) {
        Ok(()) => info!("Completed successfully"),
        Err(BoxesError::Validation(errors)) => {
            eprintln!("Validation errors:");
            for err in &errors {
                eprintln!("  - {err}");
            }
            process::exit(1);
        }
        Err(err) => {
            let reporter = miette::GraphicalReportHandler::new();
            let mut writer = String::new();
            reporter
                .render_report(&mut writer, &to_reportable(&err))
                .expect("Writing to String buffer is infallible");
            error!("{writer}");
            process::exit(1);
        }
    }
}
