//! Command line front end for sunshade.
//!
//! Both modes run the full update loop, submitting ramps to an in-memory
//! preview output.
//!
//! - Without `--simulate`: follow the wall clock until SIGINT or SIGTERM.
//!   SIGUSR1 cycles the forced mode.
//! - With `--simulate`: run over a time range on a simulated clock.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use std::path::Path;
use std::sync::Arc;

use sunshade::args::{CliAction, ParsedArgs, display_help, display_version_info};
use sunshade::backend::DryRunBackend;
use sunshade::common::constants::{EXIT_FAILURE, PREVIEW_OUTPUT_NAME, PREVIEW_RAMP_SIZE};
use sunshade::common::utils::Timestamp;
use sunshade::config::{self, Config};
use sunshade::core::outputs::OutputRegistry;
use sunshade::core::period::Scheduler;
use sunshade::core::{Core, CoreParams};
use sunshade::signals::setup_signal_handler;
use sunshade::time_source::{self, RealTimeSource, SimulatedTimeSource, parse_datetime};
use sunshade::{log_block_start, log_end, log_error_exit, log_indented, log_version};

fn main() {
    let result = match ParsedArgs::from_env().action {
        CliAction::ShowHelp => {
            display_help();
            Ok(())
        }
        CliAction::ShowVersion => {
            display_version_info();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Run {
            config_path,
            overrides,
        } => run(config_path, overrides),
        CliAction::Simulate {
            config_path,
            overrides,
            start,
            end,
            multiplier,
        } => simulate(config_path, overrides, &start, &end, multiplier),
    };

    if let Err(e) = result {
        log_error_exit!("{:#}", e);
        log_end!();
        std::process::exit(EXIT_FAILURE);
    }
}

fn load_config(config_path: Option<String>, overrides: Config) -> Result<Config> {
    let file = match config_path {
        Some(path) => config::load_from_path(Path::new(&path))?,
        None => config::load()?,
    };
    Ok(file.merge(overrides))
}

/// Local timezone offset east of UTC at `at`, in seconds.
fn local_utc_offset(at: Timestamp) -> i64 {
    DateTime::<Utc>::from_timestamp(at, 0)
        .map(|t| t.with_timezone(&Local).offset().local_minus_utc() as i64)
        .unwrap_or(0)
}

/// Core writing to a single preview output through the dry-run backend.
fn preview_core(config: &Config, start: Timestamp) -> Result<Core<DryRunBackend>> {
    let settings = config
        .to_settings(local_utc_offset(start))
        .context("Invalid configuration")?;

    let mut outputs = OutputRegistry::new(config.outputs().to_vec());
    let preview_name = config
        .outputs()
        .first()
        .map(String::as_str)
        .unwrap_or(PREVIEW_OUTPUT_NAME);
    outputs.add(0);
    outputs.set_name(0, preview_name);
    outputs.set_ramp_size(0, PREVIEW_RAMP_SIZE);

    Ok(Core::new(CoreParams {
        scheduler: Scheduler::new(settings, start),
        outputs,
        backend: DryRunBackend::new(true),
    }))
}

fn run(config_path: Option<String>, overrides: Config) -> Result<()> {
    log_version!();
    let config = load_config(config_path, overrides)?;
    config.log_config();

    let mut core = preview_core(&config, time_source::now())?;
    log_block_start!(
        "Current temperature: {}K",
        core.scheduler().current_temperature()
    );
    log_indented!("Phase: {}", core.scheduler().phase().display_name());

    let signals = setup_signal_handler()?;
    core.run(&RealTimeSource, &signals)?;
    log_end!();
    Ok(())
}

fn simulate(
    config_path: Option<String>,
    overrides: Config,
    start: &str,
    end: &str,
    multiplier: f64,
) -> Result<()> {
    let start = parse_datetime(start)?;
    let end = parse_datetime(end)?;
    let source = Arc::new(SimulatedTimeSource::new(start, end, multiplier)?);
    time_source::init_time_source(source.clone());

    log_version!();
    let config = load_config(config_path, overrides)?;
    config.log_config();

    let mut core = preview_core(&config, start)?;
    let signals = setup_signal_handler()?;
    core.run(source.as_ref(), &signals)?;

    log_block_start!(
        "Simulation finished: {} ramps applied",
        core.backend().applied().len()
    );
    log_end!();
    Ok(())
}
