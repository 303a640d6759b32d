//! Command-line argument parsing.
//!
//! Schedule and temperature flags produce a [`Config`] of overrides that is
//! merged over the configuration file. `--simulate` previews a time range
//! against a simulated clock instead of the wall clock.

use crate::config::Config;

/// What the binary should do.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the update loop on the wall clock.
    Run {
        config_path: Option<String>,
        overrides: Config,
    },
    /// Drive the scheduler over `[start, end]` on a simulated clock.
    Simulate {
        config_path: Option<String>,
        overrides: Config,
        start: String,
        end: String,
        /// Simulated seconds per real second, 0 to fast-forward.
        multiplier: f64,
    },
    ShowHelp,
    ShowVersion,
    /// Unknown flag or malformed value.
    ShowHelpDueToError,
}

pub struct ParsedArgs {
    pub action: CliAction,
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Option<T> {
    let Some(value) = value else {
        log_warning!("Missing value for {}", flag);
        return None;
    };
    let parsed = value.parse().ok();
    if parsed.is_none() {
        log_warning!("Invalid value for {}: {}", flag, value);
    }
    parsed
}

impl ParsedArgs {
    /// Parse arguments, including the program name in first position.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        if args.iter().any(|arg| arg == "--version" || arg == "-v") {
            return ParsedArgs {
                action: CliAction::ShowVersion,
            };
        }
        if args.iter().any(|arg| arg == "--help" || arg == "-h") {
            return ParsedArgs {
                action: CliAction::ShowHelp,
            };
        }

        let error = ParsedArgs {
            action: CliAction::ShowHelpDueToError,
        };
        let mut overrides = Config::default();
        let mut config_path = None;
        let mut simulate: Option<(String, String, f64)> = None;

        let mut idx = 0;
        while idx < args.len() {
            let flag = args[idx].as_str();
            let value = args.get(idx + 1);
            macro_rules! value_or_error {
                () => {
                    match parse_value(flag, value) {
                        Some(parsed) => parsed,
                        None => return error,
                    }
                };
            }
            match flag {
                "-c" | "--config" => config_path = Some(value_or_error!()),
                "-o" | "--output" => {
                    let output: String = value_or_error!();
                    overrides.outputs.get_or_insert_with(Vec::new).push(output);
                }
                "-t" | "--low-temp" => overrides.low_temp = Some(value_or_error!()),
                "-T" | "--high-temp" => overrides.high_temp = Some(value_or_error!()),
                "-l" | "--latitude" => overrides.latitude = Some(value_or_error!()),
                "-L" | "--longitude" => overrides.longitude = Some(value_or_error!()),
                "-S" | "--sunrise" => overrides.sunrise = Some(value_or_error!()),
                "-s" | "--sunset" => overrides.sunset = Some(value_or_error!()),
                "-d" | "--duration" => overrides.duration = Some(value_or_error!()),
                "-g" | "--gamma" => overrides.gamma = Some(value_or_error!()),
                "--simulate" => {
                    let (Some(start), Some(end)) = (args.get(idx + 1), args.get(idx + 2)) else {
                        log_warning!("--simulate requires a start and an end time");
                        return error;
                    };
                    let multiplier = args
                        .get(idx + 3)
                        .and_then(|m| m.parse::<f64>().ok())
                        .filter(|m| m.is_finite() && *m >= 0.0);
                    if multiplier.is_some() {
                        idx += 1;
                    }
                    simulate = Some((start.clone(), end.clone(), multiplier.unwrap_or(0.0)));
                    // start and end
                    idx += 3;
                    continue;
                }
                unknown => {
                    log_warning!("Unknown argument: {}", unknown);
                    return error;
                }
            }
            idx += 2;
        }

        let action = match simulate {
            Some((start, end, multiplier)) => CliAction::Simulate {
                config_path,
                overrides,
                start,
                end,
                multiplier,
            },
            None => CliAction::Run {
                config_path,
                overrides,
            },
        };
        ParsedArgs { action }
    }

    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

pub fn display_version_info() {
    log_version!();
    log_end!();
}

pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("sunshade [OPTIONS]");
    log_block_start!("Options:");
    log_indented!("-h, --help             Print help information");
    log_indented!("-v, --version          Print version information");
    log_indented!("-c, --config <file>    Use a specific configuration file");
    log_indented!("-o, --output <name>    Manage this output (repeatable, default all)");
    log_indented!("-t, --low-temp <K>     Night temperature");
    log_indented!("-T, --high-temp <K>    Day temperature");
    log_indented!("-l, --latitude <deg>   Latitude, positive north");
    log_indented!("-L, --longitude <deg>  Longitude, positive east");
    log_indented!("-S, --sunrise <HH:MM>  Manual sunrise time");
    log_indented!("-s, --sunset <HH:MM>   Manual sunset time");
    log_indented!("-d, --duration <sec>   Manual ramp duration");
    log_indented!("-g, --gamma <value>    Gamma exponent");
    log_indented!("--simulate <start> <end> [multiplier]");
    log_indented!("                       Preview a time range (YYYY-MM-DD HH:MM:SS);");
    log_indented!("                       multiplier 0 fast-forwards between updates");
    log_block_start!("Signals:");
    log_indented!("SIGUSR1                Cycle forced mode (off, high, low)");
    log_indented!("SIGINT, SIGTERM        Stop");
    log_end!();
}
