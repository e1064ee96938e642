//! Command-line argument parsing and processing.
//!
//! ```text
//! dusklapse [command] [options] [field=value ...]
//! ```
//!
//! Commands: `run` (default), `simulate`, `probe <altitude>`, `exposures`, `help`.
//! Any `field=value` argument overrides the matching configuration field for
//! this invocation only.

/// Settings shared by every command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonArgs {
    pub debug_enabled: bool,
    pub config_dir: Option<String>,
    /// `field=value` configuration overrides, in command-line order
    pub overrides: Vec<(String, String)>,
}

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run a capture session
    Run(CommonArgs),
    /// Write the session's simulated exposures as CSV
    Simulate {
        common: CommonArgs,
        output: Option<String>,
    },
    /// Show the exposure for a single sun altitude
    Probe { common: CommonArgs, altitude: f64 },
    /// Show the longest exposure per common focal length
    Exposures(CommonArgs),

    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    Run,
    Simulate,
    Probe,
    Exposures,
    Help,
}

impl ParsedArgs {
    /// Parse command-line arguments (program name first) into a structured result.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ParsedArgs {
            action: parse_action(args),
        }
    }

    /// Parse the process's own command line.
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("dusklapse [COMMAND] [OPTIONS] [field=value ...]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-h, --help             Print help information");
    log_indented!("-o, --output <file>    CSV file written by 'simulate'");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("run                    Run a capture session (default)");
    log_indented!("simulate               Write the session's exposures as CSV without a camera");
    log_indented!("probe <altitude>       Show phase and settings for one sun altitude");
    log_indented!("exposures              Longest untrailed exposure per focal length");
    log_indented!("help                   Print this message");
    log_block_start!("Overrides:");
    log_indented!("Any configuration field can be set for one run, for example:");
    log_indented!("dusklapse simulate mode=star_trails exposure=20 gap=1 iso=800");
    log_end!();
}

fn parse_action<I, S>(args: I) -> CliAction
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let args_vec: Vec<String> = args
        .into_iter()
        .skip(1)
        .map(|s| s.as_ref().to_string())
        .collect();

    let mut common = CommonArgs::default();
    let mut command: Option<Command> = None;
    let mut output: Option<String> = None;
    let mut altitude: Option<f64> = None;
    let mut display_help = false;
    let mut display_version = false;

    let mut idx = 0;
    while idx < args_vec.len() {
        let arg = args_vec[idx].as_str();
        match arg {
            "--debug" | "-d" => common.debug_enabled = true,
            "--help" | "-h" => display_help = true,
            "--version" | "-V" | "-v" => display_version = true,
            "--config" | "-c" => {
                idx += 1;
                match args_vec.get(idx) {
                    Some(dir) => common.config_dir = Some(dir.clone()),
                    None => return CliAction::ShowHelpDueToError,
                }
            }
            "--output" | "-o" => {
                idx += 1;
                match args_vec.get(idx) {
                    Some(path) => output = Some(path.clone()),
                    None => return CliAction::ShowHelpDueToError,
                }
            }
            // Altitudes may be negative, so probe's argument is read before flag handling
            _ if command == Some(Command::Probe) && altitude.is_none() => {
                match arg.parse::<f64>() {
                    Ok(value) if value.is_finite() => altitude = Some(value),
                    _ => return CliAction::ShowHelpDueToError,
                }
            }
            _ if arg.starts_with('-') => return CliAction::ShowHelpDueToError,
            _ => {
                if let Some((field, value)) = arg.split_once('=') {
                    if field.is_empty() {
                        return CliAction::ShowHelpDueToError;
                    }
                    common
                        .overrides
                        .push((field.trim().to_string(), value.trim().to_string()));
                } else if command.is_none() {
                    command = Some(match arg {
                        "run" => Command::Run,
                        "simulate" => Command::Simulate,
                        "probe" => Command::Probe,
                        "exposures" => Command::Exposures,
                        "help" => Command::Help,
                        _ => return CliAction::ShowHelpDueToError,
                    });
                } else {
                    return CliAction::ShowHelpDueToError;
                }
            }
        }
        idx += 1;
    }

    if display_version {
        return CliAction::ShowVersion;
    }
    if display_help || command == Some(Command::Help) {
        return CliAction::ShowHelp;
    }
    if output.is_some() && command != Some(Command::Simulate) {
        return CliAction::ShowHelpDueToError;
    }

    match command.unwrap_or(Command::Run) {
        Command::Run => CliAction::Run(common),
        Command::Simulate => CliAction::Simulate { common, output },
        Command::Probe => match altitude {
            Some(altitude) => CliAction::Probe { common, altitude },
            None => CliAction::ShowHelpDueToError,
        },
        Command::Exposures => CliAction::Exposures(common),
        Command::Help => CliAction::ShowHelp,
    }
}
