//! Main application entry point.
//!
//! Parses the command line, configures console logging and dispatches to the
//! matching command in `dusklapse::commands`. Errors from any command end the
//! process with a non-zero exit code after being printed in the log style.

use dusklapse::args::{self, CliAction, ParsedArgs};
use dusklapse::commands;
use dusklapse::common::constants::{EXIT_FAILURE, EXIT_SUCCESS};
use dusklapse::common::logger::Log;
use dusklapse::log_error_exit;

fn main() {
    let parsed_args = ParsedArgs::from_env();

    let result = match parsed_args.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Run(common) => commands::run::handle_run_command(common),
        CliAction::Simulate { common, output } => {
            commands::simulate::handle_simulate_command(common, output)
        }
        CliAction::Probe { common, altitude } => {
            commands::probe::handle_probe_command(common, altitude)
        }
        CliAction::Exposures(common) => commands::exposures::handle_exposures_command(common),
    };

    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            Log::set_enabled(true);
            log_error_exit!("{e:#}");
            std::process::exit(EXIT_FAILURE);
        }
    }
}
