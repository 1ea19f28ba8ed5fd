//! Main entry point and CLI dispatch for switchback.
//!
//! Argument parsing happens in `args`; everything beyond dispatch is
//! delegated to the `Switchback` application coordinator.

use std::path::PathBuf;

use switchback::args::{CliAction, ParsedArgs, print_help, print_version};
use switchback::config;
use switchback::constants::EXIT_FAILURE;
use switchback::{Log, Switchback};

fn main() {
    let parsed = ParsedArgs::parse(std::env::args().skip(1));

    let result = match parsed.action {
        CliAction::Run {
            verbose,
            config_path,
        } => Switchback::new(verbose)
            .with_config_path(config_path.map(PathBuf::from))
            .run(),
        CliAction::Once {
            config_path,
            period,
        } => Switchback::new(true)
            .with_config_path(config_path.map(PathBuf::from))
            .without_lock()
            .run_once(period),
        CliAction::Test { config_path } => Switchback::new(true)
            .with_config_path(config_path.map(PathBuf::from))
            .without_lock()
            .run_test(),
        CliAction::Init { config_path } => init_config(config_path.map(PathBuf::from)),
        CliAction::ClearCache { config_path } => Switchback::new(true)
            .with_config_path(config_path.map(PathBuf::from))
            .without_lock()
            .run_clear_cache(),
        CliAction::ShowHelp => {
            print_help();
            return;
        }
        CliAction::ShowVersion => {
            print_version();
            return;
        }
        CliAction::ShowHelpDueToError(message) => {
            eprintln!("Error: {message}\n");
            print_help();
            std::process::exit(EXIT_FAILURE);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:?}");
        std::process::exit(EXIT_FAILURE);
    }
}

fn init_config(path: Option<PathBuf>) -> anyhow::Result<()> {
    let log = Log::new(true);
    let target = match path {
        Some(path) => path,
        None => config::default_config_path()?,
    };
    config::create_default_config(&target)?;
    log.decorated(format!(
        "Configuration template created at: {}",
        target.display()
    ));
    log.indented("Edit this file with your location and wallpaper paths.");
    Ok(())
}
