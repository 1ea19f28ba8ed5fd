//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a
//! clean interface for the main dispatch. It supports the standard help,
//! version and verbose flags while gracefully handling unknown options.

use crate::transition::Period;

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the daemon with these settings.
    Run {
        verbose: bool,
        config_path: Option<String>,
    },
    /// Set the wallpaper once and exit.
    Once {
        config_path: Option<String>,
        period: Option<Period>,
    },
    /// Show the current period and next transition, then exit.
    Test { config_path: Option<String> },
    /// Generate a configuration template.
    Init { config_path: Option<String> },
    /// Delete every cached blend.
    ClearCache { config_path: Option<String> },

    /// Display help information and exit.
    ShowHelp,
    /// Display version information and exit.
    ShowVersion,
    /// Show help due to unknown arguments and exit with failure.
    ShowHelpDueToError(String),
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured action.
    ///
    /// # Arguments
    /// * `args` - Iterator over arguments, excluding the program name
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut verbose = false;
        let mut config_path: Option<String> = None;
        let mut command: Option<String> = None;
        let mut period: Option<Period> = None;

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            let arg = arg.as_ref();
            match arg {
                "--help" | "-h" => return ParsedArgs { action: CliAction::ShowHelp },
                "--version" | "-V" => return ParsedArgs { action: CliAction::ShowVersion },
                "--verbose" | "-v" => verbose = true,
                "--config" | "-c" => match iter.next() {
                    Some(path) => config_path = Some(path.as_ref().to_string()),
                    None => {
                        return ParsedArgs {
                            action: CliAction::ShowHelpDueToError(
                                "--config requires a path".to_string(),
                            ),
                        };
                    }
                },
                "--period" => match iter.next().and_then(|p| Period::from_name(p.as_ref())) {
                    Some(parsed) => period = Some(parsed),
                    None => {
                        return ParsedArgs {
                            action: CliAction::ShowHelpDueToError(
                                "--period requires one of: night, morning, afternoon"
                                    .to_string(),
                            ),
                        };
                    }
                },
                "run" | "once" | "test" | "init" | "clear-cache" if command.is_none() => {
                    command = Some(arg.to_string());
                }
                unknown => {
                    return ParsedArgs {
                        action: CliAction::ShowHelpDueToError(format!(
                            "Unknown argument: {unknown}"
                        )),
                    };
                }
            }
        }

        if period.is_some() && command.as_deref() != Some("once") {
            return ParsedArgs {
                action: CliAction::ShowHelpDueToError(
                    "--period is only valid with the 'once' command".to_string(),
                ),
            };
        }

        let action = match command.as_deref() {
            None | Some("run") => CliAction::Run {
                verbose,
                config_path,
            },
            Some("once") => CliAction::Once {
                config_path,
                period,
            },
            Some("test") => CliAction::Test { config_path },
            Some("init") => CliAction::Init { config_path },
            Some("clear-cache") => CliAction::ClearCache { config_path },
            Some(_) => unreachable!("command matched above"),
        };

        ParsedArgs { action }
    }
}

/// Print usage information.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!("switchback v{version} - Solar-based dynamic wallpaper switcher");
    println!();
    println!("Usage: switchback [OPTIONS] [COMMAND]");
    println!();
    println!("Commands:");
    println!("  run               Run the daemon (default)");
    println!("  once              Set the wallpaper once and exit");
    println!("  test              Show current period and next transition");
    println!("  init              Generate a configuration template");
    println!("  clear-cache       Delete every cached blend");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>    Path to configuration file");
    println!("      --period <PERIOD>  Period for 'once': night, morning, afternoon");
    println!("  -v, --verbose          Enable verbose logging");
    println!("  -h, --help             Print help");
    println!("  -V, --version          Print version");
}

/// Print the version line.
pub fn print_version() {
    println!("switchback v{}", env!("CARGO_PKG_VERSION"));
}
