//! Lunaria action binary entry point.
//! Resolves settings, runs the action once and prints the outcome.

use clap::Parser;
use lunaria_action::cli::{Cli, Commands};
use lunaria_action::{action, config, output, utils};

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Run(args) => {
            let eff = config::resolve_effective(&args);
            match (&eff.settings_file, eff.settings_loaded) {
                (None, _) => utils::debug("No lunaria-action settings file found; using defaults."),
                (Some(p), false) => utils::notice(&format!(
                    "Ignoring {}: it could not be parsed; using defaults.",
                    p.display()
                )),
                (Some(_), true) => {}
            }
            match action::run(&eff) {
                Ok(outcome) => output::print_outcome(&outcome, &eff.output),
                Err(e) => {
                    // Everything that escapes the run fails the job once, here.
                    utils::set_failed(&e.to_string());
                    std::process::exit(1);
                }
            }
        }
    }
}
