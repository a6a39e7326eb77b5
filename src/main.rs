mod cli;
mod config;
mod discovery;
mod error;
mod report;
mod run;
mod validate;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.no_color);

    // colored already honours NO_COLOR / CLICOLOR; the flag forces it off.
    if cli.no_color {
        colored::control::set_override(false);
    }
    let color = colored::control::SHOULD_COLORIZE.should_colorize();

    run::run(cli, color)
}

/// Logs go to stderr so stdout stays clean for `--output json`.
fn init_logging(verbose: bool, no_color: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .init();
}
