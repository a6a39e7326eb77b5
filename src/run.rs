use anyhow::Result;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::cli::Cli;
use crate::config::{Config, FailurePolicy};
use crate::discovery;
use crate::error::CheckError;
use crate::report::Reporter;
use crate::validate;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(cli: Cli, color: bool) -> Result<()> {
    let config = Config::load(&cli)?;
    debug!(path = %config.target.display(), policy = ?config.policy, "configuration");

    let mut reporter = Reporter::new(cli.output, color, io::stdout(), io::stderr());
    execute(&config, &mut reporter)
}

/// Resolve the configured target and check every candidate.
pub fn execute<O: Write, E: Write>(config: &Config, reporter: &mut Reporter<O, E>) -> Result<()> {
    let files = discovery::resolve(&config.target)?;

    if files.is_empty() {
        info!(path = %config.target.display(), "nothing to check");
        reporter.no_files(&config.target)?;
        return Ok(());
    }

    check_files(&files, config.policy, reporter)
}

// ---------------------------------------------------------------------------
// Validation loop
// ---------------------------------------------------------------------------

/// Validate `files` in order.
///
/// FailFast   – the first failure is returned as is; later files are skipped.
/// CollectAll – every file is checked, then `FilesFailed` is returned if any
///              of them was broken.
pub fn check_files<O: Write, E: Write>(
    files: &[PathBuf],
    policy: FailurePolicy,
    reporter: &mut Reporter<O, E>,
) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();
    let mut checked = 0;

    for file in files {
        reporter.validating(file)?;
        checked += 1;

        match validate::validate(file) {
            Ok(()) => reporter.passed(file)?,
            Err(e) => match policy {
                FailurePolicy::FailFast => {
                    reporter.failed(file, &e, false)?;
                    reporter.summary(checked, &[e.detail()])?;
                    return Err(e.into());
                }
                FailurePolicy::CollectAll => {
                    reporter.failed(file, &e, true)?;
                    errors.push(e.detail());
                }
            },
        }
    }

    reporter.summary(checked, &errors)?;

    if !errors.is_empty() {
        return Err(CheckError::FilesFailed {
            failed: errors.len(),
            checked,
        }
        .into());
    }

    Ok(())
}
