use anyhow::Result;
use colored::Colorize;
use serde_json::{Value, json};
use std::io::Write;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::error::CheckError;

pub const NO_FILES: &str = "No workflow files found";
pub const ALL_OK: &str = "All workflow YAML files parsed successfully.";
pub const PARSE_ERROR: &str = "YAML parse error in:";

/// Console output for a run.
///
/// Text – `Validating <path>` per file on stdout, one `YAML parse error in:`
///        line per failure on stderr.
/// JSON – one record per event on stdout; the stderr failure line is kept so
///        CI logs still name the broken file.
pub struct Reporter<O: Write, E: Write> {
    format: OutputFormat,
    color: bool,
    out: O,
    err: E,
}

impl<O: Write, E: Write> Reporter<O, E> {
    pub fn new(format: OutputFormat, color: bool, out: O, err: E) -> Self {
        Self {
            format,
            color,
            out,
            err,
        }
    }

    pub fn validating(&mut self, path: &Path) -> Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "Validating {}", path.display())?,
            OutputFormat::Json => self.record(json!({
                "event": "validating",
                "path": path.display().to_string(),
            }))?,
        }
        Ok(())
    }

    pub fn passed(&mut self, path: &Path) -> Result<()> {
        if self.format == OutputFormat::Json {
            self.record(json!({
                "event": "ok",
                "path": path.display().to_string(),
            }))?;
        }
        Ok(())
    }

    /// Report a broken file. `with_detail` also prints the cause chain, for
    /// runs where the error is not propagated straight to the caller.
    pub fn failed(&mut self, path: &Path, error: &CheckError, with_detail: bool) -> Result<()> {
        let label = if self.color {
            PARSE_ERROR.red().bold().to_string()
        } else {
            PARSE_ERROR.to_string()
        };
        writeln!(self.err, "{label} {}", path.display())?;

        match self.format {
            OutputFormat::Text if with_detail => {
                writeln!(self.err, "  {}", error.detail())?;
            }
            OutputFormat::Text => {}
            OutputFormat::Json => self.record(json!({
                "event": "error",
                "path": path.display().to_string(),
                "message": error.detail(),
            }))?,
        }
        Ok(())
    }

    pub fn no_files(&mut self, target: &Path) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                let msg = if self.color {
                    NO_FILES.yellow().to_string()
                } else {
                    NO_FILES.to_string()
                };
                writeln!(self.out, "{msg}")?;
            }
            OutputFormat::Json => self.record(json!({
                "event": "empty",
                "path": target.display().to_string(),
            }))?,
        }
        Ok(())
    }

    /// End-of-run line. Text mode prints nothing when something failed; the
    /// propagated error carries that message instead.
    pub fn summary(&mut self, checked: usize, errors: &[String]) -> Result<()> {
        match self.format {
            OutputFormat::Text if errors.is_empty() => {
                let msg = if self.color {
                    ALL_OK.green().to_string()
                } else {
                    ALL_OK.to_string()
                };
                writeln!(self.out, "{msg}")?;
            }
            OutputFormat::Text => {}
            OutputFormat::Json => self.record(json!({
                "event": "summary",
                "checked": checked,
                "failed": errors.len(),
                "errors": errors,
            }))?,
        }
        Ok(())
    }

    fn record(&mut self, value: Value) -> Result<()> {
        writeln!(self.out, "{}", serde_json::to_string(&value)?)?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn reporter(format: OutputFormat) -> Reporter<Vec<u8>, Vec<u8>> {
        Reporter::new(format, false, Vec::new(), Vec::new())
    }

    fn tag_error() -> CheckError {
        CheckError::UnsupportedTag {
            path: PathBuf::from("bad.yml"),
            tag: "!Ref".into(),
            line: 1,
        }
    }

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn text_success_run() {
        let mut r = reporter(OutputFormat::Text);
        r.validating(Path::new("a.yml")).unwrap();
        r.passed(Path::new("a.yml")).unwrap();
        r.summary(1, &[]).unwrap();

        let (out, err) = r.into_parts();
        assert_eq!(text(out), format!("Validating a.yml\n{ALL_OK}\n"));
        assert!(err.is_empty());
    }

    #[test]
    fn text_failure_goes_to_stderr() {
        let mut r = reporter(OutputFormat::Text);
        r.failed(Path::new("bad.yml"), &tag_error(), false).unwrap();

        let (out, err) = r.into_parts();
        assert!(out.is_empty());
        assert_eq!(text(err), "YAML parse error in: bad.yml\n");
    }

    #[test]
    fn text_failure_with_detail() {
        let mut r = reporter(OutputFormat::Text);
        r.failed(Path::new("bad.yml"), &tag_error(), true).unwrap();

        let (_, err) = r.into_parts();
        let err = text(err);
        let mut lines = err.lines();
        assert_eq!(lines.next(), Some("YAML parse error in: bad.yml"));
        assert!(lines.next().unwrap().contains("'!Ref'"));
    }

    #[test]
    fn json_records_are_one_per_line() {
        let mut r = reporter(OutputFormat::Json);
        r.validating(Path::new("bad.yml")).unwrap();
        r.failed(Path::new("bad.yml"), &tag_error(), false).unwrap();
        r.summary(1, &["bad.yml".into()]).unwrap();

        let (out, err) = r.into_parts();
        let records: Vec<Value> = text(out)
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["event"], "validating");
        assert_eq!(records[1]["event"], "error");
        assert_eq!(records[1]["path"], "bad.yml");
        assert_eq!(records[2]["failed"], 1);
        assert!(text(err).starts_with(PARSE_ERROR));
    }

    #[test]
    fn no_files_message() {
        let mut r = reporter(OutputFormat::Text);
        r.no_files(Path::new("wf")).unwrap();
        let (out, _) = r.into_parts();
        assert_eq!(text(out), "No workflow files found\n");
    }
}
