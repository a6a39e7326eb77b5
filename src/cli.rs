use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Check that YAML workflow files parse – for pre-commit hooks and CI.
#[derive(Parser, Debug)]
#[command(name = "yamlcheck", version, about)]
pub struct Cli {
    /// File or directory to check.
    /// A directory is scanned (non-recursively) for *.yml and *.yaml files;
    /// a file is checked whatever its extension.
    /// Defaults to ./.github/workflows.
    #[arg(value_name = "PATH", env = "YAMLCHECK_PATH")]
    pub path: Option<PathBuf>,

    /// Keep going after a parse error and report every broken file.
    /// Without this flag the first error stops the run.
    #[arg(long, env = "YAMLCHECK_COLLECT_ALL")]
    pub collect_all: bool,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Config file [default: <config dir>/yamlcheck/config.yaml]
    #[arg(long, value_name = "FILE", env = "YAMLCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr (RUST_LOG takes precedence).
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable coloured output.
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines (default).
    Text,
    /// Newline-delimited JSON records – one per event.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_is_optional() {
        let cli = Cli::try_parse_from(["yamlcheck"]).unwrap();
        assert!(cli.path.is_none());
        assert!(!cli.collect_all);
        assert_eq!(cli.output, OutputFormat::Text);
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "yamlcheck",
            "--collect-all",
            "--output",
            "json",
            "-v",
            "ci/workflows",
        ])
        .unwrap();
        assert_eq!(cli.path, Some(PathBuf::from("ci/workflows")));
        assert!(cli.collect_all);
        assert!(cli.verbose);
        assert_eq!(cli.output, OutputFormat::Json);
    }

    #[test]
    fn rejects_unknown_output_format() {
        assert!(Cli::try_parse_from(["yamlcheck", "--output", "xml"]).is_err());
    }
}
