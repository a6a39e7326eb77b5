use std::error::Error as _;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Path not found: {}", path.display())]
    PathNotFound { path: PathBuf },

    #[error("Cannot list directory '{}'", path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in '{}'", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: yaml_rust2::scanner::ScanError,
    },

    #[error("Unsafe YAML in '{}' at line {line}: could not determine a constructor for the tag '{tag}'", path.display())]
    UnsupportedTag {
        path: PathBuf,
        tag: String,
        line: usize,
    },

    #[error("Invalid YAML in '{}' at line {line}: tag '{tag}': {reason}", path.display())]
    InvalidTagged {
        path: PathBuf,
        tag: String,
        line: usize,
        reason: String,
    },

    #[error("Invalid YAML in '{}': expected a single document in the stream, found {count}", path.display())]
    MultipleDocuments { path: PathBuf, count: usize },

    #[error("{failed} of {checked} file(s) failed to parse")]
    FilesFailed { failed: usize, checked: usize },
}

impl CheckError {
    /// Message and every underlying cause on one line, `outer: inner`.
    pub fn detail(&self) -> String {
        let mut out = self.to_string();
        let mut cause = self.source();
        while let Some(err) = cause {
            out.push_str(": ");
            out.push_str(&err.to_string());
            cause = err.source();
        }
        out
    }
}
