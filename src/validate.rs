use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use std::path::{Path, PathBuf};
use tracing::debug;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::Marker;

use crate::error::CheckError;

const CORE_HANDLE: &str = "!!";
const CORE_PREFIX: &str = "tag:yaml.org,2002:";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Node {
    Scalar,
    Sequence,
    Mapping,
}

impl Node {
    fn name(self) -> &'static str {
        match self {
            Node::Scalar => "scalar",
            Node::Sequence => "sequence",
            Node::Mapping => "mapping",
        }
    }
}

/// Tags of the YAML core schema and the node kind each one applies to.
const CORE_TAGS: &[(&str, Node)] = &[
    ("str", Node::Scalar),
    ("int", Node::Scalar),
    ("float", Node::Scalar),
    ("bool", Node::Scalar),
    ("null", Node::Scalar),
    ("binary", Node::Scalar),
    ("timestamp", Node::Scalar),
    ("merge", Node::Scalar),
    ("seq", Node::Sequence),
    ("omap", Node::Sequence),
    ("pairs", Node::Sequence),
    ("map", Node::Mapping),
    ("set", Node::Mapping),
];

/// Safe-load a single file.
///
/// The file is read as UTF-8 and run through the YAML parser event by event;
/// nothing is constructed. Application tags (`!!python/object`, `!Ref`, …)
/// are rejected, core tags must fit their node and value, and a stream may
/// hold at most one document. Duplicate keys are a semantic matter and pass.
pub fn validate(path: &Path) -> Result<(), CheckError> {
    let content = std::fs::read_to_string(path).map_err(|source| CheckError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    check_str(path, &content)
}

/// Safe-load YAML `content`; `path` is only used for error context.
pub fn check_str(path: &Path, content: &str) -> Result<(), CheckError> {
    let mut check = SafeLoad::new(path);
    Parser::new_from_str(content)
        .load(&mut check, true)
        .map_err(|source| CheckError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if let Some(err) = check.error {
        return Err(err);
    }
    if check.documents > 1 {
        return Err(CheckError::MultipleDocuments {
            path: path.to_path_buf(),
            count: check.documents,
        });
    }

    debug!(path = %path.display(), "parsed");
    Ok(())
}

/// Event sink that keeps the first tag violation.
struct SafeLoad {
    path: PathBuf,
    documents: usize,
    error: Option<CheckError>,
}

enum Rejection {
    Unknown,
    Invalid(String),
}

impl SafeLoad {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            documents: 0,
            error: None,
        }
    }

    fn reject(&mut self, tag: &Tag, mark: Marker, rejection: Rejection) {
        let path = self.path.clone();
        let tag = format!("{}{}", tag.handle, tag.suffix);
        let line = mark.line();
        self.error = Some(match rejection {
            Rejection::Unknown => CheckError::UnsupportedTag { path, tag, line },
            Rejection::Invalid(reason) => CheckError::InvalidTagged {
                path,
                tag,
                line,
                reason,
            },
        });
    }
}

impl MarkedEventReceiver for SafeLoad {
    fn on_event(&mut self, ev: Event, mark: Marker) {
        if self.error.is_some() {
            return;
        }
        let (tag, result) = match ev {
            Event::DocumentEnd => {
                self.documents += 1;
                return;
            }
            Event::Scalar(value, _, _, Some(tag)) => {
                let result = core_name(&tag, Node::Scalar)
                    .and_then(|name| check_scalar(name, &value).map_err(Rejection::Invalid));
                (tag, result)
            }
            Event::SequenceStart(_, Some(tag)) => {
                let result = core_name(&tag, Node::Sequence).map(drop);
                (tag, result)
            }
            Event::MappingStart(_, Some(tag)) => {
                let result = core_name(&tag, Node::Mapping).map(drop);
                (tag, result)
            }
            _ => return,
        };
        if let Err(rejection) = result {
            self.reject(&tag, mark, rejection);
        }
    }
}

/// Core schema name of `tag` when it resolves to one and suits `node`.
/// The bare non-specific tag `!` yields `None`.
fn core_name(tag: &Tag, node: Node) -> Result<Option<&'static str>, Rejection> {
    let suffix = match (tag.handle.as_str(), tag.suffix.as_str()) {
        (CORE_HANDLE | CORE_PREFIX, suffix) => suffix,
        // Verbatim `!<tag:yaml.org,2002:str>`.
        ("" | "!", suffix) if suffix.starts_with(CORE_PREFIX) => &suffix[CORE_PREFIX.len()..],
        ("", "!") | ("!", "") => return Ok(None),
        _ => return Err(Rejection::Unknown),
    };

    let (name, expected) = CORE_TAGS
        .iter()
        .find(|(name, _)| *name == suffix)
        .ok_or(Rejection::Unknown)?;

    if *expected != node {
        return Err(Rejection::Invalid(format!(
            "expected a {} node, but found {}",
            expected.name(),
            node.name()
        )));
    }
    Ok(Some(*name))
}

fn check_scalar(name: Option<&str>, value: &str) -> Result<(), String> {
    let valid = match name {
        Some("bool") => is_bool(value),
        Some("int") => is_int(value),
        Some("float") => is_float(value),
        Some("binary") => {
            let packed: String = value.chars().filter(|c| !c.is_whitespace()).collect();
            return BASE64
                .decode(packed)
                .map(drop)
                .map_err(|e| format!("failed to decode base64 data: {e}"));
        }
        _ => true,
    };
    if valid {
        Ok(())
    } else {
        Err(format!("invalid {} value '{value}'", name.unwrap_or("str")))
    }
}

fn is_bool(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "yes" | "no" | "true" | "false" | "on" | "off"
    )
}

fn is_int(value: &str) -> bool {
    let value = value.replace('_', "");
    let digits = value.trim_start_matches(['+', '-']);
    if let Some(bin) = digits.strip_prefix("0b") {
        !bin.is_empty() && bin.chars().all(|c| c == '0' || c == '1')
    } else if let Some(hex) = digits.strip_prefix("0x") {
        !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit())
    } else if digits.contains(':') {
        // Sexagesimal, e.g. 190:20:30.
        digits
            .split(':')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
    } else {
        // A leading 0 is octal.
        let octal = digits.len() > 1 && digits.starts_with('0');
        !digits.is_empty()
            && digits
                .chars()
                .all(|c| if octal { ('0'..='7').contains(&c) } else { c.is_ascii_digit() })
    }
}

fn is_float(value: &str) -> bool {
    let value = value.replace('_', "").to_ascii_lowercase();
    let unsigned = value.trim_start_matches(['+', '-']);
    if unsigned == ".inf" || value == ".nan" {
        return true;
    }
    if unsigned.contains(':') {
        let mut parts = unsigned.split(':');
        let last = parts.next_back().unwrap_or_default();
        return parts.all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
            && last.parse::<f64>().is_ok();
    }
    value.parse::<f64>().is_ok()
}
