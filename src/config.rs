//! Edit script configuration for rope-edit
//!
//! ```toml
//! [input]
//! path = "notes.txt"
//!
//! [output]
//! stats = true
//!
//! [[ops]]
//! op = "drop_prefix"
//! count = 6
//! ```

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid edit script: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{0} needs either `text` or `path`")]
    MissingSource(&'static str),
    #[error("{0} takes `text` or `path`, not both")]
    AmbiguousSource(&'static str),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EditScript {
    #[serde(default)]
    pub input: Source,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub ops: Vec<Op>,

    /// Directory relative paths resolve against (the script's own directory)
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// Inline text or a file to read, exactly one of the two
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Source {
    pub text: Option<String>,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Destination file, stdout when absent
    pub path: Option<PathBuf>,
    /// Print length, depth and leaf counts to stderr
    #[serde(default)]
    pub stats: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryConfig {
    #[serde(default = "default_max_versions")]
    pub max_versions: usize,
}

/// One edit. Offsets are byte offsets and are clamped to the document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    Slice {
        start: i64,
        end: i64,
    },
    DropPrefix {
        count: i64,
    },
    DropPostfix {
        len: i64,
    },
    Append {
        text: Option<String>,
        path: Option<PathBuf>,
    },
    Prepend {
        text: Option<String>,
        path: Option<PathBuf>,
    },
    Insert {
        at: i64,
        text: Option<String>,
        path: Option<PathBuf>,
    },
    Delete {
        start: i64,
        end: i64,
    },
    Undo,
    Redo,
}

impl Op {
    pub fn name(&self) -> &'static str {
        match self {
            Op::Slice { .. } => "slice",
            Op::DropPrefix { .. } => "drop_prefix",
            Op::DropPostfix { .. } => "drop_postfix",
            Op::Append { .. } => "append",
            Op::Prepend { .. } => "prepend",
            Op::Insert { .. } => "insert",
            Op::Delete { .. } => "delete",
            Op::Undo => "undo",
            Op::Redo => "redo",
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_versions: default_max_versions(),
        }
    }
}

fn default_max_versions() -> usize {
    100
}

impl EditScript {
    /// Load a script from disk; relative paths inside it resolve next to it
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut script = Self::from_toml(&content)?;
        script.base_dir = path.parent().map(Path::to_path_buf);

        tracing::info!(
            script = %path.display(),
            ops = script.ops.len(),
            "loaded edit script"
        );
        Ok(script)
    }

    pub fn from_toml(content: &str) -> Result<Self, ScriptError> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve `path` against the script directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_script() {
        let script = EditScript::from_toml(
            r#"
            [input]
            text = "hello world"

            [output]
            path = "out.txt"
            stats = true

            [history]
            max_versions = 5

            [[ops]]
            op = "slice"
            start = 0
            end = 5

            [[ops]]
            op = "insert"
            at = 2
            text = "--"

            [[ops]]
            op = "undo"
            "#,
        )
        .unwrap();

        assert_eq!(script.input.text.as_deref(), Some("hello world"));
        assert_eq!(script.output.path, Some(PathBuf::from("out.txt")));
        assert!(script.output.stats);
        assert_eq!(script.history.max_versions, 5);
        assert_eq!(
            script.ops,
            vec![
                Op::Slice { start: 0, end: 5 },
                Op::Insert {
                    at: 2,
                    text: Some("--".to_string()),
                    path: None
                },
                Op::Undo,
            ]
        );
    }

    #[test]
    fn test_defaults() {
        let script = EditScript::from_toml("").unwrap();
        assert_eq!(script.input, Source::default());
        assert!(!script.output.stats);
        assert_eq!(script.history.max_versions, 100);
        assert!(script.ops.is_empty());
    }

    #[test]
    fn test_unknown_op_is_rejected() {
        let err = EditScript::from_toml("[[ops]]\nop = \"rotate\"\n").unwrap_err();
        assert!(matches!(err, ScriptError::Parse(_)));
    }

    #[test]
    fn test_resolve_relative_to_script() {
        let script = EditScript {
            base_dir: Some(PathBuf::from("/scripts")),
            ..Default::default()
        };
        assert_eq!(
            script.resolve(Path::new("a.txt")),
            PathBuf::from("/scripts/a.txt")
        );
        assert_eq!(script.resolve(Path::new("/abs.txt")), PathBuf::from("/abs.txt"));
    }
}
