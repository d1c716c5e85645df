//! Runs an edit script against a rope, keeping every version

use std::fmt;
use std::path::PathBuf;

use tiny_rope::Rope;

use crate::config::{EditScript, Op, ScriptError, Source};
use crate::history::History;

/// Summary of the final document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub len: usize,
    pub depth: u32,
    pub leaves: usize,
    pub lines: usize,
    pub versions: usize,
}

impl Stats {
    pub fn of(rope: &Rope, versions: usize) -> Self {
        Self {
            len: rope.len(),
            depth: rope.depth(),
            leaves: rope.leaf_count(),
            lines: rope.line_count(),
            versions,
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bytes, {} lines, depth {}, {} leaves, {} versions",
            self.len, self.lines, self.depth, self.leaves, self.versions
        )
    }
}

/// Current document plus the versions behind and ahead of it
pub struct Session<'a> {
    script: &'a EditScript,
    current: Rope,
    history: History,
    versions: usize,
}

impl<'a> Session<'a> {
    pub fn new(script: &'a EditScript) -> Result<Self, ScriptError> {
        let current = read_source(script, "input", &script.input)?;
        tracing::debug!(len = current.len(), "loaded input");
        Ok(Self {
            script,
            current,
            history: History::with_max_size(script.history.max_versions),
            versions: 1,
        })
    }

    pub fn current(&self) -> &Rope {
        &self.current
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn apply(&mut self, op: &Op) -> Result<(), ScriptError> {
        let next = match op {
            Op::Undo | Op::Redo => {
                self.step(op);
                return Ok(());
            }
            Op::Slice { start, end } => self.current.slice(*start, *end),
            Op::DropPrefix { count } => self.current.drop_prefix(*count),
            Op::DropPostfix { len } => self.current.drop_postfix(*len),
            Op::Delete { start, end } => self.current.delete(*start, *end),
            Op::Append { text, path } => {
                let tail = self.read_inline(op.name(), text, path)?;
                self.current.concat(&tail)
            }
            Op::Prepend { text, path } => {
                let head = self.read_inline(op.name(), text, path)?;
                head.concat(&self.current)
            }
            Op::Insert { at, text, path } => {
                let piece = self.read_inline(op.name(), text, path)?;
                self.current.insert(*at, &piece)
            }
        };

        if next.node().ptr_eq(self.current.node()) || next == self.current {
            tracing::debug!(op = op.name(), "content unchanged, no new version");
            return Ok(());
        }

        tracing::debug!(
            op = op.name(),
            len = next.len(),
            depth = next.depth(),
            "applied edit"
        );
        let previous = std::mem::replace(&mut self.current, next);
        self.history.checkpoint(previous);
        self.versions += 1;
        Ok(())
    }

    /// Undo or redo; an empty stack leaves the document as is
    fn step(&mut self, op: &Op) {
        let current = self.current.clone();
        let restored = match op {
            Op::Redo => self.history.redo(current),
            _ => self.history.undo(current),
        };
        match restored {
            Some(version) => {
                tracing::debug!(op = op.name(), len = version.len(), "restored version");
                self.current = version;
            }
            None => tracing::warn!(op = op.name(), "nothing to {}, ignoring", op.name()),
        }
    }

    fn read_inline(
        &self,
        name: &'static str,
        text: &Option<String>,
        path: &Option<PathBuf>,
    ) -> Result<Rope, ScriptError> {
        let source = Source {
            text: text.clone(),
            path: path.clone(),
        };
        read_source(self.script, name, &source)
    }

    pub fn stats(&self) -> Stats {
        Stats::of(&self.current, self.versions)
    }

    pub fn finish(self) -> Rope {
        self.current
    }
}

fn read_source(
    script: &EditScript,
    name: &'static str,
    source: &Source,
) -> Result<Rope, ScriptError> {
    match (&source.text, &source.path) {
        (Some(text), None) => Ok(Rope::from(text.as_str())),
        (None, Some(path)) => {
            let path = script.resolve(path);
            crate::io::load(&path).map_err(|source| ScriptError::Read { path, source })
        }
        (None, None) => Err(ScriptError::MissingSource(name)),
        (Some(_), Some(_)) => Err(ScriptError::AmbiguousSource(name)),
    }
}

/// Apply every op in order, returning the finished session
pub fn run(script: &EditScript) -> Result<Session<'_>, ScriptError> {
    let mut session = Session::new(script)?;
    for (i, op) in script.ops.iter().enumerate() {
        session.apply(op)?;
        tracing::info!(step = i + 1, op = op.name(), len = session.current().len(), "step done");
    }
    Ok(session)
}
