//! Build trace accumulated while constructing a model.
//!
//! Every geometry decision worth auditing ends up here as one line; the
//! batch driver writes the lines to a per-scenario log file. Failed builds
//! keep their partial trace, which is usually the only way to see why a
//! scenario produced no model.

/// An append-only, human-readable trace of one geometry build.
#[derive(Debug, Default, Clone)]
pub struct BuildLog {
    lines: Vec<String>,
}

impl BuildLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// The accumulated lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing was logged.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Consume the log, yielding its lines.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
