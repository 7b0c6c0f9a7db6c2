//! Run report
//!
//! Built from the stream of [`StageEvent`]s emitted by pipeline tasks. One
//! [`FileReport`] per configured input path, in input order.

use crate::error::TaskError;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Position of an input path in the configured path list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourceId(pub usize);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outcome reported by a pipeline task
#[derive(Debug)]
pub enum StageEvent {
    /// Source parsed; generated class names in declaration order
    Generated {
        source: SourceId,
        classes: Vec<String>,
    },
    /// Output file persisted
    Written { source: SourceId, output: PathBuf },
    /// Task failed
    Failed { source: SourceId, error: TaskError },
    /// Non-fatal condition worth surfacing
    Warning { source: SourceId, error: TaskError },
}

impl StageEvent {
    /// Input the event belongs to
    #[inline]
    #[must_use]
    pub fn source(&self) -> SourceId {
        match self {
            Self::Generated { source, .. }
            | Self::Written { source, .. }
            | Self::Failed { source, .. }
            | Self::Warning { source, .. } => *source,
        }
    }
}

/// Overall status of one input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Every generated file written
    Succeeded,
    /// Parsed fine but declared no classes
    Empty,
    /// At least one task failed
    Failed,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Succeeded => "ok",
            Self::Empty => "empty",
            Self::Failed => "FAILED",
        };
        f.write_str(label)
    }
}

/// Outcome for one input path
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// Input path
    pub path: PathBuf,
    /// Generated class names in declaration order
    pub classes: Vec<String>,
    /// Output files written
    pub written: Vec<PathBuf>,
    /// Failures attributed to this input
    pub errors: Vec<TaskError>,
    /// Warnings attributed to this input
    pub warnings: Vec<TaskError>,
}

impl FileReport {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            classes: Vec::new(),
            written: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Overall status
    #[must_use]
    pub fn status(&self) -> FileStatus {
        if !self.errors.is_empty() {
            FileStatus::Failed
        } else if self.classes.is_empty() {
            FileStatus::Empty
        } else {
            FileStatus::Succeeded
        }
    }
}

/// Aggregate outcome of a generator run
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    /// One entry per configured input path, in input order
    pub files: Vec<FileReport>,
}

impl RunReport {
    /// Create report with one empty entry per input path
    #[must_use]
    pub fn for_paths(paths: &[PathBuf]) -> Self {
        Self {
            files: paths.iter().cloned().map(FileReport::new).collect(),
        }
    }

    /// Fold one event into the report
    pub fn record(&mut self, event: StageEvent) {
        let source = event.source();
        let Some(file) = self.files.get_mut(source.0) else {
            tracing::warn!(%source, "event for unknown source dropped");
            return;
        };

        match event {
            StageEvent::Generated { classes, .. } => file.classes = classes,
            StageEvent::Written { output, .. } => file.written.push(output),
            StageEvent::Failed { error, .. } => file.errors.push(error),
            StageEvent::Warning { error, .. } => file.warnings.push(error),
        }
    }

    /// Whether every task succeeded
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Total task failures
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Total warnings
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.files.iter().map(|f| f.warnings.len()).sum()
    }

    /// Total output files written
    #[must_use]
    pub fn written_count(&self) -> usize {
        self.files.iter().map(|f| f.written.len()).sum()
    }

    /// Total classes generated
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.files.iter().map(|f| f.classes.len()).sum()
    }

    /// Report entry for an input path (first match)
    #[must_use]
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&FileReport> {
        let path = path.as_ref();
        self.files.iter().find(|f| f.path == path)
    }

    /// All failures across inputs
    pub fn failures(&self) -> impl Iterator<Item = &TaskError> {
        self.files.iter().flat_map(|f| f.errors.iter())
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for file in &self.files {
            writeln!(
                f,
                "[{}] {} ({} classes, {} written)",
                file.status(),
                file.path.display(),
                file.classes.len(),
                file.written.len()
            )?;
            for error in &file.errors {
                writeln!(f, "    error: {error}")?;
            }
            for warning in &file.warnings {
                writeln!(f, "    warning: {warning}")?;
            }
        }
        write!(
            f,
            "{} files, {} classes, {} written, {} failed, {} warnings",
            self.files.len(),
            self.class_count(),
            self.written_count(),
            self.failure_count(),
            self.warning_count()
        )
    }
}
