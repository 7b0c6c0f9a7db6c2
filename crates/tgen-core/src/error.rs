//! Error types for TGen Core
//!
//! Two levels:
//! - `GeneratorError`: the run as a whole could not proceed
//! - `TaskError`: one read, parse, generate or write task failed; the run
//!   continues and the failure lands in the report

use serde::{Serialize, Serializer};
use std::path::PathBuf;
use tgen_syntax::ParseError;

/// Fatal run error
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Configuration rejected before starting
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Output directory could not be created
    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stage dispatcher stopped abnormally
    #[error("{stage} stage failed: {message}")]
    Stage {
        stage: &'static str,
        message: String,
    },
}

impl GeneratorError {
    /// Create stage failure
    pub fn stage(stage: &'static str, message: impl Into<String>) -> Self {
        Self::Stage {
            stage,
            message: message.into(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A stage parallelism limit is zero
    #[error("{stage} parallelism must be positive")]
    ZeroParallelism { stage: &'static str },

    /// Output directory path is empty
    #[error("output directory must not be empty")]
    EmptyOutputDir,

    /// Config file could not be read
    #[error("cannot read config file {path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failure reading one input path
#[derive(Debug, thiserror::Error)]
#[error("cannot read {path}: {source}")]
pub struct ReadError {
    /// Input path
    pub path: PathBuf,
    /// Underlying IO error
    #[source]
    pub source: std::io::Error,
}

impl ReadError {
    /// Create read error for path
    pub fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// Failure writing one generated file
#[derive(Debug, thiserror::Error)]
#[error("cannot write {path}: {source}")]
pub struct WriteError {
    /// Output path
    pub path: PathBuf,
    /// Underlying IO error
    #[source]
    pub source: std::io::Error,
}

impl WriteError {
    /// Create write error for path
    pub fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// Per-task failure, reported against the input path it came from
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Input could not be read
    #[error(transparent)]
    Read(#[from] ReadError),

    /// Input could not be parsed
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// Generation task died before producing output
    #[error("generation failed for {path}: {message}")]
    Generate { path: PathBuf, message: String },

    /// Output could not be written
    #[error(transparent)]
    Write(#[from] WriteError),

    /// Two generated files mapped to the same output path
    #[error("output {output} from {path} collides with output from {previous}")]
    NameCollision {
        /// Shared output path
        output: PathBuf,
        /// Input that produced this file
        path: PathBuf,
        /// Input that produced the earlier file
        previous: PathBuf,
    },
}

impl TaskError {
    /// Create parse failure
    pub fn parse(path: impl Into<PathBuf>, source: ParseError) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Short kind label
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Read(_) => "read",
            Self::Parse { .. } => "parse",
            Self::Generate { .. } => "generate",
            Self::Write(_) => "write",
            Self::NameCollision { .. } => "name-collision",
        }
    }
}

impl Serialize for TaskError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("TaskError", 2)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for generator runs
pub type GeneratorResult<T> = Result<T, GeneratorError>;
