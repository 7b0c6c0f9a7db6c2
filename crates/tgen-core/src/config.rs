//! Generator configuration
//!
//! Immutable once a run starts. Built programmatically with `with_*`
//! methods or loaded from TOML:
//!
//! ```toml
//! read_parallelism = 3
//! generate_parallelism = 6
//! write_parallelism = 3
//! paths = ["src/Foo.cs", "src/Bar.cs"]
//! output_dir = "generated"
//! framework = "mstest"
//! line_ending = "crlf"
//! collision_policy = "overwrite"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tgen_syntax::LineEnding;
use tgen_synth::TestFramework;

/// Default concurrent reads
pub const DEFAULT_READ_PARALLELISM: usize = 3;
/// Default concurrent parse+synthesize tasks
pub const DEFAULT_GENERATE_PARALLELISM: usize = 6;
/// Default concurrent writes
pub const DEFAULT_WRITE_PARALLELISM: usize = 3;

/// What to do when two generated files map to the same output path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Later file wins; collision reported as a warning
    #[default]
    Overwrite,
    /// Earlier file wins; later file is skipped and reported as a failure
    Skip,
}

impl std::str::FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "skip" => Ok(Self::Skip),
            other => Err(format!("unknown collision policy: {other}")),
        }
    }
}

/// Generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Maximum concurrent file reads
    pub read_parallelism: usize,
    /// Maximum concurrent parse+synthesize tasks
    pub generate_parallelism: usize,
    /// Maximum concurrent file writes
    pub write_parallelism: usize,
    /// Input files; duplicates are read independently
    pub paths: Vec<PathBuf>,
    /// Destination directory, created if absent
    pub output_dir: PathBuf,
    /// Test framework for generated markers
    pub framework: TestFramework,
    /// Line terminator of generated files
    pub line_ending: LineEnding,
    /// Output name collision handling
    pub collision_policy: CollisionPolicy,
}

impl GeneratorConfig {
    /// Create configuration with default limits
    #[inline]
    #[must_use]
    pub fn new(paths: Vec<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            paths,
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// With all three parallelism limits
    #[inline]
    #[must_use]
    pub fn with_parallelism(mut self, read: usize, generate: usize, write: usize) -> Self {
        self.read_parallelism = read;
        self.generate_parallelism = generate;
        self.write_parallelism = write;
        self
    }

    /// With input path appended
    #[inline]
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// With test framework
    #[inline]
    #[must_use]
    pub fn with_framework(mut self, framework: TestFramework) -> Self {
        self.framework = framework;
        self
    }

    /// With line ending
    #[inline]
    #[must_use]
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// With collision policy
    #[inline]
    #[must_use]
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    /// Check limits and output directory
    ///
    /// # Errors
    /// - `ConfigError::ZeroParallelism` if any stage limit is zero
    /// - `ConfigError::EmptyOutputDir` if the output directory is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (stage, limit) in [
            ("read", self.read_parallelism),
            ("generate", self.generate_parallelism),
            ("write", self.write_parallelism),
        ] {
            if limit == 0 {
                return Err(ConfigError::ZeroParallelism { stage });
            }
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyOutputDir);
        }

        Ok(())
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` if the text does not match the schema
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Load from a TOML file
    ///
    /// Relative input and output paths are resolved against the file's directory.
    ///
    /// # Errors
    /// - `ConfigError::Unreadable` if the file cannot be read
    /// - `ConfigError::Invalid` if the contents do not match the schema
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut config = Self::from_toml_str(&text)?;
        if let Some(base) = path.parent() {
            config.paths = config.paths.iter().map(|p| base.join(p)).collect();
            if !config.output_dir.as_os_str().is_empty() {
                config.output_dir = base.join(&config.output_dir);
            }
        }
        Ok(config)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            read_parallelism: DEFAULT_READ_PARALLELISM,
            generate_parallelism: DEFAULT_GENERATE_PARALLELISM,
            write_parallelism: DEFAULT_WRITE_PARALLELISM,
            paths: Vec::new(),
            output_dir: PathBuf::new(),
            framework: TestFramework::default(),
            line_ending: LineEnding::default(),
            collision_policy: CollisionPolicy::default(),
        }
    }
}
