//! TGen Core - test stub generation pipeline
//!
//! Reads C# source files, generates one `<Class>Tests` file per declared
//! class and writes the results to an output directory, with independent
//! parallelism limits for the read, generate and write stages.
//!
//! # Example
//!
//! ```rust,ignore
//! use tgen_core::{GeneratorConfig, TestGenerator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GeneratorConfig::new(vec!["src/Foo.cs".into()], "generated")
//!     .with_parallelism(3, 6, 3);
//! let report = TestGenerator::csharp(config).generate().await?;
//!
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
mod stage;

pub use config::{
    CollisionPolicy, GeneratorConfig, DEFAULT_GENERATE_PARALLELISM, DEFAULT_READ_PARALLELISM,
    DEFAULT_WRITE_PARALLELISM,
};
pub use error::{
    ConfigError, GeneratorError, GeneratorResult, ReadError, TaskError, WriteError,
};
pub use pipeline::TestGenerator;
pub use report::{FileReport, FileStatus, RunReport, SourceId, StageEvent};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running the generator
    pub use crate::{
        CollisionPolicy, GeneratorConfig, GeneratorError, RunReport, TaskError, TestGenerator,
    };
    pub use tgen_syntax::LineEnding;
    pub use tgen_synth::TestFramework;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
