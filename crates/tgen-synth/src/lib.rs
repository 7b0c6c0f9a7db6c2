//! TGen Synth
//!
//! Synthesis of test-stub classes: one `<Class>Tests` per source class, one
//! intentionally failing test per public method.
//!
//! # Example
//!
//! ```rust,ignore
//! use tgen_syntax::CSharpSyntax;
//! use tgen_synth::TestSynthesizer;
//!
//! let synthesizer = TestSynthesizer::new(CSharpSyntax::new());
//! for file in synthesizer.generate_all(source)? {
//!     println!("{}: {} bytes", file.name, file.content.len());
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod framework;
pub mod naming;
pub mod synthesizer;

pub use framework::{TestFramework, UnknownFramework};
pub use naming::UniqueNames;
pub use synthesizer::{merge_imports, test_class_name, test_namespace, TestFile, TestSynthesizer};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
