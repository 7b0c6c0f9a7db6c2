//! TGen Syntax
//!
//! Structural model of C# compilation units and the parse/render capability
//! the generator is built on.
//!
//! # Architecture
//!
//! ```text
//! source text → SourceSyntax::parse → CompilationUnit → SourceSyntax::render → source text
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use tgen_syntax::{CSharpSyntax, SourceSyntax};
//!
//! let syntax = CSharpSyntax::new();
//! let unit = syntax.parse("namespace App { public class Foo { } }")?;
//! assert_eq!(unit.classes[0].name, "Foo");
//! println!("{}", syntax.render(&unit));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod csharp;
pub mod error;
pub mod model;

pub use csharp::{CSharpSyntax, LineEnding, PrintOptions};
pub use error::ParseError;
pub use model::{
    ClassDeclaration, CompilationUnit, Expression, ImportDeclaration, MethodBody,
    MethodDeclaration, Modifier, Parameter, Statement,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse/render capability for one source language
///
/// Implementations must be pure: the same text always parses to the same
/// tree and the same tree always renders to the same text.
pub trait SourceSyntax: Send + Sync + 'static {
    /// Parse source text into a compilation unit
    ///
    /// # Errors
    /// Returns `ParseError` when the text is not well-formed
    fn parse(&self, text: &str) -> Result<CompilationUnit, ParseError>;

    /// Render a compilation unit to source text
    fn render(&self, unit: &CompilationUnit) -> String;

    /// File extension (without dot) for rendered files
    fn extension(&self) -> &'static str;
}

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with compilation units
    pub use crate::model::{
        ClassDeclaration, CompilationUnit, Expression, ImportDeclaration, MethodBody,
        MethodDeclaration, Modifier, Statement,
    };
    pub use crate::{CSharpSyntax, ParseError, SourceSyntax};
}
