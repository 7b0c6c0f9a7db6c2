//! C# support: tree-sitter parsing and canonical printing

use crate::error::ParseError;
use crate::model::CompilationUnit;
use crate::SourceSyntax;

mod parser;
mod printer;

pub use printer::{LineEnding, PrintOptions};

/// C# implementation of [`SourceSyntax`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CSharpSyntax {
    options: PrintOptions,
}

impl CSharpSyntax {
    /// Create with default print options (4 spaces, CRLF)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With print options
    #[inline]
    #[must_use]
    pub fn with_options(mut self, options: PrintOptions) -> Self {
        self.options = options;
        self
    }

    /// With line ending
    #[inline]
    #[must_use]
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.options.line_ending = line_ending;
        self
    }

    /// Get print options
    #[inline]
    #[must_use]
    pub fn options(&self) -> PrintOptions {
        self.options
    }
}

impl SourceSyntax for CSharpSyntax {
    fn parse(&self, text: &str) -> Result<CompilationUnit, ParseError> {
        parser::parse_compilation_unit(text)
    }

    fn render(&self, unit: &CompilationUnit) -> String {
        printer::render_compilation_unit(unit, self.options)
    }

    fn extension(&self) -> &'static str {
        "cs"
    }
}
