//! Structural model of a compilation unit
//!
//! The model is deliberately small: imports, an optional namespace, and the
//! classes of a file with their methods. It is produced by a parser from
//! source text and built directly by the synthesizer for generated files.

use std::fmt;

/// One parsed or synthesized source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilationUnit {
    /// Import (`using`) declarations in declaration order
    pub imports: Vec<ImportDeclaration>,
    /// Namespace the classes live in, if any
    pub namespace: Option<String>,
    /// Class declarations in document order, nested classes included
    pub classes: Vec<ClassDeclaration>,
}

impl CompilationUnit {
    /// Create empty unit
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With namespace
    #[inline]
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// With import appended
    #[inline]
    #[must_use]
    pub fn with_import(mut self, import: ImportDeclaration) -> Self {
        self.imports.push(import);
        self
    }

    /// With class appended
    #[inline]
    #[must_use]
    pub fn with_class(mut self, class: ClassDeclaration) -> Self {
        self.classes.push(class);
        self
    }

    /// Find first class by name
    #[must_use]
    pub fn find_class(&self, name: &str) -> Option<&ClassDeclaration> {
        self.classes.iter().find(|c| c.name == name)
    }
}

/// A `using` directive
///
/// Identity for deduplication is [`ImportDeclaration::path`] alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportDeclaration {
    /// Dotted namespace or type path
    pub path: String,
    /// Alias name for `using Alias = Path;`
    pub alias: Option<String>,
    /// `using static Path;`
    pub is_static: bool,
    /// `global using Path;`
    pub is_global: bool,
}

impl ImportDeclaration {
    /// Plain `using Path;`
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: None,
            is_static: false,
            is_global: false,
        }
    }

    /// Alias form `using Alias = Path;`
    #[inline]
    #[must_use]
    pub fn aliased(alias: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            ..Self::new(path)
        }
    }

    /// Mark as `using static`
    #[inline]
    #[must_use]
    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Mark as `global using`
    #[inline]
    #[must_use]
    pub fn with_global(mut self) -> Self {
        self.is_global = true;
        self
    }
}

/// Declaration modifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// `public`
    Public,
    /// `private`
    Private,
    /// `protected`
    Protected,
    /// `internal`
    Internal,
    /// `static`
    Static,
    /// `abstract`
    Abstract,
    /// `sealed`
    Sealed,
    /// `partial`
    Partial,
    /// Any other keyword (`virtual`, `override`, `async`, ...)
    Other(String),
}

impl Modifier {
    /// Map a modifier keyword to its variant
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "public" => Self::Public,
            "private" => Self::Private,
            "protected" => Self::Protected,
            "internal" => Self::Internal,
            "static" => Self::Static,
            "abstract" => Self::Abstract,
            "sealed" => Self::Sealed,
            "partial" => Self::Partial,
            other => Self::Other(other.to_string()),
        }
    }

    /// Source keyword
    #[must_use]
    pub fn keyword(&self) -> &str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Protected => "protected",
            Self::Internal => "internal",
            Self::Static => "static",
            Self::Abstract => "abstract",
            Self::Sealed => "sealed",
            Self::Partial => "partial",
            Self::Other(keyword) => keyword,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A class declaration with its direct methods
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDeclaration {
    /// Class identifier
    pub name: String,
    /// Modifiers in source order
    pub modifiers: Vec<Modifier>,
    /// Attribute names (`[TestClass]` → `TestClass`)
    pub attributes: Vec<String>,
    /// Methods declared directly in the class body
    pub methods: Vec<MethodDeclaration>,
}

impl ClassDeclaration {
    /// Create class with no modifiers or members
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Vec::new(),
            attributes: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// With modifier appended
    #[inline]
    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// With attribute appended
    #[inline]
    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    /// With method appended
    #[inline]
    #[must_use]
    pub fn with_method(mut self, method: MethodDeclaration) -> Self {
        self.methods.push(method);
        self
    }

    /// Whether the class is declared `public`
    #[inline]
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.modifiers.contains(&Modifier::Public)
    }

    /// Public methods in declaration order
    pub fn public_methods(&self) -> impl Iterator<Item = &MethodDeclaration> {
        self.methods.iter().filter(|m| m.is_public())
    }
}

/// A method declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDeclaration {
    /// Method identifier
    pub name: String,
    /// Modifiers in source order
    pub modifiers: Vec<Modifier>,
    /// Attribute names
    pub attributes: Vec<String>,
    /// Return type as written (`void`, `Task<int>`, ...)
    pub return_type: String,
    /// Formal parameters
    pub parameters: Vec<Parameter>,
    /// Method body
    pub body: MethodBody,
}

impl MethodDeclaration {
    /// Create `void` method with empty opaque body
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Vec::new(),
            attributes: Vec::new(),
            return_type: "void".to_string(),
            parameters: Vec::new(),
            body: MethodBody::Opaque(String::new()),
        }
    }

    /// With modifier appended
    #[inline]
    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// With attribute appended
    #[inline]
    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    /// With return type
    #[inline]
    #[must_use]
    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = return_type.into();
        self
    }

    /// With parameter appended
    #[inline]
    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// With body
    #[inline]
    #[must_use]
    pub fn with_body(mut self, body: MethodBody) -> Self {
        self.body = body;
        self
    }

    /// Whether the method is declared `public`
    #[inline]
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.modifiers.contains(&Modifier::Public)
    }
}

/// Formal parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter type as written
    pub ty: String,
    /// Parameter name
    pub name: String,
}

impl Parameter {
    /// Create parameter
    #[inline]
    #[must_use]
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
        }
    }
}

/// Method body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodBody {
    /// Body kept as verbatim source text; empty for bodiless declarations
    Opaque(String),
    /// Structured statement block
    Block(Vec<Statement>),
}

/// Statement inside a structured block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `expr;`
    Expression(Expression),
}

/// Expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// `A.B.C(args)`
    Invocation {
        /// Dotted callee path segments
        callee: Vec<String>,
        /// Call arguments
        arguments: Vec<Expression>,
    },
    /// String literal holding the unescaped value
    StringLiteral(String),
    /// Bare identifier
    Identifier(String),
}

impl Expression {
    /// Build an invocation from a dotted path
    #[must_use]
    pub fn call(callee: &[&str], arguments: Vec<Expression>) -> Self {
        Self::Invocation {
            callee: callee.iter().map(|s| (*s).to_string()).collect(),
            arguments,
        }
    }
}
